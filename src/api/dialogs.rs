use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{api_error, ApiResult};
use crate::state::AppState;
use subshelf_backend::catalog;
use subshelf_backend::models::{CreateDialogRequest, Dialog, UpdateDialogRequest};

/// POST /api/v1/dialogs - 创建对白
pub async fn create_dialog(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDialogRequest>,
) -> ApiResult<(StatusCode, Json<Dialog>)> {
    let dialog = catalog::create_dialog(&state.db, req).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(dialog)))
}

/// GET /api/v1/dialogs/:id
pub async fn get_dialog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Dialog>> {
    let dialog = catalog::get_dialog(&state.db, &id).await.map_err(api_error)?;
    Ok(Json(dialog))
}

/// GET /api/v1/dialogs/subtitle/:subtitle_id - 字幕的所有对白
pub async fn list_dialogs_for_subtitle(
    State(state): State<Arc<AppState>>,
    Path(subtitle_id): Path<String>,
) -> ApiResult<Json<Vec<Dialog>>> {
    let dialogs = catalog::list_dialogs_for_subtitle(&state.db, &subtitle_id)
        .await
        .map_err(api_error)?;
    Ok(Json(dialogs))
}

/// PUT /api/v1/dialogs/:id
pub async fn update_dialog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDialogRequest>,
) -> ApiResult<Json<Dialog>> {
    let dialog = catalog::update_dialog(&state.db, &id, req).await.map_err(api_error)?;
    Ok(Json(dialog))
}

/// DELETE /api/v1/dialogs/:id
pub async fn delete_dialog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    catalog::delete_dialog(&state.db, &id).await.map_err(api_error)?;
    Ok(Json(json!({"message": "Dialog deleted successfully"})))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{send, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_dialog_lifecycle() {
        let app = test_app().await;
        let (_, subtitle) = send(
            &app,
            "POST",
            "/api/v1/subtitles",
            Some(json!({
                "filename": "bleach-1.srt",
                "filler": false,
                "episode": 1,
                "season": 1,
                "showName": "Bleach",
                "language": "en"
            })),
        )
        .await;
        let subtitle_id = subtitle["id"].as_str().unwrap().to_string();

        let (status, dialog) = send(
            &app,
            "POST",
            "/api/v1/dialogs",
            Some(json!({
                "subtitleId": subtitle_id,
                "text": "Bankai!",
                "startTime": "00:05:00,000",
                "endTime": "00:05:01,500"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = dialog["id"].as_str().unwrap().to_string();
        assert_eq!(dialog["position"], 0);

        let (status, listed) = send(&app, "GET", &format!("/api/v1/dialogs/subtitle/{}", subtitle_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/api/v1/dialogs/{}", id),
            Some(json!({"text": "Ban... kai!"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["text"], "Ban... kai!");

        let (status, deleted) = send(&app, "DELETE", &format!("/api/v1/dialogs/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["message"], "Dialog deleted successfully");

        let (status, _) = send(&app, "GET", &format!("/api/v1/dialogs/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dialog_for_missing_subtitle() {
        let app = test_app().await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/dialogs",
            Some(json!({
                "subtitleId": "nope",
                "text": "Hi",
                "startTime": "00:00:01",
                "endTime": "00:00:02"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Subtitle not found");
    }

    #[tokio::test]
    async fn test_oversized_timestamp_is_rejected() {
        let app = test_app().await;
        let (_, subtitle) = send(
            &app,
            "POST",
            "/api/v1/subtitles",
            Some(json!({
                "filename": "bleach-2.srt",
                "filler": false,
                "episode": 2,
                "season": 1,
                "showName": "Bleach",
                "language": "en"
            })),
        )
        .await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/dialogs",
            Some(json!({
                "subtitleId": subtitle["id"],
                "text": "Hi",
                "startTime": "00:00:01",
                "endTime": "18446744073709551615:00:00"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("invalid timecode"));
    }
}
