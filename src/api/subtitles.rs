use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use super::{api_error, ApiResult};
use crate::state::AppState;
use subshelf_backend::catalog::{
    self, DetailOptions, SubtitleDetail, SubtitleListQuery, SubtitlePage,
};
use subshelf_backend::models::{CreateSubtitleRequest, Subtitle, SubtitleSummary, UpdateSubtitleRequest};

const SUBTITLES_PATH: &str = "/api/v1/subtitles";

/// POST /api/v1/subtitles - 创建字幕
pub async fn create_subtitle(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSubtitleRequest>,
) -> ApiResult<(StatusCode, Json<SubtitleDetail>)> {
    let detail = catalog::create_subtitle(&state.db, req).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/subtitles - 字幕列表
pub async fn list_subtitles(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<SubtitlePage>> {
    let query = SubtitleListQuery::from_query(&raw, &state.config.search).map_err(api_error)?;
    let page = catalog::list_subtitles(&state.db, &query, SUBTITLES_PATH)
        .await
        .map_err(api_error)?;
    Ok(Json(page))
}

/// GET /api/v1/subtitles/episode/:episode_id - 集的所有字幕
pub async fn list_subtitles_for_episode(
    State(state): State<Arc<AppState>>,
    Path(episode_id): Path<String>,
) -> ApiResult<Json<Vec<SubtitleSummary>>> {
    let subtitles = catalog::list_subtitles_for_episode(&state.db, &episode_id)
        .await
        .map_err(api_error)?;
    Ok(Json(subtitles))
}

/// GET /api/v1/subtitles/:id - 字幕详情（含对白）
pub async fn get_subtitle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<SubtitleDetail>> {
    let options = DetailOptions::from_query(&raw, &state.config.search).map_err(api_error)?;
    let detail = catalog::get_subtitle_detail(&state.db, &id, &options)
        .await
        .map_err(api_error)?;
    Ok(Json(detail))
}

/// PUT /api/v1/subtitles/:id - 更新字幕
pub async fn update_subtitle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSubtitleRequest>,
) -> ApiResult<Json<Subtitle>> {
    let subtitle = catalog::update_subtitle(&state.db, &id, req).await.map_err(api_error)?;
    Ok(Json(subtitle))
}

/// DELETE /api/v1/subtitles/:id - 删除字幕及其对白
pub async fn delete_subtitle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    catalog::delete_subtitle(&state.db, &id).await.map_err(api_error)?;
    Ok(Json(json!({"message": "Subtitle deleted successfully"})))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{send, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    fn body(episode: i64) -> serde_json::Value {
        json!({
            "filename": format!("op-{}.srt", episode),
            "filler": false,
            "episode": episode,
            "season": 1,
            "showName": "One Piece",
            "language": "en",
            "dialogs": [
                {"text": "{i1}I'm gonna be{i0}\\Nking of the pirates!", "startTime": "00:01:00,000", "endTime": "00:01:04,000"},
                {"text": "Gomu Gomu no...", "startTime": "00:10:00,000", "endTime": "00:10:02,000"}
            ]
        })
    }

    #[tokio::test]
    async fn test_subtitle_lifecycle() {
        let app = test_app().await;

        let (status, created) = send(&app, "POST", "/api/v1/subtitles", Some(body(1))).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["showName"], "One Piece");
        assert_eq!(created["dialogs"].as_array().unwrap().len(), 2);

        let (status, detail) = send(
            &app,
            "GET",
            &format!("/api/v1/subtitles/{}?to=120&highlight=king", id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let dialogs = detail["dialogs"].as_array().unwrap();
        assert_eq!(dialogs.len(), 1);
        let segments = dialogs[0]["segments"].as_array().unwrap();
        assert_eq!(segments[0]["italic"], true);
        assert_eq!(segments[1]["kind"], "break");
        assert!(segments.iter().any(|s| s["highlighted"] == true && s["content"] == "king"));

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/api/v1/subtitles/{}", id),
            Some(json!({"filler": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["filler"], true);

        let (status, deleted) = send(&app, "DELETE", &format!("/api/v1/subtitles/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["message"], "Subtitle deleted successfully");

        let (status, missing) = send(&app, "GET", &format!("/api/v1/subtitles/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(missing["error"], "Subtitle not found");
    }

    #[tokio::test]
    async fn test_subtitle_listing() {
        let app = test_app().await;
        for episode in [3, 1, 2] {
            send(&app, "POST", "/api/v1/subtitles", Some(body(episode))).await;
        }

        let (status, page) = send(&app, "GET", "/api/v1/subtitles?limit=2&sort=episode&order=asc", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["metadata"]["totalResults"], 3);
        assert_eq!(page["results"][0]["episode"], 1);
        assert_eq!(page["results"][1]["episode"], 2);
        assert_eq!(page["results"][0]["dialogCount"], 2);
        assert_eq!(
            page["metadata"]["nextPage"],
            "/api/v1/subtitles?sort=episode&order=asc&page=2&limit=2"
        );

        let (status, _) = send(&app, "GET", "/api/v1/subtitles?sort=rating", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let app = test_app().await;
        let mut invalid = body(1);
        invalid["showName"] = json!("  ");
        let (status, err) = send(&app, "POST", "/api/v1/subtitles", Some(invalid)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"], "showName must not be empty");
    }
}
