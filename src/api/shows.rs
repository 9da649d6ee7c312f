use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{api_error, ApiResult};
use crate::state::AppState;
use subshelf_backend::catalog::{self, ShowDetail};
use subshelf_backend::models::{CreateShowRequest, Show, UpdateShowRequest};

/// POST /api/v1/shows - 创建节目
pub async fn create_show(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateShowRequest>,
) -> ApiResult<(StatusCode, Json<Show>)> {
    let show = catalog::create_show(&state.db, req).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(show)))
}

/// GET /api/v1/shows
pub async fn list_shows(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Show>>> {
    let shows = catalog::list_shows(&state.db).await.map_err(api_error)?;
    Ok(Json(shows))
}

/// GET /api/v1/shows/:id - 节目详情（含季）
pub async fn get_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ShowDetail>> {
    let detail = catalog::get_show_detail(&state.db, &id).await.map_err(api_error)?;
    Ok(Json(detail))
}

/// PUT /api/v1/shows/:id
pub async fn update_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateShowRequest>,
) -> ApiResult<Json<Show>> {
    let show = catalog::update_show(&state.db, &id, req).await.map_err(api_error)?;
    Ok(Json(show))
}

/// DELETE /api/v1/shows/:id - 删除节目及其季和集
pub async fn delete_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    catalog::delete_show(&state.db, &id).await.map_err(api_error)?;
    Ok(Json(json!({"message": "Show deleted successfully"})))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{send, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_show_hierarchy_routes() {
        let app = test_app().await;

        let (status, show) = send(
            &app,
            "POST",
            "/api/v1/shows",
            Some(json!({"name": "Naruto", "description": "Ninja", "episodeCount": 220})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(show["slug"], "naruto");
        let show_id = show["id"].as_str().unwrap().to_string();

        let (status, season) = send(
            &app,
            "POST",
            "/api/v1/seasons",
            Some(json!({"showId": show_id, "title": "Land of Waves", "seasonNumber": 1, "episodeCount": 19})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let season_id = season["id"].as_str().unwrap().to_string();

        let (status, episode) = send(
            &app,
            "POST",
            "/api/v1/episodes",
            Some(json!({"seasonId": season_id, "title": "Enter: Naruto Uzumaki!", "episodeNumber": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(episode["showId"], show_id.as_str());
        assert_eq!(episode["slug"], "enter-naruto-uzumaki");
        let episode_id = episode["id"].as_str().unwrap().to_string();

        let (status, subtitle) = send(
            &app,
            "POST",
            "/api/v1/subtitles",
            Some(json!({
                "filename": "naruto-001.srt",
                "filler": false,
                "episode": 1,
                "season": 1,
                "showName": "Naruto",
                "language": "en",
                "episodeId": episode_id,
                "dialogs": [{"text": "Believe it!", "startTime": "00:01:00", "endTime": "00:01:02"}]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(subtitle["episodeId"], episode_id.as_str());

        let (status, detail) = send(&app, "GET", &format!("/api/v1/shows/{}", show_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["name"], "Naruto");
        assert_eq!(detail["seasons"][0]["title"], "Land of Waves");

        let (_, seasons) = send(&app, "GET", &format!("/api/v1/seasons/show/{}", show_id), None).await;
        assert_eq!(seasons.as_array().unwrap().len(), 1);

        let (_, by_show) = send(&app, "GET", &format!("/api/v1/episodes/show/{}", show_id), None).await;
        assert_eq!(by_show.as_array().unwrap().len(), 1);

        let (_, by_season) = send(&app, "GET", &format!("/api/v1/episodes/season/{}", season_id), None).await;
        assert_eq!(by_season[0]["episodeNumber"], 1);

        let (status, tracks) = send(&app, "GET", &format!("/api/v1/subtitles/episode/{}", episode_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tracks[0]["filename"], "naruto-001.srt");
        assert_eq!(tracks[0]["dialogCount"], 1);

        let (status, deleted) = send(&app, "DELETE", &format!("/api/v1/shows/{}", show_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["message"], "Show deleted successfully");

        let (status, missing) = send(&app, "GET", &format!("/api/v1/episodes/{}", episode_id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(missing["error"], "Episode not found");

        let (status, _) = send(&app, "GET", &format!("/api/v1/subtitles/episode/{}", episode_id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_show_validation() {
        let app = test_app().await;
        let (status, _) = send(&app, "POST", "/api/v1/shows", Some(json!({"name": "Mushishi"}))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, "POST", "/api/v1/shows", Some(json!({"name": "MUSHISHI"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "slug \"mushishi\" is already taken");

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/seasons",
            Some(json!({"showId": "nope", "title": "S1", "seasonNumber": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Show not found");

        let (status, _) = send(&app, "PUT", "/api/v1/shows/nope", Some(json!({"name": "x"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
