pub mod dialogs;
pub mod episodes;
pub mod render;
pub mod search;
pub mod seasons;
pub mod server;
pub mod shows;
pub mod subtitles;

use axum::{
    http::{StatusCode, Uri},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use subshelf_backend::error::CatalogError;

pub type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

/// Map a catalog error onto an HTTP status and JSON body / 错误映射
///
/// Storage details are logged here and never sent to the client.
pub fn api_error(err: CatalogError) -> (StatusCode, Json<Value>) {
    match err {
        CatalogError::StorageUnavailable(e) => {
            tracing::error!("Storage error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "An unexpected error occurred"})),
            )
        }
        CatalogError::NotFound(_) => (StatusCode::NOT_FOUND, Json(json!({"error": err.to_string()}))),
        _ => {
            tracing::debug!("Rejected request: {}", err);
            (StatusCode::BAD_REQUEST, Json(json!({"error": err.to_string()})))
        }
    }
}

async fn route_not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    tracing::debug!("No route for {}", uri.path());
    (StatusCode::NOT_FOUND, Json(json!({"error": "Resource/Route Not Found"})))
}

/// Build the HTTP router / 构建路由
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(server::health_check))
        // 对白搜索
        .route("/api/v1/dialogs/search", get(search::search_dialogs))
        .route("/api/v1/dialogs", post(dialogs::create_dialog))
        .route("/api/v1/dialogs/subtitle/:subtitle_id", get(dialogs::list_dialogs_for_subtitle))
        .route(
            "/api/v1/dialogs/:id",
            get(dialogs::get_dialog).put(dialogs::update_dialog).delete(dialogs::delete_dialog),
        )
        // 节目 / 季 / 集
        .route("/api/v1/shows", get(shows::list_shows).post(shows::create_show))
        .route(
            "/api/v1/shows/:id",
            get(shows::get_show).put(shows::update_show).delete(shows::delete_show),
        )
        .route("/api/v1/seasons", get(seasons::list_seasons).post(seasons::create_season))
        .route("/api/v1/seasons/show/:show_id", get(seasons::list_seasons_for_show))
        .route(
            "/api/v1/seasons/:id",
            get(seasons::get_season).put(seasons::update_season).delete(seasons::delete_season),
        )
        .route("/api/v1/episodes", post(episodes::create_episode))
        .route("/api/v1/episodes/show/:show_id", get(episodes::list_episodes_for_show))
        .route("/api/v1/episodes/season/:season_id", get(episodes::list_episodes_for_season))
        .route(
            "/api/v1/episodes/:id",
            get(episodes::get_episode).put(episodes::update_episode).delete(episodes::delete_episode),
        )
        // 字幕管理
        .route("/api/v1/subtitles", get(subtitles::list_subtitles).post(subtitles::create_subtitle))
        .route("/api/v1/subtitles/episode/:episode_id", get(subtitles::list_subtitles_for_episode))
        .route(
            "/api/v1/subtitles/:id",
            get(subtitles::get_subtitle)
                .put(subtitles::update_subtitle)
                .delete(subtitles::delete_subtitle),
        )
        .route("/api/v1/render", post(render::render_text))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::state::AppState;
    use subshelf_backend::config::AppConfig;
    use subshelf_backend::db::connect_in_memory;

    pub async fn test_app() -> Router {
        let db = connect_in_memory().await.unwrap();
        super::build_router(Arc::new(AppState::new(db, AppConfig::default())))
    }

    /// Send a request, return status and parsed JSON body
    pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{send, test_app};
    use super::*;

    #[tokio::test]
    async fn test_unknown_route() {
        let app = test_app().await;
        let (status, body) = send(&app, "GET", "/api/v1/nowhere", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Resource/Route Not Found");
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app().await;
        let (status, body) = send(&app, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_storage_error_is_opaque() {
        let (status, Json(body)) = api_error(CatalogError::StorageUnavailable(sqlx::Error::PoolTimedOut));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An unexpected error occurred");

        let (status, Json(body)) = api_error(CatalogError::NotFound("Subtitle".to_string()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Subtitle not found");

        let (status, _) = api_error(CatalogError::InvalidQuery);
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
