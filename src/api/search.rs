use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{api_error, ApiResult};
use crate::state::AppState;
use subshelf_backend::search::{self, SearchPage, SearchParams};

const SEARCH_PATH: &str = "/api/v1/dialogs/search";

/// Raw search query string; validated by `SearchParams::from_query`
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub mode: Option<String>,
}

/// GET /api/v1/dialogs/search - 对白搜索
pub async fn search_dialogs(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> ApiResult<Json<SearchPage>> {
    let params = SearchParams::from_query(
        q.query.as_deref(),
        q.page.as_deref(),
        q.limit.as_deref(),
        q.mode.as_deref(),
        &state.config.search,
    )
    .map_err(api_error)?;

    let page = search::search_dialogs(&state.dialog_store, &params, SEARCH_PATH)
        .await
        .map_err(api_error)?;

    Ok(Json(page))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{send, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    async fn seed(app: &axum::Router) {
        for (episode, lines) in [
            (1, vec!["Hello there", "hello again", "bye"]),
            (2, vec!["Well, hello!"]),
            (3, vec!["Nothing here"]),
        ] {
            let dialogs: Vec<_> = lines
                .iter()
                .map(|text| json!({"text": text, "startTime": "00:00:01,000", "endTime": "00:00:02,000"}))
                .collect();
            let (status, _) = send(
                app,
                "POST",
                "/api/v1/subtitles",
                Some(json!({
                    "filename": format!("ep{}.srt", episode),
                    "filler": false,
                    "episode": episode,
                    "season": 1,
                    "showName": "Naruto",
                    "language": "en",
                    "dialogs": dialogs,
                })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }
    }

    #[tokio::test]
    async fn test_search_groups_by_subtitle() {
        let app = test_app().await;
        seed(&app).await;

        let (status, body) = send(&app, "GET", "/api/v1/dialogs/search?query=hello&page=1&limit=10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metadata"]["totalResults"], 2);
        assert_eq!(body["metadata"]["hasNextPage"], false);
        assert_eq!(body["metadata"]["nextPage"], serde_json::Value::Null);

        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["episode"], 1);
        assert_eq!(results[0]["matchCount"], 2);
        assert_eq!(results[0]["dialogs"].as_array().unwrap().len(), 2);
        assert!(results[0]["_id"].is_string());
        assert_eq!(results[0]["dialogs"][0]["segments"][0]["highlighted"], true);
    }

    #[tokio::test]
    async fn test_search_links() {
        let app = test_app().await;
        seed(&app).await;

        let (_, body) = send(&app, "GET", "/api/v1/dialogs/search?query=hello&limit=1", None).await;
        assert_eq!(body["metadata"]["totalPages"], 2);
        assert_eq!(
            body["metadata"]["nextPage"],
            "/api/v1/dialogs/search?query=hello&mode=substring&page=2&limit=1"
        );
    }

    #[tokio::test]
    async fn test_search_validation_errors() {
        let app = test_app().await;

        let (status, body) = send(&app, "GET", "/api/v1/dialogs/search", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("query"));

        let (status, _) = send(&app, "GET", "/api/v1/dialogs/search?query=%20%20", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        for uri in [
            "/api/v1/dialogs/search?query=hi&page=0",
            "/api/v1/dialogs/search?query=hi&limit=-5",
            "/api/v1/dialogs/search?query=hi&limit=abc",
            "/api/v1/dialogs/search?query=hi&limit=500",
        ] {
            let (status, body) = send(&app, "GET", uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert!(body["error"].as_str().unwrap().starts_with("invalid pagination"));
        }
    }

    #[tokio::test]
    async fn test_search_empty_store() {
        let app = test_app().await;
        let (status, body) = send(&app, "GET", "/api/v1/dialogs/search?query=anything", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"], json!([]));
        assert_eq!(body["metadata"]["totalPages"], 0);
        assert_eq!(body["metadata"]["hasPrevPage"], false);
    }
}
