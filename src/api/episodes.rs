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
use subshelf_backend::models::{CreateEpisodeRequest, Episode, UpdateEpisodeRequest};

/// POST /api/v1/episodes - 创建集
pub async fn create_episode(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateEpisodeRequest>,
) -> ApiResult<(StatusCode, Json<Episode>)> {
    let episode = catalog::create_episode(&state.db, req).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(episode)))
}

/// GET /api/v1/episodes/:id
pub async fn get_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Episode>> {
    let episode = catalog::get_episode(&state.db, &id).await.map_err(api_error)?;
    Ok(Json(episode))
}

/// GET /api/v1/episodes/show/:show_id - 节目的所有集
pub async fn list_episodes_for_show(
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<String>,
) -> ApiResult<Json<Vec<Episode>>> {
    let episodes = catalog::list_episodes_for_show(&state.db, &show_id)
        .await
        .map_err(api_error)?;
    Ok(Json(episodes))
}

/// GET /api/v1/episodes/season/:season_id - 季的所有集
pub async fn list_episodes_for_season(
    State(state): State<Arc<AppState>>,
    Path(season_id): Path<String>,
) -> ApiResult<Json<Vec<Episode>>> {
    let episodes = catalog::list_episodes_for_season(&state.db, &season_id)
        .await
        .map_err(api_error)?;
    Ok(Json(episodes))
}

/// PUT /api/v1/episodes/:id
pub async fn update_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateEpisodeRequest>,
) -> ApiResult<Json<Episode>> {
    let episode = catalog::update_episode(&state.db, &id, req).await.map_err(api_error)?;
    Ok(Json(episode))
}

/// DELETE /api/v1/episodes/:id
pub async fn delete_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    catalog::delete_episode(&state.db, &id).await.map_err(api_error)?;
    Ok(Json(json!({"message": "Episode deleted successfully"})))
}
