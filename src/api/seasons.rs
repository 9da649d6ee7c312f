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
use subshelf_backend::models::{CreateSeasonRequest, Season, UpdateSeasonRequest};

/// POST /api/v1/seasons - 创建季
pub async fn create_season(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSeasonRequest>,
) -> ApiResult<(StatusCode, Json<Season>)> {
    let season = catalog::create_season(&state.db, req).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(season)))
}

/// GET /api/v1/seasons
pub async fn list_seasons(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Season>>> {
    let seasons = catalog::list_seasons(&state.db).await.map_err(api_error)?;
    Ok(Json(seasons))
}

/// GET /api/v1/seasons/show/:show_id - 节目的所有季
pub async fn list_seasons_for_show(
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<String>,
) -> ApiResult<Json<Vec<Season>>> {
    let seasons = catalog::list_seasons_for_show(&state.db, &show_id)
        .await
        .map_err(api_error)?;
    Ok(Json(seasons))
}

/// GET /api/v1/seasons/:id
pub async fn get_season(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Season>> {
    let season = catalog::get_season(&state.db, &id).await.map_err(api_error)?;
    Ok(Json(season))
}

/// PUT /api/v1/seasons/:id
pub async fn update_season(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSeasonRequest>,
) -> ApiResult<Json<Season>> {
    let season = catalog::update_season(&state.db, &id, req).await.map_err(api_error)?;
    Ok(Json(season))
}

/// DELETE /api/v1/seasons/:id - 删除季及其集
pub async fn delete_season(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    catalog::delete_season(&state.db, &id).await.map_err(api_error)?;
    Ok(Json(json!({"message": "Season deleted successfully"})))
}
