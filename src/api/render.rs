use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

use super::{api_error, ApiResult};
use crate::state::AppState;
use subshelf_backend::render::{render_with_term, HighlightOptions, Segment};
use subshelf_backend::search::MatchMode;
use subshelf_backend::utils::non_blank;

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub text: String,
    #[serde(default)]
    pub term: Option<String>,
    /// "exact" (default) or "substring"
    #[serde(default)]
    pub mode: Option<String>,
}

/// POST /api/v1/render - 渲染字幕文本
pub async fn render_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenderRequest>,
) -> ApiResult<Json<Vec<Segment>>> {
    let mode = match non_blank(req.mode.as_deref()) {
        Some(m) => MatchMode::parse(m).map_err(api_error)?,
        None => MatchMode::Exact,
    };
    let options = HighlightOptions {
        mode,
        case_sensitive: state.config.search.case_sensitive_highlight,
    };

    Ok(Json(render_with_term(&req.text, req.term.as_deref(), options)))
}
