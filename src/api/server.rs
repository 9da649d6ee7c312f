use axum::Json;
use serde_json::{json, Value};

/// GET /api/health - 健康检查
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "SubShelf service is running",
        "version": env!("CARGO_PKG_VERSION"),
        "buildTime": env!("BUILD_TIME"),
    }))
}
