use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;

/// GET /api/health - 健康检查
///
/// Reports only local state; it does not call the search engine.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "search gateway is running",
        "version": env!("CARGO_PKG_VERSION"),
        "build_time": env!("BUILD_TIME"),
        "index": state.gateway.index(),
        "page_size": state.gateway.page_size(),
        "started_at": state.started_at.to_rfc3339(),
    }))
}
