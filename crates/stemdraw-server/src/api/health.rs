//! Health check endpoint.

use axum::{extract::State, Json};
use serde_json::json;
use std::sync::Arc;

use crate::server::StemdrawServer;

/// `GET /api/health`
pub async fn health_check(State(server): State<Arc<StemdrawServer>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": stemdraw_core::version(),
        "llm_planner": server.pipeline().has_llm_planner(),
        "audit_simulated": server.pipeline().audit_is_simulated(),
    }))
}
