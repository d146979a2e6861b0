//! API routes and handlers for the Stemdraw server.

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod editor;
pub mod errors;
pub mod generate;
pub mod health;

use crate::server::StemdrawServer;

/// Build the router for API endpoints
pub fn build_router(server: Arc<StemdrawServer>) -> Router {
    let cors = cors_layer(&server.config().frontend_origin);

    Router::new()
        // Generation
        .route("/api/generate", post(generate::generate_handler))
        // Editor
        .route("/api/editor/generate", post(editor::generate_handler))
        .route("/api/editor/validate", post(editor::validate_handler))
        .route(
            "/api/editor/optimize_layout",
            post(editor::optimize_layout_handler),
        )
        .route("/api/editor/save", post(editor::save_handler))
        .route("/api/editor/load", get(editor::load_handler))
        .route("/api/editor/export", post(editor::export_handler))
        // Health check
        .route("/api/health", get(health::health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

fn cors_layer(frontend_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);
    match frontend_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            warn!(%frontend_origin, "unparseable frontend origin, CORS left closed");
            layer
        }
    }
}
