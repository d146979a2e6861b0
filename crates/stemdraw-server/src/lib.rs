//!
//! Stemdraw Server - HTTP API for the Stemdraw diagram generator
//!
//! Exposes the generation pipeline over HTTP: `POST /api/generate`
//! turns problem text into rendered diagram artifacts on disk, the
//! `/api/editor/*` routes drive the interactive plan editor, and
//! `GET /api/health` reports pipeline capabilities.

use std::sync::Arc;

/// API module
pub mod api;

/// Server module
pub mod server;

/// Artifact writer module
pub mod artifacts;

/// Plan store module
pub mod store;

/// Configuration module
pub mod config;

/// Error module
pub mod error;

// Re-export key types
pub use artifacts::ArtifactWriter;
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::StemdrawServer;
pub use store::PlanStore;

/// Run function
pub async fn run(config: ServerConfig) -> ServerResult<()> {
    init_logging(&config);
    let server = Arc::new(StemdrawServer::from_config(config)?);
    server.run().await
}

/// Initialize logging
fn init_logging(config: &ServerConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // A subscriber may already be installed when embedded in tests.
    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
