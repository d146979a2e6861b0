//! Error types for the Stemdraw server.

use thiserror::Error;

use stemdraw_core::PipelineError;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Request rejected before reaching the pipeline
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Diagram pipeline failure
    #[error(transparent)]
    PipelineError(#[from] PipelineError),

    /// Artifact writing failure
    #[error("Artifact error: {0}")]
    ArtifactError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::ArtifactError(err.to_string())
    }
}

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
