//! Standardized error responses for the HTTP API.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use stemdraw_core::PipelineError;

use crate::error::ServerError;

/// API error type carrying the HTTP status and stable error code.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),
    /// Not found (404)
    NotFound(String),
    /// Internal server error (500)
    InternalServerError(String),
    /// Wrapped server error
    ServerError(ServerError),
}

impl From<ServerError> for ApiError {
    fn from(err: ServerError) -> Self {
        ApiError::ServerError(err)
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::ServerError(ServerError::PipelineError(err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::ServerError(err) => write!(f, "Server Error: {}", err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "ERR_BAD_REQUEST".to_string(), msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "ERR_NOT_FOUND".to_string(), msg),
            ApiError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ERR_INTERNAL_SERVER_ERROR".to_string(),
                msg,
            ),
            ApiError::ServerError(err) => server_error_parts(err),
        };

        let body = Json(json!({
            "error": message,
            "errorDetails": {
                "errorCode": error_code,
                "errorMessage": message,
            }
        }));

        (status, body).into_response()
    }
}

fn server_error_parts(err: ServerError) -> (StatusCode, String, String) {
    match err {
        ServerError::NotFound(resource) => (
            StatusCode::NOT_FOUND,
            format!("ERR_NOT_FOUND_{}", resource.to_uppercase().replace(' ', "_")),
            format!("{} not found", resource),
        ),
        ServerError::ValidationError(msg) => (
            StatusCode::BAD_REQUEST,
            "ERR_VALIDATION_ERROR".to_string(),
            msg,
        ),
        ServerError::PipelineError(err) => {
            let status = if err.is_user_error() {
                StatusCode::BAD_REQUEST
            } else if matches!(err, PipelineError::LlmError(_)) {
                StatusCode::BAD_GATEWAY
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, err.error_code().to_string(), err.to_string())
        }
        ServerError::ArtifactError(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "ERR_ARTIFACT_ERROR".to_string(),
            msg,
        ),
        ServerError::ConfigError(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "ERR_CONFIG_ERROR".to_string(),
            msg,
        ),
        ServerError::InternalError(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "ERR_INTERNAL_SERVER_ERROR".to_string(),
            msg,
        ),
    }
}
