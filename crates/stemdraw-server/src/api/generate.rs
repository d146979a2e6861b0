//! The main generation endpoint.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use stemdraw_core::DiagramResult;

use crate::api::errors::ApiError;
use crate::server::StemdrawServer;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub problem_text: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub result: DiagramResult,
    /// Paths of the files written under the output directory
    pub files: Vec<String>,
}

/// `POST /api/generate`
///
/// Runs the full pipeline over the problem text and writes the rendered
/// artifacts to disk.
pub async fn generate_handler(
    State(server): State<Arc<StemdrawServer>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let (result, files) = server.generate(&request.problem_text).await?;
    info!(
        plan_id = %result.plan.plan_id,
        domain = %result.plan.domain,
        score = result.quality.score,
        "generation complete"
    );
    Ok(Json(GenerateResponse { result, files }))
}
