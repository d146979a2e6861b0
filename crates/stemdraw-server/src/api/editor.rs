//! Editor endpoints.
//!
//! The frontend editor works directly with diagram plans: it can
//! generate a fresh one from problem text, validate or re-layout an
//! edited plan, save and reload drafts, and export a plan to rendered
//! artifacts on disk.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use stemdraw_core::{
    DiagramPlan, DiagramResult, DomainModuleArtifact, PipelineError, PlanIssue, QualityReport,
};

use crate::api::errors::ApiError;
use crate::error::ServerError;
use crate::server::StemdrawServer;

#[derive(Debug, Deserialize)]
pub struct EditorGenerateRequest {
    pub problem_text: String,
}

/// `POST /api/editor/generate`
///
/// Same pipeline as `/api/generate` but nothing is written to disk; the
/// editor holds the plan until the user saves or exports.
pub async fn generate_handler(
    State(server): State<Arc<StemdrawServer>>,
    Json(request): Json<EditorGenerateRequest>,
) -> Result<Json<DiagramResult>, ApiError> {
    let result = server.pipeline().generate(&request.problem_text).await?;
    Ok(Json(result))
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub issues: Vec<PlanIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityReport>,
}

/// `POST /api/editor/validate`
///
/// Structural issues come back in the response body rather than as an
/// error; the editor surfaces them inline.
pub async fn validate_handler(
    State(server): State<Arc<StemdrawServer>>,
    Json(plan): Json<DiagramPlan>,
) -> Result<Json<ValidateResponse>, ApiError> {
    match server.pipeline().validate_external(&plan) {
        Ok(quality) => Ok(Json(ValidateResponse {
            valid: quality.passed,
            issues: Vec::new(),
            quality: Some(quality),
        })),
        Err(PipelineError::InvalidPlan(issues)) => Ok(Json(ValidateResponse {
            valid: false,
            issues,
            quality: None,
        })),
        Err(err) => Err(err.into()),
    }
}

/// `POST /api/editor/optimize_layout`
///
/// Re-runs the layout engine over the plan and returns it with fresh
/// positions.
pub async fn optimize_layout_handler(
    State(server): State<Arc<StemdrawServer>>,
    Json(mut plan): Json<DiagramPlan>,
) -> Result<Json<DiagramPlan>, ApiError> {
    server.pipeline().optimize_layout(&mut plan)?;
    Ok(Json(plan))
}

/// `POST /api/editor/save`
pub async fn save_handler(
    State(server): State<Arc<StemdrawServer>>,
    Json(plan): Json<DiagramPlan>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = server.plan_store().save(plan).await;
    info!(plan_id = %id, "editor plan saved");
    Ok(Json(json!({ "saved": true, "plan_id": id })))
}

#[derive(Debug, Deserialize)]
pub struct LoadQuery {
    pub plan_id: Option<Uuid>,
}

/// `GET /api/editor/load`
///
/// Loads a saved plan by id, or the most recently saved plan when no id
/// is given.
pub async fn load_handler(
    State(server): State<Arc<StemdrawServer>>,
    Query(query): Query<LoadQuery>,
) -> Result<Json<DiagramPlan>, ApiError> {
    let plan = match query.plan_id {
        Some(id) => server.plan_store().load(id).await,
        None => server.plan_store().load_latest().await,
    };
    plan.map(Json)
        .ok_or_else(|| ServerError::NotFound("plan".to_string()).into())
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub artifacts: Vec<DomainModuleArtifact>,
    pub files: Vec<String>,
}

/// `POST /api/editor/export`
///
/// Renders the plan through its domain module (laying it out first when
/// it has no positions) and writes the artifacts under the output
/// directory.
pub async fn export_handler(
    State(server): State<Arc<StemdrawServer>>,
    Json(mut plan): Json<DiagramPlan>,
) -> Result<Json<ExportResponse>, ApiError> {
    let artifacts = server.pipeline().render_external(&mut plan).await?;
    let written = server
        .artifacts()
        .write_artifacts(plan.domain, plan.plan_id, &artifacts)
        .await?;
    let files = written
        .into_iter()
        .map(|p| p.display().to_string())
        .collect();
    info!(plan_id = %plan.plan_id, "editor plan exported");
    Ok(Json(ExportResponse { artifacts, files }))
}
