//! Error types for the diagram pipeline.

use thiserror::Error;

use crate::validate::PlanIssue;

/// All errors that can surface from a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input rejected before any stage ran
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// NLP extraction failed
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    /// No planner could produce a usable plan
    #[error("Planning error: {0}")]
    PlanningError(String),

    /// Plan failed structural validation
    #[error("{}", PlanIssuesFormat(.0))]
    InvalidPlan(Vec<PlanIssue>),

    /// Layout engine failure
    #[error("Layout error: {0}")]
    LayoutError(String),

    /// Domain module rendering failure
    #[error("Render error: {0}")]
    RenderError(String),

    /// Primitive library access failure
    #[error("Primitive store error: {0}")]
    PrimitiveStoreError(String),

    /// LLM planner/auditor failure
    #[error("LLM error: {0}")]
    LlmError(String),

    /// Unexpected internal failure
    #[error("Internal error: {0}")]
    InternalError(String),
}

// Helper struct to format a list of plan issues
struct PlanIssuesFormat<'a>(&'a [PlanIssue]);

impl std::fmt::Display for PlanIssuesFormat<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid plan ({} issues):", self.0.len())?;
        for (i, issue) in self.0.iter().enumerate() {
            write!(f, "\n  {}. {}", i + 1, issue)?;
        }
        Ok(())
    }
}

impl PipelineError {
    /// Get the stable error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            PipelineError::ValidationError(_) => "ERR_PIPELINE_VALIDATION",
            PipelineError::ExtractionError(_) => "ERR_PIPELINE_EXTRACTION",
            PipelineError::PlanningError(_) => "ERR_PIPELINE_PLANNING",
            PipelineError::InvalidPlan(_) => "ERR_PIPELINE_INVALID_PLAN",
            PipelineError::LayoutError(_) => "ERR_PIPELINE_LAYOUT",
            PipelineError::RenderError(_) => "ERR_PIPELINE_RENDER",
            PipelineError::PrimitiveStoreError(_) => "ERR_PIPELINE_PRIMITIVE_STORE",
            PipelineError::LlmError(_) => "ERR_PIPELINE_LLM",
            PipelineError::InternalError(_) => "ERR_PIPELINE_INTERNAL",
        }
    }

    /// Whether the error came from user input rather than the pipeline.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            PipelineError::ValidationError(_) | PipelineError::InvalidPlan(_)
        )
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::ValidationError(format!("JSON error: {}", err))
    }
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
