//! Trait seams between pipeline stages.
//!
//! Each stage of the pipeline is a trait object so implementations can be
//! swapped: the NLP extractor, the planners (rule-based and LLM), the
//! layout engine, the per-domain renderers, and the auditor.

use async_trait::async_trait;

use crate::error::PipelineResult;
use crate::types::{
    AuditReport, CanonicalProblemSpec, DiagramPlan, DomainModuleArtifact, ExtractionReport,
    ProblemDomain, QualityCheck, QualityReport,
};

/// Pulls entities, relations and quantities out of raw problem text.
pub trait ProblemExtractor: Send + Sync {
    fn extract(&self, text: &str) -> PipelineResult<ExtractionReport>;
}

/// Produces a diagram plan from a canonical problem spec.
///
/// Two implementations exist: the rule-based scene builder (always
/// available) and the LLM planner (present only when an API key is
/// configured).
#[async_trait]
pub trait DiagramPlanner: Send + Sync {
    /// Planner name used in logs, e.g. "scene-builder" or "deepseek".
    fn name(&self) -> &'static str;

    async fn plan(&self, spec: &CanonicalProblemSpec) -> PipelineResult<DiagramPlan>;
}

/// Assigns a position to every node in a plan.
pub trait LayoutBackend: Send + Sync {
    fn arrange(&self, plan: &mut DiagramPlan) -> PipelineResult<()>;
}

/// A pluggable rendering backend for one STEM domain.
///
/// Converts a positioned diagram plan into domain-appropriate artifacts
/// (SVG always; LaTeX or graph JSON where the domain calls for it).
#[async_trait]
pub trait DomainModule: Send + Sync {
    /// The domain this module renders.
    fn domain(&self) -> ProblemDomain;

    /// Module name used in logs and artifact metadata.
    fn name(&self) -> &'static str;

    /// Domain-specific correctness checks, fed into the quality score.
    fn validate(&self, plan: &DiagramPlan) -> Vec<QualityCheck>;

    /// Render the plan. The plan is guaranteed to be structurally valid
    /// and fully positioned when this is called.
    async fn render(&self, plan: &DiagramPlan) -> PipelineResult<Vec<DomainModuleArtifact>>;
}

/// Critiques a generated diagram.
#[async_trait]
pub trait DiagramAuditor: Send + Sync {
    /// True for the heuristic fallback used when no LLM is configured.
    fn is_simulated(&self) -> bool;

    async fn audit(
        &self,
        plan: &DiagramPlan,
        quality: &QualityReport,
    ) -> PipelineResult<AuditReport>;
}
