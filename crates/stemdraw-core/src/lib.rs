//! # Stemdraw Core
//!
//! Core types and orchestration for the Stemdraw diagram generator: the
//! data model shared by every stage (extraction reports, canonical problem
//! specs, diagram plans, artifacts, results), the trait seams between
//! stages, structural plan validation, the rule-based scene builder, and
//! the [`pipeline::DiagramPipeline`] that ties them together.
//!
//! The concrete extractor, layout engine, domain modules and LLM stages
//! live in their own crates and plug in through the traits in [`module`].

pub mod error;
pub mod module;
pub mod pipeline;
pub mod scene;
pub mod types;
pub mod validate;

pub use error::{PipelineError, PipelineResult};
pub use module::{DiagramAuditor, DiagramPlanner, DomainModule, LayoutBackend, ProblemExtractor};
pub use pipeline::{DiagramPipeline, PipelineSettings};
pub use scene::SceneBuilder;
pub use types::{
    ArtifactKind, AuditReport, AuditVerdict, CanonicalProblemSpec, ComponentKind, DiagramPlan,
    DiagramResult, DomainModuleArtifact, EdgeKind, ExtractedEntity, ExtractedRelation,
    ExtractionReport, LayoutHints, LayoutStrategyKind, PlanEdge, PlanNode, PlanProvenance, Point,
    ProblemDomain, QualityCheck, QualityReport, Quantity, Size,
};
pub use validate::{check_plan, ensure_positioned, validate_plan, PlanIssue};

/// Returns the version of the core crate.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
