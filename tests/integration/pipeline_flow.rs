//! End-to-end pipeline tests: problem text in, rendered artifacts out,
//! fully offline (no LLM configured).

use std::sync::Arc;

use stemdraw_core::{
    ArtifactKind, AuditVerdict, DiagramPipeline, PipelineSettings, PlanProvenance, ProblemDomain,
    SceneBuilder,
};
use stemdraw_domains::default_modules;
use stemdraw_layout::LayoutEngine;
use stemdraw_llm::SimulatedAuditor;
use stemdraw_nlp::KeywordExtractor;
use stemdraw_primitives::InMemoryPrimitiveStore;
use stemdraw_test_utils::{
    free_body_plan, molecule_plan, pathway_plan, sample_problem, series_circuit_plan,
    software_plan, FailingPlanner, GridLayout, StaticAuditor, StaticPlanner,
};

fn offline_pipeline(llm: Option<Arc<dyn stemdraw_core::DiagramPlanner>>) -> DiagramPipeline {
    let store: Arc<dyn stemdraw_primitives::PrimitiveStore> =
        Arc::new(InMemoryPrimitiveStore::new());
    DiagramPipeline::new(
        Arc::new(KeywordExtractor::new()),
        Arc::new(SceneBuilder::new()),
        llm,
        Arc::new(LayoutEngine::new()),
        default_modules(store),
        Arc::new(SimulatedAuditor::new()),
        PipelineSettings::default(),
    )
}

#[tokio::test]
async fn circuit_problem_produces_svg_and_latex() {
    let pipeline = offline_pipeline(None);
    let result = pipeline
        .generate(sample_problem(ProblemDomain::Circuit))
        .await
        .unwrap();

    assert_eq!(result.plan.domain, ProblemDomain::Circuit);
    assert!(result.plan.is_positioned());
    assert!(matches!(result.plan.provenance, PlanProvenance::RuleBased));

    let kinds: Vec<ArtifactKind> = result.artifacts.iter().map(|a| a.kind).collect();
    assert!(kinds.contains(&ArtifactKind::Svg));
    assert!(kinds.contains(&ArtifactKind::Latex));

    let svg = result
        .artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::Svg)
        .unwrap();
    assert!(svg.content.starts_with("<svg"));
    let tex = result
        .artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::Latex)
        .unwrap();
    assert!(tex.content.contains("\\begin{circuitikz}"));
}

#[tokio::test]
async fn mechanics_problem_renders_force_arrows() {
    let pipeline = offline_pipeline(None);
    let result = pipeline
        .generate(sample_problem(ProblemDomain::Mechanics))
        .await
        .unwrap();

    assert_eq!(result.plan.domain, ProblemDomain::Mechanics);
    let svg = result
        .artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::Svg)
        .unwrap();
    assert!(svg.content.contains("marker-end=\"url(#arrow)\""));
}

#[tokio::test]
async fn chemistry_formula_expands_to_atoms() {
    let pipeline = offline_pipeline(None);
    let result = pipeline
        .generate(sample_problem(ProblemDomain::Chemistry))
        .await
        .unwrap();

    assert_eq!(result.plan.domain, ProblemDomain::Chemistry);
    // H2O expands to three atom nodes with two bonds.
    assert_eq!(result.plan.nodes.len(), 3);
    assert_eq!(result.plan.edges.len(), 2);
}

#[tokio::test]
async fn biology_problem_exports_a_graph() {
    let pipeline = offline_pipeline(None);
    let result = pipeline
        .generate(sample_problem(ProblemDomain::Biology))
        .await
        .unwrap();

    assert_eq!(result.plan.domain, ProblemDomain::Biology);
    let graph = result
        .artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::GraphJson)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&graph.content).unwrap();
    assert!(!value["nodes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn software_problem_uses_layered_layout() {
    let pipeline = offline_pipeline(None);
    let result = pipeline
        .generate(sample_problem(ProblemDomain::Software))
        .await
        .unwrap();

    assert_eq!(result.plan.domain, ProblemDomain::Software);
    assert!(result.plan.is_positioned());
}

#[tokio::test]
async fn audit_is_simulated_without_an_llm() {
    let pipeline = offline_pipeline(None);
    assert!(pipeline.audit_is_simulated());
    let result = pipeline
        .generate(sample_problem(ProblemDomain::Circuit))
        .await
        .unwrap();
    assert!(result.audit.simulated);
    assert!(matches!(
        result.audit.verdict,
        AuditVerdict::Approved | AuditVerdict::NeedsRevision
    ));
}

#[tokio::test]
async fn broken_llm_planner_falls_back_to_rule_based() {
    let pipeline = offline_pipeline(Some(Arc::new(FailingPlanner)));
    assert!(pipeline.has_llm_planner());
    let result = pipeline
        .generate(sample_problem(ProblemDomain::Circuit))
        .await
        .unwrap();
    assert!(matches!(result.plan.provenance, PlanProvenance::RuleBased));
}

#[tokio::test]
async fn valid_llm_plan_is_used_over_the_scene_builder() {
    let planner = StaticPlanner::new(series_circuit_plan());
    let pipeline = offline_pipeline(Some(Arc::new(planner)));
    let result = pipeline
        .generate(sample_problem(ProblemDomain::Circuit))
        .await
        .unwrap();
    assert_eq!(result.plan.title.as_deref(), Some("Series circuit"));
    assert!(result.plan.find_node("battery-1").is_some());
}

#[tokio::test]
async fn rejecting_audit_verdict_is_surfaced_in_the_result() {
    let store: Arc<dyn stemdraw_primitives::PrimitiveStore> =
        Arc::new(InMemoryPrimitiveStore::new());
    let pipeline = DiagramPipeline::new(
        Arc::new(KeywordExtractor::new()),
        Arc::new(SceneBuilder::new()),
        None,
        Arc::new(GridLayout),
        default_modules(store),
        Arc::new(StaticAuditor::rejecting()),
        PipelineSettings::default(),
    );
    let result = pipeline
        .generate(sample_problem(ProblemDomain::Mechanics))
        .await
        .unwrap();
    assert_eq!(result.audit.verdict, AuditVerdict::Rejected);
}

#[tokio::test]
async fn prebuilt_plans_validate_cleanly_in_their_domain() {
    let pipeline = offline_pipeline(None);
    for plan in [
        series_circuit_plan(),
        free_body_plan(),
        molecule_plan(),
        pathway_plan(),
        software_plan(),
    ] {
        let quality = pipeline.validate_external(&plan).unwrap();
        assert!(quality.passed, "{} plan failed: {:?}", plan.domain, quality);
    }
}

#[tokio::test]
async fn empty_problem_text_is_rejected() {
    let pipeline = offline_pipeline(None);
    let err = pipeline.generate("   ").await.unwrap_err();
    assert!(matches!(
        err,
        stemdraw_core::PipelineError::ValidationError(_)
    ));
}
