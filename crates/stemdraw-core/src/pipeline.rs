//! Pipeline orchestration.
//!
//! [`DiagramPipeline`] wires the stages together: extraction, planning
//! (LLM planner first when configured, rule-based scene builder as
//! fallback), structural validation, layout, domain-module validation with
//! refinement passes, rendering, and the audit.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::module::{DiagramAuditor, DiagramPlanner, DomainModule, LayoutBackend, ProblemExtractor};
use crate::types::{
    CanonicalProblemSpec, DiagramPlan, DiagramResult, ProblemDomain, QualityReport,
};
use crate::validate::{ensure_positioned, validate_plan};

/// Tunables for a pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    /// Quality score (0-100) a plan must reach to skip refinement
    pub quality_threshold: u8,
    /// Maximum re-layout/re-validate passes for a failing plan
    pub max_refinement_passes: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            quality_threshold: 70,
            max_refinement_passes: 2,
        }
    }
}

/// The unified diagram generation pipeline.
pub struct DiagramPipeline {
    extractor: Arc<dyn ProblemExtractor>,
    scene_builder: Arc<dyn DiagramPlanner>,
    llm_planner: Option<Arc<dyn DiagramPlanner>>,
    layout: Arc<dyn LayoutBackend>,
    modules: HashMap<ProblemDomain, Arc<dyn DomainModule>>,
    auditor: Arc<dyn DiagramAuditor>,
    settings: PipelineSettings,
}

impl std::fmt::Debug for DiagramPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramPipeline")
            .field("llm_planner", &self.llm_planner.as_ref().map(|p| p.name()))
            .field("modules", &self.modules.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl DiagramPipeline {
    pub fn new(
        extractor: Arc<dyn ProblemExtractor>,
        scene_builder: Arc<dyn DiagramPlanner>,
        llm_planner: Option<Arc<dyn DiagramPlanner>>,
        layout: Arc<dyn LayoutBackend>,
        modules: Vec<Arc<dyn DomainModule>>,
        auditor: Arc<dyn DiagramAuditor>,
        settings: PipelineSettings,
    ) -> Self {
        let modules = modules.into_iter().map(|m| (m.domain(), m)).collect();
        Self {
            extractor,
            scene_builder,
            llm_planner,
            layout,
            modules,
            auditor,
            settings,
        }
    }

    /// Whether the optional LLM planner stage is configured.
    pub fn has_llm_planner(&self) -> bool {
        self.llm_planner.is_some()
    }

    /// Whether the audit stage is the simulated fallback.
    pub fn audit_is_simulated(&self) -> bool {
        self.auditor.is_simulated()
    }

    /// Run the full pipeline over raw problem text.
    pub async fn generate(&self, problem_text: &str) -> PipelineResult<DiagramResult> {
        let text = problem_text.trim();
        if text.is_empty() {
            return Err(PipelineError::ValidationError(
                "problem_text must not be empty".to_string(),
            ));
        }

        info!(chars = text.len(), "pipeline run started");

        let extraction = self.extractor.extract(text)?;
        debug!(
            domain = %extraction.domain,
            entities = extraction.entities.len(),
            relations = extraction.relations.len(),
            "extraction complete"
        );

        let spec = CanonicalProblemSpec::from_extraction(&extraction, text);
        let mut plan = self.plan(&spec).await?;
        validate_plan(&plan)?;

        self.layout
            .arrange(&mut plan)
            .and_then(|_| ensure_positioned(&plan))?;

        let module = self.modules.get(&plan.domain).ok_or_else(|| {
            PipelineError::RenderError(format!(
                "no domain module registered for '{}'",
                plan.domain
            ))
        })?;

        let mut quality = self.score(module.as_ref(), &plan);
        let mut pass = 0;
        while !quality.passed && pass < self.settings.max_refinement_passes {
            pass += 1;
            // Refinement widens spacing; crowding is the dominant cause of
            // failed geometry checks.
            plan.layout.spacing *= 1.3;
            warn!(
                pass,
                score = quality.score,
                spacing = plan.layout.spacing,
                "quality below threshold, re-running layout"
            );
            self.layout.arrange(&mut plan)?;
            ensure_positioned(&plan)?;
            quality = self.score(module.as_ref(), &plan);
        }

        let artifacts = module.render(&plan).await?;
        if artifacts.is_empty() {
            return Err(PipelineError::RenderError(format!(
                "module '{}' produced no artifacts",
                module.name()
            )));
        }

        let audit = self.auditor.audit(&plan, &quality).await?;

        info!(
            plan_id = %plan.plan_id,
            domain = %plan.domain,
            score = quality.score,
            refinement_passes = pass,
            artifacts = artifacts.len(),
            "pipeline run finished"
        );

        Ok(DiagramResult {
            plan,
            artifacts,
            extraction,
            quality,
            audit,
            generated_at: Utc::now(),
        })
    }

    /// Re-run layout over an externally supplied plan (editor API).
    pub fn optimize_layout(&self, plan: &mut DiagramPlan) -> PipelineResult<()> {
        validate_plan(plan)?;
        self.layout.arrange(plan)?;
        ensure_positioned(plan)
    }

    /// Validate an externally supplied plan against its domain module.
    pub fn validate_external(&self, plan: &DiagramPlan) -> PipelineResult<QualityReport> {
        validate_plan(plan)?;
        let module = self.module_for(plan.domain)?;
        Ok(self.score(module.as_ref(), plan))
    }

    /// Render an externally supplied plan through its domain module.
    pub async fn render_external(
        &self,
        plan: &mut DiagramPlan,
    ) -> PipelineResult<Vec<crate::types::DomainModuleArtifact>> {
        validate_plan(plan)?;
        if !plan.is_positioned() {
            self.layout.arrange(plan)?;
            ensure_positioned(plan)?;
        }
        let module = self.module_for(plan.domain)?;
        module.render(plan).await
    }

    fn module_for(&self, domain: ProblemDomain) -> PipelineResult<&Arc<dyn DomainModule>> {
        self.modules.get(&domain).ok_or_else(|| {
            PipelineError::RenderError(format!("no domain module registered for '{}'", domain))
        })
    }

    async fn plan(&self, spec: &CanonicalProblemSpec) -> PipelineResult<DiagramPlan> {
        if let Some(llm) = &self.llm_planner {
            match llm.plan(spec).await {
                Ok(plan) => match validate_plan(&plan) {
                    Ok(()) => {
                        debug!(planner = llm.name(), "using LLM plan");
                        return Ok(plan);
                    }
                    Err(err) => {
                        warn!(planner = llm.name(), %err, "LLM plan invalid, falling back");
                    }
                },
                Err(err) => {
                    warn!(planner = llm.name(), %err, "LLM planner failed, falling back");
                }
            }
        }
        self.scene_builder.plan(spec).await
    }

    fn score(&self, module: &dyn DomainModule, plan: &DiagramPlan) -> QualityReport {
        QualityReport::from_checks(module.validate(plan), self.settings.quality_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{DiagramAuditor, DiagramPlanner, DomainModule, ProblemExtractor};
    use crate::scene::SceneBuilder;
    use crate::types::{
        ArtifactKind, AuditReport, AuditVerdict, ComponentKind, DomainModuleArtifact,
        ExtractedEntity, ExtractionReport, Point, QualityCheck,
    };
    use async_trait::async_trait;

    struct FixedExtractor;

    impl ProblemExtractor for FixedExtractor {
        fn extract(&self, _text: &str) -> PipelineResult<ExtractionReport> {
            Ok(ExtractionReport {
                domain: ProblemDomain::Circuit,
                confidence: 0.9,
                entities: vec![
                    ExtractedEntity {
                        id: "v1".to_string(),
                        label: "battery".to_string(),
                        kind: ComponentKind::Battery,
                        quantities: Vec::new(),
                        span: (0, 7),
                    },
                    ExtractedEntity {
                        id: "r1".to_string(),
                        label: "resistor".to_string(),
                        kind: ComponentKind::Resistor,
                        quantities: Vec::new(),
                        span: (10, 18),
                    },
                ],
                relations: Vec::new(),
                unattached_quantities: Vec::new(),
            })
        }
    }

    struct GridLayout;

    impl LayoutBackend for GridLayout {
        fn arrange(&self, plan: &mut DiagramPlan) -> PipelineResult<()> {
            for (i, node) in plan.nodes.iter_mut().enumerate() {
                node.position = Some(Point::new(i as f64 * 100.0, 0.0));
            }
            Ok(())
        }
    }

    struct StubModule {
        fail_first_validation: std::sync::atomic::AtomicBool,
    }

    impl StubModule {
        fn passing() -> Self {
            Self {
                fail_first_validation: std::sync::atomic::AtomicBool::new(false),
            }
        }

        fn failing_once() -> Self {
            Self {
                fail_first_validation: std::sync::atomic::AtomicBool::new(true),
            }
        }
    }

    #[async_trait]
    impl DomainModule for StubModule {
        fn domain(&self) -> ProblemDomain {
            ProblemDomain::Circuit
        }

        fn name(&self) -> &'static str {
            "stub-circuit"
        }

        fn validate(&self, _plan: &DiagramPlan) -> Vec<QualityCheck> {
            if self
                .fail_first_validation
                .swap(false, std::sync::atomic::Ordering::SeqCst)
            {
                vec![QualityCheck::fail("crowded", "nodes overlap", 1)]
            } else {
                vec![QualityCheck::pass("crowded", "ok", 1)]
            }
        }

        async fn render(&self, plan: &DiagramPlan) -> PipelineResult<Vec<DomainModuleArtifact>> {
            Ok(vec![DomainModuleArtifact::new(
                ArtifactKind::Svg,
                "diagram",
                format!("<svg data-nodes=\"{}\"/>", plan.nodes.len()),
            )])
        }
    }

    struct SimAuditor;

    #[async_trait]
    impl DiagramAuditor for SimAuditor {
        fn is_simulated(&self) -> bool {
            true
        }

        async fn audit(
            &self,
            _plan: &DiagramPlan,
            quality: &QualityReport,
        ) -> PipelineResult<AuditReport> {
            Ok(AuditReport {
                verdict: if quality.passed {
                    AuditVerdict::Approved
                } else {
                    AuditVerdict::NeedsRevision
                },
                issues: Vec::new(),
                simulated: true,
                model: None,
            })
        }
    }

    struct BrokenPlanner;

    #[async_trait]
    impl DiagramPlanner for BrokenPlanner {
        fn name(&self) -> &'static str {
            "broken-llm"
        }

        async fn plan(&self, _spec: &CanonicalProblemSpec) -> PipelineResult<DiagramPlan> {
            Err(PipelineError::LlmError("upstream timeout".to_string()))
        }
    }

    fn pipeline(
        llm: Option<Arc<dyn DiagramPlanner>>,
        module: StubModule,
    ) -> DiagramPipeline {
        DiagramPipeline::new(
            Arc::new(FixedExtractor),
            Arc::new(SceneBuilder::new()),
            llm,
            Arc::new(GridLayout),
            vec![Arc::new(module)],
            Arc::new(SimAuditor),
            PipelineSettings::default(),
        )
    }

    #[tokio::test]
    async fn generate_produces_result_with_artifacts() {
        let p = pipeline(None, StubModule::passing());
        let result = p.generate("a 9V battery and a 100 ohm resistor").await.unwrap();
        assert_eq!(result.plan.domain, ProblemDomain::Circuit);
        assert_eq!(result.artifacts.len(), 1);
        assert!(result.quality.passed);
        assert_eq!(result.audit.verdict, AuditVerdict::Approved);
        assert!(result.audit.simulated);
        assert!(result.plan.is_positioned());
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let p = pipeline(None, StubModule::passing());
        let err = p.generate("   \n ").await.unwrap_err();
        assert!(matches!(err, PipelineError::ValidationError(_)));
    }

    #[tokio::test]
    async fn llm_planner_failure_falls_back_to_scene_builder() {
        let p = pipeline(Some(Arc::new(BrokenPlanner)), StubModule::passing());
        assert!(p.has_llm_planner());
        let result = p.generate("battery and resistor").await.unwrap();
        assert!(matches!(
            result.plan.provenance,
            crate::types::PlanProvenance::RuleBased
        ));
    }

    #[tokio::test]
    async fn failing_quality_triggers_refinement_pass() {
        let p = pipeline(None, StubModule::failing_once());
        let result = p.generate("battery and resistor").await.unwrap();
        // The second validation pass succeeds after spacing was widened.
        assert!(result.quality.passed);
        let default_spacing = crate::types::LayoutHints::default().spacing;
        assert!(result.plan.layout.spacing > default_spacing);
    }

    #[tokio::test]
    async fn missing_domain_module_is_a_render_error() {
        let p = DiagramPipeline::new(
            Arc::new(FixedExtractor),
            Arc::new(SceneBuilder::new()),
            None,
            Arc::new(GridLayout),
            vec![],
            Arc::new(SimAuditor),
            PipelineSettings::default(),
        );
        let err = p.generate("battery and resistor").await.unwrap_err();
        assert!(matches!(err, PipelineError::RenderError(_)));
    }
}
