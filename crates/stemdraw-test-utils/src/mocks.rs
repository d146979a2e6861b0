//! Mock pipeline stages.

use async_trait::async_trait;

use stemdraw_core::{
    AuditReport, AuditVerdict, CanonicalProblemSpec, DiagramAuditor, DiagramPlan, DiagramPlanner,
    LayoutBackend, PipelineError, PipelineResult, Point, QualityReport,
};

/// Planner that always returns a clone of a fixed plan.
pub struct StaticPlanner {
    plan: DiagramPlan,
}

impl StaticPlanner {
    pub fn new(plan: DiagramPlan) -> Self {
        Self { plan }
    }
}

#[async_trait]
impl DiagramPlanner for StaticPlanner {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn plan(&self, _spec: &CanonicalProblemSpec) -> PipelineResult<DiagramPlan> {
        Ok(self.plan.clone())
    }
}

/// Planner that always fails, for fallback-path tests.
pub struct FailingPlanner;

#[async_trait]
impl DiagramPlanner for FailingPlanner {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn plan(&self, _spec: &CanonicalProblemSpec) -> PipelineResult<DiagramPlan> {
        Err(PipelineError::LlmError("mock planner failure".to_string()))
    }
}

/// Deterministic grid layout.
pub struct GridLayout;

impl LayoutBackend for GridLayout {
    fn arrange(&self, plan: &mut DiagramPlan) -> PipelineResult<()> {
        for (i, node) in plan.nodes.iter_mut().enumerate() {
            node.position = Some(Point::new(100.0 + 120.0 * i as f64, 100.0));
        }
        Ok(())
    }
}

/// Auditor with a fixed verdict.
pub struct StaticAuditor {
    verdict: AuditVerdict,
}

impl StaticAuditor {
    pub fn approving() -> Self {
        Self {
            verdict: AuditVerdict::Approved,
        }
    }

    pub fn rejecting() -> Self {
        Self {
            verdict: AuditVerdict::Rejected,
        }
    }
}

#[async_trait]
impl DiagramAuditor for StaticAuditor {
    fn is_simulated(&self) -> bool {
        true
    }

    async fn audit(
        &self,
        _plan: &DiagramPlan,
        _quality: &QualityReport,
    ) -> PipelineResult<AuditReport> {
        Ok(AuditReport {
            verdict: self.verdict,
            issues: Vec::new(),
            simulated: true,
            model: None,
        })
    }
}
