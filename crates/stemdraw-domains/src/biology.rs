//! Biological pathway module.
//!
//! Pathways are node-link graphs: metabolites, enzymes and processes
//! joined by activation, inhibition and flow edges. Renders SVG and a
//! graph JSON export consumed by the frontend editor.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use stemdraw_core::{
    ArtifactKind, DiagramPlan, DomainModule, DomainModuleArtifact, EdgeKind, PipelineResult,
    ProblemDomain, QualityCheck,
};
use stemdraw_primitives::PrimitiveStore;

use crate::render::{graph_json, render_plan_svg};

pub struct BiologyModule {
    store: Arc<dyn PrimitiveStore>,
}

impl BiologyModule {
    pub fn new(store: Arc<dyn PrimitiveStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DomainModule for BiologyModule {
    fn domain(&self) -> ProblemDomain {
        ProblemDomain::Biology
    }

    fn name(&self) -> &'static str {
        "pathway"
    }

    fn validate(&self, plan: &DiagramPlan) -> Vec<QualityCheck> {
        let mut checks = Vec::new();

        let untyped = plan
            .edges
            .iter()
            .filter(|e| {
                !matches!(
                    e.kind,
                    EdgeKind::Activation | EdgeKind::Inhibition | EdgeKind::Flow
                )
            })
            .count();
        checks.push(if untyped == 0 {
            QualityCheck::pass("typed_edges", "all interactions are typed", 2)
        } else {
            QualityCheck::fail(
                "typed_edges",
                format!("{} interactions with no pathway type", untyped),
                2,
            )
        });

        let mut linked: HashSet<&str> = HashSet::new();
        for edge in &plan.edges {
            linked.insert(edge.source.as_str());
            linked.insert(edge.target.as_str());
        }
        let isolated: Vec<&str> = plan
            .nodes
            .iter()
            .filter(|n| !linked.contains(n.id.as_str()))
            .map(|n| n.id.as_str())
            .collect();
        checks.push(if isolated.is_empty() {
            QualityCheck::pass("no_isolated", "every species participates", 2)
        } else {
            QualityCheck::fail(
                "no_isolated",
                format!("isolated species: {}", isolated.join(", ")),
                2,
            )
        });

        checks.push(if plan.edges.is_empty() {
            QualityCheck::fail("has_interaction", "pathway has no interactions", 1)
        } else {
            QualityCheck::pass(
                "has_interaction",
                format!("{} interactions", plan.edges.len()),
                1,
            )
        });

        checks
    }

    async fn render(&self, plan: &DiagramPlan) -> PipelineResult<Vec<DomainModuleArtifact>> {
        debug!(species = plan.nodes.len(), "rendering pathway");
        let svg = render_plan_svg(self.store.as_ref(), plan).await?;
        let graph = serde_json::to_string_pretty(&graph_json(plan))?;
        Ok(vec![
            DomainModuleArtifact::new(ArtifactKind::Svg, "diagram", svg),
            DomainModuleArtifact::new(ArtifactKind::GraphJson, "graph", graph),
        ])
    }
}
