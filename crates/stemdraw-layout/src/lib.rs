//! # Stemdraw Layout
//!
//! The layout engine: picks a strategy per plan (orthogonal rails for
//! circuits, radial for free-body diagrams, force-directed for molecule
//! and pathway graphs, layered ranks for software structure), runs it,
//! resolves residual overlaps and fits the canvas.

use tracing::debug;

use stemdraw_core::{
    DiagramPlan, LayoutBackend, LayoutStrategyKind, PipelineResult, ProblemDomain,
};

mod force;
mod layered;
mod orthogonal;
mod overlap;
mod radial;
mod strategy;

pub use force::ForceDirectedLayout;
pub use layered::LayeredLayout;
pub use orthogonal::OrthogonalLayout;
pub use overlap::{overlap_count, resolve_overlaps};
pub use radial::RadialLayout;
pub use strategy::{LayoutStrategy, CANVAS_MARGIN};

/// Strategy-selecting layout engine; the concrete [`LayoutBackend`]
/// wired into the pipeline.
#[derive(Debug, Default)]
pub struct LayoutEngine {
    orthogonal: OrthogonalLayout,
    radial: RadialLayout,
    force: ForceDirectedLayout,
    layered: LayeredLayout,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The strategy a domain defaults to when the plan does not specify.
    pub fn default_strategy(domain: ProblemDomain) -> LayoutStrategyKind {
        match domain {
            ProblemDomain::Circuit => LayoutStrategyKind::Orthogonal,
            ProblemDomain::Mechanics => LayoutStrategyKind::Radial,
            ProblemDomain::Chemistry | ProblemDomain::Biology => {
                LayoutStrategyKind::ForceDirected
            }
            ProblemDomain::Software => LayoutStrategyKind::Layered,
        }
    }

    fn strategy(&self, kind: LayoutStrategyKind) -> &dyn LayoutStrategy {
        match kind {
            LayoutStrategyKind::Orthogonal => &self.orthogonal,
            LayoutStrategyKind::Radial => &self.radial,
            LayoutStrategyKind::ForceDirected => &self.force,
            LayoutStrategyKind::Layered => &self.layered,
        }
    }
}

impl LayoutBackend for LayoutEngine {
    fn arrange(&self, plan: &mut DiagramPlan) -> PipelineResult<()> {
        let kind = plan
            .layout
            .strategy
            .unwrap_or_else(|| Self::default_strategy(plan.domain));
        debug!(strategy = ?kind, nodes = plan.nodes.len(), "arranging plan");

        self.strategy(kind).arrange(plan)?;

        let overlaps = overlap_count(plan);
        if overlaps > 0 {
            debug!(overlaps, "resolving overlaps after strategy pass");
            resolve_overlaps(plan);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stemdraw_core::{
        ComponentKind, EdgeKind, PlanEdge, PlanNode, PlanProvenance,
    };

    fn plan(domain: ProblemDomain, n: usize) -> DiagramPlan {
        let mut plan = DiagramPlan::new(domain, PlanProvenance::RuleBased);
        for i in 0..n {
            plan.nodes.push(PlanNode::new(
                format!("n{}", i),
                format!("N{}", i),
                ComponentKind::Other("node".to_string()),
            ));
        }
        for i in 1..n {
            plan.edges.push(PlanEdge::new(
                format!("e{}", i),
                format!("n{}", i - 1),
                format!("n{}", i),
                EdgeKind::Flow,
            ));
        }
        plan
    }

    #[test]
    fn engine_positions_every_domain() {
        for domain in ProblemDomain::all() {
            let mut p = plan(*domain, 5);
            LayoutEngine::new().arrange(&mut p).unwrap();
            assert!(p.is_positioned(), "domain {} left nodes unpositioned", domain);
            assert_eq!(overlap_count(&p), 0, "domain {} has overlaps", domain);
        }
    }

    #[test]
    fn explicit_strategy_overrides_domain_default() {
        let mut p = plan(ProblemDomain::Circuit, 4);
        p.layout.strategy = Some(LayoutStrategyKind::Layered);
        LayoutEngine::new().arrange(&mut p).unwrap();
        // Layered layout stacks the chain downward; orthogonal would
        // split it across two rails.
        let ys: Vec<f64> = p.nodes.iter().map(|n| n.position.unwrap().y).collect();
        assert!(ys.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn wider_spacing_spreads_nodes() {
        let mut narrow = plan(ProblemDomain::Biology, 4);
        let mut wide = plan(ProblemDomain::Biology, 4);
        wide.layout.spacing = narrow.layout.spacing * 2.0;
        LayoutEngine::new().arrange(&mut narrow).unwrap();
        LayoutEngine::new().arrange(&mut wide).unwrap();
        let span = |p: &DiagramPlan| {
            let xs: Vec<f64> = p.nodes.iter().map(|n| n.position.unwrap().x).collect();
            xs.iter().cloned().fold(f64::MIN, f64::max) - xs.iter().cloned().fold(f64::MAX, f64::min)
        };
        assert!(span(&wide) > span(&narrow));
    }
}
