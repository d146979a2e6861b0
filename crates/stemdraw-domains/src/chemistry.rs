//! Molecule structure module.
//!
//! Checks valence limits and connectivity, renders atoms as labelled
//! circles with bond-order-aware strokes.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tracing::debug;

use stemdraw_core::{
    ArtifactKind, ComponentKind, DiagramPlan, DomainModule, DomainModuleArtifact, EdgeKind,
    PipelineResult, ProblemDomain, QualityCheck,
};
use stemdraw_primitives::PrimitiveStore;

use crate::render::render_plan_svg;

/// Maximum bonding capacity per element symbol.
fn max_valence(symbol: &str) -> u32 {
    match symbol {
        "H" | "F" | "Cl" | "Br" | "I" | "Na" | "K" | "Li" => 1,
        "O" | "Ca" | "Mg" | "Zn" => 2,
        "N" | "B" | "Al" => 3,
        "C" | "Si" => 4,
        "P" => 5,
        "S" => 6,
        _ => 4,
    }
}

pub struct ChemistryModule {
    store: Arc<dyn PrimitiveStore>,
}

impl ChemistryModule {
    pub fn new(store: Arc<dyn PrimitiveStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DomainModule for ChemistryModule {
    fn domain(&self) -> ProblemDomain {
        ProblemDomain::Chemistry
    }

    fn name(&self) -> &'static str {
        "molecule"
    }

    fn validate(&self, plan: &DiagramPlan) -> Vec<QualityCheck> {
        let mut checks = Vec::new();

        // Sum bond orders per atom.
        let mut bond_sum: HashMap<&str, u32> = HashMap::new();
        let mut bad_orders = 0usize;
        for edge in &plan.edges {
            if let EdgeKind::Bond { order } = edge.kind {
                if !(1..=3).contains(&order) {
                    bad_orders += 1;
                }
                let order = order.clamp(1, 3) as u32;
                *bond_sum.entry(edge.source.as_str()).or_default() += order;
                *bond_sum.entry(edge.target.as_str()).or_default() += order;
            }
        }

        let overbonded: Vec<String> = plan
            .nodes
            .iter()
            .filter(|n| n.component == ComponentKind::Atom)
            .filter(|n| {
                let used = bond_sum.get(n.id.as_str()).copied().unwrap_or(0);
                used > max_valence(&n.label)
            })
            .map(|n| format!("{} ({})", n.id, n.label))
            .collect();
        checks.push(if overbonded.is_empty() {
            QualityCheck::pass("valence", "all atoms within valence limits", 3)
        } else {
            QualityCheck::fail(
                "valence",
                format!("valence exceeded at: {}", overbonded.join(", ")),
                3,
            )
        });

        // BFS over bonds to verify a single connected molecule.
        let connected = if plan.nodes.len() <= 1 {
            true
        } else {
            let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
            for edge in &plan.edges {
                if matches!(edge.kind, EdgeKind::Bond { .. }) {
                    adjacency
                        .entry(edge.source.as_str())
                        .or_default()
                        .push(edge.target.as_str());
                    adjacency
                        .entry(edge.target.as_str())
                        .or_default()
                        .push(edge.source.as_str());
                }
            }
            let mut seen: HashSet<&str> = HashSet::new();
            let mut queue: VecDeque<&str> = VecDeque::new();
            if let Some(first) = plan.nodes.first() {
                queue.push_back(first.id.as_str());
                seen.insert(first.id.as_str());
            }
            while let Some(id) = queue.pop_front() {
                for next in adjacency.get(id).into_iter().flatten() {
                    if seen.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
            seen.len() == plan.nodes.len()
        };
        checks.push(if connected {
            QualityCheck::pass("connected", "molecule is a single connected structure", 2)
        } else {
            QualityCheck::fail("connected", "molecule has disconnected fragments", 2)
        });

        checks.push(if bad_orders == 0 {
            QualityCheck::pass("bond_orders", "bond orders within 1..=3", 1)
        } else {
            QualityCheck::fail(
                "bond_orders",
                format!("{} bonds with invalid order", bad_orders),
                1,
            )
        });

        checks
    }

    async fn render(&self, plan: &DiagramPlan) -> PipelineResult<Vec<DomainModuleArtifact>> {
        debug!(atoms = plan.nodes.len(), bonds = plan.edges.len(), "rendering molecule");
        let svg = render_plan_svg(self.store.as_ref(), plan).await?;
        Ok(vec![DomainModuleArtifact::new(
            ArtifactKind::Svg,
            "diagram",
            svg,
        )])
    }
}
