//! Software structure (UML-like) module.
//!
//! Classes, interfaces, actors and packages joined by inheritance and
//! association edges. Inheritance cycles fail validation. Renders SVG
//! and a graph JSON export.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use stemdraw_core::{
    ArtifactKind, DiagramPlan, DomainModule, DomainModuleArtifact, EdgeKind, PipelineResult,
    ProblemDomain, QualityCheck,
};
use stemdraw_primitives::PrimitiveStore;

use crate::render::{graph_json, render_plan_svg};

pub struct SoftwareModule {
    store: Arc<dyn PrimitiveStore>,
}

impl SoftwareModule {
    pub fn new(store: Arc<dyn PrimitiveStore>) -> Self {
        Self { store }
    }

    /// DFS cycle detection over inheritance edges only.
    fn has_inheritance_cycle(plan: &DiagramPlan) -> bool {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &plan.edges {
            if edge.kind == EdgeKind::Inheritance {
                adjacency
                    .entry(edge.source.as_str())
                    .or_default()
                    .push(edge.target.as_str());
            }
        }
        let mut done: HashSet<&str> = HashSet::new();
        for start in adjacency.keys().copied() {
            if done.contains(start) {
                continue;
            }
            let mut on_path: HashSet<&str> = HashSet::new();
            let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
            on_path.insert(start);
            while let Some((node, idx)) = stack.pop() {
                let next = adjacency.get(node).and_then(|out| out.get(idx)).copied();
                match next {
                    Some(next) => {
                        stack.push((node, idx + 1));
                        if on_path.contains(next) {
                            return true;
                        }
                        if !done.contains(next) {
                            on_path.insert(next);
                            stack.push((next, 0));
                        }
                    }
                    None => {
                        on_path.remove(node);
                        done.insert(node);
                    }
                }
            }
        }
        false
    }
}

#[async_trait]
impl DomainModule for SoftwareModule {
    fn domain(&self) -> ProblemDomain {
        ProblemDomain::Software
    }

    fn name(&self) -> &'static str {
        "software"
    }

    fn validate(&self, plan: &DiagramPlan) -> Vec<QualityCheck> {
        let mut checks = Vec::new();

        checks.push(if Self::has_inheritance_cycle(plan) {
            QualityCheck::fail("acyclic_inheritance", "inheritance hierarchy has a cycle", 3)
        } else {
            QualityCheck::pass("acyclic_inheritance", "inheritance hierarchy is acyclic", 3)
        });

        let untyped = plan
            .edges
            .iter()
            .filter(|e| {
                !matches!(
                    e.kind,
                    EdgeKind::Inheritance | EdgeKind::Association | EdgeKind::Flow
                )
            })
            .count();
        checks.push(if untyped == 0 {
            QualityCheck::pass("typed_edges", "all relationships are typed", 1)
        } else {
            QualityCheck::fail(
                "typed_edges",
                format!("{} relationships with no UML type", untyped),
                1,
            )
        });

        let unlabeled = plan.nodes.iter().filter(|n| n.label.is_empty()).count();
        checks.push(if unlabeled == 0 {
            QualityCheck::pass("labeled", "all elements named", 1)
        } else {
            QualityCheck::fail("labeled", format!("{} unnamed elements", unlabeled), 1)
        });

        checks
    }

    async fn render(&self, plan: &DiagramPlan) -> PipelineResult<Vec<DomainModuleArtifact>> {
        debug!(elements = plan.nodes.len(), "rendering software structure");
        let svg = render_plan_svg(self.store.as_ref(), plan).await?;
        let graph = serde_json::to_string_pretty(&graph_json(plan))?;
        Ok(vec![
            DomainModuleArtifact::new(ArtifactKind::Svg, "diagram", svg),
            DomainModuleArtifact::new(ArtifactKind::GraphJson, "graph", graph),
        ])
    }
}
