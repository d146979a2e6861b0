//! Circuit schematic module.
//!
//! Validates electrical structure (power source, closed loop, no
//! dangling components) and renders an SVG schematic plus a circuitikz
//! LaTeX export.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

use stemdraw_core::{
    ArtifactKind, ComponentKind, DiagramPlan, DomainModule, DomainModuleArtifact, PipelineResult,
    PlanNode, ProblemDomain, QualityCheck,
};
use stemdraw_primitives::PrimitiveStore;

use crate::render::{latex_label, position_of, render_plan_svg};

/// SVG user units per circuitikz unit.
const LATEX_SCALE: f64 = 100.0;
/// Half-length of a component stub in circuitikz units.
const STUB: f64 = 0.7;

pub struct CircuitModule {
    store: Arc<dyn PrimitiveStore>,
}

impl CircuitModule {
    pub fn new(store: Arc<dyn PrimitiveStore>) -> Self {
        Self { store }
    }

    fn to_circuitikz(&self, plan: &DiagramPlan) -> PipelineResult<String> {
        let height = plan.layout.canvas.height;
        let coord = |node: &PlanNode| -> PipelineResult<(f64, f64)> {
            let p = position_of(node)?;
            Ok((p.x / LATEX_SCALE, (height - p.y) / LATEX_SCALE))
        };

        // Stub orientation follows the rail the component sits on.
        let mut dx_sum: HashMap<&str, f64> = HashMap::new();
        let mut dy_sum: HashMap<&str, f64> = HashMap::new();
        for edge in &plan.edges {
            if let (Some(a), Some(b)) = (plan.find_node(&edge.source), plan.find_node(&edge.target))
            {
                if let (Some(pa), Some(pb)) = (a.position, b.position) {
                    *dx_sum.entry(a.id.as_str()).or_default() += (pb.x - pa.x).abs();
                    *dy_sum.entry(a.id.as_str()).or_default() += (pb.y - pa.y).abs();
                    *dx_sum.entry(b.id.as_str()).or_default() += (pb.x - pa.x).abs();
                    *dy_sum.entry(b.id.as_str()).or_default() += (pb.y - pa.y).abs();
                }
            }
        }

        let mut out = String::from("\\begin{circuitikz}\n");
        if let Some(title) = &plan.title {
            let _ = writeln!(out, "% {}", title);
        }
        for node in &plan.nodes {
            let (x, y) = coord(node)?;
            if node.component == ComponentKind::Ground {
                let _ = writeln!(out, "\\draw ({x:.2},{y:.2}) node[ground]{{}};");
                continue;
            }
            let element = match node.component {
                ComponentKind::Battery => "battery1",
                ComponentKind::Resistor => "R",
                ComponentKind::Capacitor => "C",
                ComponentKind::Inductor => "L",
                ComponentKind::Lamp => "lamp",
                ComponentKind::Switch => "switch",
                _ => "generic",
            };
            let label = latex_label(&node.label);
            let vertical = dy_sum.get(node.id.as_str()).copied().unwrap_or(0.0)
                > dx_sum.get(node.id.as_str()).copied().unwrap_or(0.0);
            if vertical {
                let _ = writeln!(
                    out,
                    "\\draw ({x:.2},{ya:.2}) to[{element}={{{label}}}] ({x:.2},{yb:.2});",
                    ya = y - STUB,
                    yb = y + STUB,
                );
            } else {
                let _ = writeln!(
                    out,
                    "\\draw ({xa:.2},{y:.2}) to[{element}={{{label}}}] ({xb:.2},{y:.2});",
                    xa = x - STUB,
                    xb = x + STUB,
                );
            }
        }
        for edge in &plan.edges {
            let source = plan.find_node(&edge.source);
            let target = plan.find_node(&edge.target);
            if let (Some(a), Some(b)) = (source, target) {
                let (xa, ya) = coord(a)?;
                let (xb, yb) = coord(b)?;
                let _ = writeln!(out, "\\draw ({xa:.2},{ya:.2}) -- ({xb:.2},{yb:.2});");
            }
        }
        out.push_str("\\end{circuitikz}\n");
        Ok(out)
    }
}

#[async_trait]
impl DomainModule for CircuitModule {
    fn domain(&self) -> ProblemDomain {
        ProblemDomain::Circuit
    }

    fn name(&self) -> &'static str {
        "circuit"
    }

    fn validate(&self, plan: &DiagramPlan) -> Vec<QualityCheck> {
        let mut degree: HashMap<&str, usize> = HashMap::new();
        for edge in &plan.edges {
            *degree.entry(edge.source.as_str()).or_default() += 1;
            *degree.entry(edge.target.as_str()).or_default() += 1;
        }

        let mut checks = Vec::new();

        let has_source = plan
            .nodes
            .iter()
            .any(|n| n.component == ComponentKind::Battery);
        checks.push(if has_source {
            QualityCheck::pass("power_source", "circuit has a power source", 2)
        } else {
            QualityCheck::fail("power_source", "no battery or power source found", 2)
        });

        let dangling: Vec<&str> = plan
            .nodes
            .iter()
            .filter(|n| degree.get(n.id.as_str()).copied().unwrap_or(0) == 0)
            .map(|n| n.id.as_str())
            .collect();
        checks.push(if dangling.is_empty() {
            QualityCheck::pass("no_dangling", "every component is wired", 2)
        } else {
            QualityCheck::fail(
                "no_dangling",
                format!("unwired components: {}", dangling.join(", ")),
                2,
            )
        });

        // A closed loop needs two connections at every component.
        let open: Vec<&str> = plan
            .nodes
            .iter()
            .filter(|n| n.component != ComponentKind::Ground)
            .filter(|n| degree.get(n.id.as_str()).copied().unwrap_or(0) < 2)
            .map(|n| n.id.as_str())
            .collect();
        checks.push(if open.is_empty() {
            QualityCheck::pass("closed_loop", "circuit forms a closed loop", 3)
        } else {
            QualityCheck::fail(
                "closed_loop",
                format!("open circuit at: {}", open.join(", ")),
                3,
            )
        });

        let unlabeled = plan.nodes.iter().filter(|n| n.label.is_empty()).count();
        checks.push(if unlabeled == 0 {
            QualityCheck::pass("labeled", "all components labeled", 1)
        } else {
            QualityCheck::fail("labeled", format!("{} unlabeled components", unlabeled), 1)
        });

        checks
    }

    async fn render(&self, plan: &DiagramPlan) -> PipelineResult<Vec<DomainModuleArtifact>> {
        debug!(nodes = plan.nodes.len(), edges = plan.edges.len(), "rendering circuit");
        let svg = render_plan_svg(self.store.as_ref(), plan).await?;
        let latex = self.to_circuitikz(plan)?;
        Ok(vec![
            DomainModuleArtifact::new(ArtifactKind::Svg, "diagram", svg),
            DomainModuleArtifact::new(ArtifactKind::Latex, "diagram", latex),
        ])
    }
}
