//! Free-body diagram module.
//!
//! Forces render as arrows out of the body they act on, surfaces and
//! inclines as ground lines. Exports SVG plus a TikZ LaTeX version.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

use stemdraw_core::{
    ArtifactKind, ComponentKind, DiagramPlan, DomainModule, DomainModuleArtifact, EdgeKind,
    PipelineResult, PlanNode, Point, ProblemDomain, QualityCheck,
};
use stemdraw_primitives::PrimitiveStore;
use stemdraw_svg::{line, text};

use crate::render::{document_for, edge_element, latex_label, node_symbol, position_of};

const LATEX_SCALE: f64 = 100.0;

pub struct MechanicsModule {
    store: Arc<dyn PrimitiveStore>,
}

impl MechanicsModule {
    pub fn new(store: Arc<dyn PrimitiveStore>) -> Self {
        Self { store }
    }

    /// Map each force node to the body it acts on, via vector edges.
    fn force_anchors<'a>(plan: &'a DiagramPlan) -> HashMap<&'a str, &'a PlanNode> {
        let mut anchors = HashMap::new();
        for edge in &plan.edges {
            if edge.kind != EdgeKind::Vector {
                continue;
            }
            let source = plan.find_node(&edge.source);
            let target = plan.find_node(&edge.target);
            if let (Some(a), Some(b)) = (source, target) {
                match (&a.component, &b.component) {
                    (ComponentKind::Body, ComponentKind::Force) => {
                        anchors.insert(b.id.as_str(), a);
                    }
                    (ComponentKind::Force, ComponentKind::Body) => {
                        anchors.insert(a.id.as_str(), b);
                    }
                    _ => {}
                }
            }
        }
        anchors
    }

    fn to_tikz(&self, plan: &DiagramPlan) -> PipelineResult<String> {
        let height = plan.layout.canvas.height;
        let coord = |p: Point| (p.x / LATEX_SCALE, (height - p.y) / LATEX_SCALE);
        let anchors = Self::force_anchors(plan);

        let mut out = String::from("\\begin{tikzpicture}[>=stealth]\n");
        if let Some(title) = &plan.title {
            let _ = writeln!(out, "% {}", title);
        }
        for node in &plan.nodes {
            let (x, y) = coord(position_of(node)?);
            match node.component {
                ComponentKind::Body => {
                    let w = node.size.width / LATEX_SCALE / 2.0;
                    let h = node.size.height / LATEX_SCALE / 2.0;
                    let _ = writeln!(
                        out,
                        "\\draw[thick] ({:.2},{:.2}) rectangle ({:.2},{:.2});",
                        x - w,
                        y - h,
                        x + w,
                        y + h,
                    );
                    if !node.label.is_empty() {
                        let _ = writeln!(
                            out,
                            "\\node at ({x:.2},{y:.2}) {{{}}};",
                            latex_label(&node.label)
                        );
                    }
                }
                ComponentKind::Force => {
                    let origin = anchors
                        .get(node.id.as_str())
                        .and_then(|body| body.position)
                        .map(|p| coord(p))
                        .unwrap_or((x, y));
                    let _ = writeln!(
                        out,
                        "\\draw[->,thick] ({:.2},{:.2}) -- ({x:.2},{y:.2}) node[pos=1.1] {{{}}};",
                        origin.0,
                        origin.1,
                        latex_label(&node.label),
                    );
                }
                ComponentKind::Surface | ComponentKind::Incline => {
                    let half = node.size.width / LATEX_SCALE;
                    let _ = writeln!(
                        out,
                        "\\draw ({:.2},{y:.2}) -- ({:.2},{y:.2});",
                        x - half,
                        x + half,
                    );
                }
                _ => {
                    let _ = writeln!(
                        out,
                        "\\node at ({x:.2},{y:.2}) {{{}}};",
                        latex_label(&node.label)
                    );
                }
            }
        }
        out.push_str("\\end{tikzpicture}\n");
        Ok(out)
    }
}

#[async_trait]
impl DomainModule for MechanicsModule {
    fn domain(&self) -> ProblemDomain {
        ProblemDomain::Mechanics
    }

    fn name(&self) -> &'static str {
        "free-body"
    }

    fn validate(&self, plan: &DiagramPlan) -> Vec<QualityCheck> {
        let mut checks = Vec::new();

        let has_body = plan.nodes.iter().any(|n| n.component == ComponentKind::Body);
        checks.push(if has_body {
            QualityCheck::pass("has_body", "diagram has a body", 3)
        } else {
            QualityCheck::fail("has_body", "no body to attach forces to", 3)
        });

        let anchors = Self::force_anchors(plan);
        let unattached: Vec<&str> = plan
            .nodes
            .iter()
            .filter(|n| n.component == ComponentKind::Force)
            .filter(|n| !anchors.contains_key(n.id.as_str()))
            .map(|n| n.id.as_str())
            .collect();
        checks.push(if unattached.is_empty() {
            QualityCheck::pass("forces_attached", "every force acts on a body", 3)
        } else {
            QualityCheck::fail(
                "forces_attached",
                format!("forces not attached to any body: {}", unattached.join(", ")),
                3,
            )
        });

        let forces: Vec<&PlanNode> = plan
            .nodes
            .iter()
            .filter(|n| n.component == ComponentKind::Force)
            .collect();
        checks.push(if forces.is_empty() {
            QualityCheck::fail("has_forces", "no forces in the diagram", 1)
        } else {
            QualityCheck::pass("has_forces", format!("{} forces", forces.len()), 1)
        });

        let missing_angle = forces
            .iter()
            .filter(|n| !n.attrs.get("angle_deg").map_or(false, |v| v.is_number()))
            .count();
        checks.push(if missing_angle == 0 {
            QualityCheck::pass("force_angles", "every force has a direction", 1)
        } else {
            QualityCheck::fail(
                "force_angles",
                format!("{} forces without an angle", missing_angle),
                1,
            )
        });

        checks
    }

    async fn render(&self, plan: &DiagramPlan) -> PipelineResult<Vec<DomainModuleArtifact>> {
        debug!(nodes = plan.nodes.len(), "rendering free-body diagram");
        let anchors = Self::force_anchors(plan);
        let mut doc = document_for(plan);

        // Non-vector edges (ropes, contacts) draw as plain connections.
        for edge in &plan.edges {
            if edge.kind != EdgeKind::Vector {
                doc.add(edge_element(plan, edge)?);
            }
        }

        for node in &plan.nodes {
            let pos = position_of(node)?;
            match node.component {
                ComponentKind::Force => {
                    let origin = anchors
                        .get(node.id.as_str())
                        .and_then(|body| body.position)
                        .unwrap_or(pos);
                    doc.add(
                        line(origin.x, origin.y, pos.x, pos.y)
                            .attr("stroke", "currentColor")
                            .attr("stroke-width", "2")
                            .attr("marker-end", "url(#arrow)"),
                    );
                    let dist = origin.distance(&pos).max(1.0);
                    let lx = pos.x + (pos.x - origin.x) / dist * 16.0;
                    let ly = pos.y + (pos.y - origin.y) / dist * 16.0;
                    doc.add(
                        text(lx, ly, node.label.clone())
                            .attr("text-anchor", "middle")
                            .attr("font-size", "12")
                            .attr("font-family", "sans-serif"),
                    );
                }
                ComponentKind::Surface | ComponentKind::Incline => {
                    doc.add(
                        line(pos.x - node.size.width, pos.y, pos.x + node.size.width, pos.y)
                            .attr("stroke", "currentColor")
                            .attr("stroke-width", "2")
                            .attr("stroke-dasharray", "6 3"),
                    );
                }
                _ => doc.add(node_symbol(self.store.as_ref(), plan.domain, node).await?),
            }
        }

        let svg = doc.render();
        let latex = self.to_tikz(plan)?;
        Ok(vec![
            DomainModuleArtifact::new(ArtifactKind::Svg, "diagram", svg),
            DomainModuleArtifact::new(ArtifactKind::Latex, "diagram", latex),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stemdraw_core::{PlanEdge, PlanProvenance, QualityReport};
    use stemdraw_primitives::InMemoryPrimitiveStore;

    fn module() -> MechanicsModule {
        MechanicsModule::new(Arc::new(InMemoryPrimitiveStore::new()))
    }

    fn block_with_forces() -> DiagramPlan {
        let mut plan = DiagramPlan::new(ProblemDomain::Mechanics, PlanProvenance::RuleBased);
        let mut body = PlanNode::new("body-1", "5 kg", ComponentKind::Body);
        body.position = Some(Point::new(300.0, 300.0));
        plan.nodes.push(body);
        let mut weight = PlanNode::new("force-1", "Weight (mg)", ComponentKind::Force)
            .with_attr("angle_deg", json!(270));
        weight.position = Some(Point::new(300.0, 440.0));
        plan.nodes.push(weight);
        let mut normal = PlanNode::new("force-2", "Normal", ComponentKind::Force)
            .with_attr("angle_deg", json!(90));
        normal.position = Some(Point::new(300.0, 160.0));
        plan.nodes.push(normal);
        plan.edges.push(PlanEdge::new(
            "e1",
            "body-1",
            "force-1",
            EdgeKind::Vector,
        ));
        plan.edges.push(PlanEdge::new(
            "e2",
            "body-1",
            "force-2",
            EdgeKind::Vector,
        ));
        plan
    }

    #[test]
    fn attached_forces_pass_validation() {
        let checks = module().validate(&block_with_forces());
        let report = QualityReport::from_checks(checks, 70);
        assert_eq!(report.score, 100);
    }

    #[test]
    fn detached_force_fails_attachment_check() {
        let mut plan = block_with_forces();
        plan.edges.clear();
        let checks = module().validate(&plan);
        let check = checks.iter().find(|c| c.name == "forces_attached").unwrap();
        assert!(!check.passed);
    }

    #[test]
    fn missing_body_fails() {
        let mut plan = block_with_forces();
        plan.nodes.retain(|n| n.component != ComponentKind::Body);
        plan.edges.clear();
        let checks = module().validate(&plan);
        assert!(!checks.iter().find(|c| c.name == "has_body").unwrap().passed);
    }

    #[tokio::test]
    async fn forces_render_as_arrows_from_the_body() {
        let artifacts = module().render(&block_with_forces()).await.unwrap();
        let svg = artifacts
            .iter()
            .find(|a| a.kind == ArtifactKind::Svg)
            .unwrap();
        assert!(svg.content.contains("marker-end=\"url(#arrow)\""));
        assert!(svg.content.contains(">Weight (mg)</text>"));
    }

    #[tokio::test]
    async fn tikz_export_draws_body_and_arrows() {
        let artifacts = module().render(&block_with_forces()).await.unwrap();
        let tex = artifacts
            .iter()
            .find(|a| a.kind == ArtifactKind::Latex)
            .unwrap();
        assert!(tex.content.starts_with("\\begin{tikzpicture}"));
        assert!(tex.content.contains("rectangle"));
        assert!(tex.content.contains("\\draw[->,thick]"));
    }
}
