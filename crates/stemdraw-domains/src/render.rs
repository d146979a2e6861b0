//! Shared rendering helpers used by every domain module.
//!
//! Each module assembles its SVG from the same building blocks: a
//! document sized from the plan's layout hints, node symbols resolved
//! through the primitive library with a procedural fallback, and edge
//! lines trimmed to node boundaries.

use stemdraw_core::{
    ComponentKind, DiagramPlan, EdgeKind, PipelineError, PipelineResult, PlanEdge, PlanNode, Point,
    ProblemDomain,
};
use stemdraw_primitives::{PrimitiveKey, PrimitiveStore, PrimitiveStoreError};
use stemdraw_svg::{circle, fmt_coord, group, line, rect, text, SvgDocument, SvgElement};
use tracing::trace;

const LABEL_OFFSET: f64 = 14.0;
const ANNOTATION_LINE_HEIGHT: f64 = 16.0;

/// Create the document shell: canvas, title, annotations, arrow marker.
pub(crate) fn document_for(plan: &DiagramPlan) -> SvgDocument {
    let canvas = plan.layout.canvas;
    let mut doc = SvgDocument::new(canvas.width, canvas.height);
    doc.add_def(SvgDocument::arrow_marker());
    if let Some(title) = &plan.title {
        doc.add(
            text(canvas.width / 2.0, 24.0, title.clone())
                .attr("text-anchor", "middle")
                .attr("font-size", "16")
                .attr("font-family", "sans-serif"),
        );
    }
    let base = canvas.height - ANNOTATION_LINE_HEIGHT * plan.annotations.len() as f64;
    for (i, note) in plan.annotations.iter().enumerate() {
        doc.add(
            text(16.0, base + ANNOTATION_LINE_HEIGHT * i as f64, note.clone())
                .attr("font-size", "12")
                .attr("font-family", "sans-serif")
                .attr("fill", "#555"),
        );
    }
    doc
}

/// A node's position, or a render error when layout never ran.
pub(crate) fn position_of(node: &PlanNode) -> PipelineResult<Point> {
    node.position.ok_or_else(|| {
        PipelineError::RenderError(format!("node '{}' has no layout position", node.id))
    })
}

fn translate(p: Point) -> String {
    format!("translate({},{})", fmt_coord(p.x), fmt_coord(p.y))
}

/// Procedural symbol for components without a library primitive.
fn fallback_shape(node: &PlanNode) -> SvgElement {
    let w = node.size.width;
    let h = node.size.height;
    match node.component {
        ComponentKind::Atom
        | ComponentKind::Metabolite
        | ComponentKind::Enzyme
        | ComponentKind::Process => circle(0.0, 0.0, w.min(h) / 2.0)
            .attr("fill", "white")
            .attr("stroke", "currentColor")
            .attr("stroke-width", "2"),
        _ => rect(-w / 2.0, -h / 2.0, w, h)
            .attr("fill", "white")
            .attr("stroke", "currentColor")
            .attr("stroke-width", "2")
            .attr("rx", "4"),
    }
}

/// Resolve a node to a positioned `<g>`: primitive fragment when the
/// library has one, procedural shape otherwise, plus the label.
pub(crate) async fn node_symbol(
    store: &dyn PrimitiveStore,
    domain: ProblemDomain,
    node: &PlanNode,
) -> PipelineResult<SvgElement> {
    let pos = position_of(node)?;
    let key = PrimitiveKey::for_component(domain, &node.component);
    let mut symbol = group()
        .attr("transform", translate(pos))
        .attr("data-node", node.id.clone());
    let height = match store.get(&key).await {
        Ok(primitive) => {
            trace!(key = %key, node = %node.id, "using library primitive");
            symbol = symbol.raw(primitive.svg_fragment);
            primitive.height
        }
        Err(PrimitiveStoreError::NotFound(_)) => {
            symbol = symbol.child(fallback_shape(node));
            node.size.height
        }
        Err(err) => return Err(err.into()),
    };
    if !node.label.is_empty() {
        // Atom symbols carry the element label inside the circle.
        let label = if node.component == ComponentKind::Atom {
            text(0.0, 5.0, node.label.clone())
                .attr("text-anchor", "middle")
                .attr("font-size", "14")
                .attr("font-family", "sans-serif")
        } else {
            text(0.0, height / 2.0 + LABEL_OFFSET, node.label.clone())
                .attr("text-anchor", "middle")
                .attr("font-size", "12")
                .attr("font-family", "sans-serif")
        };
        symbol = symbol.child(label);
    }
    Ok(symbol)
}

/// Pull both endpoints in toward each other so edges stop at node
/// boundaries rather than node centers.
fn trimmed_endpoints(a: Point, a_extent: f64, b: Point, b_extent: f64) -> (Point, Point) {
    let dist = a.distance(&b);
    if dist <= a_extent + b_extent {
        return (a, b);
    }
    let ux = (b.x - a.x) / dist;
    let uy = (b.y - a.y) / dist;
    (
        Point::new(a.x + ux * a_extent, a.y + uy * a_extent),
        Point::new(b.x - ux * b_extent, b.y - uy * b_extent),
    )
}

fn half_extent(node: &PlanNode) -> f64 {
    node.size.width.min(node.size.height) / 2.0
}

/// Render one edge as a `<g>` of line(s) and an optional midpoint label.
///
/// Bonds render as parallel strokes matching the order; directed kinds
/// get an arrowhead, inhibition gets a blunt bar instead.
pub(crate) fn edge_element(plan: &DiagramPlan, edge: &PlanEdge) -> PipelineResult<SvgElement> {
    let source = plan
        .find_node(&edge.source)
        .ok_or_else(|| PipelineError::RenderError(format!("edge '{}' has no source", edge.id)))?;
    let target = plan
        .find_node(&edge.target)
        .ok_or_else(|| PipelineError::RenderError(format!("edge '{}' has no target", edge.id)))?;
    let (a, b) = trimmed_endpoints(
        position_of(source)?,
        half_extent(source),
        position_of(target)?,
        half_extent(target),
    );
    let mut g = group().attr("data-edge", edge.id.clone());
    match &edge.kind {
        EdgeKind::Bond { order } => {
            let dist = a.distance(&b).max(1.0);
            let nx = -(b.y - a.y) / dist;
            let ny = (b.x - a.x) / dist;
            let order = (*order).clamp(1, 3) as i32;
            for i in 0..order {
                let offset = (i as f64 - (order - 1) as f64 / 2.0) * 4.0;
                g = g.child(
                    line(
                        a.x + nx * offset,
                        a.y + ny * offset,
                        b.x + nx * offset,
                        b.y + ny * offset,
                    )
                    .attr("stroke", "currentColor")
                    .attr("stroke-width", "2"),
                );
            }
        }
        EdgeKind::Inhibition => {
            let dist = a.distance(&b).max(1.0);
            let nx = -(b.y - a.y) / dist;
            let ny = (b.x - a.x) / dist;
            g = g
                .child(
                    line(a.x, a.y, b.x, b.y)
                        .attr("stroke", "currentColor")
                        .attr("stroke-width", "2"),
                )
                .child(
                    line(b.x + nx * 7.0, b.y + ny * 7.0, b.x - nx * 7.0, b.y - ny * 7.0)
                        .attr("stroke", "currentColor")
                        .attr("stroke-width", "2"),
                );
        }
        kind => {
            let mut l = line(a.x, a.y, b.x, b.y)
                .attr("stroke", "currentColor")
                .attr("stroke-width", "2");
            if kind.directed() {
                l = l.attr("marker-end", "url(#arrow)");
            }
            g = g.child(l);
        }
    }
    if let Some(label) = &edge.label {
        g = g.child(
            text((a.x + b.x) / 2.0, (a.y + b.y) / 2.0 - 6.0, label.clone())
                .attr("text-anchor", "middle")
                .attr("font-size", "11")
                .attr("font-family", "sans-serif")
                .attr("fill", "#333"),
        );
    }
    Ok(g)
}

/// Default scene renderer: edges under nodes, shared by the domains
/// that need no custom drawing pass.
pub(crate) async fn render_plan_svg(
    store: &dyn PrimitiveStore,
    plan: &DiagramPlan,
) -> PipelineResult<String> {
    let mut doc = document_for(plan);
    for edge in &plan.edges {
        doc.add(edge_element(plan, edge)?);
    }
    for node in &plan.nodes {
        doc.add(node_symbol(store, plan.domain, node).await?);
    }
    Ok(doc.render())
}

/// Node-link JSON export used by the pathway and software modules.
pub(crate) fn graph_json(plan: &DiagramPlan) -> serde_json::Value {
    serde_json::json!({
        "directed": true,
        "domain": plan.domain,
        "title": plan.title,
        "nodes": plan.nodes.iter().map(|n| serde_json::json!({
            "id": n.id,
            "label": n.label,
            "kind": n.component,
            "x": n.position.map(|p| p.x),
            "y": n.position.map(|p| p.y),
        })).collect::<Vec<_>>(),
        "edges": plan.edges.iter().map(|e| serde_json::json!({
            "id": e.id,
            "source": e.source,
            "target": e.target,
            "kind": e.kind,
            "label": e.label,
        })).collect::<Vec<_>>(),
    })
}

/// Escape a diagram label for LaTeX output.
pub(crate) fn latex_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '\\' => out.push_str("\\textbackslash{}"),
            'Ω' => out.push_str("$\\Omega$"),
            'µ' => out.push_str("$\\mu$"),
            '°' => out.push_str("$^{\\circ}$"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use stemdraw_core::{PlanProvenance, Size};
    use stemdraw_primitives::InMemoryPrimitiveStore;

    fn positioned_plan() -> DiagramPlan {
        let mut plan = DiagramPlan::new(ProblemDomain::Circuit, PlanProvenance::RuleBased);
        let mut battery = PlanNode::new("battery-1", "9 V", ComponentKind::Battery);
        battery.position = Some(Point::new(100.0, 100.0));
        let mut resistor = PlanNode::new("resistor-1", "100 Ω", ComponentKind::Resistor);
        resistor.position = Some(Point::new(300.0, 100.0));
        plan.nodes.push(battery);
        plan.nodes.push(resistor);
        plan.edges.push(PlanEdge::new(
            "edge-1",
            "battery-1",
            "resistor-1",
            EdgeKind::Wire,
        ));
        plan
    }

    #[tokio::test]
    async fn library_primitive_wins_over_fallback() {
        let store = InMemoryPrimitiveStore::new();
        let plan = positioned_plan();
        let svg = render_plan_svg(&store, &plan).await.unwrap();
        // The builtin resistor is a zig-zag path, not a fallback rect.
        assert!(svg.contains("data-node=\"resistor-1\""));
        assert!(svg.contains("<path d=\"M -24 0"));
    }

    #[tokio::test]
    async fn empty_store_falls_back_to_procedural_shapes() {
        let store = InMemoryPrimitiveStore::empty();
        let plan = positioned_plan();
        let svg = render_plan_svg(&store, &plan).await.unwrap();
        assert!(svg.contains("<rect"));
        assert!(!svg.contains("M -24 0"));
    }

    #[tokio::test]
    async fn unpositioned_node_is_a_render_error() {
        let store = InMemoryPrimitiveStore::new();
        let mut plan = positioned_plan();
        plan.nodes[0].position = None;
        let err = render_plan_svg(&store, &plan).await.unwrap_err();
        assert!(matches!(err, PipelineError::RenderError(_)));
    }

    #[test]
    fn bonds_render_parallel_strokes() {
        let mut plan = DiagramPlan::new(ProblemDomain::Chemistry, PlanProvenance::RuleBased);
        let mut a = PlanNode::new("atom-1", "C", ComponentKind::Atom);
        a.position = Some(Point::new(0.0, 0.0));
        a.size = Size::new(24.0, 24.0);
        let mut b = PlanNode::new("atom-2", "O", ComponentKind::Atom);
        b.position = Some(Point::new(80.0, 0.0));
        b.size = Size::new(24.0, 24.0);
        plan.nodes.push(a);
        plan.nodes.push(b);
        let edge = PlanEdge::new("edge-1", "atom-1", "atom-2", EdgeKind::Bond { order: 2 });
        let g = edge_element(&plan, &edge).unwrap();
        let mut doc = SvgDocument::new(100.0, 100.0);
        doc.add(g);
        let svg = doc.render();
        assert_eq!(svg.matches("<line").count(), 2);
    }

    #[test]
    fn latex_labels_escape_specials() {
        assert_eq!(latex_label("100 Ω"), "100 $\\Omega$");
        assert_eq!(latex_label("R_1 & R_2"), "R\\_1 \\& R\\_2");
    }

    #[test]
    fn graph_json_carries_positions() {
        let plan = positioned_plan();
        let value = graph_json(&plan);
        assert_eq!(value["nodes"][0]["x"], 100.0);
        assert_eq!(value["edges"][0]["source"], "battery-1");
    }
}
