//! Radial layout for free-body diagrams.
//!
//! The body (or the highest-degree node) sits at the canvas center and
//! every other node is placed on a surrounding circle. Nodes carrying an
//! `angle_deg` attribute keep that bearing (0° points right, angles grow
//! counterclockwise, SVG y-axis points down); the rest fill the remaining
//! arc evenly.

use std::collections::HashMap;

use stemdraw_core::{ComponentKind, DiagramPlan, LayoutStrategyKind, PipelineResult, Point};

use crate::strategy::{fit_canvas, LayoutStrategy};

#[derive(Debug, Default)]
pub struct RadialLayout;

impl RadialLayout {
    /// Pick the hub: an explicit Body node, else the most connected node.
    fn hub_index(plan: &DiagramPlan) -> usize {
        if let Some(i) = plan
            .nodes
            .iter()
            .position(|n| n.component == ComponentKind::Body)
        {
            return i;
        }
        let mut degree: HashMap<&str, usize> = HashMap::new();
        for edge in &plan.edges {
            *degree.entry(edge.source.as_str()).or_default() += 1;
            *degree.entry(edge.target.as_str()).or_default() += 1;
        }
        plan.nodes
            .iter()
            .enumerate()
            .max_by_key(|(_, n)| degree.get(n.id.as_str()).copied().unwrap_or(0))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

impl LayoutStrategy for RadialLayout {
    fn kind(&self) -> LayoutStrategyKind {
        LayoutStrategyKind::Radial
    }

    fn arrange(&self, plan: &mut DiagramPlan) -> PipelineResult<()> {
        if plan.nodes.is_empty() {
            return Ok(());
        }
        let spacing = plan.layout.spacing.max(1.0);
        let radius = spacing * 1.6;
        let center = Point::new(
            plan.layout.canvas.width / 2.0,
            plan.layout.canvas.height / 2.0,
        );

        let hub = Self::hub_index(plan);
        plan.nodes[hub].position = Some(center);

        // First pass: honor explicit bearings.
        let mut taken_angles: Vec<f64> = Vec::new();
        let mut pending: Vec<usize> = Vec::new();
        for (i, node) in plan.nodes.iter_mut().enumerate() {
            if i == hub {
                continue;
            }
            match node.attrs.get("angle_deg").and_then(|v| v.as_f64()) {
                Some(deg) => {
                    let rad = deg.to_radians();
                    // SVG y grows downward, so negate the sine.
                    node.position = Some(Point::new(
                        center.x + radius * rad.cos(),
                        center.y - radius * rad.sin(),
                    ));
                    taken_angles.push(deg.rem_euclid(360.0));
                }
                None => pending.push(i),
            }
        }

        // Second pass: spread the rest over the circle, starting away
        // from the taken bearings.
        let count = pending.len();
        for (slot, i) in pending.into_iter().enumerate() {
            let mut deg = (slot as f64 / count.max(1) as f64) * 360.0;
            // Nudge off an occupied bearing.
            while taken_angles
                .iter()
                .any(|t| (t - deg.rem_euclid(360.0)).abs() < 15.0)
            {
                deg += 20.0;
            }
            let rad = deg.to_radians();
            plan.nodes[i].position = Some(Point::new(
                center.x + radius * rad.cos(),
                center.y - radius * rad.sin(),
            ));
            taken_angles.push(deg.rem_euclid(360.0));
        }

        fit_canvas(plan);
        Ok(())
    }
}
