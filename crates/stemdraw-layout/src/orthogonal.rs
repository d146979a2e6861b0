//! Orthogonal rail layout for circuit loops.
//!
//! Components are distributed around the perimeter of a rectangle in
//! plan order, so a series loop reads left-to-right along the top rail
//! and right-to-left along the bottom. Wire routing between rails is the
//! circuit module's job; this strategy only fixes node centers.

use stemdraw_core::{DiagramPlan, LayoutStrategyKind, PipelineResult, Point};

use crate::strategy::{fit_canvas, LayoutStrategy, CANVAS_MARGIN};

#[derive(Debug, Default)]
pub struct OrthogonalLayout;

impl LayoutStrategy for OrthogonalLayout {
    fn kind(&self) -> LayoutStrategyKind {
        LayoutStrategyKind::Orthogonal
    }

    fn arrange(&self, plan: &mut DiagramPlan) -> PipelineResult<()> {
        let n = plan.nodes.len();
        if n == 0 {
            return Ok(());
        }
        let spacing = plan.layout.spacing.max(1.0);

        if n == 1 {
            plan.nodes[0].position = Some(Point::new(CANVAS_MARGIN, CANVAS_MARGIN));
            fit_canvas(plan);
            return Ok(());
        }

        // Split nodes between a top and a bottom rail; the loop closes at
        // the rectangle's short sides.
        let top_count = n.div_ceil(2);
        let bottom_count = n - top_count;
        let width = spacing * (top_count.max(2) - 1) as f64;
        let height = spacing.max(120.0);

        for (i, node) in plan.nodes.iter_mut().enumerate() {
            let position = if i < top_count {
                // Top rail, left to right.
                let step = if top_count > 1 {
                    width / (top_count - 1) as f64
                } else {
                    0.0
                };
                Point::new(i as f64 * step, 0.0)
            } else {
                // Bottom rail, right to left so the loop stays in order.
                let j = i - top_count;
                let step = if bottom_count > 1 {
                    width / (bottom_count - 1) as f64
                } else {
                    0.0
                };
                Point::new(width - j as f64 * step, height)
            };
            node.position = Some(position);
        }

        fit_canvas(plan);
        Ok(())
    }
}
