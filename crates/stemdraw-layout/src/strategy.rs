//! The layout strategy seam and shared placement helpers.

use stemdraw_core::{DiagramPlan, LayoutStrategyKind, PipelineResult, Point};

/// A placement algorithm for one diagram style.
pub trait LayoutStrategy: Send + Sync {
    fn kind(&self) -> LayoutStrategyKind;

    /// Assign a position to every node in the plan.
    fn arrange(&self, plan: &mut DiagramPlan) -> PipelineResult<()>;
}

/// Margin kept between the canvas edge and the outermost node centers.
pub const CANVAS_MARGIN: f64 = 80.0;

/// Deterministic seed positions on a circle, used before iterative
/// refinement so runs are reproducible without a RNG.
pub fn seed_circle(count: usize, center: Point, radius: f64) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let angle = (i as f64 / count.max(1) as f64) * std::f64::consts::TAU;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// Grow the plan canvas to cover all node positions plus the margin.
pub fn fit_canvas(plan: &mut DiagramPlan) {
    let mut max_x: f64 = 0.0;
    let mut max_y: f64 = 0.0;
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    for node in &plan.nodes {
        if let Some(p) = node.position {
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
        }
    }
    if min_x == f64::MAX {
        return;
    }
    // Shift everything so the minimum sits at the margin.
    let dx = CANVAS_MARGIN - min_x;
    let dy = CANVAS_MARGIN - min_y;
    for node in &mut plan.nodes {
        if let Some(p) = node.position.as_mut() {
            p.x += dx;
            p.y += dy;
        }
    }
    plan.layout.canvas.width = (max_x + dx + CANVAS_MARGIN).max(plan.layout.canvas.width);
    plan.layout.canvas.height = (max_y + dy + CANVAS_MARGIN).max(plan.layout.canvas.height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use stemdraw_core::{ComponentKind, PlanNode, PlanProvenance, ProblemDomain};

    #[test]
    fn seed_circle_is_deterministic_and_distinct() {
        let a = seed_circle(4, Point::new(0.0, 0.0), 100.0);
        let b = seed_circle(4, Point::new(0.0, 0.0), 100.0);
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
        assert!(a[0].distance(&a[2]) > 150.0);
    }

    #[test]
    fn fit_canvas_shifts_negative_positions_inside() {
        let mut plan = DiagramPlan::new(ProblemDomain::Circuit, PlanProvenance::RuleBased);
        let mut n = PlanNode::new("a", "A", ComponentKind::Resistor);
        n.position = Some(Point::new(-50.0, -20.0));
        plan.nodes.push(n);
        fit_canvas(&mut plan);
        let p = plan.nodes[0].position.unwrap();
        assert_eq!(p.x, CANVAS_MARGIN);
        assert_eq!(p.y, CANVAS_MARGIN);
    }
}
