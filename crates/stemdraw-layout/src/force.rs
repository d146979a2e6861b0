//! Force-directed layout (Fruchterman-Reingold) for pathway and
//! molecule graphs.
//!
//! Nodes are seeded on a circle so the result is deterministic, then
//! relaxed with the usual repulsive/attractive step and a linear cooling
//! schedule.

use std::collections::HashMap;

use stemdraw_core::{DiagramPlan, LayoutStrategyKind, PipelineResult, Point};

use crate::strategy::{fit_canvas, seed_circle, LayoutStrategy};

const ITERATIONS: usize = 200;

#[derive(Debug, Default)]
pub struct ForceDirectedLayout;

impl LayoutStrategy for ForceDirectedLayout {
    fn kind(&self) -> LayoutStrategyKind {
        LayoutStrategyKind::ForceDirected
    }

    fn arrange(&self, plan: &mut DiagramPlan) -> PipelineResult<()> {
        let n = plan.nodes.len();
        if n == 0 {
            return Ok(());
        }
        let k = plan.layout.spacing.max(1.0);
        let center = Point::new(
            plan.layout.canvas.width / 2.0,
            plan.layout.canvas.height / 2.0,
        );

        let mut positions = seed_circle(n, center, k * 1.2);
        let index_of: HashMap<&str, usize> = plan
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.as_str(), i))
            .collect();
        let edges: Vec<(usize, usize)> = plan
            .edges
            .iter()
            .filter_map(|e| {
                Some((
                    *index_of.get(e.source.as_str())?,
                    *index_of.get(e.target.as_str())?,
                ))
            })
            .collect();

        let mut temperature = k;
        for step in 0..ITERATIONS {
            let mut disp = vec![Point::default(); n];

            // Repulsion between every pair.
            for i in 0..n {
                for j in (i + 1)..n {
                    let dx = positions[i].x - positions[j].x;
                    let dy = positions[i].y - positions[j].y;
                    let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                    let force = (k * k) / dist;
                    let (fx, fy) = (dx / dist * force, dy / dist * force);
                    disp[i].x += fx;
                    disp[i].y += fy;
                    disp[j].x -= fx;
                    disp[j].y -= fy;
                }
            }

            // Attraction along edges.
            for &(a, b) in &edges {
                let dx = positions[a].x - positions[b].x;
                let dy = positions[a].y - positions[b].y;
                let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                let force = (dist * dist) / k;
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                disp[a].x -= fx;
                disp[a].y -= fy;
                disp[b].x += fx;
                disp[b].y += fy;
            }

            // Apply displacements, capped by the current temperature.
            for i in 0..n {
                let len = (disp[i].x * disp[i].x + disp[i].y * disp[i].y)
                    .sqrt()
                    .max(0.01);
                let capped = len.min(temperature);
                positions[i].x += disp[i].x / len * capped;
                positions[i].y += disp[i].y / len * capped;
            }

            temperature = k * (1.0 - step as f64 / ITERATIONS as f64);
        }

        for (node, position) in plan.nodes.iter_mut().zip(positions) {
            node.position = Some(position);
        }
        fit_canvas(plan);
        Ok(())
    }
}
