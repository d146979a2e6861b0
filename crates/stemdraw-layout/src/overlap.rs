//! Post-layout overlap resolution.
//!
//! Strategies optimize for shape, not collision-freedom; this pass pushes
//! overlapping bounding boxes apart along their center line until the
//! plan is clean or the iteration budget runs out.

use stemdraw_core::{DiagramPlan, Point};

const MAX_ITERATIONS: usize = 50;
/// Extra clearance required between bounding boxes.
const PADDING: f64 = 8.0;

/// Whether two nodes' boxes (plus padding) intersect.
fn overlapping(a: (&Point, f64, f64), b: (&Point, f64, f64)) -> bool {
    let (pa, wa, ha) = a;
    let (pb, wb, hb) = b;
    (pa.x - pb.x).abs() < (wa + wb) / 2.0 + PADDING
        && (pa.y - pb.y).abs() < (ha + hb) / 2.0 + PADDING
}

/// Count overlapping node pairs; zero means the layout is clean.
pub fn overlap_count(plan: &DiagramPlan) -> usize {
    let mut count = 0;
    for i in 0..plan.nodes.len() {
        for j in (i + 1)..plan.nodes.len() {
            let (a, b) = (&plan.nodes[i], &plan.nodes[j]);
            if let (Some(pa), Some(pb)) = (&a.position, &b.position) {
                if overlapping(
                    (pa, a.size.width, a.size.height),
                    (pb, b.size.width, b.size.height),
                ) {
                    count += 1;
                }
            }
        }
    }
    count
}

/// Push overlapping nodes apart in place.
pub fn resolve_overlaps(plan: &mut DiagramPlan) {
    for _ in 0..MAX_ITERATIONS {
        let mut moved = false;
        for i in 0..plan.nodes.len() {
            for j in (i + 1)..plan.nodes.len() {
                let (pa, pb) = match (plan.nodes[i].position, plan.nodes[j].position) {
                    (Some(a), Some(b)) => (a, b),
                    _ => continue,
                };
                let (wa, ha) = (plan.nodes[i].size.width, plan.nodes[i].size.height);
                let (wb, hb) = (plan.nodes[j].size.width, plan.nodes[j].size.height);
                if !overlapping((&pa, wa, ha), (&pb, wb, hb)) {
                    continue;
                }
                moved = true;
                let dx = pb.x - pa.x;
                let dy = pb.y - pa.y;
                let dist = (dx * dx + dy * dy).sqrt();
                // Coincident centers get an arbitrary horizontal split.
                let (ux, uy) = if dist < 0.01 { (1.0, 0.0) } else { (dx / dist, dy / dist) };
                let threshold = (wa + wb) / 2.0 + PADDING;
                let push = ((threshold - dist).max(0.0) / 2.0).max(4.0);
                if let Some(p) = plan.nodes[i].position.as_mut() {
                    p.x -= ux * push;
                    p.y -= uy * push;
                }
                if let Some(p) = plan.nodes[j].position.as_mut() {
                    p.x += ux * push;
                    p.y += uy * push;
                }
            }
        }
        if !moved {
            break;
        }
    }
}
