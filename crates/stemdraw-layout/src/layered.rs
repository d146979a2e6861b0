//! Layered (rank-based) layout for software structure diagrams.
//!
//! Ranks come from the longest path below each root; inheritance edges
//! therefore stack base types above their subtypes and dependency chains
//! read top to bottom. Cycles are tolerated: nodes on a cycle keep the
//! rank they were first assigned.

use std::collections::{HashMap, VecDeque};

use stemdraw_core::{DiagramPlan, LayoutStrategyKind, PipelineResult, Point};

use crate::strategy::{fit_canvas, LayoutStrategy};

#[derive(Debug, Default)]
pub struct LayeredLayout;

impl LayeredLayout {
    /// Longest-path ranks from the roots (nodes with no incoming edge).
    fn ranks(plan: &DiagramPlan) -> HashMap<String, usize> {
        let mut incoming: HashMap<&str, usize> = HashMap::new();
        let mut outgoing: HashMap<&str, Vec<&str>> = HashMap::new();
        for node in &plan.nodes {
            incoming.entry(node.id.as_str()).or_default();
        }
        for edge in &plan.edges {
            *incoming.entry(edge.target.as_str()).or_default() += 1;
            outgoing
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
        }

        let mut ranks: HashMap<String, usize> = HashMap::new();
        let mut queue: VecDeque<&str> = incoming
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(id, _)| *id)
            .collect();
        // A fully cyclic graph has no roots; start from the first node.
        if queue.is_empty() {
            if let Some(node) = plan.nodes.first() {
                queue.push_back(node.id.as_str());
            }
        }
        for id in &queue {
            ranks.insert((*id).to_string(), 0);
        }

        while let Some(id) = queue.pop_front() {
            let rank = ranks.get(id).copied().unwrap_or(0);
            for next in outgoing.get(id).cloned().unwrap_or_default() {
                let proposed = rank + 1;
                let current = ranks.get(next).copied();
                if current.map_or(true, |c| proposed > c) && proposed <= plan.nodes.len() {
                    ranks.insert(next.to_string(), proposed);
                    queue.push_back(next);
                }
            }
        }

        // Unreachable nodes land on rank 0.
        for node in &plan.nodes {
            ranks.entry(node.id.clone()).or_insert(0);
        }
        ranks
    }
}

impl LayoutStrategy for LayeredLayout {
    fn kind(&self) -> LayoutStrategyKind {
        LayoutStrategyKind::Layered
    }

    fn arrange(&self, plan: &mut DiagramPlan) -> PipelineResult<()> {
        if plan.nodes.is_empty() {
            return Ok(());
        }
        let spacing = plan.layout.spacing.max(1.0);
        let ranks = Self::ranks(plan);

        // Group nodes per rank, preserving plan order within a layer.
        let mut layers: Vec<Vec<usize>> = Vec::new();
        for (i, node) in plan.nodes.iter().enumerate() {
            let rank = ranks.get(&node.id).copied().unwrap_or(0);
            while layers.len() <= rank {
                layers.push(Vec::new());
            }
            layers[rank].push(i);
        }

        let row_height = spacing * 1.4;
        for (rank, layer) in layers.iter().enumerate() {
            let width = spacing * layer.len().saturating_sub(1) as f64;
            for (slot, &i) in layer.iter().enumerate() {
                plan.nodes[i].position = Some(Point::new(
                    slot as f64 * spacing - width / 2.0,
                    rank as f64 * row_height,
                ));
            }
        }

        fit_canvas(plan);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stemdraw_core::{ComponentKind, EdgeKind, PlanEdge, PlanNode, PlanProvenance, ProblemDomain};

    fn uml_plan() -> DiagramPlan {
        let mut plan = DiagramPlan::new(ProblemDomain::Software, PlanProvenance::RuleBased);
        for id in ["base", "middle", "leaf", "helper"] {
            plan.nodes
                .push(PlanNode::new(id, id.to_uppercase(), ComponentKind::Class));
        }
        plan.edges
            .push(PlanEdge::new("e1", "base", "middle", EdgeKind::Inheritance));
        plan.edges
            .push(PlanEdge::new("e2", "middle", "leaf", EdgeKind::Inheritance));
        plan
    }

    #[test]
    fn inheritance_chain_stacks_downward() {
        let mut plan = uml_plan();
        LayeredLayout.arrange(&mut plan).unwrap();
        let y = |id: &str| plan.find_node(id).unwrap().position.unwrap().y;
        assert!(y("base") < y("middle"));
        assert!(y("middle") < y("leaf"));
    }

    #[test]
    fn disconnected_node_stays_on_top_layer() {
        let mut plan = uml_plan();
        LayeredLayout.arrange(&mut plan).unwrap();
        let y = |id: &str| plan.find_node(id).unwrap().position.unwrap().y;
        assert_eq!(y("helper"), y("base"));
    }

    #[test]
    fn cycle_terminates_with_all_nodes_positioned() {
        let mut plan = DiagramPlan::new(ProblemDomain::Software, PlanProvenance::RuleBased);
        for id in ["a", "b", "c"] {
            plan.nodes
                .push(PlanNode::new(id, id.to_uppercase(), ComponentKind::Class));
        }
        plan.edges
            .push(PlanEdge::new("e1", "a", "b", EdgeKind::Association));
        plan.edges
            .push(PlanEdge::new("e2", "b", "c", EdgeKind::Association));
        plan.edges
            .push(PlanEdge::new("e3", "c", "a", EdgeKind::Association));
        LayeredLayout.arrange(&mut plan).unwrap();
        assert!(plan.is_positioned());
    }
}
