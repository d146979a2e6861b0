//! Structural validation of diagram plans.
//!
//! These checks are domain-independent: they guarantee that a plan is a
//! well-formed graph before layout and rendering run. Domain-specific
//! correctness (closed circuit loops, force attachment, valence) lives in
//! each domain module's `validate` implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{PipelineError, PipelineResult};
use crate::types::DiagramPlan;

/// A single structural problem found in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanIssue {
    /// Stable issue code, e.g. "DANGLING_EDGE"
    pub code: String,
    pub message: String,
}

impl PlanIssue {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for PlanIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Collect every structural issue in a plan.
pub fn check_plan(plan: &DiagramPlan) -> Vec<PlanIssue> {
    let mut issues = Vec::new();

    if plan.nodes.is_empty() {
        issues.push(PlanIssue::new(
            "EMPTY_PLAN",
            "plan contains no nodes to draw",
        ));
    }

    let mut seen_nodes: HashSet<&str> = HashSet::new();
    for node in &plan.nodes {
        if node.id.trim().is_empty() {
            issues.push(PlanIssue::new("EMPTY_NODE_ID", "node has an empty id"));
            continue;
        }
        if !seen_nodes.insert(node.id.as_str()) {
            issues.push(PlanIssue::new(
                "DUPLICATE_NODE_ID",
                format!("node id '{}' appears more than once", node.id),
            ));
        }
    }

    let mut seen_edges: HashSet<&str> = HashSet::new();
    for edge in &plan.edges {
        if !seen_edges.insert(edge.id.as_str()) {
            issues.push(PlanIssue::new(
                "DUPLICATE_EDGE_ID",
                format!("edge id '{}' appears more than once", edge.id),
            ));
        }
        for endpoint in [&edge.source, &edge.target] {
            if !seen_nodes.contains(endpoint.as_str()) {
                issues.push(PlanIssue::new(
                    "DANGLING_EDGE",
                    format!(
                        "edge '{}' references missing node '{}'",
                        edge.id, endpoint
                    ),
                ));
            }
        }
        if edge.source == edge.target {
            issues.push(PlanIssue::new(
                "SELF_LOOP",
                format!("edge '{}' connects node '{}' to itself", edge.id, edge.source),
            ));
        }
    }

    issues
}

/// Validate a plan, rejecting it if any structural issue is found.
pub fn validate_plan(plan: &DiagramPlan) -> PipelineResult<()> {
    let issues = check_plan(plan);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::InvalidPlan(issues))
    }
}

/// Assert that layout ran: every node must carry a position.
pub fn ensure_positioned(plan: &DiagramPlan) -> PipelineResult<()> {
    let missing: Vec<&str> = plan
        .nodes
        .iter()
        .filter(|n| n.position.is_none())
        .map(|n| n.id.as_str())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::LayoutError(format!(
            "nodes without positions after layout: {}",
            missing.join(", ")
        )))
    }
}
