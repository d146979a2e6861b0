//! Rule-based scene builder.
//!
//! The always-available planner: maps extracted entities to plan nodes and
//! relations to edges, then enriches the plan with domain conventions
//! (series loops for circuits, force attachment for free-body diagrams,
//! bond chains for molecules). The LLM planner, when configured, runs
//! before this one; the scene builder is the fallback and the baseline.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::module::DiagramPlanner;
use crate::types::{
    CanonicalProblemSpec, ComponentKind, DiagramPlan, EdgeKind, LayoutStrategyKind, PlanEdge,
    PlanNode, PlanProvenance, ProblemDomain,
};

/// Rule-based planner mapping extraction output onto a diagram plan.
#[derive(Debug, Default, Clone)]
pub struct SceneBuilder;

impl SceneBuilder {
    pub fn new() -> Self {
        Self
    }

    fn base_plan(&self, spec: &CanonicalProblemSpec) -> DiagramPlan {
        let mut plan = DiagramPlan::new(spec.domain, PlanProvenance::RuleBased);
        plan.title = Some(short_title(&spec.raw_text));

        for entity in &spec.entities {
            let mut label = entity.label.clone();
            if let Some(q) = entity.quantities.first() {
                if !label.contains(&q.display()) {
                    label = format!("{} ({})", label, q.display());
                }
            }
            plan.nodes
                .push(PlanNode::new(entity.id.clone(), label, entity.kind.clone()));
        }

        for (i, rel) in spec.relations.iter().enumerate() {
            let mut edge = PlanEdge::new(
                format!("edge-{}", i + 1),
                rel.source.clone(),
                rel.target.clone(),
                rel.kind.clone(),
            );
            edge.label = rel.label.clone();
            plan.edges.push(edge);
        }

        plan
    }

    fn enrich_circuit(&self, plan: &mut DiagramPlan) {
        plan.layout.strategy = Some(LayoutStrategyKind::Orthogonal);
        // Series loop convention: chain the components in mention order
        // and close the loop, keeping any explicitly stated wiring.
        if plan.nodes.len() < 2 {
            return;
        }
        fn wired(plan: &DiagramPlan, a: &str, b: &str) -> bool {
            plan.edges.iter().any(|e| {
                (e.source == a && e.target == b) || (e.source == b && e.target == a)
            })
        }
        let ids: Vec<String> = plan.nodes.iter().map(|n| n.id.clone()).collect();
        let mut next_wire = 0;
        for i in 0..ids.len() {
            let a = &ids[i];
            let b = &ids[(i + 1) % ids.len()];
            if a != b && !wired(plan, a, b) {
                next_wire += 1;
                plan.edges.push(PlanEdge::new(
                    format!("wire-{}", next_wire),
                    a.clone(),
                    b.clone(),
                    EdgeKind::Wire,
                ));
            }
        }
    }

    fn enrich_mechanics(&self, plan: &mut DiagramPlan, spec: &CanonicalProblemSpec) {
        plan.layout.strategy = Some(LayoutStrategyKind::Radial);

        // Free-body diagrams need a body; synthesize one if the text only
        // mentioned forces.
        let body_id = match plan
            .nodes
            .iter()
            .find(|n| n.component == ComponentKind::Body)
        {
            Some(body) => body.id.clone(),
            None => {
                let id = "body".to_string();
                plan.nodes.insert(
                    0,
                    PlanNode::new(id.clone(), "Body", ComponentKind::Body),
                );
                id
            }
        };

        // Attach unconnected forces to the body.
        let force_ids: Vec<String> = plan
            .nodes
            .iter()
            .filter(|n| n.component == ComponentKind::Force)
            .map(|n| n.id.clone())
            .collect();
        let mut next_edge = plan.edges.len();
        for force_id in force_ids {
            let connected = plan
                .edges
                .iter()
                .any(|e| e.source == force_id || e.target == force_id);
            if !connected {
                next_edge += 1;
                plan.edges.push(PlanEdge::new(
                    format!("force-edge-{}", next_edge),
                    body_id.clone(),
                    force_id,
                    EdgeKind::Vector,
                ));
            }
        }

        // A stated mass implies a weight vector even when the text never
        // says "gravity".
        let has_mass = spec
            .entities
            .iter()
            .flat_map(|e| &e.quantities)
            .any(|q| q.unit == "kg");
        let has_weight = plan.nodes.iter().any(|n| {
            let label = n.label.to_lowercase();
            n.component == ComponentKind::Force
                && (label.contains("grav") || label.contains("weight"))
        });
        if has_mass && !has_weight {
            let id = "weight".to_string();
            plan.nodes.push(
                PlanNode::new(id.clone(), "Weight (mg)", ComponentKind::Force)
                    .with_attr("angle_deg", serde_json::json!(270.0)),
            );
            next_edge += 1;
            plan.edges.push(PlanEdge::new(
                format!("force-edge-{}", next_edge),
                body_id,
                id,
                EdgeKind::Vector,
            ));
        }
    }

    fn enrich_chemistry(&self, plan: &mut DiagramPlan) {
        plan.layout.strategy = Some(LayoutStrategyKind::ForceDirected);
        // Bond chain convention for bare atom lists.
        if plan.edges.is_empty() && plan.nodes.len() >= 2 {
            let ids: Vec<String> = plan.nodes.iter().map(|n| n.id.clone()).collect();
            for (i, pair) in ids.windows(2).enumerate() {
                plan.edges.push(PlanEdge::new(
                    format!("bond-{}", i + 1),
                    pair[0].clone(),
                    pair[1].clone(),
                    EdgeKind::Bond { order: 1 },
                ));
            }
        }
    }

    fn enrich_biology(&self, plan: &mut DiagramPlan) {
        plan.layout.strategy = Some(LayoutStrategyKind::ForceDirected);
        // Pathways flow in mention order when no relation was extracted.
        if plan.edges.is_empty() && plan.nodes.len() >= 2 {
            let ids: Vec<String> = plan.nodes.iter().map(|n| n.id.clone()).collect();
            for (i, pair) in ids.windows(2).enumerate() {
                plan.edges.push(PlanEdge::new(
                    format!("flow-{}", i + 1),
                    pair[0].clone(),
                    pair[1].clone(),
                    EdgeKind::Flow,
                ));
            }
        }
    }

    fn enrich_software(&self, plan: &mut DiagramPlan) {
        plan.layout.strategy = Some(LayoutStrategyKind::Layered);
    }
}

#[async_trait]
impl DiagramPlanner for SceneBuilder {
    fn name(&self) -> &'static str {
        "scene-builder"
    }

    async fn plan(&self, spec: &CanonicalProblemSpec) -> PipelineResult<DiagramPlan> {
        if spec.entities.is_empty() {
            return Err(PipelineError::PlanningError(
                "no entities to build a scene from".to_string(),
            ));
        }

        let mut plan = self.base_plan(spec);
        match spec.domain {
            ProblemDomain::Circuit => self.enrich_circuit(&mut plan),
            ProblemDomain::Mechanics => self.enrich_mechanics(&mut plan, spec),
            ProblemDomain::Chemistry => self.enrich_chemistry(&mut plan),
            ProblemDomain::Biology => self.enrich_biology(&mut plan),
            ProblemDomain::Software => self.enrich_software(&mut plan),
        }

        debug!(
            domain = %plan.domain,
            nodes = plan.nodes.len(),
            edges = plan.edges.len(),
            "scene builder produced plan"
        );
        Ok(plan)
    }
}

/// First sentence of the problem text, clipped for use as a title.
fn short_title(text: &str) -> String {
    let first = text
        .split(['.', '\n'])
        .next()
        .unwrap_or(text)
        .trim()
        .to_string();
    if first.chars().count() > 80 {
        let clipped: String = first.chars().take(79).collect();
        format!("{}…", clipped)
    } else {
        first
    }
}
