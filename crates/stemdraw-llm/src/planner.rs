//! LLM-backed diagram planner.
//!
//! Prompts the model with the canonical problem spec and parses the
//! reply into a diagram plan. Invalid or unparseable replies surface as
//! errors; the pipeline falls back to the rule-based scene builder.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

use stemdraw_core::{
    CanonicalProblemSpec, ComponentKind, DiagramPlan, DiagramPlanner, EdgeKind, LayoutHints,
    LayoutStrategyKind, PipelineError, PipelineResult, PlanEdge, PlanNode, PlanProvenance,
};

use crate::client::{extract_json, ChatMessage, DeepSeekClient};

const SYSTEM_PROMPT: &str = "\
You are a diagram planner for STEM problems. Reply with a single JSON object \
and nothing else, following this schema:
{
  \"title\": string,
  \"nodes\": [{\"id\": string, \"label\": string, \"component\": string, \"attrs\": object?}],
  \"edges\": [{\"source\": string, \"target\": string, \"kind\": string, \"order\": int?, \"label\": string?}],
  \"annotations\": [string],
  \"strategy\": \"orthogonal\" | \"radial\" | \"force_directed\" | \"layered\"
}
Component values: battery, resistor, capacitor, inductor, switch, lamp, ground, \
body, force, surface, incline, pulley, atom, functional_group, metabolite, \
enzyme, process, compartment, class, interface, actor, package.
Edge kinds: wire, vector, bond (with order 1-3), activation, inhibition, flow, \
association, inheritance.
Every edge must reference node ids that exist. Do not invent positions.";

#[derive(Deserialize)]
struct WirePlan {
    #[serde(default)]
    title: Option<String>,
    nodes: Vec<WireNode>,
    #[serde(default)]
    edges: Vec<WireEdge>,
    #[serde(default)]
    annotations: Vec<String>,
    #[serde(default)]
    strategy: Option<String>,
}

#[derive(Deserialize)]
struct WireNode {
    id: String,
    label: String,
    component: String,
    #[serde(default)]
    attrs: BTreeMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct WireEdge {
    #[serde(default)]
    id: Option<String>,
    source: String,
    target: String,
    kind: String,
    #[serde(default)]
    order: Option<u8>,
    #[serde(default)]
    label: Option<String>,
}

fn parse_component(value: &str) -> ComponentKind {
    match value.to_lowercase().as_str() {
        "battery" => ComponentKind::Battery,
        "resistor" => ComponentKind::Resistor,
        "capacitor" => ComponentKind::Capacitor,
        "inductor" => ComponentKind::Inductor,
        "switch" => ComponentKind::Switch,
        "lamp" => ComponentKind::Lamp,
        "ground" => ComponentKind::Ground,
        "body" => ComponentKind::Body,
        "force" => ComponentKind::Force,
        "surface" => ComponentKind::Surface,
        "incline" => ComponentKind::Incline,
        "pulley" => ComponentKind::Pulley,
        "atom" => ComponentKind::Atom,
        "functional_group" => ComponentKind::FunctionalGroup,
        "metabolite" => ComponentKind::Metabolite,
        "enzyme" => ComponentKind::Enzyme,
        "process" => ComponentKind::Process,
        "compartment" => ComponentKind::Compartment,
        "class" => ComponentKind::Class,
        "interface" => ComponentKind::Interface,
        "actor" => ComponentKind::Actor,
        "package" => ComponentKind::Package,
        other => ComponentKind::Other(other.to_string()),
    }
}

fn parse_edge_kind(value: &str, order: Option<u8>) -> EdgeKind {
    match value.to_lowercase().as_str() {
        "wire" => EdgeKind::Wire,
        "vector" => EdgeKind::Vector,
        "bond" => EdgeKind::Bond {
            order: order.unwrap_or(1).clamp(1, 3),
        },
        "activation" => EdgeKind::Activation,
        "inhibition" => EdgeKind::Inhibition,
        "flow" => EdgeKind::Flow,
        "association" => EdgeKind::Association,
        "inheritance" => EdgeKind::Inheritance,
        other => EdgeKind::Other(other.to_string()),
    }
}

fn parse_strategy(value: &str) -> Option<LayoutStrategyKind> {
    match value {
        "orthogonal" => Some(LayoutStrategyKind::Orthogonal),
        "radial" => Some(LayoutStrategyKind::Radial),
        "force_directed" => Some(LayoutStrategyKind::ForceDirected),
        "layered" => Some(LayoutStrategyKind::Layered),
        _ => None,
    }
}

/// Planner backed by the DeepSeek chat API.
pub struct LlmPlanner {
    client: DeepSeekClient,
}

impl LlmPlanner {
    pub fn new(client: DeepSeekClient) -> Self {
        Self { client }
    }

    fn user_prompt(spec: &CanonicalProblemSpec) -> String {
        let entities = serde_json::to_string(&spec.entities).unwrap_or_default();
        let relations = serde_json::to_string(&spec.relations).unwrap_or_default();
        format!(
            "Domain: {}\nProblem: {}\nExtracted entities: {}\nExtracted relations: {}\nHints: {}",
            spec.domain,
            spec.raw_text,
            entities,
            relations,
            spec.hints.join("; "),
        )
    }

    fn into_plan(&self, spec: &CanonicalProblemSpec, wire: WirePlan) -> DiagramPlan {
        let mut plan = DiagramPlan::new(
            spec.domain,
            PlanProvenance::Llm {
                model: self.client.model().to_string(),
            },
        );
        plan.title = wire.title;
        plan.annotations = wire.annotations;
        plan.layout = LayoutHints {
            strategy: wire.strategy.as_deref().and_then(parse_strategy),
            ..LayoutHints::default()
        };
        for node in wire.nodes {
            let mut plan_node = PlanNode::new(node.id, node.label, parse_component(&node.component));
            plan_node.attrs = node.attrs;
            plan.nodes.push(plan_node);
        }
        for (i, edge) in wire.edges.into_iter().enumerate() {
            let kind = parse_edge_kind(&edge.kind, edge.order);
            let id = edge.id.unwrap_or_else(|| format!("edge-{}", i + 1));
            let mut plan_edge = PlanEdge::new(id, edge.source, edge.target, kind);
            plan_edge.label = edge.label;
            plan.edges.push(plan_edge);
        }
        plan
    }
}

#[async_trait]
impl DiagramPlanner for LlmPlanner {
    fn name(&self) -> &'static str {
        "deepseek"
    }

    async fn plan(&self, spec: &CanonicalProblemSpec) -> PipelineResult<DiagramPlan> {
        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(Self::user_prompt(spec)),
        ];
        let content = self.client.chat(&messages).await?;
        let json = extract_json(&content)?;
        let wire: WirePlan = serde_json::from_str(json)
            .map_err(|err| PipelineError::LlmError(format!("unparseable plan: {}", err)))?;
        let plan = self.into_plan(spec, wire);
        debug!(
            nodes = plan.nodes.len(),
            edges = plan.edges.len(),
            "LLM plan parsed"
        );
        Ok(plan)
    }
}
