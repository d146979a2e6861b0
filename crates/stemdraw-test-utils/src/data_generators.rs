//! Sample problems and pre-positioned plans.

use serde_json::json;
use stemdraw_core::{
    ComponentKind, DiagramPlan, EdgeKind, PlanEdge, PlanNode, PlanProvenance, Point, ProblemDomain,
};

/// A representative problem text for each domain.
pub fn sample_problem(domain: ProblemDomain) -> &'static str {
    match domain {
        ProblemDomain::Circuit => {
            "A circuit with a 9V battery connected in series with a 100 ohm resistor and a lamp."
        }
        ProblemDomain::Mechanics => {
            "A 5 kg block rests on a surface. Friction acts on the block."
        }
        ProblemDomain::Chemistry => "Draw the structure of H2O showing its bonds.",
        ProblemDomain::Biology => {
            "Hexokinase catalyzes glucose. The enzyme is inhibited by its product."
        }
        ProblemDomain::Software => {
            "A class Dog inherits from a class Animal. Dog depends on a class Bone."
        }
    }
}

fn positioned(mut node: PlanNode, x: f64, y: f64) -> PlanNode {
    node.position = Some(Point::new(x, y));
    node
}

/// Battery, resistor and lamp in a closed series loop.
pub fn series_circuit_plan() -> DiagramPlan {
    let mut plan = DiagramPlan::new(ProblemDomain::Circuit, PlanProvenance::RuleBased);
    plan.title = Some("Series circuit".to_string());
    plan.nodes.push(positioned(
        PlanNode::new("battery-1", "9 V", ComponentKind::Battery),
        100.0,
        100.0,
    ));
    plan.nodes.push(positioned(
        PlanNode::new("resistor-1", "100 Ω", ComponentKind::Resistor),
        400.0,
        100.0,
    ));
    plan.nodes.push(positioned(
        PlanNode::new("lamp-1", "Lamp", ComponentKind::Lamp),
        400.0,
        400.0,
    ));
    for (i, (a, b)) in [
        ("battery-1", "resistor-1"),
        ("resistor-1", "lamp-1"),
        ("lamp-1", "battery-1"),
    ]
    .iter()
    .enumerate()
    {
        plan.edges
            .push(PlanEdge::new(format!("edge-{}", i + 1), *a, *b, EdgeKind::Wire));
    }
    plan
}

/// A block with weight and normal force attached.
pub fn free_body_plan() -> DiagramPlan {
    let mut plan = DiagramPlan::new(ProblemDomain::Mechanics, PlanProvenance::RuleBased);
    plan.nodes.push(positioned(
        PlanNode::new("body-1", "5 kg", ComponentKind::Body),
        300.0,
        300.0,
    ));
    plan.nodes.push(positioned(
        PlanNode::new("force-1", "Weight (mg)", ComponentKind::Force)
            .with_attr("angle_deg", json!(270)),
        300.0,
        440.0,
    ));
    plan.nodes.push(positioned(
        PlanNode::new("force-2", "Normal", ComponentKind::Force).with_attr("angle_deg", json!(90)),
        300.0,
        160.0,
    ));
    plan.edges
        .push(PlanEdge::new("edge-1", "body-1", "force-1", EdgeKind::Vector));
    plan.edges
        .push(PlanEdge::new("edge-2", "body-1", "force-2", EdgeKind::Vector));
    plan
}

/// Water: one oxygen, two hydrogens, single bonds.
pub fn molecule_plan() -> DiagramPlan {
    let mut plan = DiagramPlan::new(ProblemDomain::Chemistry, PlanProvenance::RuleBased);
    for (i, (symbol, x, y)) in [("O", 300.0, 200.0), ("H", 200.0, 300.0), ("H", 400.0, 300.0)]
        .iter()
        .enumerate()
    {
        plan.nodes.push(positioned(
            PlanNode::new(format!("atom-{}", i + 1), *symbol, ComponentKind::Atom),
            *x,
            *y,
        ));
    }
    plan.edges.push(PlanEdge::new(
        "bond-1",
        "atom-1",
        "atom-2",
        EdgeKind::Bond { order: 1 },
    ));
    plan.edges.push(PlanEdge::new(
        "bond-2",
        "atom-1",
        "atom-3",
        EdgeKind::Bond { order: 1 },
    ));
    plan
}

/// One enzymatic step: enzyme activates substrate, substrate flows to
/// product.
pub fn pathway_plan() -> DiagramPlan {
    let mut plan = DiagramPlan::new(ProblemDomain::Biology, PlanProvenance::RuleBased);
    plan.nodes.push(positioned(
        PlanNode::new("metabolite-1", "Glucose", ComponentKind::Metabolite),
        120.0,
        200.0,
    ));
    plan.nodes.push(positioned(
        PlanNode::new("enzyme-1", "Hexokinase", ComponentKind::Enzyme),
        300.0,
        100.0,
    ));
    plan.nodes.push(positioned(
        PlanNode::new("metabolite-2", "G6P", ComponentKind::Metabolite),
        480.0,
        200.0,
    ));
    plan.edges.push(PlanEdge::new(
        "edge-1",
        "enzyme-1",
        "metabolite-1",
        EdgeKind::Activation,
    ));
    plan.edges.push(PlanEdge::new(
        "edge-2",
        "metabolite-1",
        "metabolite-2",
        EdgeKind::Flow,
    ));
    plan
}

/// A two-class inheritance hierarchy.
pub fn software_plan() -> DiagramPlan {
    let mut plan = DiagramPlan::new(ProblemDomain::Software, PlanProvenance::RuleBased);
    plan.nodes.push(positioned(
        PlanNode::new("class-1", "Animal", ComponentKind::Class),
        300.0,
        100.0,
    ));
    plan.nodes.push(positioned(
        PlanNode::new("class-2", "Dog", ComponentKind::Class),
        300.0,
        260.0,
    ));
    plan.edges.push(PlanEdge::new(
        "edge-1",
        "class-2",
        "class-1",
        EdgeKind::Inheritance,
    ));
    plan
}
