//! Shared value types for the diagram generation pipeline.
//!
//! Everything that crosses a stage boundary lives here: the extraction
//! report produced by the NLP layer, the canonical problem spec consumed
//! by planners, the diagram plan consumed by layout and the domain
//! modules, and the final result returned to API clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// The STEM domain a problem belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemDomain {
    /// Electrical circuit schematics
    Circuit,
    /// Classical mechanics / free-body diagrams
    Mechanics,
    /// Molecule structures
    Chemistry,
    /// Biological pathway graphs
    Biology,
    /// Software structure (UML-like) templates
    Software,
}

impl ProblemDomain {
    /// All domains, in classification priority order.
    ///
    /// When keyword scoring ties, the earlier domain wins.
    pub fn all() -> &'static [ProblemDomain] {
        &[
            ProblemDomain::Circuit,
            ProblemDomain::Mechanics,
            ProblemDomain::Chemistry,
            ProblemDomain::Biology,
            ProblemDomain::Software,
        ]
    }

    /// Stable string key, used in primitive lookups and output paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemDomain::Circuit => "circuit",
            ProblemDomain::Mechanics => "mechanics",
            ProblemDomain::Chemistry => "chemistry",
            ProblemDomain::Biology => "biology",
            ProblemDomain::Software => "software",
        }
    }
}

impl fmt::Display for ProblemDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A 2D position on the diagram canvas, in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Width/height pair, in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        // Default footprint of a rendered component
        Self::new(60.0, 40.0)
    }
}

/// A parsed physical magnitude, e.g. "9V", "100Ω", "5 kg".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// Numeric value in the stated unit
    pub value: f64,
    /// Unit as written in the problem text (normalized symbol)
    pub unit: String,
    /// Optional symbol the problem assigns, e.g. "R1"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl Quantity {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
            symbol: None,
        }
    }

    /// Human-readable form used for node labels, e.g. "100 Ω".
    pub fn display(&self) -> String {
        if self.unit.is_empty() {
            format!("{}", self.value)
        } else {
            format!("{} {}", self.value, self.unit)
        }
    }
}

/// The kind of component a plan node represents.
///
/// Variants span all supported domains; the primitive library and the
/// domain modules dispatch on this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    // Circuit
    Battery,
    Resistor,
    Capacitor,
    Inductor,
    Switch,
    Lamp,
    Ground,
    // Mechanics
    Body,
    Force,
    Surface,
    Incline,
    Pulley,
    // Chemistry
    Atom,
    FunctionalGroup,
    // Biology
    Metabolite,
    Enzyme,
    Process,
    Compartment,
    // Software
    Class,
    Interface,
    Actor,
    Package,
    /// Anything without a dedicated variant (kept for LLM-proposed plans)
    Other(String),
}

impl ComponentKind {
    /// Stable key used for primitive library lookups, e.g. "resistor".
    pub fn key(&self) -> String {
        match self {
            ComponentKind::Battery => "battery".to_string(),
            ComponentKind::Resistor => "resistor".to_string(),
            ComponentKind::Capacitor => "capacitor".to_string(),
            ComponentKind::Inductor => "inductor".to_string(),
            ComponentKind::Switch => "switch".to_string(),
            ComponentKind::Lamp => "lamp".to_string(),
            ComponentKind::Ground => "ground".to_string(),
            ComponentKind::Body => "body".to_string(),
            ComponentKind::Force => "force".to_string(),
            ComponentKind::Surface => "surface".to_string(),
            ComponentKind::Incline => "incline".to_string(),
            ComponentKind::Pulley => "pulley".to_string(),
            ComponentKind::Atom => "atom".to_string(),
            ComponentKind::FunctionalGroup => "functional_group".to_string(),
            ComponentKind::Metabolite => "metabolite".to_string(),
            ComponentKind::Enzyme => "enzyme".to_string(),
            ComponentKind::Process => "process".to_string(),
            ComponentKind::Compartment => "compartment".to_string(),
            ComponentKind::Class => "class".to_string(),
            ComponentKind::Interface => "interface".to_string(),
            ComponentKind::Actor => "actor".to_string(),
            ComponentKind::Package => "package".to_string(),
            ComponentKind::Other(name) => name.to_lowercase(),
        }
    }

    /// The domain this component naturally belongs to, if unambiguous.
    pub fn native_domain(&self) -> Option<ProblemDomain> {
        match self {
            ComponentKind::Battery
            | ComponentKind::Resistor
            | ComponentKind::Capacitor
            | ComponentKind::Inductor
            | ComponentKind::Switch
            | ComponentKind::Lamp
            | ComponentKind::Ground => Some(ProblemDomain::Circuit),
            ComponentKind::Body
            | ComponentKind::Force
            | ComponentKind::Surface
            | ComponentKind::Incline
            | ComponentKind::Pulley => Some(ProblemDomain::Mechanics),
            ComponentKind::Atom | ComponentKind::FunctionalGroup => {
                Some(ProblemDomain::Chemistry)
            }
            ComponentKind::Metabolite
            | ComponentKind::Enzyme
            | ComponentKind::Process
            | ComponentKind::Compartment => Some(ProblemDomain::Biology),
            ComponentKind::Class
            | ComponentKind::Interface
            | ComponentKind::Actor
            | ComponentKind::Package => Some(ProblemDomain::Software),
            ComponentKind::Other(_) => None,
        }
    }
}

/// The kind of connection a plan edge represents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Electrical connection between circuit components
    Wire,
    /// Force vector applied to a body
    Vector,
    /// Chemical bond; order 1..=3
    Bond { order: u8 },
    /// Pathway activation
    Activation,
    /// Pathway inhibition
    Inhibition,
    /// Generic directed flow
    Flow,
    /// UML association
    Association,
    /// UML inheritance
    Inheritance,
    Other(String),
}

impl EdgeKind {
    /// Whether an arrowhead should be drawn for this edge kind.
    pub fn directed(&self) -> bool {
        !matches!(
            self,
            EdgeKind::Wire | EdgeKind::Bond { .. } | EdgeKind::Association
        )
    }
}

/// An entity the NLP layer pulled out of the problem text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntity {
    /// Stable id within the report, e.g. "resistor-1"
    pub id: String,
    /// Display label, e.g. "100 Ω resistor"
    pub label: String,
    /// Component classification
    pub kind: ComponentKind,
    /// Magnitudes attached to this entity
    #[serde(default)]
    pub quantities: Vec<Quantity>,
    /// Byte offset range of the mention in the source text
    pub span: (usize, usize),
}

/// A relation the NLP layer inferred between two extracted entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRelation {
    /// Id of the source entity
    pub source: String,
    /// Id of the target entity
    pub target: String,
    pub kind: EdgeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Full output of the NLP extraction stage.
///
/// Serialized as the "NLP-extraction JSON" artifact alongside the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub domain: ProblemDomain,
    /// Classification confidence in [0, 1]
    pub confidence: f64,
    pub entities: Vec<ExtractedEntity>,
    pub relations: Vec<ExtractedRelation>,
    /// Quantities found in the text but not attached to any entity
    #[serde(default)]
    pub unattached_quantities: Vec<Quantity>,
}

/// Normalized problem description handed to planners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProblemSpec {
    pub domain: ProblemDomain,
    pub raw_text: String,
    pub entities: Vec<ExtractedEntity>,
    pub relations: Vec<ExtractedRelation>,
    /// Free-form planner hints (e.g. "prefer horizontal rails")
    #[serde(default)]
    pub hints: Vec<String>,
}

impl CanonicalProblemSpec {
    /// Build a spec from an extraction report and the original text.
    pub fn from_extraction(report: &ExtractionReport, raw_text: impl Into<String>) -> Self {
        Self {
            domain: report.domain,
            raw_text: raw_text.into(),
            entities: report.entities.clone(),
            relations: report.relations.clone(),
            hints: Vec::new(),
        }
    }
}

/// Which layout strategy a plan prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStrategyKind {
    /// Rectangular rails, used for circuit loops
    Orthogonal,
    /// Spokes around a central node, used for free-body diagrams
    Radial,
    /// Iterative spring embedding, used for pathway graphs
    ForceDirected,
    /// Rank-based layers, used for software structure
    Layered,
}

/// Layout preferences carried by a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutHints {
    /// Preferred strategy; `None` lets the engine pick by domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<LayoutStrategyKind>,
    /// Minimum spacing between node centers
    pub spacing: f64,
    /// Target canvas size
    pub canvas: Size,
}

impl Default for LayoutHints {
    fn default() -> Self {
        Self {
            strategy: None,
            spacing: 90.0,
            canvas: Size::new(800.0, 600.0),
        }
    }
}

/// Records which planner produced a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "planner", rename_all = "snake_case")]
pub enum PlanProvenance {
    RuleBased,
    Llm { model: String },
}

/// A single drawable element in a diagram plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanNode {
    pub id: String,
    pub label: String,
    pub component: ComponentKind,
    /// Assigned by the layout engine; `None` before layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(default)]
    pub size: Size,
    /// Domain-specific attributes, e.g. {"angle_deg": 30}
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, serde_json::Value>,
}

impl PlanNode {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        component: ComponentKind,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            component,
            position: None,
            size: Size::default(),
            attrs: BTreeMap::new(),
        }
    }

    /// Attach a domain-specific attribute, builder style.
    pub fn with_attr(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attrs.insert(key.into(), value);
        self
    }
}

/// A connection between two plan nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PlanEdge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        kind: EdgeKind,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind,
            label: None,
        }
    }
}

/// Intermediate representation between planning and rendering.
///
/// Produced by a planner from a [`CanonicalProblemSpec`], positioned by
/// the layout engine, and consumed by a domain module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramPlan {
    pub plan_id: Uuid,
    pub domain: ProblemDomain,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub nodes: Vec<PlanNode>,
    pub edges: Vec<PlanEdge>,
    /// Free-text callouts rendered alongside the diagram
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default)]
    pub layout: LayoutHints,
    pub provenance: PlanProvenance,
}

impl DiagramPlan {
    /// Create an empty plan for the given domain.
    pub fn new(domain: ProblemDomain, provenance: PlanProvenance) -> Self {
        Self {
            plan_id: Uuid::new_v4(),
            domain,
            title: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            annotations: Vec::new(),
            layout: LayoutHints::default(),
            provenance,
        }
    }

    /// Look up a node by id.
    pub fn find_node(&self, id: &str) -> Option<&PlanNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Whether every node has a layout position assigned.
    pub fn is_positioned(&self) -> bool {
        self.nodes.iter().all(|n| n.position.is_some())
    }
}

/// Output format of a rendered artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Svg,
    Latex,
    GraphJson,
}

impl ArtifactKind {
    /// File extension used when writing under `output/`.
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Svg => "svg",
            ArtifactKind::Latex => "tex",
            ArtifactKind::GraphJson => "json",
        }
    }
}

/// One rendered output from a domain module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainModuleArtifact {
    pub kind: ArtifactKind,
    /// Artifact name without extension, e.g. "diagram"
    pub name: String,
    pub content: String,
}

impl DomainModuleArtifact {
    pub fn new(kind: ArtifactKind, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            content: content.into(),
        }
    }

    /// File name including extension.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.kind.extension())
    }
}

/// One validation check run against a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityCheck {
    /// Short identifier, e.g. "closed_loop"
    pub name: String,
    pub passed: bool,
    pub detail: String,
    /// Relative weight of this check in the overall score
    pub weight: u32,
}

impl QualityCheck {
    pub fn pass(name: impl Into<String>, detail: impl Into<String>, weight: u32) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail: detail.into(),
            weight,
        }
    }

    pub fn fail(name: impl Into<String>, detail: impl Into<String>, weight: u32) -> Self {
        Self {
            name: name.into(),
            passed: false,
            detail: detail.into(),
            weight,
        }
    }
}

/// Aggregated validation outcome with a 0-100 quality score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Weighted pass ratio scaled to 0-100
    pub score: u8,
    pub checks: Vec<QualityCheck>,
    /// Whether the score met the configured threshold
    pub passed: bool,
}

impl QualityReport {
    /// Compute a report from individual checks.
    ///
    /// The score is the weighted fraction of passing checks, scaled to
    /// 0-100 and clamped. An empty check list scores 100.
    pub fn from_checks(checks: Vec<QualityCheck>, threshold: u8) -> Self {
        let total: u32 = checks.iter().map(|c| c.weight).sum();
        let score = if total == 0 {
            100
        } else {
            let passed: u32 = checks.iter().filter(|c| c.passed).map(|c| c.weight).sum();
            ((passed as f64 / total as f64) * 100.0).round().min(100.0) as u8
        };
        Self {
            score,
            passed: score >= threshold,
            checks,
        }
    }
}

/// Auditor verdict on a generated diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditVerdict {
    Approved,
    NeedsRevision,
    Rejected,
}

/// Output of the audit stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub verdict: AuditVerdict,
    #[serde(default)]
    pub issues: Vec<String>,
    /// True when produced by the heuristic fallback instead of an LLM
    pub simulated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Final pipeline output returned by `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramResult {
    pub plan: DiagramPlan,
    pub artifacts: Vec<DomainModuleArtifact>,
    pub extraction: ExtractionReport,
    pub quality: QualityReport,
    pub audit: AuditReport,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_report_scores_weighted_fraction() {
        let checks = vec![
            QualityCheck::pass("a", "ok", 3),
            QualityCheck::fail("b", "bad", 1),
        ];
        let report = QualityReport::from_checks(checks, 70);
        assert_eq!(report.score, 75);
        assert!(report.passed);
    }

    #[test]
    fn quality_report_empty_checks_score_full() {
        let report = QualityReport::from_checks(vec![], 70);
        assert_eq!(report.score, 100);
        assert!(report.passed);
    }

    #[test]
    fn quality_report_below_threshold_fails() {
        let checks = vec![
            QualityCheck::pass("a", "ok", 1),
            QualityCheck::fail("b", "bad", 1),
        ];
        let report = QualityReport::from_checks(checks, 70);
        assert_eq!(report.score, 50);
        assert!(!report.passed);
    }

    #[test]
    fn component_kind_keys_are_stable() {
        assert_eq!(ComponentKind::Resistor.key(), "resistor");
        assert_eq!(ComponentKind::Other("Flux".to_string()).key(), "flux");
    }

    #[test]
    fn plan_node_lookup() {
        let mut plan = DiagramPlan::new(ProblemDomain::Circuit, PlanProvenance::RuleBased);
        plan.nodes
            .push(PlanNode::new("r1", "R1", ComponentKind::Resistor));
        assert!(plan.find_node("r1").is_some());
        assert!(plan.find_node("r2").is_none());
        assert!(!plan.is_positioned());
    }

    #[test]
    fn edge_kind_direction() {
        assert!(!EdgeKind::Wire.directed());
        assert!(!EdgeKind::Bond { order: 2 }.directed());
        assert!(EdgeKind::Vector.directed());
        assert!(EdgeKind::Activation.directed());
    }

    #[test]
    fn plan_round_trips_through_json() {
        let mut plan = DiagramPlan::new(ProblemDomain::Biology, PlanProvenance::RuleBased);
        plan.nodes
            .push(PlanNode::new("m1", "Glucose", ComponentKind::Metabolite));
        plan.nodes
            .push(PlanNode::new("e1", "Hexokinase", ComponentKind::Enzyme));
        plan.edges.push(PlanEdge::new(
            "edge-1",
            "e1",
            "m1",
            EdgeKind::Activation,
        ));
        let json = serde_json::to_string(&plan).unwrap();
        let back: DiagramPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(plan, back);
    }
}
