//! Relation phrase detection.
//!
//! Scans for connective phrases ("in series with", "activates",
//! "inherits from") and links the nearest entity mention on each side.

use once_cell::sync::Lazy;
use regex::Regex;
use stemdraw_core::EdgeKind;

static RELATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(in series with|in parallel with|connected to|double[- ]bonded to|bonded to|activates|inhibits|blocks|suppresses|catalyzes|phosphorylates|converts|produces|yields|inherits from|extends|implements|depends on|uses|calls)\b",
    )
    .expect("relation regex must compile")
});

/// A connective phrase found in the text, not yet linked to entities.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationMention {
    pub span: (usize, usize),
    pub kind: EdgeKind,
    pub label: Option<String>,
}

/// Map a matched phrase to its edge kind and label.
fn classify_phrase(phrase: &str) -> (EdgeKind, Option<String>) {
    let normalized = phrase.to_lowercase().replace('-', " ");
    match normalized.as_str() {
        "in series with" => (EdgeKind::Wire, Some("series".to_string())),
        "in parallel with" => (EdgeKind::Wire, Some("parallel".to_string())),
        "connected to" => (EdgeKind::Wire, None),
        "double bonded to" => (EdgeKind::Bond { order: 2 }, None),
        "bonded to" => (EdgeKind::Bond { order: 1 }, None),
        "activates" => (EdgeKind::Activation, None),
        "inhibits" | "blocks" | "suppresses" => (EdgeKind::Inhibition, None),
        "catalyzes" | "phosphorylates" | "converts" => {
            (EdgeKind::Activation, Some(normalized))
        }
        "produces" | "yields" => (EdgeKind::Flow, Some(normalized)),
        "inherits from" | "extends" => (EdgeKind::Inheritance, None),
        "implements" => (EdgeKind::Inheritance, Some("implements".to_string())),
        "depends on" | "uses" | "calls" => (EdgeKind::Association, Some(normalized)),
        other => (EdgeKind::Other(other.to_string()), None),
    }
}

/// Find every relation phrase in the text.
pub fn find_relation_mentions(text: &str) -> Vec<RelationMention> {
    RELATION_RE
        .find_iter(text)
        .map(|m| {
            let (kind, label) = classify_phrase(m.as_str());
            RelationMention {
                span: (m.start(), m.end()),
                kind,
                label,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_phrase_maps_to_labeled_wire() {
        let found = find_relation_mentions("R1 in series with R2");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, EdgeKind::Wire);
        assert_eq!(found[0].label.as_deref(), Some("series"));
    }

    #[test]
    fn biology_verbs_map_to_pathway_kinds() {
        let found = find_relation_mentions("hexokinase phosphorylates glucose; ATP inhibits it");
        assert_eq!(found.len(), 2);
        assert_eq!(
            found[0].kind,
            EdgeKind::Activation
        );
        assert_eq!(found[0].label.as_deref(), Some("phosphorylates"));
        assert_eq!(found[1].kind, EdgeKind::Inhibition);
    }

    #[test]
    fn bond_order_is_detected() {
        let found = find_relation_mentions("carbon double-bonded to oxygen");
        assert_eq!(found[0].kind, EdgeKind::Bond { order: 2 });
    }

    #[test]
    fn uml_phrases_map_to_uml_kinds() {
        let found = find_relation_mentions("the controller extends the base class and uses the repository");
        assert_eq!(found[0].kind, EdgeKind::Inheritance);
        assert_eq!(found[1].kind, EdgeKind::Association);
    }
}
