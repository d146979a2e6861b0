//! The keyword extractor: the concrete [`ProblemExtractor`] used by the
//! pipeline.
//!
//! Extraction is four passes over the text: lexicon mentions, quantities,
//! chemical formulas, relation phrases. Classification votes with mention
//! domains and unit symbols; the winning domain's mentions become
//! entities and everything else is dropped.

use std::collections::HashMap;
use tracing::debug;

use stemdraw_core::{
    ComponentKind, EdgeKind, ExtractedEntity, ExtractedRelation, ExtractionReport, PipelineError,
    PipelineResult, ProblemDomain, ProblemExtractor, Quantity,
};

use crate::formula::{find_formulas, FormulaMention};
use crate::lexicon::{lookup, unit_domain, LexiconEntry, LEXICON_RE};
use crate::quantity::{parse_quantities, SpannedQuantity};
use crate::relations::find_relation_mentions;

/// Maximum character gap between a quantity and the entity it annotates.
const QUANTITY_ATTACH_DISTANCE: usize = 30;

/// Rule-based extractor over the static lexicon.
#[derive(Debug, Default, Clone)]
pub struct KeywordExtractor;

impl KeywordExtractor {
    pub fn new() -> Self {
        Self
    }
}

struct Mention {
    span: (usize, usize),
    entry: &'static LexiconEntry,
}

fn find_mentions(text: &str) -> Vec<Mention> {
    LEXICON_RE
        .find_iter(text)
        .filter_map(|m| {
            lookup(m.as_str()).map(|entry| Mention {
                span: (m.start(), m.end()),
                entry,
            })
        })
        .collect()
}

/// Score each domain by mention and unit votes; return winner with
/// confidence in [0, 1]. Ties resolve in `ProblemDomain::all()` order.
fn classify(
    mentions: &[Mention],
    quantities: &[SpannedQuantity],
    formulas: &[FormulaMention],
) -> Option<(ProblemDomain, f64)> {
    let mut scores: HashMap<ProblemDomain, f64> = HashMap::new();

    for mention in mentions {
        // Multi-word phrases are stronger evidence than single words.
        let weight = if mention.entry.phrase.contains(' ') { 1.5 } else { 1.0 };
        *scores.entry(mention.entry.domain).or_default() += weight;
    }
    for sq in quantities {
        if let Some(domain) = unit_domain(&sq.quantity.unit) {
            *scores.entry(domain).or_default() += 1.0;
        }
    }
    if !formulas.is_empty() {
        *scores.entry(ProblemDomain::Chemistry).or_default() += formulas.len() as f64 * 1.5;
    }

    let total: f64 = scores.values().sum();
    if total <= 0.0 {
        return None;
    }
    // Strictly-greater comparison keeps the earlier domain on ties.
    let mut winner = None;
    let mut best = 0.0;
    for domain in ProblemDomain::all() {
        let score = scores.get(domain).copied().unwrap_or(0.0);
        if score > best {
            best = score;
            winner = Some(*domain);
        }
    }
    winner.map(|w| (w, best / total))
}

/// Attach each quantity to the nearest entity within range; the rest are
/// reported unattached.
fn attach_quantities(
    entities: &mut [ExtractedEntity],
    quantities: Vec<SpannedQuantity>,
) -> Vec<Quantity> {
    let mut unattached = Vec::new();
    for sq in quantities {
        let best = entities
            .iter_mut()
            .map(|e| {
                let gap = if sq.span.1 <= e.span.0 {
                    e.span.0 - sq.span.1
                } else if e.span.1 <= sq.span.0 {
                    sq.span.0 - e.span.1
                } else {
                    0
                };
                (gap, e)
            })
            .min_by_key(|(gap, _)| *gap);
        match best {
            Some((gap, entity)) if gap <= QUANTITY_ATTACH_DISTANCE => {
                entity.quantities.push(sq.quantity);
            }
            _ => unattached.push(sq.quantity),
        }
    }
    unattached
}

impl ProblemExtractor for KeywordExtractor {
    fn extract(&self, text: &str) -> PipelineResult<ExtractionReport> {
        let mentions = find_mentions(text);
        let quantities = parse_quantities(text);
        let formulas = find_formulas(text);

        let (domain, confidence) =
            classify(&mentions, &quantities, &formulas).ok_or_else(|| {
                PipelineError::ExtractionError(
                    "no recognizable STEM vocabulary in the problem text".to_string(),
                )
            })?;
        debug!(%domain, confidence, mentions = mentions.len(), "classified problem domain");

        let mut entities: Vec<ExtractedEntity> = Vec::new();
        let mut kind_counters: HashMap<String, u32> = HashMap::new();
        for mention in mentions
            .iter()
            .filter(|m| m.entry.domain == domain)
        {
            let kind = mention.entry.kind.clone();
            let counter = kind_counters.entry(kind.key()).or_default();
            *counter += 1;
            let label = mention
                .entry
                .label
                .map(str::to_string)
                .unwrap_or_else(|| text[mention.span.0..mention.span.1].to_string());
            entities.push(ExtractedEntity {
                id: format!("{}-{}", kind.key(), counter),
                label,
                kind,
                quantities: Vec::new(),
                span: mention.span,
            });
        }

        // Formula expansion adds atom entities and star bonds.
        let mut relations: Vec<ExtractedRelation> = Vec::new();
        if domain == ProblemDomain::Chemistry {
            for formula in &formulas {
                expand_formula(formula, &mut entities, &mut relations, &mut kind_counters);
            }
        }

        let unattached_quantities = attach_quantities(&mut entities, quantities);

        // Relation phrases link the nearest entity on each side.
        for rm in find_relation_mentions(text) {
            let source = entities
                .iter()
                .filter(|e| e.span.1 <= rm.span.0)
                .max_by_key(|e| e.span.1);
            let target = entities
                .iter()
                .filter(|e| e.span.0 >= rm.span.1)
                .min_by_key(|e| e.span.0);
            if let (Some(source), Some(target)) = (source, target) {
                if source.id != target.id {
                    relations.push(ExtractedRelation {
                        source: source.id.clone(),
                        target: target.id.clone(),
                        kind: rm.kind,
                        label: rm.label,
                    });
                }
            }
        }

        if entities.is_empty() {
            return Err(PipelineError::ExtractionError(format!(
                "classified domain '{}' but found no entities",
                domain
            )));
        }

        Ok(ExtractionReport {
            domain,
            confidence,
            entities,
            relations,
            unattached_quantities,
        })
    }
}

/// Expand a formula into atom entities bonded to the central atom.
fn expand_formula(
    formula: &FormulaMention,
    entities: &mut Vec<ExtractedEntity>,
    relations: &mut Vec<ExtractedRelation>,
    kind_counters: &mut HashMap<String, u32>,
) {
    let center_index = formula.center();
    let mut ids: Vec<Vec<String>> = Vec::new();

    for (symbol, count) in &formula.atoms {
        let mut instance_ids = Vec::new();
        for _ in 0..*count {
            let counter = kind_counters.entry("atom".to_string()).or_default();
            *counter += 1;
            let id = format!("atom-{}", counter);
            entities.push(ExtractedEntity {
                id: id.clone(),
                label: symbol.clone(),
                kind: ComponentKind::Atom,
                quantities: Vec::new(),
                span: formula.span,
            });
            instance_ids.push(id);
        }
        ids.push(instance_ids);
    }

    let center_id = ids[center_index][0].clone();
    for (i, instance_ids) in ids.iter().enumerate() {
        for (j, id) in instance_ids.iter().enumerate() {
            if i == center_index && j == 0 {
                continue;
            }
            relations.push(ExtractedRelation {
                source: center_id.clone(),
                target: id.clone(),
                kind: EdgeKind::Bond { order: 1 },
                label: None,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stemdraw_core::ComponentKind;

    fn extract(text: &str) -> ExtractionReport {
        KeywordExtractor::new().extract(text).unwrap()
    }

    #[test]
    fn circuit_problem_classifies_and_extracts() {
        let report = extract("A circuit with a 9V battery and a 100 ohm resistor.");
        assert_eq!(report.domain, ProblemDomain::Circuit);
        assert_eq!(report.entities.len(), 2);

        let battery = report
            .entities
            .iter()
            .find(|e| e.kind == ComponentKind::Battery)
            .unwrap();
        assert_eq!(battery.quantities.len(), 1);
        assert_eq!(battery.quantities[0].unit, "V");

        let resistor = report
            .entities
            .iter()
            .find(|e| e.kind == ComponentKind::Resistor)
            .unwrap();
        assert_eq!(resistor.quantities[0].unit, "Ω");
    }

    #[test]
    fn mechanics_problem_extracts_body_and_forces() {
        let report =
            extract("A 5 kg block rests on an incline at 30 degrees with friction acting on it.");
        assert_eq!(report.domain, ProblemDomain::Mechanics);
        assert!(report
            .entities
            .iter()
            .any(|e| e.kind == ComponentKind::Body));
        assert!(report
            .entities
            .iter()
            .any(|e| e.kind == ComponentKind::Incline));
        assert!(report
            .entities
            .iter()
            .any(|e| e.kind == ComponentKind::Force && e.label == "Friction"));
    }

    #[test]
    fn series_relation_links_adjacent_components() {
        let report = extract("A resistor in series with a capacitor and a 12V battery.");
        assert_eq!(report.domain, ProblemDomain::Circuit);
        let series = report
            .relations
            .iter()
            .find(|r| r.label.as_deref() == Some("series"))
            .unwrap();
        assert!(series.source.starts_with("resistor"));
        assert!(series.target.starts_with("capacitor"));
    }

    #[test]
    fn water_formula_expands_to_bonded_atoms() {
        let report = extract("Draw the structure of the H2O molecule.");
        assert_eq!(report.domain, ProblemDomain::Chemistry);
        let atoms: Vec<&ExtractedEntity> = report
            .entities
            .iter()
            .filter(|e| e.kind == ComponentKind::Atom)
            .collect();
        // H, H, O from formula expansion
        assert_eq!(atoms.len(), 3);
        let bonds = report
            .relations
            .iter()
            .filter(|r| matches!(r.kind, EdgeKind::Bond { .. }))
            .count();
        assert_eq!(bonds, 2);
        // Both bonds share the oxygen center.
        let centers: std::collections::HashSet<&str> = report
            .relations
            .iter()
            .map(|r| r.source.as_str())
            .collect();
        assert_eq!(centers.len(), 1);
    }

    #[test]
    fn pathway_problem_extracts_activation() {
        let report = extract("Hexokinase phosphorylates glucose in glycolysis, producing ATP.");
        assert_eq!(report.domain, ProblemDomain::Biology);
        assert!(report
            .relations
            .iter()
            .any(|r| r.kind == EdgeKind::Activation));
    }

    #[test]
    fn software_problem_classifies() {
        let report = extract("The controller class depends on the repository interface.");
        assert_eq!(report.domain, ProblemDomain::Software);
        assert!(report
            .relations
            .iter()
            .any(|r| r.kind == EdgeKind::Association));
    }

    #[test]
    fn unrecognizable_text_is_an_extraction_error() {
        let err = KeywordExtractor::new()
            .extract("lorem ipsum dolor sit amet")
            .unwrap_err();
        assert!(matches!(err, PipelineError::ExtractionError(_)));
    }

    #[test]
    fn far_away_quantities_stay_unattached() {
        let report = extract(
            "A battery powers the lamp. Much later in the text, after a very long digression about nothing in particular, we learn the answer is 42 volts.",
        );
        assert!(report
            .unattached_quantities
            .iter()
            .any(|q| q.value == 42.0));
    }
}
