//! Keyword lexicon mapping problem-text vocabulary to component kinds.
//!
//! The tables below drive both entity extraction and domain
//! classification. Matching is whole-word and case-insensitive; longer
//! phrases are listed before their prefixes so "normal force" wins over
//! "force".

use once_cell::sync::Lazy;
use regex::Regex;
use stemdraw_core::{ComponentKind, ProblemDomain};

/// One lexicon entry: the surface phrase and the component it maps to.
pub struct LexiconEntry {
    pub phrase: &'static str,
    pub kind: ComponentKind,
    pub domain: ProblemDomain,
    /// Canonical display label; `None` keeps the matched text
    pub label: Option<&'static str>,
}

const fn entry(
    phrase: &'static str,
    kind: ComponentKind,
    domain: ProblemDomain,
) -> LexiconEntry {
    LexiconEntry {
        phrase,
        kind,
        domain,
        label: None,
    }
}

const fn labeled(
    phrase: &'static str,
    kind: ComponentKind,
    domain: ProblemDomain,
    label: &'static str,
) -> LexiconEntry {
    LexiconEntry {
        phrase,
        kind,
        domain,
        label: Some(label),
    }
}

/// The full lexicon, longest phrases first within each domain.
pub static LEXICON: Lazy<Vec<LexiconEntry>> = Lazy::new(|| {
    use ComponentKind as K;
    use ProblemDomain as D;
    vec![
        // Circuit
        entry("light bulb", K::Lamp, D::Circuit),
        entry("battery", K::Battery, D::Circuit),
        entry("voltage source", K::Battery, D::Circuit),
        entry("cell", K::Battery, D::Circuit),
        entry("resistor", K::Resistor, D::Circuit),
        entry("resistance", K::Resistor, D::Circuit),
        entry("capacitor", K::Capacitor, D::Circuit),
        entry("inductor", K::Inductor, D::Circuit),
        entry("coil", K::Inductor, D::Circuit),
        entry("switch", K::Switch, D::Circuit),
        entry("lamp", K::Lamp, D::Circuit),
        entry("bulb", K::Lamp, D::Circuit),
        entry("led", K::Lamp, D::Circuit),
        entry("ground", K::Ground, D::Circuit),
        // Mechanics
        labeled("normal force", K::Force, D::Mechanics, "Normal force"),
        labeled("applied force", K::Force, D::Mechanics, "Applied force"),
        labeled("friction", K::Force, D::Mechanics, "Friction"),
        labeled("tension", K::Force, D::Mechanics, "Tension"),
        labeled("gravity", K::Force, D::Mechanics, "Weight (mg)"),
        labeled("weight", K::Force, D::Mechanics, "Weight (mg)"),
        entry("force", K::Force, D::Mechanics),
        entry("block", K::Body, D::Mechanics),
        entry("crate", K::Body, D::Mechanics),
        entry("box", K::Body, D::Mechanics),
        entry("ball", K::Body, D::Mechanics),
        entry("mass", K::Body, D::Mechanics),
        entry("object", K::Body, D::Mechanics),
        entry("incline", K::Incline, D::Mechanics),
        entry("ramp", K::Incline, D::Mechanics),
        entry("slope", K::Incline, D::Mechanics),
        entry("pulley", K::Pulley, D::Mechanics),
        entry("surface", K::Surface, D::Mechanics),
        entry("table", K::Surface, D::Mechanics),
        entry("floor", K::Surface, D::Mechanics),
        // Chemistry
        labeled("carbon", K::Atom, D::Chemistry, "C"),
        labeled("hydrogen", K::Atom, D::Chemistry, "H"),
        labeled("oxygen", K::Atom, D::Chemistry, "O"),
        labeled("nitrogen", K::Atom, D::Chemistry, "N"),
        labeled("sulfur", K::Atom, D::Chemistry, "S"),
        labeled("chlorine", K::Atom, D::Chemistry, "Cl"),
        labeled("phosphorus", K::Atom, D::Chemistry, "P"),
        labeled("hydroxyl group", K::FunctionalGroup, D::Chemistry, "OH"),
        labeled("carboxyl group", K::FunctionalGroup, D::Chemistry, "COOH"),
        labeled("amino group", K::FunctionalGroup, D::Chemistry, "NH2"),
        labeled("methyl group", K::FunctionalGroup, D::Chemistry, "CH3"),
        // Biology
        entry("glucose", K::Metabolite, D::Biology),
        entry("pyruvate", K::Metabolite, D::Biology),
        labeled("atp", K::Metabolite, D::Biology, "ATP"),
        labeled("adp", K::Metabolite, D::Biology, "ADP"),
        labeled("nadh", K::Metabolite, D::Biology, "NADH"),
        entry("lactate", K::Metabolite, D::Biology),
        entry("substrate", K::Metabolite, D::Biology),
        entry("protein", K::Metabolite, D::Biology),
        entry("hexokinase", K::Enzyme, D::Biology),
        entry("kinase", K::Enzyme, D::Biology),
        entry("enzyme", K::Enzyme, D::Biology),
        entry("polymerase", K::Enzyme, D::Biology),
        entry("glycolysis", K::Process, D::Biology),
        entry("photosynthesis", K::Process, D::Biology),
        entry("respiration", K::Process, D::Biology),
        entry("transcription", K::Process, D::Biology),
        entry("translation", K::Process, D::Biology),
        entry("mitochondria", K::Compartment, D::Biology),
        entry("mitochondrion", K::Compartment, D::Biology),
        entry("nucleus", K::Compartment, D::Biology),
        entry("cytoplasm", K::Compartment, D::Biology),
        entry("membrane", K::Compartment, D::Biology),
        // Software
        entry("interface", K::Interface, D::Software),
        entry("class", K::Class, D::Software),
        entry("service", K::Class, D::Software),
        entry("controller", K::Class, D::Software),
        entry("repository", K::Class, D::Software),
        entry("module", K::Package, D::Software),
        entry("package", K::Package, D::Software),
        entry("component", K::Package, D::Software),
        entry("actor", K::Actor, D::Software),
        entry("user", K::Actor, D::Software),
        entry("client", K::Actor, D::Software),
        entry("database", K::Class, D::Software),
    ]
});

/// Word-boundary regex over every lexicon phrase, longest first.
pub static LEXICON_RE: Lazy<Regex> = Lazy::new(|| {
    let mut phrases: Vec<&str> = LEXICON.iter().map(|e| e.phrase).collect();
    // Longest first so multi-word phrases beat their suffix words.
    phrases.sort_by_key(|p| std::cmp::Reverse(p.len()));
    let escaped: Vec<String> = phrases.iter().map(|p| regex::escape(p)).collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", escaped.join("|")))
        .expect("lexicon regex must compile")
});

/// Look up the lexicon entry for a matched phrase.
pub fn lookup(phrase: &str) -> Option<&'static LexiconEntry> {
    let lower = phrase.to_lowercase();
    LEXICON.iter().find(|e| e.phrase == lower)
}

/// Which domain a unit symbol votes for during classification.
pub fn unit_domain(unit: &str) -> Option<ProblemDomain> {
    match unit {
        "V" | "Ω" | "kΩ" | "A" | "F" | "µF" => Some(ProblemDomain::Circuit),
        "N" | "kg" | "m/s²" => Some(ProblemDomain::Mechanics),
        "mol" => Some(ProblemDomain::Chemistry),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(lookup("Resistor").is_some());
        assert!(lookup("RESISTOR").is_some());
        assert!(lookup("flux capacitor oddity").is_none());
    }

    #[test]
    fn multi_word_phrases_match_before_suffixes() {
        let text = "the normal force on the block";
        let m = LEXICON_RE.find(text).unwrap();
        assert_eq!(m.as_str(), "normal force");
    }

    #[test]
    fn unit_votes_map_to_domains() {
        assert_eq!(unit_domain("Ω"), Some(ProblemDomain::Circuit));
        assert_eq!(unit_domain("N"), Some(ProblemDomain::Mechanics));
        assert_eq!(unit_domain("°"), None);
    }

    #[test]
    fn every_entry_is_findable_by_its_own_phrase() {
        for e in LEXICON.iter() {
            assert!(
                lookup(e.phrase).is_some(),
                "phrase '{}' not found by lookup",
                e.phrase
            );
        }
    }
}
