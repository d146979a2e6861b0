//! Chemical formula recognition and expansion.
//!
//! Formula tokens like "H2O" or "CH4" expand into individual atoms
//! bonded to a central atom. The center is the first element with a
//! count of one (the O in H2O, the C in CH4), falling back to the first
//! element listed.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

// Candidate tokens: two or more element segments, e.g. "CO2", "C2H5OH".
static FORMULA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[A-Z][a-z]?\d*){2,}\b").expect("formula regex must compile")
});

static SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z][a-z]?)(\d*)").expect("segment regex must compile"));

static ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
        "Cl", "K", "Ca", "Fe", "Cu", "Zn", "Br", "I",
    ]
    .into_iter()
    .collect()
});

/// A formula found in the text, expanded into atom counts.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaMention {
    /// The token as written, e.g. "H2O"
    pub token: String,
    pub span: (usize, usize),
    /// (element symbol, count) in written order
    pub atoms: Vec<(String, u32)>,
}

impl FormulaMention {
    /// Index into `atoms` of the central atom.
    pub fn center(&self) -> usize {
        self.atoms
            .iter()
            .position(|(_, count)| *count == 1)
            .unwrap_or(0)
    }

    /// Total atom count.
    pub fn atom_total(&self) -> u32 {
        self.atoms.iter().map(|(_, c)| c).sum()
    }
}

/// Parse a candidate token into element segments, if every segment is a
/// known element.
fn parse_token(token: &str) -> Option<Vec<(String, u32)>> {
    let mut atoms = Vec::new();
    let mut consumed = 0;
    for caps in SEGMENT_RE.captures_iter(token) {
        let symbol = caps.get(1)?.as_str();
        if !ELEMENTS.contains(symbol) {
            return None;
        }
        let count: u32 = match caps.get(2).map(|m| m.as_str()) {
            Some("") | None => 1,
            Some(digits) => digits.parse().ok()?,
        };
        if count == 0 {
            return None;
        }
        consumed += caps.get(0)?.as_str().len();
        atoms.push((symbol.to_string(), count));
    }
    if consumed != token.len() || atoms.len() < 2 {
        return None;
    }
    // All-caps tokens without digits are almost always acronyms or
    // shouting prose ("IS", "ATP"), not formulas. "NaCl" and "H2O" both
    // survive this rule.
    let has_digit = token.chars().any(|c| c.is_ascii_digit());
    if !has_digit && token.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }
    Some(atoms)
}

/// Find every chemical formula token in the text.
pub fn find_formulas(text: &str) -> Vec<FormulaMention> {
    FORMULA_RE
        .find_iter(text)
        .filter_map(|m| {
            parse_token(m.as_str()).map(|atoms| FormulaMention {
                token: m.as_str().to_string(),
                span: (m.start(), m.end()),
                atoms,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_expands_with_oxygen_center() {
        let found = find_formulas("a molecule of H2O");
        assert_eq!(found.len(), 1);
        let water = &found[0];
        assert_eq!(
            water.atoms,
            vec![("H".to_string(), 2), ("O".to_string(), 1)]
        );
        assert_eq!(water.center(), 1);
        assert_eq!(water.atom_total(), 3);
    }

    #[test]
    fn methane_centers_on_carbon() {
        let found = find_formulas("draw CH4");
        assert_eq!(found[0].center(), 0);
        assert_eq!(found[0].atom_total(), 5);
    }

    #[test]
    fn ordinary_words_are_not_formulas() {
        assert!(find_formulas("THE PLAN IS DONE").is_empty());
        assert!(find_formulas("Rust and Cargo").is_empty());
    }

    #[test]
    fn unknown_elements_are_rejected() {
        // "Xy" is not an element symbol
        assert!(find_formulas("Xy2Z3").is_empty());
    }

    #[test]
    fn ethanol_parses_in_written_order() {
        let found = find_formulas("C2H5OH is ethanol");
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].atoms,
            vec![
                ("C".to_string(), 2),
                ("H".to_string(), 5),
                ("O".to_string(), 1),
                ("H".to_string(), 1),
            ]
        );
    }
}