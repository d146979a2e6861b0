//! Quantity and unit parsing.
//!
//! Recognizes magnitudes like "9V", "100 ohm", "5 kg", "30 degrees" and
//! normalizes the unit spelling. Single-letter units are matched
//! case-sensitively so articles and prose letters don't parse as units.

use once_cell::sync::Lazy;
use regex::Regex;
use stemdraw_core::Quantity;

/// A parsed quantity together with its byte span in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedQuantity {
    pub quantity: Quantity,
    pub span: (usize, usize),
}

// Longest alternatives first so "ohms" wins over "ohm" and "kΩ" over "Ω".
// Units ending in a non-word symbol ("°", "m/s²") get their own group
// because `\b` cannot terminate them.
static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<num>\d+(?:\.\d+)?)\s*(?:(?P<unit>volts?|Volts?|ohms?|Ohms?|kilo-?ohms?|kΩ|Ω|amperes?|amps?|Amps?|newtons?|Newtons?|kilograms?|kg|grams?|microfarads?|µF|uF|farads?|Farads?|m/s\^?2|degrees?|moles?|mol|seconds?|V|A|N|F|g|s)\b|(?P<sym>m/s²|°))",
    )
    .expect("quantity regex must compile")
});

/// Normalize a matched unit token to its display symbol.
fn normalize_unit(raw: &str) -> String {
    let lower = raw.to_lowercase();
    match lower.as_str() {
        "v" | "volt" | "volts" => "V".to_string(),
        "ohm" | "ohms" | "ω" => "Ω".to_string(),
        "kilo-ohm" | "kilo-ohms" | "kiloohm" | "kiloohms" | "kω" => "kΩ".to_string(),
        "a" | "amp" | "amps" | "ampere" | "amperes" => "A".to_string(),
        "n" | "newton" | "newtons" => "N".to_string(),
        "kg" | "kilogram" | "kilograms" => "kg".to_string(),
        "g" | "gram" | "grams" => "g".to_string(),
        "f" | "farad" | "farads" => "F".to_string(),
        "uf" | "µf" | "microfarad" | "microfarads" => "µF".to_string(),
        "m/s^2" | "m/s2" | "m/s²" => "m/s²".to_string(),
        "degree" | "degrees" | "°" => "°".to_string(),
        "mol" | "mole" | "moles" => "mol".to_string(),
        "s" | "second" | "seconds" => "s".to_string(),
        _ => raw.to_string(),
    }
}

/// Find every quantity in the text.
pub fn parse_quantities(text: &str) -> Vec<SpannedQuantity> {
    QUANTITY_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let m = caps.get(0)?;
            let value: f64 = caps.name("num")?.as_str().parse().ok()?;
            let raw_unit = caps
                .name("unit")
                .or_else(|| caps.name("sym"))?
                .as_str();
            let unit = normalize_unit(raw_unit);
            Some(SpannedQuantity {
                quantity: Quantity::new(value, unit),
                span: (m.start(), m.end()),
            })
        })
        .collect()
}
