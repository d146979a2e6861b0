//! Builtin primitive symbol set.
//!
//! A minimal curated pack covering the common circuit and mechanics
//! symbols. Fragments are drawn around the origin in a roughly 60x40
//! box, stroke-only, so they inherit the diagram's color scheme.

use crate::{Primitive, PrimitiveKey};

fn primitive(key: &str, fragment: &str, width: f64, height: f64) -> Primitive {
    // Builtin keys are static and well-formed.
    let key = PrimitiveKey::new(key).expect("builtin primitive key must be valid");
    Primitive::new(key, fragment, width, height)
}

/// The builtin set, loaded into every in-memory store by default.
pub(crate) fn builtin_primitives() -> Vec<Primitive> {
    vec![
        primitive(
            "circuit/battery",
            r#"<line x1="-10" y1="-16" x2="-10" y2="16" stroke-width="2"/><line x1="10" y1="-8" x2="10" y2="8" stroke-width="4"/>"#,
            30.0,
            40.0,
        ),
        primitive(
            "circuit/resistor",
            r#"<path d="M -24 0 L -18 0 L -14 -8 L -6 8 L 2 -8 L 10 8 L 14 0 L 24 0" fill="none" stroke-width="2"/>"#,
            48.0,
            20.0,
        ),
        primitive(
            "circuit/capacitor",
            r#"<line x1="-4" y1="-14" x2="-4" y2="14" stroke-width="2"/><line x1="4" y1="-14" x2="4" y2="14" stroke-width="2"/>"#,
            16.0,
            28.0,
        ),
        primitive(
            "circuit/lamp",
            r#"<circle cx="0" cy="0" r="12" fill="none" stroke-width="2"/><line x1="-8" y1="-8" x2="8" y2="8" stroke-width="2"/><line x1="-8" y1="8" x2="8" y2="-8" stroke-width="2"/>"#,
            24.0,
            24.0,
        ),
        primitive(
            "circuit/switch",
            r#"<circle cx="-12" cy="0" r="2"/><circle cx="12" cy="0" r="2"/><line x1="-10" y1="0" x2="10" y2="-10" stroke-width="2"/>"#,
            28.0,
            16.0,
        ),
        primitive(
            "circuit/ground",
            r#"<line x1="0" y1="-10" x2="0" y2="0" stroke-width="2"/><line x1="-12" y1="0" x2="12" y2="0" stroke-width="2"/><line x1="-8" y1="5" x2="8" y2="5" stroke-width="2"/><line x1="-4" y1="10" x2="4" y2="10" stroke-width="2"/>"#,
            24.0,
            20.0,
        ),
        primitive(
            "circuit/inductor",
            r#"<path d="M -24 0 A 6 6 0 0 1 -12 0 A 6 6 0 0 1 0 0 A 6 6 0 0 1 12 0 A 6 6 0 0 1 24 0" fill="none" stroke-width="2"/>"#,
            48.0,
            12.0,
        ),
        primitive(
            "mechanics/body",
            r#"<rect x="-25" y="-20" width="50" height="40" fill="none" stroke-width="2"/>"#,
            50.0,
            40.0,
        ),
        primitive(
            "mechanics/pulley",
            r#"<circle cx="0" cy="0" r="14" fill="none" stroke-width="2"/><circle cx="0" cy="0" r="2"/>"#,
            28.0,
            28.0,
        ),
    ]
}
