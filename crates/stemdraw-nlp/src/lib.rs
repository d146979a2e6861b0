//! # Stemdraw NLP
//!
//! Rule-based extraction of entities, relations and quantities from STEM
//! problem text, plus domain classification. The public entry point is
//! [`KeywordExtractor`], which implements the core crate's
//! `ProblemExtractor` seam.
//!
//! Extraction is deliberately lexical: a static lexicon, unit-aware
//! quantity parsing, chemical formula expansion and a set of connective
//! phrase patterns. An LLM planner (when configured) can compensate for
//! what a lexicon misses; this layer has to be fast, deterministic and
//! offline.

mod extract;
mod formula;
mod lexicon;
mod quantity;
mod relations;

pub use extract::KeywordExtractor;
pub use formula::{find_formulas, FormulaMention};
pub use quantity::{parse_quantities, SpannedQuantity};
pub use relations::{find_relation_mentions, RelationMention};
