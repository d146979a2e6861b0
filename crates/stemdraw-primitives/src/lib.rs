//! # Stemdraw Primitives
//!
//! The Primitive Library: a store of reusable SVG component fragments,
//! keyed by domain and component kind. Domain modules query the library
//! for each component before falling back to procedural generation, so a
//! curated resistor symbol beats a generated box wherever one exists.
//!
//! Two implementations are provided: [`InMemoryPrimitiveStore`] (ships
//! with the builtin symbol set, used by the server by default) and
//! [`FilePrimitiveStore`] (a directory tree of JSON primitive files for
//! curated symbol packs).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use thiserror::Error;

use stemdraw_core::{ComponentKind, ProblemDomain};

mod builtin;
mod file;
mod memory;

pub use file::FilePrimitiveStore;
pub use memory::InMemoryPrimitiveStore;

/// Errors from primitive library access.
#[derive(Error, Debug)]
pub enum PrimitiveStoreError {
    /// No primitive under the requested key
    #[error("primitive '{0}' not found")]
    NotFound(PrimitiveKey),

    /// Malformed key string
    #[error("invalid primitive key: {0}")]
    InvalidKey(String),

    /// Filesystem failure in the file-backed store
    #[error("primitive store IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Corrupt primitive file
    #[error("primitive deserialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for primitive store operations.
pub type PrimitiveStoreResult<T> = Result<T, PrimitiveStoreError>;

impl From<PrimitiveStoreError> for stemdraw_core::PipelineError {
    fn from(err: PrimitiveStoreError) -> Self {
        stemdraw_core::PipelineError::PrimitiveStoreError(err.to_string())
    }
}

/// A primitive key: "<domain>/<component>", e.g. "circuit/resistor".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrimitiveKey(String);

impl PrimitiveKey {
    /// Parse and validate a key string.
    pub fn new(key: impl Into<String>) -> PrimitiveStoreResult<Self> {
        let key = key.into();
        let mut parts = key.splitn(2, '/');
        let domain = parts.next().unwrap_or_default();
        let component = parts.next().unwrap_or_default();
        if domain.is_empty()
            || component.is_empty()
            || component.contains('/')
            || key.chars().any(|c| c.is_whitespace() || c == '.')
        {
            return Err(PrimitiveStoreError::InvalidKey(key));
        }
        Ok(Self(key))
    }

    /// Build the key for a component in a domain.
    pub fn for_component(domain: ProblemDomain, kind: &ComponentKind) -> Self {
        // Domain and kind keys are lowercase identifiers, always valid.
        Self(format!("{}/{}", domain.as_str(), kind.key()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The domain half of the key.
    pub fn domain(&self) -> &str {
        self.0.split('/').next().unwrap_or_default()
    }

    /// The component half of the key.
    pub fn component(&self) -> &str {
        self.0.splitn(2, '/').nth(1).unwrap_or_default()
    }
}

impl Display for PrimitiveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reusable SVG component fragment.
///
/// The fragment is a `<g>` body drawn around the origin; renderers
/// translate it to the node position. `width`/`height` describe its
/// bounding box for spacing purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub key: PrimitiveKey,
    pub svg_fragment: String,
    pub width: f64,
    pub height: f64,
    /// Free-form search tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Primitive {
    pub fn new(key: PrimitiveKey, svg_fragment: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            key,
            svg_fragment: svg_fragment.into(),
            width,
            height,
            tags: Vec::new(),
        }
    }
}

/// Contract for primitive library backends.
#[async_trait]
pub trait PrimitiveStore: Send + Sync + Debug {
    /// Fetch a primitive by key.
    async fn get(&self, key: &PrimitiveKey) -> PrimitiveStoreResult<Primitive>;

    /// Insert or replace a primitive.
    async fn put(&self, primitive: Primitive) -> PrimitiveStoreResult<()>;

    /// Whether a primitive exists under the key.
    async fn exists(&self, key: &PrimitiveKey) -> PrimitiveStoreResult<bool>;

    /// List every key within a domain.
    async fn list_domain(&self, domain: ProblemDomain) -> PrimitiveStoreResult<Vec<PrimitiveKey>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_validate_shape() {
        assert!(PrimitiveKey::new("circuit/resistor").is_ok());
        assert!(PrimitiveKey::new("circuit").is_err());
        assert!(PrimitiveKey::new("circuit/").is_err());
        assert!(PrimitiveKey::new("a/b/c").is_err());
        assert!(PrimitiveKey::new("a/b c").is_err());
        assert!(PrimitiveKey::new("../etc/passwd").is_err());
    }

    #[test]
    fn key_halves_split_correctly() {
        let key = PrimitiveKey::new("mechanics/force").unwrap();
        assert_eq!(key.domain(), "mechanics");
        assert_eq!(key.component(), "force");
    }

    #[test]
    fn component_keys_compose() {
        let key = PrimitiveKey::for_component(ProblemDomain::Circuit, &ComponentKind::Resistor);
        assert_eq!(key.as_str(), "circuit/resistor");
    }
}
