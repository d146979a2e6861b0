//! In-memory implementation of PrimitiveStore
//!
//! Backs the server by default. Starts from the builtin symbol set;
//! `empty()` gives a blank store for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use stemdraw_core::ProblemDomain;

use crate::builtin::builtin_primitives;
use crate::{Primitive, PrimitiveKey, PrimitiveStore, PrimitiveStoreError, PrimitiveStoreResult};

/// In-memory primitive store. All data is lost when dropped.
#[derive(Debug, Clone)]
pub struct InMemoryPrimitiveStore {
    primitives: Arc<RwLock<HashMap<String, Primitive>>>,
}

impl InMemoryPrimitiveStore {
    /// Create a store preloaded with the builtin symbol set.
    pub fn new() -> Self {
        let map = builtin_primitives()
            .into_iter()
            .map(|p| (p.key.as_str().to_string(), p))
            .collect();
        Self {
            primitives: Arc::new(RwLock::new(map)),
        }
    }

    /// Create a store with no primitives at all.
    pub fn empty() -> Self {
        Self {
            primitives: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored primitives.
    pub async fn len(&self) -> usize {
        self.primitives.read().await.len()
    }

    /// Whether the store holds no primitives.
    pub async fn is_empty(&self) -> bool {
        self.primitives.read().await.is_empty()
    }
}

impl Default for InMemoryPrimitiveStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrimitiveStore for InMemoryPrimitiveStore {
    async fn get(&self, key: &PrimitiveKey) -> PrimitiveStoreResult<Primitive> {
        let store = self.primitives.read().await;
        store
            .get(key.as_str())
            .cloned()
            .ok_or_else(|| PrimitiveStoreError::NotFound(key.clone()))
    }

    async fn put(&self, primitive: Primitive) -> PrimitiveStoreResult<()> {
        let mut store = self.primitives.write().await;
        store.insert(primitive.key.as_str().to_string(), primitive);
        Ok(())
    }

    async fn exists(&self, key: &PrimitiveKey) -> PrimitiveStoreResult<bool> {
        Ok(self.primitives.read().await.contains_key(key.as_str()))
    }

    async fn list_domain(&self, domain: ProblemDomain) -> PrimitiveStoreResult<Vec<PrimitiveKey>> {
        let prefix = format!("{}/", domain.as_str());
        let store = self.primitives.read().await;
        let mut keys: Vec<PrimitiveKey> = store
            .values()
            .filter(|p| p.key.as_str().starts_with(&prefix))
            .map(|p| p.key.clone())
            .collect();
        keys.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builtins_are_preloaded() {
        let store = InMemoryPrimitiveStore::new();
        assert!(!store.is_empty().await);
        let key = PrimitiveKey::new("circuit/resistor").unwrap();
        assert!(store.exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = InMemoryPrimitiveStore::empty();
        let key = PrimitiveKey::new("chemistry/atom").unwrap();
        let primitive = Primitive::new(key.clone(), "<circle r=\"10\"/>", 20.0, 20.0);
        store.put(primitive.clone()).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), primitive);
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let store = InMemoryPrimitiveStore::empty();
        let key = PrimitiveKey::new("circuit/resistor").unwrap();
        let err = store.get(&key).await.unwrap_err();
        assert!(matches!(err, PrimitiveStoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_domain_filters_and_sorts() {
        let store = InMemoryPrimitiveStore::new();
        let keys = store.list_domain(ProblemDomain::Circuit).await.unwrap();
        assert!(keys.len() >= 3);
        assert!(keys.windows(2).all(|w| w[0].as_str() <= w[1].as_str()));
        assert!(keys.iter().all(|k| k.domain() == "circuit"));
    }
}
