//! File-backed implementation of PrimitiveStore
//!
//! Lays primitives out as `<root>/<domain>/<component>.json`, one JSON
//! file per primitive. Intended for curated symbol packs shipped next to
//! the server binary.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use stemdraw_core::ProblemDomain;

use crate::{Primitive, PrimitiveKey, PrimitiveStore, PrimitiveStoreError, PrimitiveStoreResult};

/// Directory-backed primitive store.
#[derive(Debug, Clone)]
pub struct FilePrimitiveStore {
    root: PathBuf,
}

impl FilePrimitiveStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &PrimitiveKey) -> PathBuf {
        // Key validation already rejects separators and dots.
        self.root
            .join(key.domain())
            .join(format!("{}.json", key.component()))
    }

    /// The root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl PrimitiveStore for FilePrimitiveStore {
    async fn get(&self, key: &PrimitiveKey) -> PrimitiveStoreResult<Primitive> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(PrimitiveStoreError::NotFound(key.clone()));
            }
            Err(err) => return Err(err.into()),
        };
        let primitive: Primitive = serde_json::from_slice(&bytes)?;
        Ok(primitive)
    }

    async fn put(&self, primitive: Primitive) -> PrimitiveStoreResult<()> {
        let path = self.path_for(&primitive.key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(&primitive)?;
        fs::write(&path, json).await?;
        debug!(key = %primitive.key, path = %path.display(), "stored primitive");
        Ok(())
    }

    async fn exists(&self, key: &PrimitiveKey) -> PrimitiveStoreResult<bool> {
        Ok(fs::try_exists(self.path_for(key)).await?)
    }

    async fn list_domain(&self, domain: ProblemDomain) -> PrimitiveStoreResult<Vec<PrimitiveKey>> {
        let dir = self.root.join(domain.as_str());
        let mut keys = Vec::new();
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(keys),
            Err(err) => return Err(err.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if let Ok(key) = PrimitiveKey::new(format!("{}/{}", domain.as_str(), stem)) {
                    keys.push(key);
                }
            }
        }
        keys.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(keys)
    }
}
