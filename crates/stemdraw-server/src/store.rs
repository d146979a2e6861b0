//! In-memory store for editor-saved diagram plans.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use stemdraw_core::DiagramPlan;

/// Keeps plans saved through the editor API. Contents are lost on
/// restart; exports under the output directory are the durable copy.
#[derive(Debug, Clone, Default)]
pub struct PlanStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    plans: HashMap<Uuid, DiagramPlan>,
    latest: Option<Uuid>,
}

impl PlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a plan, replacing any previous version under the same id.
    pub async fn save(&self, plan: DiagramPlan) -> Uuid {
        let id = plan.plan_id;
        let mut inner = self.inner.write().await;
        inner.plans.insert(id, plan);
        inner.latest = Some(id);
        id
    }

    /// Load a plan by id.
    pub async fn load(&self, id: Uuid) -> Option<DiagramPlan> {
        self.inner.read().await.plans.get(&id).cloned()
    }

    /// Load the most recently saved plan.
    pub async fn load_latest(&self) -> Option<DiagramPlan> {
        let inner = self.inner.read().await;
        inner.latest.and_then(|id| inner.plans.get(&id).cloned())
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.plans.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.plans.is_empty()
    }
}
