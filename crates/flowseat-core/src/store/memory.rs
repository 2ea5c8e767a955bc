//! In-memory plan backend.

use super::{BoxFuture, Store, StoreError, StoreResult};
use crate::plan::{Plan, PlanId};
use std::collections::HashMap;
use std::sync::RwLock;

/// Keeps plans as encoded JSON snapshots, the same representation the file
/// and remote backends hold. Round-tripping through the codec on every
/// save/load means tests against this store also exercise serialization.
#[derive(Default)]
pub struct MemoryStore {
    snapshots: RwLock<HashMap<PlanId, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned(e: impl std::fmt::Display) -> StoreError {
        StoreError::Backend(format!("snapshot lock poisoned: {e}"))
    }
}

impl Store for MemoryStore {
    fn save(&self, plan: &Plan) -> BoxFuture<'_, StoreResult<()>> {
        let encoded = plan.to_json();
        let id = plan.id;
        Box::pin(async move {
            let mut snapshots = self.snapshots.write().map_err(Self::poisoned)?;
            snapshots.insert(id, encoded?);
            Ok(())
        })
    }

    fn load(&self, id: PlanId) -> BoxFuture<'_, StoreResult<Plan>> {
        Box::pin(async move {
            let snapshots = self.snapshots.read().map_err(Self::poisoned)?;
            let json = snapshots.get(&id).ok_or(StoreError::NotFound(id))?;
            Ok(Plan::from_json(json)?)
        })
    }

    fn delete(&self, id: PlanId) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let mut snapshots = self.snapshots.write().map_err(Self::poisoned)?;
            snapshots.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<PlanId>>> {
        Box::pin(async move {
            let snapshots = self.snapshots.read().map_err(Self::poisoned)?;
            Ok(snapshots.keys().copied().collect())
        })
    }

    fn exists(&self, id: PlanId) -> BoxFuture<'_, StoreResult<bool>> {
        Box::pin(async move {
            let snapshots = self.snapshots.read().map_err(Self::poisoned)?;
            Ok(snapshots.contains_key(&id))
        })
    }
}
