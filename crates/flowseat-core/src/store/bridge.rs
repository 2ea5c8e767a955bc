//! Debounced plan persistence.
//!
//! Mutations schedule a save per plan; rescheduling replaces the pending
//! deadline so rapid edits collapse into one write. The host drives the
//! bridge with a periodic `flush_due` tick.

use super::{Store, StoreError, StoreResult};
use crate::plan::{Plan, PlanId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Delay between the last mutation and the save it triggers.
pub const PLAN_SYNC_DELAY: Duration = Duration::from_millis(1000);

/// Result of one flushed save.
#[derive(Debug)]
pub enum SyncOutcome {
    Saved(PlanId),
    /// The plan disappeared before its deadline; nothing to write.
    Skipped(PlanId),
    Failed(PlanId, StoreError),
}

/// Debounces plan saves against a [`Store`] backend.
///
/// One deadline per plan; the newest schedule wins, so saves for a plan are
/// serialized. A failed save drops the deadline but leaves in-memory state
/// authoritative; the next mutation reschedules and retries.
pub struct SyncBridge<S: Store> {
    store: Arc<S>,
    delay: Duration,
    pending: HashMap<PlanId, Instant>,
}

impl<S: Store> SyncBridge<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_delay(store, PLAN_SYNC_DELAY)
    }

    pub fn with_delay(store: Arc<S>, delay: Duration) -> Self {
        Self {
            store,
            delay,
            pending: HashMap::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Schedule (or reschedule) a save for the plan, `delay` after `now`.
    pub fn schedule(&mut self, id: PlanId, now: Instant) {
        self.pending.insert(id, now + self.delay);
    }

    /// Drop a pending save, e.g. when the plan is deleted.
    pub fn cancel(&mut self, id: PlanId) {
        if self.pending.remove(&id).is_some() {
            log::debug!("cancelled pending sync for plan {id}");
        }
    }

    /// Drop all pending saves (sign-out path).
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, id: PlanId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Next deadline for a plan, if one is scheduled.
    pub fn deadline(&self, id: PlanId) -> Option<Instant> {
        self.pending.get(&id).copied()
    }

    /// Save a plan right now, clearing any pending deadline for it.
    pub async fn flush_immediate(&mut self, plan: &Plan) -> StoreResult<()> {
        self.pending.remove(&plan.id);
        self.store.save(plan).await
    }

    /// Save every plan whose deadline has passed. `resolve` maps an id back
    /// to the current plan; plans that resolve to `None` are skipped.
    pub async fn flush_due(
        &mut self,
        now: Instant,
        resolve: impl Fn(PlanId) -> Option<Plan>,
    ) -> Vec<SyncOutcome> {
        let due: Vec<PlanId> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, _)| *id)
            .collect();

        let mut outcomes = Vec::with_capacity(due.len());
        for id in due {
            self.pending.remove(&id);
            match resolve(id) {
                Some(plan) => match self.store.save(&plan).await {
                    Ok(()) => outcomes.push(SyncOutcome::Saved(id)),
                    Err(e) => {
                        log::warn!("sync failed for plan {id}: {e}");
                        outcomes.push(SyncOutcome::Failed(id, e));
                    }
                },
                None => outcomes.push(SyncOutcome::Skipped(id)),
            }
        }
        outcomes
    }
}
