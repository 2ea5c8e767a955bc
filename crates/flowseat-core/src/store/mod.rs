//! Plan persistence: the `Store` trait, its backends, and the sync bridge.
//!
//! Everything here works on whole [`Plan`] values keyed by [`PlanId`].
//! Backends are async behind boxed futures so a browser host and a native
//! host can share the same trait object.

mod bridge;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use bridge::{SyncBridge, SyncOutcome, PLAN_SYNC_DELAY};
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

use crate::plan::{Plan, PlanId};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// What can go wrong talking to a plan backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no plan with id {0}")]
    NotFound(PlanId),
    #[error("plan encoding failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),
    /// Backend-specific failures with no more precise shape (poisoned
    /// locks, remote rejections).
    #[error("{0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future returned by every `Store` method. Not `Send`: thread bounds
/// live on the trait itself, where the wasm build can drop them.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A plan backend.
///
/// `save` is an upsert and `delete` is idempotent, so the sync bridge can
/// replay either without checking state first. `list` reports ids only;
/// loading stays the caller's choice.
#[cfg(not(target_arch = "wasm32"))]
pub trait Store: Send + Sync {
    fn save(&self, plan: &Plan) -> BoxFuture<'_, StoreResult<()>>;

    fn load(&self, id: PlanId) -> BoxFuture<'_, StoreResult<Plan>>;

    fn delete(&self, id: PlanId) -> BoxFuture<'_, StoreResult<()>>;

    /// Ids of every stored plan, in no particular order.
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<PlanId>>>;

    fn exists(&self, id: PlanId) -> BoxFuture<'_, StoreResult<bool>>;
}

/// Single-threaded twin of [`Store`] for wasm targets, where futures never
/// cross threads and `Send + Sync` would be unsatisfiable.
#[cfg(target_arch = "wasm32")]
pub trait Store {
    fn save(&self, plan: &Plan) -> BoxFuture<'_, StoreResult<()>>;

    fn load(&self, id: PlanId) -> BoxFuture<'_, StoreResult<Plan>>;

    fn delete(&self, id: PlanId) -> BoxFuture<'_, StoreResult<()>>;

    /// Ids of every stored plan, in no particular order.
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<PlanId>>>;

    fn exists(&self, id: PlanId) -> BoxFuture<'_, StoreResult<bool>>;
}

/// Drive a store future to completion on the test thread. Store futures
/// never actually park, so a no-op waker is enough.
#[cfg(test)]
pub(crate) fn block_on<F: std::future::Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
