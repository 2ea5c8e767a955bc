//! Authentication session abstraction.
//!
//! The editor only needs to know who the user is and when that changes; the
//! provider behind this trait owns tokens, redirects, and refresh.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::BoxFuture;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Auth provider is not configured")]
    NotConfigured,
    #[error("Auth provider error: {0}")]
    Provider(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// The signed-in user, mapped down to what the editor displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserProfile,
}

/// Callback invoked whenever the session changes (sign-in, refresh,
/// sign-out).
#[cfg(not(target_arch = "wasm32"))]
pub type SessionCallback = Box<dyn Fn(Option<Session>) + Send + Sync>;
#[cfg(target_arch = "wasm32")]
pub type SessionCallback = Box<dyn Fn(Option<Session>)>;

/// Trait for authentication providers.
#[cfg(not(target_arch = "wasm32"))]
pub trait SessionProvider: Send + Sync {
    /// Resolve the current session, if any, and register a change listener.
    fn bootstrap(&self, on_change: SessionCallback) -> BoxFuture<'_, SessionResult<Option<Session>>>;

    /// Begin an interactive sign-in. Resolution of the new session arrives
    /// through the bootstrap listener.
    fn sign_in(&self) -> BoxFuture<'_, SessionResult<()>>;

    /// End the current session.
    fn sign_out(&self) -> BoxFuture<'_, SessionResult<()>>;
}

/// Trait for authentication providers (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait SessionProvider {
    /// Resolve the current session, if any, and register a change listener.
    fn bootstrap(&self, on_change: SessionCallback) -> BoxFuture<'_, SessionResult<Option<Session>>>;

    /// Begin an interactive sign-in. Resolution of the new session arrives
    /// through the bootstrap listener.
    fn sign_in(&self) -> BoxFuture<'_, SessionResult<()>>;

    /// End the current session.
    fn sign_out(&self) -> BoxFuture<'_, SessionResult<()>>;
}

/// Fallback provider for deployments without auth configured. Bootstraps to
/// no session so the editor runs in local-only mode.
#[derive(Debug, Default)]
pub struct UnconfiguredProvider;

impl SessionProvider for UnconfiguredProvider {
    fn bootstrap(&self, _on_change: SessionCallback) -> BoxFuture<'_, SessionResult<Option<Session>>> {
        log::warn!("auth provider not configured; running without a session");
        Box::pin(async { Ok(None) })
    }

    fn sign_in(&self) -> BoxFuture<'_, SessionResult<()>> {
        Box::pin(async { Err(SessionError::NotConfigured) })
    }

    fn sign_out(&self) -> BoxFuture<'_, SessionResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::block_on;

    #[test]
    fn test_unconfigured_bootstrap_yields_no_session() {
        let provider = UnconfiguredProvider;
        let session = block_on(provider.bootstrap(Box::new(|_| {}))).unwrap();
        assert!(session.is_none());
    }

    #[test]
    fn test_unconfigured_sign_in_fails() {
        let provider = UnconfiguredProvider;
        let result = block_on(provider.sign_in());
        assert!(matches!(result, Err(SessionError::NotConfigured)));
    }

    #[test]
    fn test_unconfigured_sign_out_is_noop() {
        let provider = UnconfiguredProvider;
        assert!(block_on(provider.sign_out()).is_ok());
    }
}
