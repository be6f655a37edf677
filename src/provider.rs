//! Auth provider abstraction and state-change notifications.
//!
//! The store's only boundary is an external auth backend. `AuthProvider`
//! names the capabilities that backend must expose; the shipped Supabase
//! implementation lives in [`crate::supabase`], and tests swap in a
//! scripted mock.

use crate::error::AuthResult;
use crate::session::Session;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Auth state transition reported by the provider.
///
/// Names follow the provider's own event vocabulary so payloads can be
/// forwarded to UI or IPC layers without translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthChangeEvent {
    /// Initial session pulled from the provider at startup.
    InitialSession,
    /// A session was issued (sign-in or confirmed sign-up).
    SignedIn,
    /// The session was ended (explicit sign-out or provider-side expiry).
    SignedOut,
    /// The session's tokens were replaced.
    TokenRefreshed,
    /// The user record inside the session changed.
    UserUpdated,
}

/// Payload delivered to subscribers on every auth state change.
#[derive(Debug, Clone)]
pub struct AuthChange {
    /// What happened.
    pub event: AuthChangeEvent,
    /// The session after the change; absent on sign-out.
    pub session: Option<Session>,
}

/// Capabilities the external auth backend must expose.
///
/// All calls await a network round trip and may fail; errors carry the
/// provider's payload unchanged. Implementations must not retry internally.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The session the provider currently reports, if any.
    async fn current_session(&self) -> AuthResult<Option<Session>>;

    /// Password-based sign-in. Returns the newly issued session.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session>;

    /// Account creation. Returns `None` when the provider requires a
    /// confirmation step before issuing a session.
    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<Option<Session>>;

    /// End the current session provider-side.
    async fn sign_out(&self) -> AuthResult<()>;

    /// Subscription handle for state-change notifications. The caller owns
    /// the receiver; dropping it detaches the subscriber.
    fn subscribe(&self) -> broadcast::Receiver<AuthChange>;
}
