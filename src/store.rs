//! Reactive session store.
//!
//! Holds the latest session issued by the auth provider and derives the
//! current user from it. The store is constructed explicitly and passed by
//! reference; there is no global instance. Construction registers a single
//! subscription to the provider's state-change notifications and mirrors
//! them into the session slot until the store is closed or dropped.

use crate::error::{AuthResult, ProviderError};
use crate::provider::{AuthChange, AuthChangeEvent, AuthProvider};
use crate::session::{Session, User};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const CHANGE_CHANNEL_CAPACITY: usize = 100;

/// Observable holder of the current authentication session.
///
/// The session slot is a single shared cell with last-write-wins semantics:
/// operations are not mutually excluded, the lock is held only for the
/// assignment itself, and the provider's notification task may overwrite the
/// slot between any two awaits. No operation retries or times out locally.
pub struct SessionStore {
    provider: Arc<dyn AuthProvider>,
    session: Arc<Mutex<Option<Session>>>,
    changes: broadcast::Sender<AuthChange>,
    listener: JoinHandle<()>,
}

impl SessionStore {
    /// Create a store bound to a provider.
    ///
    /// Must be called from within a tokio runtime: this spawns the task that
    /// forwards provider notifications into the session slot.
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        let session = Arc::new(Mutex::new(None));
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        let listener =
            Self::spawn_listener(provider.subscribe(), session.clone(), changes.clone());
        Self {
            provider,
            session,
            changes,
            listener,
        }
    }

    fn spawn_listener(
        mut notifications: broadcast::Receiver<AuthChange>,
        session: Arc<Mutex<Option<Session>>>,
        changes: broadcast::Sender<AuthChange>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match notifications.recv().await {
                    Ok(change) => {
                        debug!(event = ?change.event, "Provider auth state change");
                        *session.lock().unwrap() = change.session.clone();
                        let _ = changes.send(change);
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "Missed provider auth changes, resuming with latest");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// The current session, if any.
    pub fn session(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }

    /// The current user, recomputed from the session slot on every read.
    /// Present iff a session is present.
    pub fn user(&self) -> Option<User> {
        self.session.lock().unwrap().as_ref().map(|s| s.user.clone())
    }

    /// Subscription handle for observing slot updates, both results of
    /// explicit operations and forwarded provider notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.changes.subscribe()
    }

    fn set_session(&self, session: Option<Session>, event: AuthChangeEvent) {
        *self.session.lock().unwrap() = session.clone();
        let _ = self.changes.send(AuthChange { event, session });
    }

    /// Pull the provider's current session into the slot.
    ///
    /// Safe to call repeatedly; the slot always ends up reflecting whatever
    /// the provider reports, which may be no session at all.
    pub async fn initialize(&self) -> Result<(), ProviderError> {
        let session = self.provider.current_session().await?;

        match &session {
            Some(s) => info!(user_id = %s.user.id, "Session restored from provider"),
            None => debug!("Provider reports no current session"),
        }

        self.set_session(session, AuthChangeEvent::InitialSession);
        Ok(())
    }

    /// Sign in with email and password.
    ///
    /// Inputs are forwarded to the provider as-is; validation is its job.
    /// On failure the error is propagated unchanged and the slot keeps its
    /// prior value.
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<()> {
        let session = self.provider.sign_in_with_password(email, password).await?;

        info!(user_id = %session.user.id, "Signed in");
        self.set_session(Some(session), AuthChangeEvent::SignedIn);
        Ok(())
    }

    /// Create an account with email and password.
    ///
    /// The provider may withhold the session until the account is confirmed;
    /// in that case the slot is left empty.
    pub async fn sign_up(&self, email: &str, password: &str) -> AuthResult<()> {
        match self.provider.sign_up(email, password).await? {
            Some(session) => {
                info!(user_id = %session.user.id, "Signed up");
                self.set_session(Some(session), AuthChangeEvent::SignedIn);
            }
            None => {
                info!("Signed up, awaiting confirmation");
                *self.session.lock().unwrap() = None;
            }
        }
        Ok(())
    }

    /// Sign out.
    ///
    /// On provider failure the error is propagated and the slot is untouched;
    /// on success the slot is cleared unconditionally.
    pub async fn sign_out(&self) -> AuthResult<()> {
        self.provider.sign_out().await?;

        self.set_session(None, AuthChangeEvent::SignedOut);
        info!("Signed out");
        Ok(())
    }

    /// Detach from provider notifications. Also happens on drop.
    pub fn close(&self) {
        self.listener.abort();
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
