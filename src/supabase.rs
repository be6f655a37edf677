//! Supabase GoTrue client implementing the auth provider contract.
//!
//! Speaks the `/auth/v1` HTTP API: password grant for sign-in, `/signup`
//! for account creation, `/logout` for sign-out, and the refresh-token
//! grant when the held session has expired locally. The last issued
//! session is kept in memory only; persistence is out of scope.

use crate::config::SupabaseConfig;
use crate::error::{AuthError, AuthResult};
use crate::provider::{AuthChange, AuthChangeEvent, AuthProvider};
use crate::session::{Session, User};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const CHANGE_CHANNEL_CAPACITY: usize = 100;

/// GoTrue password grant request.
#[derive(Debug, Serialize)]
struct PasswordGrantRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// GoTrue refresh grant request.
#[derive(Debug, Serialize)]
struct RefreshGrantRequest<'a> {
    refresh_token: &'a str,
}

/// GoTrue token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    expires_in: i64,
    refresh_token: String,
    user: User,
}

/// GoTrue signup response: a full token response when the project
/// auto-confirms, otherwise just the pending user record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Issued(TokenResponse),
    Pending(User),
}

/// Supabase auth client.
///
/// Holds the last issued session and broadcasts an [`AuthChange`] on every
/// transition (sign-in, sign-out, token refresh).
pub struct SupabaseAuthClient {
    http_client: Client,
    config: SupabaseConfig,
    session: Mutex<Option<Session>>,
    changes: broadcast::Sender<AuthChange>,
}

impl SupabaseAuthClient {
    /// Create a new client for the given project.
    pub fn new(config: SupabaseConfig) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            http_client: Client::new(),
            config,
            session: Mutex::new(None),
            changes,
        }
    }

    /// Build an auth API URL, e.g. `https://xyz.supabase.co/auth/v1/signup`.
    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.config.url, path)
    }

    /// Replace the held session and notify subscribers.
    fn store_session(&self, session: Option<Session>, event: AuthChangeEvent) {
        *self.session.lock().unwrap() = session.clone();
        let _ = self.changes.send(AuthChange { event, session });
    }

    /// Convert a rejected response into an error carrying the provider's
    /// payload verbatim.
    async fn api_error(response: reqwest::Response) -> AuthError {
        let status = response.status().as_u16();
        let payload = response.text().await.unwrap_or_default();
        warn!(status, payload = %payload, "Provider rejected request");
        AuthError::Api { status, payload }
    }

    fn session_from_token(data: TokenResponse) -> Session {
        let expires_at = Utc::now() + Duration::seconds(data.expires_in);
        Session {
            access_token: data.access_token,
            token_type: data.token_type,
            expires_in: data.expires_in,
            expires_at,
            refresh_token: data.refresh_token,
            user: data.user,
        }
    }

    /// Exchange a refresh token for a replacement session.
    async fn refresh(&self, refresh_token: &str) -> AuthResult<Session> {
        let url = self.auth_url("token?grant_type=refresh_token");

        debug!(url = %url, "Refreshing token");

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.config.publishable_key)
            .header("Content-Type", "application/json")
            .json(&RefreshGrantRequest { refresh_token })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let data: TokenResponse = response.json().await?;
        info!(user_id = %data.user.id, "Token refreshed");
        Ok(Self::session_from_token(data))
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuthClient {
    async fn current_session(&self) -> AuthResult<Option<Session>> {
        let held = self.session.lock().unwrap().clone();
        let Some(session) = held else {
            debug!("No session held");
            return Ok(None);
        };

        if !session.is_expired() {
            return Ok(Some(session));
        }

        // Expired locally: refresh and replace. On failure the held session
        // stays as it was and the error surfaces to the caller.
        let refreshed = self.refresh(&session.refresh_token).await?;
        self.store_session(Some(refreshed.clone()), AuthChangeEvent::TokenRefreshed);
        Ok(Some(refreshed))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session> {
        let url = self.auth_url("token?grant_type=password");

        debug!(url = %url, email = %email, "Attempting email/password sign-in");

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.config.publishable_key)
            .header("Content-Type", "application/json")
            .json(&PasswordGrantRequest { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let data: TokenResponse = response.json().await?;
        let session = Self::session_from_token(data);

        info!(user_id = %session.user.id, "Sign-in successful");
        self.store_session(Some(session.clone()), AuthChangeEvent::SignedIn);
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<Option<Session>> {
        let url = self.auth_url("signup");

        debug!(url = %url, email = %email, "Attempting sign-up");

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.config.publishable_key)
            .header("Content-Type", "application/json")
            .json(&PasswordGrantRequest { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        match response.json().await? {
            SignUpResponse::Issued(data) => {
                let session = Self::session_from_token(data);
                info!(user_id = %session.user.id, "Sign-up successful");
                self.store_session(Some(session.clone()), AuthChangeEvent::SignedIn);
                Ok(Some(session))
            }
            SignUpResponse::Pending(user) => {
                info!(user_id = %user.id, "Sign-up accepted, confirmation pending");
                Ok(None)
            }
        }
    }

    async fn sign_out(&self) -> AuthResult<()> {
        let access_token = self
            .session
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.access_token.clone());

        let url = self.auth_url("logout");

        debug!(url = %url, "Signing out");

        let mut request = self
            .http_client
            .post(&url)
            .header("apikey", &self.config.publishable_key);
        if let Some(token) = access_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        self.store_session(None, AuthChangeEvent::SignedOut);
        info!("Signed out");
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.changes.subscribe()
    }
}
