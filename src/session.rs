//! Session and user data model.
//!
//! A `Session` is the authenticated-login record issued by the provider. It
//! is owned by the store for the life of the process and replaced wholesale
//! on every update, never mutated in place. A `User` is only ever derived
//! from a session; there is no user without a backing session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity projection carried inside a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User UUID
    pub id: String,
    /// User email, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Account creation timestamp, if reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Authenticated login issued by the external auth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for authenticated provider calls
    pub access_token: String,
    /// Token type, `"bearer"` for GoTrue
    pub token_type: String,
    /// Token lifetime in seconds, as issued
    pub expires_in: i64,
    /// Absolute expiry of the access token
    pub expires_at: DateTime<Utc>,
    /// Token used to obtain a replacement session
    pub refresh_token: String,
    /// The user this session authenticates
    pub user: User,
}

impl Session {
    /// Whether the access token has expired locally.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session_expiring_at(expires_at: DateTime<Utc>) -> Session {
        Session {
            access_token: "access".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 3600,
            expires_at,
            refresh_token: "refresh".to_string(),
            user: User {
                id: "user-1".to_string(),
                email: Some("test@example.com".to_string()),
                created_at: None,
            },
        }
    }

    #[test]
    fn test_future_expiry_is_not_expired() {
        let session = session_expiring_at(Utc::now() + Duration::hours(1));
        assert!(!session.is_expired());
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let session = session_expiring_at(Utc::now() - Duration::seconds(1));
        assert!(session.is_expired());
    }
}
