//! Provider configuration.

use crate::error::{AuthError, AuthResult};
use url::Url;

/// Environment variable holding the Supabase project URL.
pub const SUPABASE_URL_ENV: &str = "SUPABASE_URL";

/// Environment variable holding the Supabase publishable API key.
pub const SUPABASE_PUBLISHABLE_KEY_ENV: &str = "SUPABASE_PUBLISHABLE_KEY";

/// Connection settings for the Supabase auth backend.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Supabase project URL, e.g. `https://abc123.supabase.co`.
    pub url: String,
    /// Publishable API key (public, safe to expose).
    pub publishable_key: String,
}

impl SupabaseConfig {
    /// Build a config from an explicit URL and key.
    ///
    /// The URL is validated up front so a bad value fails at construction
    /// rather than on the first provider call.
    pub fn new(url: impl Into<String>, publishable_key: impl Into<String>) -> AuthResult<Self> {
        let url = url.into();
        Url::parse(&url)?;
        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            publishable_key: publishable_key.into(),
        })
    }

    /// Build a config from `SUPABASE_URL` and `SUPABASE_PUBLISHABLE_KEY`.
    pub fn from_env() -> AuthResult<Self> {
        let url = std::env::var(SUPABASE_URL_ENV)
            .map_err(|_| AuthError::Config(format!("{SUPABASE_URL_ENV} is not set")))?;
        let key = std::env::var(SUPABASE_PUBLISHABLE_KEY_ENV)
            .map_err(|_| AuthError::Config(format!("{SUPABASE_PUBLISHABLE_KEY_ENV} is not set")))?;
        Self::new(url, key)
    }
}
