//! Authentication error types.

use thiserror::Error;

/// Authentication error type.
///
/// Provider failures are passed through without local recovery or retry;
/// on any error the caller's session state is left untouched.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Provider rejected the request; the payload is the provider's error
    /// body, passed through verbatim.
    #[error("provider error: HTTP {status}: {payload}")]
    Api { status: u16, payload: String },

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed provider response
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;

/// Error raised when the provider's session lookup fails during store
/// initialization. Wraps the underlying provider error unchanged.
#[derive(Error, Debug)]
#[error("session lookup failed: {0}")]
pub struct ProviderError(#[from] pub AuthError);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_keeps_payload_verbatim() {
        let err = AuthError::Api {
            status: 400,
            payload: r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#
                .to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("HTTP 400"));
        assert!(rendered.contains("Invalid login credentials"));
    }

    #[test]
    fn test_config_error_display() {
        let err = AuthError::Config("SUPABASE_URL is not set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: SUPABASE_URL is not set"
        );
    }

    #[test]
    fn test_provider_error_wraps_auth_error() {
        let inner = AuthError::Api {
            status: 503,
            payload: "unavailable".to_string(),
        };
        let err = ProviderError::from(inner);
        assert!(err.to_string().starts_with("session lookup failed:"));
        assert!(err.to_string().contains("HTTP 503"));
    }
}
