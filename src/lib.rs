//! Reactive session store over a pluggable authentication provider.
//!
//! This crate provides:
//! - A `SessionStore` that holds the latest authentication session and
//!   derives the current user from it
//! - An `AuthProvider` trait describing the external auth backend
//! - A Supabase GoTrue implementation of that trait
//! - Broadcast-based auth state change notifications

mod config;
mod error;
mod provider;
mod session;
mod store;
mod supabase;

pub use config::SupabaseConfig;
pub use error::{AuthError, AuthResult, ProviderError};
pub use provider::{AuthChange, AuthChangeEvent, AuthProvider};
pub use session::{Session, User};
pub use store::SessionStore;
pub use supabase::SupabaseAuthClient;
