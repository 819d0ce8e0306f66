//! Credential persistence shared across Topcoin crates.
//!
//! The client reaches persisted tokens only through the narrow
//! [`CredentialStore`](auth::CredentialStore) contract. Two implementations
//! ship here:
//!
//! - [`KeychainProvider`](security::KeychainProvider): platform keychain
//!   (behind the default `keychain` feature)
//! - [`MemoryCredentialStore`](auth::MemoryCredentialStore): process-local
//!   storage, for ephemeral sessions and tests
//!
//! # Feature Tiers
//!
//! - `keychain` (default): platform keychain integration via `keyring`

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
#[cfg(feature = "keychain")]
pub mod security;

// Re-export commonly used types and traits for convenience
pub use auth::{CredentialStore, MemoryCredentialStore, StoreError, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
#[cfg(feature = "keychain")]
pub use security::KeychainProvider;
