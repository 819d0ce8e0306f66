//! Credential store contract
//!
//! The store is an external collaborator: the client seeds its in-memory
//! credential state from it once at construction and mirrors every change
//! back into it. Implementations must be cheap to call from async code
//! (no long blocking work) and safe to share across tasks.

use thiserror::Error;
use topcoin_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use topcoin_domain::Credentials;

/// Credential store error types
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Backend access failed (permission denied, service unavailable, etc.)
    #[error("Credential store access failed: {0}")]
    AccessFailed(String),

    /// Stored value could not be read back as text
    #[error("Credential store returned an unreadable value for {0}")]
    Corrupted(String),
}

/// Narrow get/set/remove contract for persisted credentials
pub trait CredentialStore: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`, not an error.
    ///
    /// # Errors
    /// Returns `StoreError` if the backend cannot be read
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    /// Returns `StoreError` if the backend cannot be written
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value (idempotent).
    ///
    /// # Errors
    /// Returns `StoreError` if the backend cannot be written
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Read both tokens.
    ///
    /// # Errors
    /// Returns the first `StoreError` encountered
    fn load_credentials(&self) -> Result<Credentials, StoreError> {
        Ok(Credentials {
            access_token: self.get(ACCESS_TOKEN_KEY)?,
            refresh_token: self.get(REFRESH_TOKEN_KEY)?,
        })
    }

    /// Mirror a credential pair; absent fields are removed from the store.
    ///
    /// # Errors
    /// Returns the first `StoreError` encountered
    fn save_credentials(&self, credentials: &Credentials) -> Result<(), StoreError> {
        put_or_remove(self, ACCESS_TOKEN_KEY, credentials.access_token.as_deref())?;
        put_or_remove(self, REFRESH_TOKEN_KEY, credentials.refresh_token.as_deref())
    }

    /// Remove both tokens. Both removals are attempted even if the first
    /// fails.
    ///
    /// # Errors
    /// Returns the first `StoreError` encountered
    fn clear_credentials(&self) -> Result<(), StoreError> {
        let access = self.remove(ACCESS_TOKEN_KEY);
        let refresh = self.remove(REFRESH_TOKEN_KEY);
        access.and(refresh)
    }
}

fn put_or_remove<S: CredentialStore + ?Sized>(
    store: &S,
    key: &str,
    value: Option<&str>,
) -> Result<(), StoreError> {
    match value {
        Some(value) => store.set(key, value),
        None => store.remove(key),
    }
}
