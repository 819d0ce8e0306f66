//! Platform keychain access
//!
//! Each token is one keychain item: the service is the provider's
//! namespace (e.g. "Topcoin.api") and the account is the token key.
//! Backed by macOS Keychain, Windows Credential Manager, or the Linux
//! Secret Service, whichever `keyring` selects for the target.
//!
//! ```no_run
//! use topcoin_common::security::KeychainProvider;
//!
//! let keychain = KeychainProvider::new("Topcoin.api");
//! keychain.write("access_token", "eyJhbGciOi...")?;
//! assert!(keychain.read("access_token")?.is_some());
//! keychain.delete("access_token")?;
//! # Ok::<(), topcoin_common::security::KeychainError>(())
//! ```

use keyring::Entry;
use thiserror::Error;
use tracing::debug;

/// Keychain items namespaced under one service name
#[derive(Debug, Clone)]
pub struct KeychainProvider {
    service_name: String,
}

impl KeychainProvider {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into() }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Read an item; a missing item is `Ok(None)`.
    ///
    /// # Errors
    /// `KeychainError::Unreadable` if the stored bytes are not UTF-8,
    /// `KeychainError::Backend` for any other keychain failure
    pub fn read(&self, account: &str) -> Result<Option<String>, KeychainError> {
        debug!(service = %self.service_name, account, "reading keychain item");

        match self.entry(account)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(keyring::Error::BadEncoding(_)) => {
                Err(KeychainError::Unreadable(account.to_string()))
            }
            Err(e) => Err(KeychainError::backend("read", account, e)),
        }
    }

    /// Create or overwrite an item.
    ///
    /// # Errors
    /// `KeychainError::Backend` if the keychain rejects the write
    pub fn write(&self, account: &str, value: &str) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, account, "writing keychain item");

        self.entry(account)?
            .set_password(value)
            .map_err(|e| KeychainError::backend("write", account, e))
    }

    /// Delete an item. Deleting a missing item succeeds.
    ///
    /// # Errors
    /// `KeychainError::Backend` if the keychain rejects the deletion
    pub fn delete(&self, account: &str) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, account, "deleting keychain item");

        match self.entry(account)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(KeychainError::backend("delete", account, e)),
        }
    }

    fn entry(&self, account: &str) -> Result<Entry, KeychainError> {
        Entry::new(&self.service_name, account)
            .map_err(|e| KeychainError::backend("open", account, e))
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeychainError {
    /// Platform keychain refused or failed the operation
    #[error("Keychain {0}")]
    Backend(String),

    /// Item exists but does not hold UTF-8 text
    #[error("Keychain item {0} is not valid UTF-8")]
    Unreadable(String),
}

impl KeychainError {
    fn backend(operation: &str, account: &str, err: keyring::Error) -> Self {
        Self::Backend(format!("{} of {} failed: {}", operation, account, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_names_operation_and_account() {
        let err = KeychainError::backend(
            "write",
            "refresh_token",
            keyring::Error::PlatformFailure("locked".into()),
        );
        assert!(err.to_string().starts_with("Keychain write of refresh_token failed"));
    }

    #[test]
    fn test_service_name_is_kept() {
        assert_eq!(KeychainProvider::new("Topcoin.api").service_name(), "Topcoin.api");
    }
}
