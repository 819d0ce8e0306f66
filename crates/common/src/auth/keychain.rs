//! Credential store backed by the platform keychain.
//!
//! Tokens are kept as individual keychain items under the provider's
//! service name, keyed by [`ACCESS_TOKEN_KEY`](super::ACCESS_TOKEN_KEY) and
//! [`REFRESH_TOKEN_KEY`](super::REFRESH_TOKEN_KEY).

use crate::auth::store::{CredentialStore, StoreError};
use crate::security::{KeychainError, KeychainProvider};

impl From<KeychainError> for StoreError {
    fn from(err: KeychainError) -> Self {
        match err {
            KeychainError::Unreadable(key) => Self::Corrupted(key),
            KeychainError::Backend(message) => Self::AccessFailed(message),
        }
    }
}

impl CredentialStore for KeychainProvider {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(self.write(key, value)?)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        Ok(self.delete(key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_failure_maps_to_access_failure() {
        let err: StoreError = KeychainError::Backend("read of access_token failed".into()).into();
        assert!(matches!(err, StoreError::AccessFailed(msg) if msg.contains("access_token")));
    }

    #[test]
    fn test_unreadable_item_maps_to_corrupted() {
        let err: StoreError = KeychainError::Unreadable("access_token".into()).into();
        assert_eq!(err, StoreError::Corrupted("access_token".into()));
    }
}
