//! In-process credential store
//!
//! Keeps tokens in a mutex-guarded map. Nothing survives a restart, which
//! makes it the right store for ephemeral sessions and for tests that need
//! isolated credential state per client.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use topcoin_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

use super::store::{CredentialStore, StoreError};

type StorageData = Arc<Mutex<HashMap<String, String>>>;

/// Credential store backed by a `HashMap`
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    storage: StorageData,
}

impl MemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with an access/refresh token pair
    pub fn with_tokens(access_token: &str, refresh_token: &str) -> Self {
        let store = Self::new();
        {
            let mut storage = store.storage.lock();
            storage.insert(ACCESS_TOKEN_KEY.to_string(), access_token.to_string());
            storage.insert(REFRESH_TOKEN_KEY.to_string(), refresh_token.to_string());
        }
        store
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.storage.lock().len()
    }

    /// `true` when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.storage.lock().is_empty()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.storage.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.storage.lock().remove(key);
        Ok(())
    }
}
