//! In-memory credential state mirrored into a [`CredentialStore`]
//!
//! The client owns one `TokenState`. Reads never touch the store; every
//! write updates memory first and then mirrors the change, so a failing
//! store never leaves the client using stale tokens.

use std::sync::Arc;

use parking_lot::RwLock;
use topcoin_common::{CredentialStore, StoreError};
use topcoin_domain::Credentials;
use tracing::{debug, warn};

pub(crate) struct TokenState {
    credentials: RwLock<Credentials>,
    store: Arc<dyn CredentialStore>,
}

impl TokenState {
    /// Seed memory from the store. An unreadable store starts the client
    /// signed out instead of failing construction.
    pub(crate) fn load(store: Arc<dyn CredentialStore>) -> Self {
        let credentials = match store.load_credentials() {
            Ok(credentials) => {
                debug!(
                    has_access = credentials.access_token.is_some(),
                    has_refresh = credentials.refresh_token.is_some(),
                    "loaded persisted credentials"
                );
                credentials
            }
            Err(err) => {
                warn!(error = %err, "failed to load persisted credentials, starting signed out");
                Credentials::default()
            }
        };

        Self { credentials: RwLock::new(credentials), store }
    }

    pub(crate) fn access_token(&self) -> Option<String> {
        self.credentials.read().access_token.clone()
    }

    pub(crate) fn refresh_token(&self) -> Option<String> {
        self.credentials.read().refresh_token.clone()
    }

    pub(crate) fn snapshot(&self) -> Credentials {
        self.credentials.read().clone()
    }

    /// Replace both tokens.
    pub(crate) fn set(&self, access: &str, refresh: &str) -> Result<(), StoreError> {
        let credentials = Credentials::new(access, refresh);
        *self.credentials.write() = credentials.clone();
        self.store.save_credentials(&credentials)
    }

    /// Install a refreshed access token. The refresh token is rotated only
    /// when the server supplied a new one.
    pub(crate) fn install_refreshed(&self, access: String, refresh: Option<String>) {
        let snapshot = {
            let mut guard = self.credentials.write();
            guard.access_token = Some(access);
            if let Some(refresh) = refresh {
                guard.refresh_token = Some(refresh);
            }
            guard.clone()
        };

        if let Err(err) = self.store.save_credentials(&snapshot) {
            warn!(error = %err, "failed to persist refreshed credentials");
        }
    }

    /// Drop both tokens.
    pub(crate) fn clear(&self) -> Result<(), StoreError> {
        *self.credentials.write() = Credentials::default();
        self.store.clear_credentials()
    }

    /// Drop both tokens on an authentication failure path; store errors
    /// are logged only.
    pub(crate) fn clear_quietly(&self) {
        if let Err(err) = self.clear() {
            warn!(error = %err, "failed to clear persisted credentials");
        }
    }
}
