//! Single-flight coordination for access-token refresh
//!
//! At most one refresh runs per client. The first caller to hit a 401
//! installs a [`Shared`] future in the slot; callers arriving while it is
//! pending clone and await the same future, so N concurrent 401s produce
//! one call to the refresh endpoint and N identical outcomes. The future
//! empties the slot itself when it settles, so the next 401 after that
//! starts a fresh attempt.
//!
//! The operation runs as its own tokio task and waiters only hold the
//! task's join handle, so a refresh keeps running to completion even when
//! every caller has stopped waiting for it.

use std::future::Future;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use reqwest::Method;
use thiserror::Error;
use topcoin_domain::{RefreshRequest, RefreshResponse};
use tracing::debug;

use super::errors::ApiError;
use super::response::error_message;
use crate::http::HttpClient;

/// Outcome shared by every waiter on one refresh attempt.
pub(crate) type RefreshResult = Result<String, RefreshError>;

pub(crate) type SharedRefresh = Shared<BoxFuture<'static, RefreshResult>>;

/// Why a refresh attempt failed. Cloneable so all waiters see the same
/// failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshError {
    /// No refresh token was held when the refresh started
    #[error("no refresh token available")]
    MissingRefreshToken,

    /// Refresh endpoint answered with a non-2xx status
    #[error("refresh rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code of the refresh response
        status: u16,
        /// Message extracted from the error body
        message: String,
    },

    /// Refresh request never produced a response
    #[error("refresh request failed: {0}")]
    Transport(String),

    /// 2xx response without a usable token pair
    #[error("malformed refresh response: {0}")]
    Malformed(String),

    /// Refresh task panicked or was shut down with the runtime
    #[error("refresh task stopped: {0}")]
    Interrupted(String),
}

impl From<RefreshError> for ApiError {
    fn from(err: RefreshError) -> Self {
        Self::Auth(err.to_string())
    }
}

#[derive(Default)]
pub(crate) struct RefreshCoordinator {
    in_flight: Mutex<Option<SharedRefresh>>,
}

impl RefreshCoordinator {
    /// Join the pending refresh, or spawn the operation produced by `start`.
    ///
    /// Returns the shared outcome and whether this call started it. Must be
    /// called from within a tokio runtime.
    pub(crate) fn join_or_start<F, Fut>(&self, start: F) -> (SharedRefresh, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshResult> + Send + 'static,
    {
        let mut slot = self.in_flight.lock();
        if let Some(pending) = slot.as_ref() {
            return (pending.clone(), false);
        }

        let task = tokio::spawn(start());
        let shared = task
            .map(|joined| joined.unwrap_or_else(|e| Err(RefreshError::Interrupted(e.to_string()))))
            .boxed()
            .shared();
        *slot = Some(shared.clone());
        (shared, true)
    }

    pub(crate) fn release(&self) {
        self.in_flight.lock().take();
    }

    #[cfg(test)]
    pub(crate) fn is_in_flight(&self) -> bool {
        self.in_flight.lock().is_some()
    }
}

/// POST the refresh token and decode the new token pair.
///
/// A 2xx with an undecodable body or an empty access token is a failure.
pub(crate) async fn exchange_refresh_token(
    http: &HttpClient,
    url: &str,
    refresh_token: String,
) -> Result<RefreshResponse, RefreshError> {
    let builder = http.request(Method::POST, url).json(&RefreshRequest { refresh_token });
    let response =
        http.send(builder).await.map_err(|e| RefreshError::Transport(e.to_string()))?;

    let status = response.status();
    let body = response.text().await.map_err(|e| RefreshError::Transport(e.to_string()))?;
    if !status.is_success() {
        return Err(RefreshError::Rejected {
            status: status.as_u16(),
            message: error_message(status, &body),
        });
    }

    let tokens: RefreshResponse =
        serde_json::from_str(&body).map_err(|e| RefreshError::Malformed(e.to_string()))?;
    if tokens.access_token.is_empty() {
        return Err(RefreshError::Malformed("empty access_token".to_string()));
    }

    debug!(rotated = tokens.refresh_token.is_some(), "refresh endpoint issued new access token");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_second_caller_joins_pending_refresh() {
        let coordinator = RefreshCoordinator::default();
        let started = Arc::new(AtomicUsize::new(0));

        let start = |counter: Arc<AtomicUsize>| {
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, RefreshError>("A2".to_string()) }.boxed()
            }
        };

        let (first, first_started) = coordinator.join_or_start(start(started.clone()));
        let (second, second_started) = coordinator.join_or_start(start(started.clone()));

        assert!(first_started);
        assert!(!second_started);
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(first.await, Ok("A2".to_string()));
        assert_eq!(second.await, Ok("A2".to_string()));
    }

    #[tokio::test]
    async fn test_release_allows_new_attempt() {
        let coordinator = RefreshCoordinator::default();

        let (pending, _) = coordinator
            .join_or_start(|| async { Err(RefreshError::MissingRefreshToken) }.boxed());
        assert!(coordinator.is_in_flight());
        assert_eq!(pending.await, Err(RefreshError::MissingRefreshToken));

        coordinator.release();
        assert!(!coordinator.is_in_flight());

        let (next, started) =
            coordinator.join_or_start(|| async { Ok("A3".to_string()) }.boxed());
        assert!(started);
        assert_eq!(next.await, Ok("A3".to_string()));
    }

    #[tokio::test]
    async fn test_abandoned_refresh_runs_to_completion() {
        let coordinator = RefreshCoordinator::default();
        let finished = Arc::new(AtomicUsize::new(0));

        let counter = finished.clone();
        let (pending, _) = coordinator.join_or_start(move || async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            counter.fetch_add(1, Ordering::SeqCst);
            Ok("A2".to_string())
        });
        drop(pending);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_refresh_is_interrupted() {
        let coordinator = RefreshCoordinator::default();

        let explode = true;
        let (pending, _) = coordinator.join_or_start(move || async move {
            if explode {
                panic!("refresh exploded");
            }
            Ok(String::new())
        });

        assert!(matches!(pending.await, Err(RefreshError::Interrupted(_))));
    }

    #[test]
    fn test_refresh_error_becomes_auth_error() {
        let err: ApiError =
            RefreshError::Rejected { status: 401, message: "Token expired".to_string() }.into();
        assert!(err.is_auth());
        assert!(err.to_string().contains("Token expired"));
    }
}
