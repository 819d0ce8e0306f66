//! API-specific error types
//!
//! Every failure the client can produce surfaces as a single [`ApiError`];
//! [`ApiError::category`] classifies it for callers that branch on kind.

use reqwest::StatusCode;
use thiserror::Error;
use topcoin_common::StoreError;
use topcoin_domain::TopcoinError;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Credentials missing, refresh failed, or request still unauthorized
    /// (also 401/403 responses outside the refresh path)
    Authentication,
    /// 4xx responses and requests the client refused to build
    Client,
    /// 5xx responses
    Server,
    /// Network/connection errors and undecodable success bodies
    Transport,
    /// Configuration errors
    Config,
    /// Credential store errors
    Storage,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credential state was cleared as a side effect.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Non-2xx response. `message` is taken from the body's `detail` or
    /// `message` field, else synthesized from the status line.
    #[error("{message}")]
    Request {
        /// HTTP status of the response
        status: StatusCode,
        /// Human-readable failure message
        message: String,
    },

    /// The network call itself failed. Never retried.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Success body did not match the expected type
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Request could not be built (body or header encoding)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid origins or transport setup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential store read or write failed
    #[error("Credential storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::Request { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN =>
            {
                ApiErrorCategory::Authentication
            }
            Self::Request { status, .. } if status.is_server_error() => ApiErrorCategory::Server,
            Self::Request { .. } | Self::InvalidRequest(_) => ApiErrorCategory::Client,
            Self::Transport(_) | Self::Decode(_) => ApiErrorCategory::Transport,
            Self::Config(_) => ApiErrorCategory::Config,
            Self::Storage(_) => ApiErrorCategory::Storage,
        }
    }

    /// HTTP status carried by the error, when a response was received
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Request { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// `true` for authentication failures raised by the refresh path
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<TopcoinError> for ApiError {
    fn from(err: TopcoinError) -> Self {
        match err {
            TopcoinError::Config(message) => Self::Config(message),
            TopcoinError::InvalidInput(message) => Self::InvalidRequest(message),
        }
    }
}
