//! Error types used throughout the domain

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for configuration-level Topcoin operations
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TopcoinError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Topcoin domain operations
pub type Result<T> = std::result::Result<T, TopcoinError>;
