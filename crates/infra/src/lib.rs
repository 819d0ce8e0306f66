//! # Topcoin Infrastructure
//!
//! Network-facing implementation of the Topcoin client.
//!
//! This crate contains:
//! - The authenticated API client with single-flight token refresh
//! - The HTTP transport wrapper
//! - Configuration loading from environment and files
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Depends on `topcoin-domain` for data types and `topcoin-common` for
//!   credential persistence
//! - Contains all the crate's I/O (HTTP, config files, environment)

pub mod api;
pub mod config;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{
    ApiClient, ApiClientBuilder, ApiError, ApiErrorCategory, Payload, RefreshError, RequestOptions,
    UploadFile,
};
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::{init_tracing, LogFormat};
