//! Authenticated client for the Topcoin HTTP API
//!
//! # Architecture
//!
//! ```text
//! caller ──▶ ApiClient::request ──▶ HttpClient (one attempt)
//!                 │   401
//!                 ▼
//!          RefreshCoordinator ──▶ POST /api/auth/refresh   (single flight)
//!                 │
//!                 ▼
//!            TokenState ──▶ CredentialStore (mirrored on every change)
//! ```
//!
//! - One refresh in flight per client; concurrent 401s share its result
//! - Each call retries at most once; transport failures are never retried
//! - Uploads bypass the refresh path entirely
//! - Realtime channel addresses are derived from configuration only

mod auth;
pub mod client;
pub mod errors;
mod realtime;
mod refresh;
pub mod request;
mod response;
mod session;
pub mod upload;

pub use client::{ApiClient, ApiClientBuilder};
pub use errors::{ApiError, ApiErrorCategory};
pub use refresh::RefreshError;
pub use request::{Payload, RequestOptions};
pub use upload::UploadFile;
