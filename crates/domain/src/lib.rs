//! # Topcoin Domain
//!
//! Plain data types shared by the Topcoin client crates.
//!
//! This crate contains:
//! - Client configuration structures and their defaults
//! - Credential and auth wire types (token pairs, login/refresh bodies)
//! - The user profile returned by the API
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other Topcoin crates
//! - No I/O; serialization only

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
