//! Observability setup
//!
//! The client crates only emit `tracing` events; binaries and tests decide
//! where they go by installing a subscriber through [`init_tracing`].

pub mod logging;

pub use logging::{init_tracing, LogFormat};
