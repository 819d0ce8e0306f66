//! Credential store contract and implementations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │    ApiClient    │  (topcoin-infra)
//! └────────┬────────┘
//!          │ get / set / remove
//!          ▼
//! ┌─────────────────┐
//! │ CredentialStore │  trait
//! └────────┬────────┘
//!          ├──► KeychainProvider       (platform keychain)
//!          └──► MemoryCredentialStore  (in-process)
//! ```
//!
//! Tokens live under the keys [`ACCESS_TOKEN_KEY`] and
//! [`REFRESH_TOKEN_KEY`].

#[cfg(feature = "keychain")]
mod keychain;
pub mod memory;
pub mod store;

pub use memory::MemoryCredentialStore;
pub use store::{CredentialStore, StoreError};
pub use topcoin_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
