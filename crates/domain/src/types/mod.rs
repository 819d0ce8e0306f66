//! Domain data types

pub mod auth;
pub mod user;

pub use auth::*;
pub use user::*;
