//! Shared domain types used across crates.

pub mod claims;
pub mod id;

pub use claims::{Claims, Principal};
pub use id::SessionId;
