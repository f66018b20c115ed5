//! Collaborator traits the gateway core consumes.
//!
//! Implementations live in other crates (`tickgate-auth`, `tickgate-cache`)
//! so the core stays free of backend dependencies.

pub mod rate_store;
pub mod token;

pub use rate_store::{RateStore, WindowEntry};
pub use token::{AuthError, TokenValidator};
