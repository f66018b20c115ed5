//! # tickgate-core
//!
//! Core crate for the TickGate realtime gateway. Contains the configuration
//! schema, typed identities (claims, principals, session ids), the
//! collaborator traits consumed by the gateway (token validation and the
//! shared rate-counting store), and the unified error system.
//!
//! This crate has **no** internal dependencies on other TickGate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
