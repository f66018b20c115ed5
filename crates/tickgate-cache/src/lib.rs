//! # tickgate-cache
//!
//! Shared counting stores for the sliding-window rate limiter:
//!
//! - **memory**: single-node store, per-key log guarded by a `DashMap` shard lock
//! - **redis**: multi-node store using one `MULTI/EXEC` pipeline per check
//!
//! The store is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::RateStoreManager;
