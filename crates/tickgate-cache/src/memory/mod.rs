//! In-memory store implementation.

pub mod rate_store;

pub use rate_store::MemoryRateStore;
