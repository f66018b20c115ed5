//! Redis store implementation.

pub mod client;
pub mod rate_store;

pub use client::RedisClient;
pub use rate_store::RedisRateStore;
