//! Shared counting store used by the sliding-window rate limiter.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;

/// One admission attempt recorded against a key.
///
/// `id` disambiguates entries that share a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowEntry {
    /// Unique member identifier.
    pub id: Uuid,
    /// Entry time in microseconds since the Unix epoch.
    pub timestamp_micros: i64,
}

impl WindowEntry {
    /// Create an entry at the given time with a fresh identifier.
    pub fn at(timestamp_micros: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp_micros,
        }
    }
}

/// Store backing the sliding-window log.
///
/// Implementations must perform [`RateStore::slide`] as one indivisible
/// step with respect to other callers on the same key, across every
/// gateway instance sharing the store.
#[async_trait]
pub trait RateStore: Send + Sync + std::fmt::Debug + 'static {
    /// Atomically:
    /// 1. remove entries of `key` older than `entry.timestamp_micros - window`,
    /// 2. count what remains,
    /// 3. insert `entry`,
    /// 4. set the key's expiry to `window`.
    ///
    /// Returns the count from step 2, i.e. before this entry was added.
    async fn slide(&self, key: &str, entry: WindowEntry, window: Duration) -> AppResult<u64>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
