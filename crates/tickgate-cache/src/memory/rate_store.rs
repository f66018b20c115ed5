//! Single-node sliding-window log.
//!
//! Every key owns a small vector of entries. The `DashMap` entry guard
//! holds the shard's write lock for the whole trim/count/insert step, which
//! gives the same per-key atomicity the Redis pipeline provides.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use tickgate_core::result::AppResult;
use tickgate_core::traits::{RateStore, WindowEntry};

#[derive(Debug, Default)]
struct WindowLog {
    entries: Vec<WindowEntry>,
    /// Key expiry in microseconds; only ever moves forward.
    expires_at_micros: i64,
}

/// In-memory [`RateStore`].
#[derive(Debug, Default)]
pub struct MemoryRateStore {
    logs: DashMap<String, WindowLog>,
}

impl MemoryRateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop keys whose expiry passed before `now_micros`. Returns how many
    /// keys were removed.
    pub fn sweep_expired(&self, now_micros: i64) -> usize {
        let before = self.logs.len();
        self.logs.retain(|_, log| log.expires_at_micros > now_micros);
        let removed = before.saturating_sub(self.logs.len());
        if removed > 0 {
            debug!(removed, "Swept expired rate windows");
        }
        removed
    }

    /// Number of keys currently tracked.
    pub fn key_count(&self) -> usize {
        self.logs.len()
    }
}

#[async_trait]
impl RateStore for MemoryRateStore {
    async fn slide(&self, key: &str, entry: WindowEntry, window: Duration) -> AppResult<u64> {
        let window_micros = i64::try_from(window.as_micros()).unwrap_or(i64::MAX);
        let floor = entry.timestamp_micros.saturating_sub(window_micros);

        let mut log = self.logs.entry(key.to_string()).or_default();
        if log.expires_at_micros < entry.timestamp_micros {
            log.entries.clear();
        }
        log.entries.retain(|e| e.timestamp_micros >= floor);
        let count = log.entries.len() as u64;
        log.entries.push(entry);
        // A late-arriving older timestamp must not pull the expiry back.
        log.expires_at_micros = log
            .expires_at_micros
            .max(entry.timestamp_micros.saturating_add(window_micros));

        Ok(count)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
