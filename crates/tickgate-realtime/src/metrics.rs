//! Hub counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Monotonic counters updated by the hub coordinator.
#[derive(Debug, Default)]
pub struct HubMetrics {
    /// Sessions added to the registry.
    pub registered: AtomicU64,
    /// Sessions removed by an unregister request.
    pub unregistered: AtomicU64,
    /// Sessions removed during a broadcast pass.
    pub evicted: AtomicU64,
    /// Broadcast passes completed.
    pub broadcasts: AtomicU64,
    /// Messages enqueued onto session queues.
    pub delivered: AtomicU64,
}

impl HubMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    /// Get a snapshot of all counters.
    pub fn snapshot(&self) -> HubMetricsSnapshot {
        let registered = self.registered.load(Ordering::Relaxed);
        let unregistered = self.unregistered.load(Ordering::Relaxed);
        let evicted = self.evicted.load(Ordering::Relaxed);
        HubMetricsSnapshot {
            registered,
            unregistered,
            evicted,
            active: registered.saturating_sub(unregistered + evicted),
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubMetricsSnapshot {
    pub registered: u64,
    pub unregistered: u64,
    pub evicted: u64,
    /// `registered - unregistered - evicted`
    pub active: u64,
    pub broadcasts: u64,
    pub delivered: u64,
}
