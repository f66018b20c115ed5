//! Response DTOs.

use serde::{Deserialize, Serialize};

use tickgate_realtime::metrics::HubMetricsSnapshot;

/// `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// `{"error": "Rate limit exceeded", "retry_after": 60}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitedBody {
    pub error: String,
    /// Seconds until the window has fully slid.
    pub retry_after: u64,
}

/// `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Unix seconds.
    pub timestamp: i64,
}

/// `GET /health/detailed`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// `healthy`, `degraded` (rate store unreachable) or `unhealthy` (hub down).
    pub status: String,
    pub timestamp: i64,
    pub version: String,
    pub uptime_seconds: i64,
    pub hub_running: bool,
    /// Live sessions according to the hub; absent when the hub is down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions: Option<usize>,
    pub hub: HubMetricsSnapshot,
    pub rate_store: String,
    pub rate_store_reachable: bool,
}

/// Result of a broadcast pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BroadcastResponse {
    pub delivered: usize,
    pub evicted: usize,
}
