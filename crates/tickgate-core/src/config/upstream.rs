//! Downstream domain service endpoints.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base URLs of the domain services the gateway proxies to.
///
/// A service left unset answers `501 Not Implemented`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Auth service (login, register, refresh).
    #[serde(default)]
    pub auth: Option<String>,
    /// Dashboard service.
    #[serde(default)]
    pub dashboards: Option<String>,
    /// Analytics engine.
    #[serde(default)]
    pub analytics: Option<String>,
    /// User service (profile, preferences).
    #[serde(default)]
    pub users: Option<String>,
    /// Watchlist service.
    #[serde(default)]
    pub watchlists: Option<String>,
    /// Alert service.
    #[serde(default)]
    pub alerts: Option<String>,
    /// Per-call timeout in seconds; falls back to the server request timeout.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl UpstreamConfig {
    /// Effective per-call timeout.
    pub fn timeout(&self, fallback_seconds: u64) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(fallback_seconds))
    }
}
