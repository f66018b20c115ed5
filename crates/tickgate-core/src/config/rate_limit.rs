//! Rate limiting configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What the limiter does when the shared store cannot complete a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Deny with `429`, same as an exceeded limit.
    Deny,
    /// Deny with `503 Service Unavailable`.
    Unavailable,
    /// Admit the request and log the failure.
    Allow,
}

/// Sliding-window rate limit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether protected routes are rate limited at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Requests admitted per key within one window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u64,
    /// Window width in seconds.
    #[serde(default = "default_window")]
    pub window_seconds: u64,
    /// Behavior when the store is unreachable.
    #[serde(default = "default_failure_policy")]
    pub failure_policy: FailurePolicy,
    /// Prefix for rate-limit keys (appended to the store's own prefix).
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl RateLimitConfig {
    /// Window width as a [`Duration`].
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: default_max_requests(),
            window_seconds: default_window(),
            failure_policy: default_failure_policy(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_requests() -> u64 {
    100
}

fn default_window() -> u64 {
    60
}

fn default_failure_policy() -> FailurePolicy {
    FailurePolicy::Deny
}

fn default_key_prefix() -> String {
    "rate_limit:".to_string()
}
