//! Sliding-window admission decisions.
//!
//! The limiter holds no counters of its own. Every check is a single
//! [`RateStore::slide`] call, so any number of gateway instances sharing a
//! store enforce one limit per key.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use tickgate_core::config::{FailurePolicy, RateLimitConfig};
use tickgate_core::traits::{RateStore, WindowEntry};

use super::key::RateLimitKey;

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Admitted; `remaining` calls are left in the current window.
    Allowed { remaining: u64 },
    /// Over the limit.
    Limited { retry_after: Duration },
    /// The store failed and policy says answer 503.
    StoreUnavailable,
    /// The store failed and policy says let the call through.
    FailedOpen,
}

impl RateDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Allowed { .. } | Self::FailedOpen)
    }
}

/// Sliding-window log limiter over a shared [`RateStore`].
#[derive(Debug, Clone)]
pub struct SlidingWindowLimiter {
    store: Arc<dyn RateStore>,
    max_requests: u64,
    window: Duration,
    failure_policy: FailurePolicy,
    key_prefix: String,
}

impl SlidingWindowLimiter {
    pub fn new(store: Arc<dyn RateStore>, config: &RateLimitConfig) -> Self {
        Self {
            store,
            max_requests: config.max_requests,
            window: config.window(),
            failure_policy: config.failure_policy,
            key_prefix: config.key_prefix.clone(),
        }
    }

    /// Window length; also the retry hint on denial.
    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_requests(&self) -> u64 {
        self.max_requests
    }

    /// Check `key` at the current wall-clock time.
    pub async fn check(&self, key: &RateLimitKey) -> RateDecision {
        self.check_at(key, Utc::now().timestamp_micros()).await
    }

    /// Check `key` as if the call happened at `now_micros`.
    pub async fn check_at(&self, key: &RateLimitKey, now_micros: i64) -> RateDecision {
        let storage_key = key.storage_key(&self.key_prefix);
        let entry = WindowEntry::at(now_micros);

        match self.store.slide(&storage_key, entry, self.window).await {
            Ok(count) if count < self.max_requests => RateDecision::Allowed {
                remaining: self.max_requests - count - 1,
            },
            Ok(count) => {
                debug!(key = %key, count, limit = self.max_requests, "Rate limit exceeded");
                RateDecision::Limited {
                    retry_after: self.window,
                }
            }
            Err(e) => {
                warn!(key = %key, error = %e, policy = ?self.failure_policy, "Rate store unavailable");
                match self.failure_policy {
                    FailurePolicy::Deny => RateDecision::Limited {
                        retry_after: self.window,
                    },
                    FailurePolicy::Unavailable => RateDecision::StoreUnavailable,
                    FailurePolicy::Allow => RateDecision::FailedOpen,
                }
            }
        }
    }
}
