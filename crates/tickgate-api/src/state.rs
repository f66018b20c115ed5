//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use tickgate_auth::{AuthGate, SlidingWindowLimiter};
use tickgate_core::config::AppConfig;
use tickgate_core::result::AppResult;
use tickgate_core::traits::RateStore;
use tickgate_realtime::RealtimeEngine;

use crate::upstream::UpstreamClient;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Bearer token gate
    pub auth_gate: Arc<AuthGate>,
    /// Sliding-window limiter
    pub rate_limiter: Arc<SlidingWindowLimiter>,
    /// Store behind the limiter, for health reporting
    pub rate_store: Arc<dyn RateStore>,
    /// Provider name of `rate_store`
    pub rate_store_name: &'static str,
    /// WebSocket realtime engine
    pub realtime: Arc<RealtimeEngine>,
    /// Domain service proxy
    pub upstream: Arc<UpstreamClient>,
    /// Process start time
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Assemble state around already-initialized components.
    pub fn new(
        config: Arc<AppConfig>,
        auth_gate: AuthGate,
        rate_store: Arc<dyn RateStore>,
        rate_store_name: &'static str,
        realtime: Arc<RealtimeEngine>,
    ) -> AppResult<Self> {
        let rate_limiter = SlidingWindowLimiter::new(rate_store.clone(), &config.rate_limit);
        let upstream = UpstreamClient::new(&config.upstreams, config.server.request_timeout_seconds)?;

        Ok(Self {
            config,
            auth_gate: Arc::new(auth_gate),
            rate_limiter: Arc::new(rate_limiter),
            rate_store,
            rate_store_name,
            realtime,
            upstream: Arc::new(upstream),
            started_at: Utc::now(),
        })
    }
}
