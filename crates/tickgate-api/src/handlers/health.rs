//! Health check handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;

use crate::dto::{DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().timestamp(),
    })
}

/// GET /health/detailed
///
/// 503 when the hub coordinator is down; a failing rate store only
/// degrades the status.
pub async fn health_detailed(
    State(state): State<AppState>,
) -> (StatusCode, Json<DetailedHealthResponse>) {
    let now = Utc::now();
    let hub = state.realtime.hub();
    let hub_running = state.realtime.is_healthy();
    let sessions = if hub_running {
        hub.snapshot().await.ok().map(|s| s.len())
    } else {
        None
    };
    let rate_store_reachable = state.rate_store.health_check().await.unwrap_or(false);

    let (status, code) = if !hub_running {
        ("unhealthy", StatusCode::SERVICE_UNAVAILABLE)
    } else if !rate_store_reachable {
        ("degraded", StatusCode::OK)
    } else {
        ("healthy", StatusCode::OK)
    };

    let body = DetailedHealthResponse {
        status: status.to_string(),
        timestamp: now.timestamp(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: (now - state.started_at).num_seconds(),
        hub_running,
        sessions,
        hub: hub.metrics(),
        rate_store: state.rate_store_name.to_string(),
        rate_store_reachable,
    };

    (code, Json(body))
}
