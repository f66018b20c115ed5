//! Broadcast ingress.

use axum::Json;
use axum::extract::State;
use tracing::info;

use tickgate_core::error::AppError;
use tickgate_realtime::Envelope;

use crate::dto::{BroadcastRequest, BroadcastResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/v1/broadcast
///
/// Wraps the event in an envelope and fans it out to every live session.
pub async fn broadcast(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<BroadcastRequest>,
) -> Result<Json<BroadcastResponse>, ApiError> {
    if req.kind.trim().is_empty() {
        return Err(AppError::validation("Event type must not be empty").into());
    }

    let envelope = Envelope::new(req.kind, req.payload);
    let report = state.realtime.broadcast(&envelope).await?;

    info!(
        principal = %user.principal_id,
        event_type = %envelope.kind,
        delivered = report.delivered,
        evicted = report.evicted,
        "Broadcast dispatched"
    );

    Ok(Json(BroadcastResponse {
        delivered: report.delivered,
        evicted: report.evicted,
    }))
}
