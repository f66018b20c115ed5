//! Per-principal, per-route rate limiting.
//!
//! Runs after [`require_auth`](super::auth::require_auth) so the principal
//! is known.

use axum::Json;
use axum::extract::{MatchedPath, Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use tickgate_auth::{RateDecision, RateLimitKey};
use tickgate_core::error::AppError;
use tickgate_core::types::Claims;

use crate::dto::{ErrorBody, RateLimitedBody};
use crate::error::ApiError;
use crate::state::AppState;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";

pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.config.rate_limit.enabled {
        return Ok(next.run(request).await);
    }

    let principal_id = request
        .extensions()
        .get::<Claims>()
        .map(|c| c.principal_id.clone())
        .ok_or_else(|| ApiError(AppError::authentication("No principal for rate limiting")))?;
    let matched = request.extensions().get::<MatchedPath>().map(MatchedPath::as_str);
    let key = RateLimitKey::new(principal_id, matched, request.uri().path());

    match state.rate_limiter.check(&key).await {
        RateDecision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert(LIMIT_HEADER, HeaderValue::from(state.rate_limiter.max_requests()));
            headers.insert(REMAINING_HEADER, HeaderValue::from(remaining));
            Ok(response)
        }
        RateDecision::FailedOpen => Ok(next.run(request).await),
        RateDecision::Limited { retry_after } => Ok(too_many_requests(retry_after.as_secs())),
        RateDecision::StoreUnavailable => Ok((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorBody::new("Rate limiter unavailable")),
        )
            .into_response()),
    }
}

fn too_many_requests(retry_after: u64) -> Response {
    let body = RateLimitedBody {
        error: "Rate limit exceeded".to_string(),
        retry_after,
    };
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, HeaderValue::from(retry_after))],
        Json(body),
    )
        .into_response()
}
