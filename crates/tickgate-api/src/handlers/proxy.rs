//! Domain routes forwarded to upstream services.

use axum::body::{Body, to_bytes};
use axum::extract::{OriginalUri, Request, State};
use axum::response::Response;

use tickgate_core::error::AppError;
use tickgate_core::types::Claims;

use crate::error::ApiError;
use crate::state::AppState;
use crate::upstream::{ProxyRequest, Service};

/// Largest request body forwarded upstream.
pub(crate) const MAX_PROXY_BODY: usize = 2 * 1024 * 1024;

async fn forward(state: AppState, service: Service, request: Request) -> Result<Response<Body>, ApiError> {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, MAX_PROXY_BODY)
        .await
        .map_err(|e| AppError::validation(format!("Request body rejected: {e}")))?;
    // Upstreams see the full public path, not the nested remainder.
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map(|o| &o.0)
        .unwrap_or(&parts.uri);
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    let response = state
        .upstream
        .forward(
            service,
            ProxyRequest {
                method: parts.method.clone(),
                path_and_query,
                headers: &parts.headers,
                body,
                claims: parts.extensions.get::<Claims>(),
            },
        )
        .await?;
    Ok(response)
}

/// /api/v1/auth/*
pub async fn auth(State(state): State<AppState>, request: Request) -> Result<Response, ApiError> {
    forward(state, Service::Auth, request).await
}

/// /api/v1/dashboards/*
pub async fn dashboards(State(state): State<AppState>, request: Request) -> Result<Response, ApiError> {
    forward(state, Service::Dashboards, request).await
}

/// /api/v1/analytics/*
pub async fn analytics(State(state): State<AppState>, request: Request) -> Result<Response, ApiError> {
    forward(state, Service::Analytics, request).await
}

/// /api/v1/users/*
pub async fn users(State(state): State<AppState>, request: Request) -> Result<Response, ApiError> {
    forward(state, Service::Users, request).await
}

/// /api/v1/watchlists/*
pub async fn watchlists(State(state): State<AppState>, request: Request) -> Result<Response, ApiError> {
    forward(state, Service::Watchlists, request).await
}

/// /api/v1/alerts/*
pub async fn alerts(State(state): State<AppState>, request: Request) -> Result<Response, ApiError> {
    forward(state, Service::Alerts, request).await
}
