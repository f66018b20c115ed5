//! Bearer authentication middleware.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use tickgate_core::error::AppError;
use tickgate_core::traits::AuthError;

use crate::error::ApiError;
use crate::state::AppState;

/// Reject requests without valid credentials; otherwise attach the
/// [`Claims`](tickgate_core::types::Claims) to request extensions.
///
/// Every failure produces the same 401 body. The cause is only logged.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match request.headers().get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| reject(AuthError::MalformedHeader))?),
        None => None,
    };

    let claims = state.auth_gate.authenticate(header).await.map_err(reject)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

fn reject(reason: AuthError) -> ApiError {
    debug!(%reason, "Authentication rejected");
    ApiError(AppError::from(reason))
}
