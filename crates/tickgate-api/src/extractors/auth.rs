//! `AuthUser` extractor: the claims attached by the auth middleware.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use tickgate_core::error::AppError;
use tickgate_core::types::Claims;

use crate::error::ApiError;

/// Authenticated principal of the current request.
///
/// Only available on routes behind
/// [`require_auth`](crate::middleware::auth::require_auth).
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl std::ops::Deref for AuthUser {
    type Target = Claims;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError(AppError::authentication("Missing claims")))
    }
}
