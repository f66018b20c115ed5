//! Token validation capability.

use async_trait::async_trait;
use thiserror::Error;

use crate::error::AppError;
use crate::types::Claims;

/// Every way an authentication attempt can fail.
///
/// The variants exist for logging only; callers of the gate see one
/// uniform rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header was sent.
    #[error("authorization header missing")]
    MissingHeader,
    /// The header is not of the form `Bearer <token>`.
    #[error("authorization header malformed")]
    MalformedHeader,
    /// The token failed validation (signature, format, issuer, revoked).
    #[error("token invalid: {0}")]
    InvalidToken(String),
    /// The token was valid but has expired.
    #[error("token expired")]
    Expired,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::with_source(
            crate::error::ErrorKind::Authentication,
            "Unauthorized",
            err,
        )
    }
}

/// Validates bearer tokens and produces claims.
///
/// Signature, revocation and refresh logic belong to the implementation;
/// the gate treats it as opaque.
#[async_trait]
pub trait TokenValidator: Send + Sync + std::fmt::Debug + 'static {
    /// Validate `token` and return the claims it carries.
    async fn validate(&self, token: &str) -> Result<Claims, AuthError>;
}
