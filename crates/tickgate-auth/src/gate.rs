//! The bearer authentication gate.
//!
//! Accepts exactly `Bearer <token>`: the scheme is case-sensitive, one
//! space separates it from a non-empty token, and the token holds no
//! further spaces. Anything else is rejected before the validator runs.

use std::sync::Arc;

use tickgate_core::traits::{AuthError, TokenValidator};
use tickgate_core::types::Claims;

const SCHEME: &str = "Bearer";

/// Extract the token from an `Authorization` header value.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.ok_or(AuthError::MissingHeader)?;
    let (scheme, token) = value.split_once(' ').ok_or(AuthError::MalformedHeader)?;

    if scheme != SCHEME || token.is_empty() || token.contains(' ') {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}

/// Turns an `Authorization` header into validated [`Claims`].
#[derive(Debug, Clone)]
pub struct AuthGate {
    validator: Arc<dyn TokenValidator>,
}

impl AuthGate {
    pub fn new(validator: Arc<dyn TokenValidator>) -> Self {
        Self { validator }
    }

    /// Parse, validate, and re-check expiry.
    ///
    /// The expiry check runs without leeway even if the validator applied
    /// some.
    pub async fn authenticate(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let token = parse_bearer(header)?;
        let claims = self.validator.validate(token).await?;
        if claims.is_expired() {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }
}
