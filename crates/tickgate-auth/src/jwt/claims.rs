//! Claims as they appear inside a signed token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tickgate_core::traits::AuthError;
use tickgate_core::types::Claims;

/// JWT payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject, the principal id.
    pub sub: String,
    /// Principal email.
    pub email: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
    /// Issuer, when the deployment configures one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl TryFrom<TokenClaims> for Claims {
    type Error = AuthError;

    fn try_from(wire: TokenClaims) -> Result<Self, Self::Error> {
        if wire.sub.is_empty() {
            return Err(AuthError::InvalidToken("empty subject".into()));
        }
        let issued_at = DateTime::<Utc>::from_timestamp(wire.iat, 0)
            .ok_or_else(|| AuthError::InvalidToken("iat out of range".into()))?;
        let expires_at = DateTime::<Utc>::from_timestamp(wire.exp, 0)
            .ok_or_else(|| AuthError::InvalidToken("exp out of range".into()))?;

        Ok(Claims {
            principal_id: wire.sub,
            email: wire.email,
            issued_at,
            expires_at,
        })
    }
}
