//! Token minting for development and tests.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use tickgate_core::config::AuthConfig;
use tickgate_core::error::AppError;
use tickgate_core::types::Principal;

use super::claims::TokenClaims;

/// Creates HS256 tokens accepted by [`JwtValidator`](super::JwtValidator).
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    issuer: Option<String>,
    default_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

/// A freshly minted token.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IssuedToken {
    /// Compact JWS string.
    pub token: String,
    /// Expiration instant.
    pub expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates an encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let minutes = i64::try_from(config.access_ttl_minutes).unwrap_or(i64::MAX / 60);
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: (!config.jwt_issuer.is_empty()).then(|| config.jwt_issuer.clone()),
            default_ttl: Duration::minutes(minutes),
        }
    }

    /// Mints a token with the configured access TTL.
    pub fn issue_default(&self, principal: &Principal) -> Result<IssuedToken, AppError> {
        self.issue(principal, self.default_ttl)
    }

    /// Mints a token for `principal` that expires after `ttl`.
    pub fn issue(&self, principal: &Principal, ttl: Duration) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = TokenClaims {
            sub: principal.id.clone(),
            email: principal.email.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok(IssuedToken { token, expires_at })
    }
}
