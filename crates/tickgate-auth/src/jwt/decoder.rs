//! HS256 token validation.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use tickgate_core::config::AuthConfig;
use tickgate_core::traits::{AuthError, TokenValidator};
use tickgate_core::types::Claims;

use super::claims::TokenClaims;

/// Validates HS256 tokens signed with the configured secret.
#[derive(Clone)]
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtValidator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtValidator {
    /// Creates a validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if !config.jwt_issuer.is_empty() {
            validation.set_issuer(&[config.jwt_issuer.as_str()]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    fn decode_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}

#[async_trait]
impl TokenValidator for JwtValidator {
    async fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let wire = self.decode_token(token)?;
        Claims::try_from(wire)
    }
}
