//! Fixed token table for local development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use tickgate_core::traits::{AuthError, TokenValidator};
use tickgate_core::types::{Claims, Principal};

/// Token accepted by [`StaticTokenValidator::with_defaults`].
pub const DEV_TOKEN: &str = "valid-token";

/// Accepts a fixed set of opaque tokens.
///
/// Each accepted token yields claims that expire `ttl` after the call.
#[derive(Debug, Clone)]
pub struct StaticTokenValidator {
    tokens: HashMap<String, Principal>,
    ttl: Duration,
}

impl StaticTokenValidator {
    /// An empty table.
    pub fn new(ttl: Duration) -> Self {
        Self {
            tokens: HashMap::new(),
            ttl,
        }
    }

    /// `valid-token` mapped to `user-123` / `user@example.com`, one hour TTL.
    pub fn with_defaults() -> Self {
        Self::new(Duration::hours(1)).with_token(
            DEV_TOKEN,
            Principal {
                id: "user-123".into(),
                email: "user@example.com".into(),
            },
        )
    }

    /// Add (or replace) an accepted token.
    pub fn with_token(mut self, token: impl Into<String>, principal: Principal) -> Self {
        self.tokens.insert(token.into(), principal);
        self
    }
}

#[async_trait]
impl TokenValidator for StaticTokenValidator {
    async fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let principal = self
            .tokens
            .get(token)
            .ok_or_else(|| AuthError::InvalidToken("unknown token".into()))?;

        let now = Utc::now();
        Ok(Claims {
            principal_id: principal.id.clone(),
            email: principal.email.clone(),
            issued_at: now,
            expires_at: now + self.ttl,
        })
    }
}
