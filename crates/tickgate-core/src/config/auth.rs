//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Which token validator backs the auth gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKind {
    /// HS256 JSON Web Tokens signed with `jwt_secret`.
    Jwt,
    /// Fixed development token (`valid-token` → `user-123`).
    Static,
}

/// Authentication and token validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Validator backing the gate.
    #[serde(default = "default_validator")]
    pub validator: ValidatorKind,
    /// Secret key for JWT verification (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Expected `iss` claim; unchecked when empty.
    #[serde(default)]
    pub jwt_issuer: String,
    /// Allowed clock skew in seconds when checking `exp`.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// Lifetime of development tokens minted by the CLI, in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            validator: default_validator(),
            jwt_secret: default_jwt_secret(),
            jwt_issuer: String::new(),
            leeway_seconds: default_leeway(),
            access_ttl_minutes: default_access_ttl(),
        }
    }
}

fn default_validator() -> ValidatorKind {
    ValidatorKind::Jwt
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_leeway() -> u64 {
    5
}

fn default_access_ttl() -> u64 {
    60
}
