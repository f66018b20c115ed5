//! Token validator selection.

pub mod static_token;

use std::sync::Arc;

use tracing::{info, warn};

use tickgate_core::config::{AuthConfig, ValidatorKind};
use tickgate_core::traits::TokenValidator;

use crate::jwt::JwtValidator;

pub use static_token::StaticTokenValidator;

/// Build the validator named by `config.validator`.
pub fn build_validator(config: &AuthConfig) -> Arc<dyn TokenValidator> {
    match config.validator {
        ValidatorKind::Jwt => {
            info!(issuer = %config.jwt_issuer, "Using JWT token validator");
            Arc::new(JwtValidator::new(config))
        }
        ValidatorKind::Static => {
            warn!("Using static development token validator; do not enable in production");
            Arc::new(StaticTokenValidator::with_defaults())
        }
    }
}
