//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a default so an empty file is valid.

pub mod app;
pub mod auth;
pub mod cache;
pub mod logging;
pub mod rate_limit;
pub mod realtime;
pub mod upstream;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::{AuthConfig, ValidatorKind};
pub use self::cache::{CacheConfig, MemoryCacheConfig, RedisCacheConfig};
pub use self::logging::LoggingConfig;
pub use self::rate_limit::{FailurePolicy, RateLimitConfig};
pub use self::realtime::RealtimeConfig;
pub use self::upstream::UpstreamConfig;

use crate::error::AppError;

/// Environment variable prefix for overrides (`TICKGATE__SERVER__PORT=9000`).
pub const ENV_PREFIX: &str = "TICKGATE";

/// Root application configuration.
///
/// Assembled once at startup and handed to each component's constructor.
/// Nothing mutates it afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Authentication settings.
    pub auth: AuthConfig,
    /// Shared counting store settings.
    pub cache: CacheConfig,
    /// Rate limiting settings.
    pub rate_limit: RateLimitConfig,
    /// Realtime hub and session settings.
    pub realtime: RealtimeConfig,
    /// Downstream domain services.
    pub upstreams: UpstreamConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `base` (e.g. `config/default`), the environment overlay
    /// `config/{env}`, and environment variables prefixed with `TICKGATE`.
    /// Missing files are skipped.
    pub fn load(base: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        parsed.validate()?;
        Ok(parsed)
    }

    /// Reject values that would make a component unusable.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.realtime.session_queue_capacity == 0 {
            return Err(AppError::configuration(
                "realtime.session_queue_capacity must be greater than zero",
            ));
        }
        if self.realtime.hub_channel_capacity == 0 {
            return Err(AppError::configuration(
                "realtime.hub_channel_capacity must be greater than zero",
            ));
        }
        let timings = [
            ("realtime.ping_interval_seconds", self.realtime.ping_interval_seconds),
            ("realtime.idle_timeout_seconds", self.realtime.idle_timeout_seconds),
            ("realtime.write_timeout_seconds", self.realtime.write_timeout_seconds),
        ];
        if let Some((name, _)) = timings.iter().find(|(_, secs)| *secs == 0) {
            return Err(AppError::configuration(format!(
                "{name} must be greater than zero"
            )));
        }
        if self.rate_limit.enabled && self.rate_limit.window_seconds == 0 {
            return Err(AppError::configuration(
                "rate_limit.window_seconds must be greater than zero",
            ));
        }
        if self.auth.validator == ValidatorKind::Jwt && self.auth.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        Ok(())
    }
}
