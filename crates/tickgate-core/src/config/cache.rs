//! Shared counting store configuration.

use serde::{Deserialize, Serialize};

/// Top-level store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Store provider type: `"memory"` or `"redis"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Redis-specific configuration.
    #[serde(default)]
    pub redis: RedisCacheConfig,
    /// In-memory store configuration.
    #[serde(default)]
    pub memory: MemoryCacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            redis: RedisCacheConfig::default(),
            memory: MemoryCacheConfig::default(),
        }
    }
}

/// Redis backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisCacheConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Key prefix for all TickGate keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Timeout for a single store round trip in milliseconds.
    #[serde(default = "default_response_timeout")]
    pub response_timeout_ms: u64,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
            response_timeout_ms: default_response_timeout(),
        }
    }
}

/// In-memory backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Interval between sweeps of expired keys, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "tickgate:".to_string()
}

fn default_response_timeout() -> u64 {
    500
}

fn default_sweep_interval() -> u64 {
    60
}
