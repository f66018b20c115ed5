//! Rate store manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use tickgate_core::config::CacheConfig;
use tickgate_core::error::AppError;
use tickgate_core::result::AppResult;
use tickgate_core::traits::{RateStore, WindowEntry};

/// Wraps the configured [`RateStore`].
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct RateStoreManager {
    inner: Arc<dyn RateStore>,
    provider: &'static str,
    #[cfg(feature = "memory")]
    memory: Option<Arc<crate::memory::MemoryRateStore>>,
    sweep_interval: Duration,
}

impl RateStoreManager {
    /// Build the store named by `config.provider`.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let sweep_interval = Duration::from_secs(config.memory.sweep_interval_seconds.max(1));

        match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis rate store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Ok(Self {
                    inner: Arc::new(crate::redis::RedisRateStore::new(client)),
                    provider: "redis",
                    #[cfg(feature = "memory")]
                    memory: None,
                    sweep_interval,
                })
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory rate store");
                let store = Arc::new(crate::memory::MemoryRateStore::new());
                Ok(Self {
                    inner: store.clone(),
                    provider: "memory",
                    memory: Some(store),
                    sweep_interval,
                })
            }
            other => Err(AppError::configuration(format!(
                "Unknown rate store provider: '{other}'. Supported: memory, redis"
            ))),
        }
    }

    /// Wrap an existing store (for testing).
    pub fn from_store(store: Arc<dyn RateStore>) -> Self {
        Self {
            inner: store,
            provider: "custom",
            #[cfg(feature = "memory")]
            memory: None,
            sweep_interval: Duration::from_secs(60),
        }
    }

    /// Name of the active provider.
    pub fn provider_name(&self) -> &'static str {
        self.provider
    }

    /// Start the background sweeper for the in-memory store.
    ///
    /// Returns `None` for stores that expire keys themselves.
    pub fn spawn_maintenance(&self, cancel: CancellationToken) -> Option<JoinHandle<()>> {
        #[cfg(feature = "memory")]
        {
            let store = self.memory.clone()?;
            let interval = self.sweep_interval;
            Some(tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.tick().await;
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = ticker.tick() => {
                            store.sweep_expired(chrono::Utc::now().timestamp_micros());
                        }
                    }
                }
                debug!("Rate store sweeper stopped");
            }))
        }
        #[cfg(not(feature = "memory"))]
        {
            let _ = cancel;
            None
        }
    }
}

#[async_trait]
impl RateStore for RateStoreManager {
    async fn slide(&self, key: &str, entry: WindowEntry, window: Duration) -> AppResult<u64> {
        self.inner.slide(key, entry, window).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
