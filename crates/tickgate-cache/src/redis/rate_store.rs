//! Sliding-window log on a Redis sorted set.
//!
//! Each key is a ZSET whose members are entry ids scored by their
//! timestamp in microseconds. One `MULTI/EXEC` pipeline trims, counts,
//! inserts and refreshes the TTL, so concurrent gateways never interleave
//! between the count and the insert.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use tickgate_core::error::{AppError, ErrorKind};
use tickgate_core::result::AppResult;
use tickgate_core::traits::{RateStore, WindowEntry};

use super::client::RedisClient;

/// Redis-backed [`RateStore`].
#[derive(Debug, Clone)]
pub struct RedisRateStore {
    client: RedisClient,
}

impl RedisRateStore {
    /// Create a store on top of a connected client.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }

    fn timed_out(op: &str) -> AppError {
        AppError::cache(format!("Redis {op} timed out"))
    }
}

#[async_trait]
impl RateStore for RedisRateStore {
    async fn slide(&self, key: &str, entry: WindowEntry, window: Duration) -> AppResult<u64> {
        let full_key = self.client.prefixed_key(key);
        let window_micros = i64::try_from(window.as_micros()).unwrap_or(i64::MAX);
        let window_millis = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
        // Exclusive bound: entries exactly at the floor still count.
        let floor = format!("({}", entry.timestamp_micros.saturating_sub(window_micros));

        let mut conn = self.client.conn_mut();
        let mut pipe = redis::pipe();
        pipe.atomic()
            .zrembyscore(&full_key, "-inf", floor)
            .ignore()
            .zcard(&full_key)
            .zadd(&full_key, entry.id.to_string(), entry.timestamp_micros)
            .ignore()
            .pexpire(&full_key, window_millis)
            .ignore();

        let query = pipe.query_async::<(u64,)>(&mut conn);
        let (count,) = tokio::time::timeout(self.client.response_timeout(), query)
            .await
            .map_err(|_| Self::timed_out("pipeline"))?
            .map_err(Self::map_err)?;

        debug!(key = %full_key, count, "Slid rate window");
        Ok(count)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let cmd = redis::cmd("PING");
        let ping = cmd.query_async::<String>(&mut conn);
        let pong = tokio::time::timeout(self.client.response_timeout(), ping)
            .await
            .map_err(|_| Self::timed_out("PING"))?
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
