//! Realtime (WebSocket) configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Realtime hub and session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Capacity of each session's outbound queue. A full queue gets the
    /// session evicted on the next broadcast.
    #[serde(default = "default_session_queue")]
    pub session_queue_capacity: usize,
    /// Capacity of each hub command channel.
    #[serde(default = "default_hub_channel")]
    pub hub_channel_capacity: usize,
    /// Server ping interval in seconds.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// A session with no inbound frame for this long is closed.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Upper bound on a single transport write, in seconds.
    #[serde(default = "default_write_timeout")]
    pub write_timeout_seconds: u64,
    /// Close live sessions when their token expires.
    #[serde(default = "default_true")]
    pub close_on_token_expiry: bool,
    /// Origins allowed to open a socket. `"*"` allows all; empty means
    /// same-origin only. Requests without an `Origin` header are allowed.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// Maximum inbound frame size in bytes.
    #[serde(default = "default_max_frame")]
    pub max_frame_bytes: usize,
}

impl RealtimeConfig {
    /// Ping interval as a [`Duration`].
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_seconds)
    }

    /// Idle timeout as a [`Duration`].
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_seconds)
    }

    /// Write timeout as a [`Duration`].
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_seconds)
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            session_queue_capacity: default_session_queue(),
            hub_channel_capacity: default_hub_channel(),
            ping_interval_seconds: default_ping_interval(),
            idle_timeout_seconds: default_idle_timeout(),
            write_timeout_seconds: default_write_timeout(),
            close_on_token_expiry: true,
            allowed_origins: Vec::new(),
            max_frame_bytes: default_max_frame(),
        }
    }
}

fn default_session_queue() -> usize {
    256
}

fn default_hub_channel() -> usize {
    1024
}

fn default_ping_interval() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    90
}

fn default_write_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_max_frame() -> usize {
    64 * 1024
}
