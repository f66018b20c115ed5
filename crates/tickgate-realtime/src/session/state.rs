//! Session lifecycle: `Active -> Closing -> Closed`.
//!
//! Every path that can end a session races on one compare-and-set. The
//! first to leave `Active` owns the close; `Closed` is entered once, by
//! whichever pump finishes last.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

const ACTIVE: u8 = 0;
const CLOSING: u8 = 1;
const CLOSED: u8 = 2;

/// Number of pumps driving one session.
const PUMPS: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Closing,
    Closed,
}

/// Why a session began closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Queue was full during a broadcast.
    Evicted,
    /// Removed from the hub by request.
    Unregistered,
    /// Client sent a close frame or the stream ended.
    ClientClosed,
    ReadError,
    WriteError,
    IdleTimeout,
    TokenExpired,
    Shutdown,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Evicted => "evicted",
            Self::Unregistered => "unregistered",
            Self::ClientClosed => "client_closed",
            Self::ReadError => "read_error",
            Self::WriteError => "write_error",
            Self::IdleTimeout => "idle_timeout",
            Self::TokenExpired => "token_expired",
            Self::Shutdown => "shutdown",
        };
        f.write_str(s)
    }
}

/// Atomic lifecycle cell shared by a session's pumps and the hub.
#[derive(Debug)]
pub struct Lifecycle {
    state: AtomicU8,
    pumps_running: AtomicU8,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(ACTIVE),
            pumps_running: AtomicU8::new(PUMPS),
        }
    }

    pub fn state(&self) -> SessionState {
        match self.state.load(Ordering::Acquire) {
            ACTIVE => SessionState::Active,
            CLOSING => SessionState::Closing,
            _ => SessionState::Closed,
        }
    }

    /// `Active -> Closing`. Returns `true` for the single winning caller.
    pub fn begin_close(&self) -> bool {
        self.state
            .compare_exchange(ACTIVE, CLOSING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Record that one pump has returned. Returns `true` exactly once,
    /// when the last pump finishes and the session becomes `Closed`.
    pub fn pump_finished(&self) -> bool {
        let previous = self
            .pumps_running
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        if previous != Ok(1) {
            return false;
        }
        self.begin_close();
        self.state
            .compare_exchange(CLOSING, CLOSED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
