//! Shared handle to one session.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use tickgate_core::types::{Principal, SessionId};

use super::state::{CloseReason, Lifecycle, SessionState};

/// Identity and lifecycle of one connection.
///
/// Held by the hub's registry and by both pumps. The outbound queue's
/// sender is deliberately not here; only the hub owns it.
#[derive(Debug)]
pub struct SessionHandle {
    pub id: SessionId,
    pub principal: Principal,
    pub connected_at: DateTime<Utc>,
    lifecycle: Lifecycle,
    close_reason: OnceLock<CloseReason>,
    cancel: CancellationToken,
}

impl SessionHandle {
    /// Create an active session. `cancel` is normally a child of the hub's
    /// token so shutdown reaches every session.
    pub fn new(principal: Principal, cancel: CancellationToken) -> Self {
        Self {
            id: SessionId::new(),
            principal,
            connected_at: Utc::now(),
            lifecycle: Lifecycle::new(),
            close_reason: OnceLock::new(),
            cancel,
        }
    }

    pub fn state(&self) -> SessionState {
        self.lifecycle.state()
    }

    pub fn is_active(&self) -> bool {
        self.state() == SessionState::Active
    }

    /// Move to `Closing` and stop both pumps.
    ///
    /// Returns `true` if this call won the transition.
    pub fn close(&self, reason: CloseReason) -> bool {
        let won = self.lifecycle.begin_close();
        if won {
            let _ = self.close_reason.set(reason);
            debug!(session_id = %self.id, principal = %self.principal.id, %reason, "Session closing");
        }
        self.cancel.cancel();
        won
    }

    /// Reason given by the close that won, if any. A session cancelled
    /// through its parent token has none.
    pub fn close_reason(&self) -> Option<CloseReason> {
        self.close_reason.get().copied()
    }

    /// Resolves once the session has been told to stop.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) fn pump_finished(&self) -> bool {
        let closed = self.lifecycle.pump_finished();
        if closed {
            debug!(session_id = %self.id, "Session closed");
        }
        closed
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id,
            principal_id: self.principal.id.clone(),
            connected_at: self.connected_at,
            state: self.state(),
        }
    }
}

/// Snapshot of session info (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub principal_id: String,
    pub connected_at: DateTime<Utc>,
    pub state: SessionState,
}
