//! Messages accepted by the hub coordinator.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use tickgate_core::types::SessionId;

use crate::message::Payload;
use crate::session::{SessionHandle, SessionInfo};

pub(crate) struct Register {
    pub handle: Arc<SessionHandle>,
    /// Sending half of the session queue; the hub becomes its only owner.
    pub sender: mpsc::Sender<Payload>,
    pub ack: oneshot::Sender<bool>,
}

pub(crate) struct Unregister {
    pub id: SessionId,
    pub ack: oneshot::Sender<bool>,
}

pub(crate) struct Broadcast {
    pub payload: Payload,
    pub reply: oneshot::Sender<BroadcastReport>,
}

/// Read-only requests; these never change membership.
pub(crate) enum Query {
    Snapshot(oneshot::Sender<HubSnapshot>),
}

/// Outcome of one broadcast pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastReport {
    /// Sessions the message was enqueued for.
    pub delivered: usize,
    /// Sessions removed because their queue could not take the message.
    pub evicted: usize,
}

/// Registry contents at one point in the coordinator's timeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HubSnapshot {
    pub sessions: Vec<SessionInfo>,
}

impl HubSnapshot {
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.iter().any(|s| s.id == id)
    }
}
