//! Client side of the hub.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use tickgate_core::error::AppError;
use tickgate_core::result::AppResult;
use tickgate_core::types::SessionId;

use super::command::{Broadcast, BroadcastReport, HubSnapshot, Query, Register, Unregister};
use crate::message::Payload;
use crate::metrics::{HubMetrics, HubMetricsSnapshot};
use crate::session::SessionHandle;

/// Cheap, cloneable handle for talking to the hub coordinator.
#[derive(Debug, Clone)]
pub struct HubHandle {
    pub(super) register_tx: mpsc::Sender<Register>,
    pub(super) unregister_tx: mpsc::Sender<Unregister>,
    pub(super) broadcast_tx: mpsc::Sender<Broadcast>,
    pub(super) query_tx: mpsc::Sender<Query>,
    pub(super) metrics: Arc<HubMetrics>,
}

fn hub_stopped() -> AppError {
    AppError::service_unavailable("Connection hub is not running")
}

impl HubHandle {
    /// Add a session. The hub takes ownership of `sender`.
    ///
    /// Returns `false` if a session with the same id is already present;
    /// the existing membership is left untouched.
    pub async fn register(
        &self,
        handle: Arc<SessionHandle>,
        sender: mpsc::Sender<Payload>,
    ) -> AppResult<bool> {
        let (ack, rx) = oneshot::channel();
        self.register_tx
            .send(Register {
                handle,
                sender,
                ack,
            })
            .await
            .map_err(|_| hub_stopped())?;
        rx.await.map_err(|_| hub_stopped())
    }

    /// Remove a session and close its queue. Returns `false` if it was not
    /// registered.
    pub async fn unregister(&self, id: SessionId) -> AppResult<bool> {
        let (ack, rx) = oneshot::channel();
        self.unregister_tx
            .send(Unregister { id, ack })
            .await
            .map_err(|_| hub_stopped())?;
        rx.await.map_err(|_| hub_stopped())
    }

    /// Enqueue `payload` for every session and wait for the pass to finish.
    pub async fn broadcast(&self, payload: Payload) -> AppResult<BroadcastReport> {
        let (reply, rx) = oneshot::channel();
        self.broadcast_tx
            .send(Broadcast { payload, reply })
            .await
            .map_err(|_| hub_stopped())?;
        rx.await.map_err(|_| hub_stopped())
    }

    pub async fn snapshot(&self) -> AppResult<HubSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.query_tx
            .send(Query::Snapshot(tx))
            .await
            .map_err(|_| hub_stopped())?;
        rx.await.map_err(|_| hub_stopped())
    }

    /// `false` once the coordinator has exited for any reason.
    pub fn is_running(&self) -> bool {
        !self.register_tx.is_closed()
    }

    pub fn metrics(&self) -> HubMetricsSnapshot {
        self.metrics.snapshot()
    }
}
