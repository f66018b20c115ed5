//! The coordinator task.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tickgate_core::config::RealtimeConfig;
use tickgate_core::types::SessionId;

use super::command::{Broadcast, BroadcastReport, HubSnapshot, Query, Register, Unregister};
use super::handle::HubHandle;
use crate::message::Payload;
use crate::metrics::HubMetrics;
use crate::session::{CloseReason, SessionHandle};

struct Member {
    handle: Arc<SessionHandle>,
    sender: mpsc::Sender<Payload>,
}

/// Owner of the session registry.
pub struct Hub {
    members: HashMap<SessionId, Member>,
    register_rx: mpsc::Receiver<Register>,
    unregister_rx: mpsc::Receiver<Unregister>,
    broadcast_rx: mpsc::Receiver<Broadcast>,
    query_rx: mpsc::Receiver<Query>,
    metrics: Arc<HubMetrics>,
    cancel: CancellationToken,
}

impl Hub {
    /// Start the coordinator. It runs until `cancel` fires.
    pub fn spawn(config: &RealtimeConfig, cancel: CancellationToken) -> (HubHandle, JoinHandle<()>) {
        let capacity = config.hub_channel_capacity.max(1);
        let (register_tx, register_rx) = mpsc::channel(capacity);
        let (unregister_tx, unregister_rx) = mpsc::channel(capacity);
        let (broadcast_tx, broadcast_rx) = mpsc::channel(capacity);
        let (query_tx, query_rx) = mpsc::channel(capacity);
        let metrics = Arc::new(HubMetrics::new());

        let hub = Self {
            members: HashMap::new(),
            register_rx,
            unregister_rx,
            broadcast_rx,
            query_rx,
            metrics: metrics.clone(),
            cancel,
        };
        let handle = HubHandle {
            register_tx,
            unregister_tx,
            broadcast_tx,
            query_tx,
            metrics,
        };

        (handle, tokio::spawn(hub.run()))
    }

    async fn run(mut self) {
        info!("Connection hub started");
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                Some(cmd) = self.register_rx.recv() => self.register(cmd),
                Some(cmd) = self.unregister_rx.recv() => self.unregister(cmd),
                Some(cmd) = self.broadcast_rx.recv() => self.broadcast(cmd),
                Some(query) = self.query_rx.recv() => self.query(query),
                else => break,
            }
        }
        self.shutdown();
    }

    fn register(&mut self, Register { handle, sender, ack }: Register) {
        let id = handle.id;
        let added = !self.members.contains_key(&id);
        if added {
            debug!(session_id = %id, principal = %handle.principal.id, "Session registered");
            self.members.insert(id, Member { handle, sender });
            HubMetrics::inc(&self.metrics.registered);
        }
        let _ = ack.send(added);
    }

    fn unregister(&mut self, Unregister { id, ack }: Unregister) {
        // Dropping the member drops the only sender, closing the queue.
        let removed = match self.members.remove(&id) {
            Some(member) => {
                member.handle.close(CloseReason::Unregistered);
                HubMetrics::inc(&self.metrics.unregistered);
                debug!(session_id = %id, "Session unregistered");
                true
            }
            None => false,
        };
        let _ = ack.send(removed);
    }

    fn broadcast(&mut self, Broadcast { payload, reply }: Broadcast) {
        let mut report = BroadcastReport::default();
        let mut evict = Vec::new();

        for (id, member) in &self.members {
            match member.sender.try_send(payload.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(session_id = %id, "Session queue full, evicting");
                    evict.push(*id);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(session_id = %id, "Session queue already closed, evicting");
                    evict.push(*id);
                }
            }
        }

        for id in evict {
            if let Some(member) = self.members.remove(&id) {
                member.handle.close(CloseReason::Evicted);
                report.evicted += 1;
            }
        }

        HubMetrics::inc(&self.metrics.broadcasts);
        HubMetrics::add(&self.metrics.delivered, report.delivered as u64);
        HubMetrics::add(&self.metrics.evicted, report.evicted as u64);
        let _ = reply.send(report);
    }

    fn query(&self, query: Query) {
        match query {
            Query::Snapshot(reply) => {
                let sessions = self.members.values().map(|m| m.handle.info()).collect();
                let _ = reply.send(HubSnapshot { sessions });
            }
        }
    }

    fn shutdown(&mut self) {
        let count = self.members.len();
        for (_, member) in self.members.drain() {
            member.handle.close(CloseReason::Shutdown);
        }
        info!(sessions = count, "Connection hub stopped");
    }
}
