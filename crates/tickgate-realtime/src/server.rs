//! Top-level realtime engine: starts the hub, watches it, and runs
//! sessions on top of it.

use std::fmt::Display;
use std::sync::Arc;

use futures::{Sink, Stream};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use tickgate_core::config::RealtimeConfig;
use tickgate_core::error::AppError;
use tickgate_core::result::AppResult;
use tickgate_core::types::{Claims, SessionId};

use crate::hub::{BroadcastReport, Hub, HubHandle};
use crate::message::Envelope;
use crate::session::{Frame, PumpConfig, SessionHandle, run_inbound, run_outbound};

/// Central realtime engine.
pub struct RealtimeEngine {
    hub: HubHandle,
    config: RealtimeConfig,
    /// Stops the hub; child of the process-wide token.
    cancel: CancellationToken,
    supervisor: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("hub_running", &self.hub.is_running())
            .finish()
    }
}

impl RealtimeEngine {
    /// Start the hub under `root`.
    ///
    /// Cancelling `root` stops the hub and every session. If the hub stops
    /// on its own, `root` is cancelled so the whole process shuts down.
    pub fn start(config: RealtimeConfig, root: CancellationToken) -> Self {
        let cancel = root.child_token();
        let (hub, task) = Hub::spawn(&config, cancel.clone());
        let supervisor = tokio::spawn(supervise(task, cancel.clone(), root));

        info!(
            queue_capacity = config.session_queue_capacity,
            ping_interval_secs = config.ping_interval_seconds,
            idle_timeout_secs = config.idle_timeout_seconds,
            "Realtime engine initialized"
        );

        Self {
            hub,
            config,
            cancel,
            supervisor: Mutex::new(Some(supervisor)),
        }
    }

    pub fn hub(&self) -> &HubHandle {
        &self.hub
    }

    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Whether the hub coordinator is still running.
    pub fn is_healthy(&self) -> bool {
        self.hub.is_running()
    }

    /// Fan an event out to every live session.
    pub async fn broadcast(&self, envelope: &Envelope) -> AppResult<BroadcastReport> {
        let payload = envelope.encode()?;
        self.hub.broadcast(payload).await
    }

    /// Register a session for `claims` and pump frames until it closes.
    ///
    /// `sink` and `stream` are the two halves of an upgraded connection.
    pub async fn serve_session<W, R, E>(
        &self,
        claims: &Claims,
        sink: W,
        stream: R,
    ) -> AppResult<SessionId>
    where
        W: Sink<Frame> + Unpin,
        W::Error: Display,
        R: Stream<Item = Result<Frame, E>> + Unpin,
        E: Display,
    {
        let session = Arc::new(SessionHandle::new(claims.principal(), self.cancel.child_token()));
        let (tx, rx) = mpsc::channel(self.config.session_queue_capacity.max(1));

        if !self.hub.register(session.clone(), tx).await? {
            return Err(AppError::session(format!(
                "Session {} is already registered",
                session.id
            )));
        }
        info!(session_id = %session.id, principal = %session.principal.id, "Session opened");

        let config = PumpConfig::new(&self.config, claims);
        tokio::join!(
            run_outbound(session.clone(), rx, sink, self.hub.clone(), config),
            run_inbound(session.clone(), stream, self.hub.clone(), config),
        );

        info!(session_id = %session.id, state = ?session.state(), "Session ended");
        Ok(session.id)
    }

    /// Stop the hub and wait for it to finish closing sessions.
    pub async fn shutdown(&self) {
        info!("Shutting down realtime engine");
        self.cancel.cancel();
        if let Some(task) = self.supervisor.lock().await.take() {
            let _ = task.await;
        }
        info!("Realtime engine shut down");
    }
}

async fn supervise(task: JoinHandle<()>, cancel: CancellationToken, root: CancellationToken) {
    let outcome = task.await;
    if cancel.is_cancelled() {
        return;
    }
    match outcome {
        Ok(()) => error!("Connection hub exited unexpectedly; shutting down"),
        Err(e) => error!(error = %e, "Connection hub crashed; shutting down"),
    }
    root.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use futures::channel::mpsc as fmpsc;
    use tickgate_core::types::Claims;

    fn claims() -> Claims {
        let now = chrono::Utc::now();
        Claims {
            principal_id: "user-123".into(),
            email: "user@example.com".into(),
            issued_at: now,
            expires_at: now + chrono::Duration::hours(1),
        }
    }

    async fn wait_for_sessions(engine: &RealtimeEngine, n: usize) {
        while engine.hub().snapshot().await.unwrap().len() != n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_session_receives_broadcast_and_closes() {
        let engine = Arc::new(RealtimeEngine::start(
            RealtimeConfig::default(),
            CancellationToken::new(),
        ));
        let (sink, mut client_rx) = fmpsc::unbounded::<Frame>();
        let (client_tx, stream) = fmpsc::unbounded::<Result<Frame, String>>();

        let task = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.serve_session(&claims(), sink, stream).await })
        };
        wait_for_sessions(&engine, 1).await;

        let report = engine
            .broadcast(&Envelope::new("price_update", serde_json::json!({"symbol": "MSFT"})))
            .await
            .unwrap();
        assert_eq!(report, BroadcastReport { delivered: 1, evicted: 0 });

        match client_rx.next().await.unwrap() {
            Frame::Text(text) => assert!(text.contains("\"price_update\"")),
            other => panic!("unexpected frame {other:?}"),
        }

        client_tx.unbounded_send(Ok(Frame::Close)).unwrap();
        task.await.unwrap().unwrap();

        assert!(engine.hub().snapshot().await.unwrap().is_empty());
        assert_eq!(engine.hub().metrics().unregistered, 1);
    }

    #[tokio::test]
    async fn test_shutdown_stops_hub_without_cancelling_root() {
        let root = CancellationToken::new();
        let engine = RealtimeEngine::start(RealtimeConfig::default(), root.clone());
        assert!(engine.is_healthy());

        engine.shutdown().await;
        assert!(!engine.is_healthy());
        assert!(!root.is_cancelled());
    }

    #[tokio::test]
    async fn test_root_cancel_ends_open_sessions() {
        let root = CancellationToken::new();
        let engine = Arc::new(RealtimeEngine::start(RealtimeConfig::default(), root.clone()));
        let (sink, client_rx) = fmpsc::unbounded::<Frame>();
        let (_client_tx, stream) = fmpsc::unbounded::<Result<Frame, String>>();

        let task = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.serve_session(&claims(), sink, stream).await })
        };
        wait_for_sessions(&engine, 1).await;

        root.cancel();
        task.await.unwrap().unwrap();

        let frames: Vec<Frame> = client_rx.collect().await;
        assert!(frames.iter().any(Frame::is_close));
    }

    #[tokio::test]
    async fn test_unexpected_hub_exit_cancels_root() {
        let root = CancellationToken::new();
        let hub_task = tokio::spawn(async {});
        supervise(hub_task, root.child_token(), root.clone()).await;
        assert!(root.is_cancelled());
    }
}
