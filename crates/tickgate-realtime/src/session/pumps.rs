//! Inbound and outbound pumps for one session.
//!
//! Both are generic over the transport so the same code drives axum
//! sockets and in-process channels.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

use tickgate_core::config::RealtimeConfig;
use tickgate_core::types::Claims;

use super::frame::Frame;
use super::handle::SessionHandle;
use super::state::CloseReason;
use crate::hub::HubHandle;
use crate::message::Payload;

/// Timing for one session's pumps.
#[derive(Debug, Clone, Copy)]
pub struct PumpConfig {
    pub ping_interval: Duration,
    pub idle_timeout: Duration,
    pub write_timeout: Duration,
    /// Close the session at this instant (token expiry).
    pub deadline: Option<Instant>,
}

impl PumpConfig {
    /// Timings from configuration, with the deadline taken from `claims`
    /// when sessions close on token expiry.
    pub fn new(config: &RealtimeConfig, claims: &Claims) -> Self {
        Self {
            ping_interval: config.ping_interval(),
            idle_timeout: config.idle_timeout(),
            write_timeout: config.write_timeout(),
            deadline: config
                .close_on_token_expiry
                .then(|| Instant::now() + claims.remaining()),
        }
    }
}

async fn write_frame<W>(sink: &mut W, frame: Frame, limit: Duration) -> Result<(), String>
where
    W: Sink<Frame> + Unpin,
    W::Error: Display,
{
    match tokio::time::timeout(limit, sink.send(frame)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("write timed out after {limit:?}")),
    }
}

/// Drain the session queue onto the transport and keep the peer alive
/// with pings.
///
/// Ends when the hub closes the queue, the session is cancelled, or a
/// write fails. A failed write unregisters the session. Messages already
/// queued are written before a cancellation takes effect, and a close
/// frame is attempted on the way out.
pub async fn run_outbound<W>(
    session: Arc<SessionHandle>,
    mut queue: mpsc::Receiver<Payload>,
    mut sink: W,
    hub: HubHandle,
    config: PumpConfig,
) where
    W: Sink<Frame> + Unpin,
    W::Error: Display,
{
    let mut ping = tokio::time::interval_at(
        Instant::now() + config.ping_interval,
        config.ping_interval,
    );
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let reason = loop {
        tokio::select! {
            // Already-queued messages go out before cancellation is seen.
            biased;
            next = queue.recv() => match next {
                Some(payload) => {
                    if let Err(e) = write_frame(&mut sink, Frame::Text(payload), config.write_timeout).await {
                        warn!(session_id = %session.id, error = %e, "Session write failed");
                        break CloseReason::WriteError;
                    }
                }
                None => break session.close_reason().unwrap_or(CloseReason::Unregistered),
            },
            _ = session.cancelled() => break session.close_reason().unwrap_or(CloseReason::Shutdown),
            _ = ping.tick() => {
                if let Err(e) = write_frame(&mut sink, Frame::Ping(Bytes::new()), config.write_timeout).await {
                    warn!(session_id = %session.id, error = %e, "Session ping failed");
                    break CloseReason::WriteError;
                }
                trace!(session_id = %session.id, "Ping sent");
            }
        }
    };

    if reason == CloseReason::WriteError {
        if let Err(e) = hub.unregister(session.id).await {
            debug!(session_id = %session.id, error = %e, "Unregister after write failure skipped");
        }
    }
    session.close(reason);

    let _ = write_frame(&mut sink, Frame::Close, config.write_timeout).await;
    let _ = tokio::time::timeout(config.write_timeout, sink.close()).await;

    session.pump_finished();
}

/// Read frames from the peer until the connection should end.
///
/// Every exit path unregisters the session.
pub async fn run_inbound<R, E>(
    session: Arc<SessionHandle>,
    mut stream: R,
    hub: HubHandle,
    config: PumpConfig,
) where
    R: Stream<Item = Result<Frame, E>> + Unpin,
    E: Display,
{
    let expiry = async {
        match config.deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(expiry);

    let reason = loop {
        tokio::select! {
            _ = session.cancelled() => break session.close_reason().unwrap_or(CloseReason::Shutdown),
            _ = &mut expiry => break CloseReason::TokenExpired,
            next = tokio::time::timeout(config.idle_timeout, stream.next()) => match next {
                Err(_) => break CloseReason::IdleTimeout,
                Ok(None) | Ok(Some(Ok(Frame::Close))) => break CloseReason::ClientClosed,
                Ok(Some(Err(e))) => {
                    debug!(session_id = %session.id, error = %e, "Session read failed");
                    break CloseReason::ReadError;
                }
                Ok(Some(Ok(Frame::Text(text)))) => {
                    trace!(session_id = %session.id, len = text.len(), "Client message ignored");
                }
                Ok(Some(Ok(_))) => {}
            },
        }
    };

    if let Err(e) = hub.unregister(session.id).await {
        debug!(session_id = %session.id, error = %e, "Unregister skipped");
    }
    session.close(reason);
    session.pump_finished();
}
