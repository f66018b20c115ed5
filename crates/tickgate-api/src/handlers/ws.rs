//! WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::http::header::{HOST, ORIGIN};
use axum::response::Response;
use futures::{SinkExt, StreamExt, future};
use tracing::{error, warn};

use tickgate_core::error::AppError;
use tickgate_core::types::Claims;
use tickgate_realtime::Frame;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Decide whether a browser `Origin` may open a socket.
///
/// Requests without `Origin` come from non-browser clients and pass.
/// `*` in the allow-list admits everything. Otherwise the origin must be
/// listed verbatim or name the same host the request was sent to.
pub fn origin_allowed(allowed: &[String], origin: Option<&str>, host: Option<&str>) -> bool {
    let Some(origin) = origin else {
        return true;
    };
    if allowed.iter().any(|a| a == "*" || a.eq_ignore_ascii_case(origin)) {
        return true;
    }
    let origin_host = origin
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(origin)
        .trim_end_matches('/');
    matches!(host, Some(h) if h.eq_ignore_ascii_case(origin_host))
}

/// GET /api/v1/ws
pub async fn ws_upgrade(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let origin = headers.get(ORIGIN).and_then(|v| v.to_str().ok());
    let host = headers.get(HOST).and_then(|v| v.to_str().ok());
    if !origin_allowed(&state.config.realtime.allowed_origins, origin, host) {
        warn!(origin = ?origin, principal = %claims.principal_id, "WebSocket origin rejected");
        return Err(AppError::authorization("Origin not allowed").into());
    }

    let max_frame = state.config.realtime.max_frame_bytes;
    Ok(ws
        .max_message_size(max_frame)
        .max_frame_size(max_frame)
        .on_failed_upgrade(|e| warn!(error = %e, "WebSocket upgrade failed"))
        .on_upgrade(move |socket| serve_socket(state.realtime.clone(), claims, socket)))
}

async fn serve_socket(
    engine: Arc<tickgate_realtime::RealtimeEngine>,
    claims: Claims,
    socket: WebSocket,
) {
    let (sink, stream) = socket.split();
    let sink = sink.with(|frame: Frame| future::ready(Ok::<_, axum::Error>(to_message(frame))));
    let stream = stream.map(|msg| msg.map(to_frame));

    if let Err(e) = engine.serve_session(&claims, Box::pin(sink), stream).await {
        error!(principal = %claims.principal_id, error = %e, "WebSocket session failed");
    }
}

fn to_message(frame: Frame) -> Message {
    match frame {
        Frame::Text(text) => Message::Text(text.to_string().into()),
        Frame::Binary(data) => Message::Binary(data),
        Frame::Ping(data) => Message::Ping(data),
        Frame::Pong(data) => Message::Pong(data),
        Frame::Close => Message::Close(None),
    }
}

fn to_frame(message: Message) -> Frame {
    match message {
        Message::Text(text) => Frame::Text(text.as_str().into()),
        Message::Binary(data) => Frame::Binary(data),
        Message::Ping(data) => Frame::Ping(data),
        Message::Pong(data) => Frame::Pong(data),
        Message::Close(_) => Frame::Close,
    }
}
