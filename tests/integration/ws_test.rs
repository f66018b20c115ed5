//! Integration tests for WebSocket sessions and broadcast fan-out.

mod helpers;

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use helpers::{DEV_TOKEN, TestApp, bearer};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(addr: SocketAddr, auth: Option<&str>, origin: Option<&str>) -> Result<Client, WsError> {
    let mut request = format!("ws://{addr}/api/v1/ws").into_client_request()?;
    if let Some(auth) = auth {
        request
            .headers_mut()
            .insert("Authorization", HeaderValue::from_str(auth).unwrap());
    }
    if let Some(origin) = origin {
        request
            .headers_mut()
            .insert("Origin", HeaderValue::from_str(origin).unwrap());
    }
    let (client, _) = tokio_tungstenite::connect_async(request).await?;
    Ok(client)
}

/// Next text frame, skipping control frames.
async fn next_text(client: &mut Client) -> Value {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match client.next().await {
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str::<Value>(text.as_str()).unwrap();
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                other => panic!("unexpected frame: {other:?}"),
            }
        }
    })
    .await
    .expect("no message within 5s")
}

fn rejected_status(err: WsError) -> u16 {
    match err {
        WsError::Http(response) => response.status().as_u16(),
        other => panic!("expected an HTTP rejection, got {other}"),
    }
}

#[tokio::test]
async fn test_upgrade_without_token_rejected() {
    let app = TestApp::new().await;
    let addr = app.spawn().await;

    let err = connect(addr, None, None).await.unwrap_err();

    assert_eq!(rejected_status(err), 401);
    app.wait_for_sessions(0).await;
}

#[tokio::test]
async fn test_upgrade_from_foreign_origin_rejected() {
    let app = TestApp::with_config(|c| {
        c.realtime.allowed_origins = vec!["https://app.example.com".to_string()];
    })
    .await;
    let addr = app.spawn().await;
    let auth = bearer(DEV_TOKEN);

    let err = connect(addr, Some(&auth), Some("https://evil.example.net"))
        .await
        .unwrap_err();
    assert_eq!(rejected_status(err), 403);

    let client = connect(addr, Some(&auth), Some("https://app.example.com")).await;
    assert!(client.is_ok());
}

#[tokio::test]
async fn test_broadcast_reaches_every_session() {
    let app = TestApp::new().await;
    let addr = app.spawn().await;
    let auth = bearer(DEV_TOKEN);

    let mut a = connect(addr, Some(&auth), None).await.unwrap();
    let mut b = connect(addr, Some(&auth), None).await.unwrap();
    app.wait_for_sessions(2).await;

    let response = app
        .request(
            "POST",
            "/api/v1/broadcast",
            Some(json!({ "type": "price", "payload": { "symbol": "AAPL", "last": 187.5 } })),
            Some(&auth),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["delivered"], 2);
    assert_eq!(response.body["evicted"], 0);

    for client in [&mut a, &mut b] {
        let event = next_text(client).await;
        assert_eq!(event["type"], "price");
        assert_eq!(event["payload"]["symbol"], "AAPL");
        assert!(event["timestamp"].is_string() || event["timestamp"].is_number());
    }
}

#[tokio::test]
async fn test_broadcasts_arrive_in_order() {
    let app = TestApp::new().await;
    let addr = app.spawn().await;
    let auth = bearer(DEV_TOKEN);

    let mut client = connect(addr, Some(&auth), None).await.unwrap();
    app.wait_for_sessions(1).await;

    for seq in 0..5 {
        app.request(
            "POST",
            "/api/v1/broadcast",
            Some(json!({ "type": "tick", "payload": { "seq": seq } })),
            Some(&auth),
        )
        .await;
    }

    for seq in 0..5 {
        let event = next_text(&mut client).await;
        assert_eq!(event["payload"]["seq"], seq);
    }
}

#[tokio::test]
async fn test_client_close_unregisters_session() {
    let app = TestApp::new().await;
    let addr = app.spawn().await;
    let auth = bearer(DEV_TOKEN);

    let mut client = connect(addr, Some(&auth), None).await.unwrap();
    app.wait_for_sessions(1).await;

    client.close(None).await.unwrap();
    app.wait_for_sessions(0).await;

    let response = app
        .request(
            "POST",
            "/api/v1/broadcast",
            Some(json!({ "type": "price", "payload": {} })),
            Some(&auth),
        )
        .await;
    assert_eq!(response.body["delivered"], 0);
}

#[tokio::test]
async fn test_dropped_connection_unregisters_session() {
    let app = TestApp::new().await;
    let addr = app.spawn().await;

    let client = connect(addr, Some(&bearer(DEV_TOKEN)), None).await.unwrap();
    app.wait_for_sessions(1).await;

    drop(client);
    app.wait_for_sessions(0).await;
}

#[tokio::test]
async fn test_shutdown_closes_sessions() {
    let app = TestApp::new().await;
    let addr = app.spawn().await;

    let mut client = connect(addr, Some(&bearer(DEV_TOKEN)), None).await.unwrap();
    app.wait_for_sessions(1).await;

    app.state.realtime.shutdown().await;

    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match client.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(closed.is_ok(), "session was not closed on shutdown");
}

#[tokio::test]
async fn test_empty_event_type_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/v1/broadcast",
            Some(json!({ "type": "  ", "payload": {} })),
            Some(&bearer(DEV_TOKEN)),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
