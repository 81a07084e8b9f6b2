/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for qrng-api tests

#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use qrng_api::StreamEvent;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-api-key";
const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Canonical successful /api/random body
pub fn entropy_body(data: &str) -> serde_json::Value {
    serde_json::json!({
        "data": data,
        "proofId": "proof-abc",
        "signature": "c2lnbmF0dXJl",
        "publicKey": "cHVibGljLWtleQ==",
        "signatureType": "ed25519",
        "metadata": {"method": "photon"}
    })
}

/// What the scripted server observed for one connection
#[derive(Debug, Clone)]
pub struct Handshake {
    pub uri: String,
    pub auth: serde_json::Value,
}

/// What the scripted server does after replaying its frames
#[derive(Debug, Clone)]
pub enum Finish {
    /// Send a close frame
    Close,
    /// Resend the frame every 20ms until the client goes away
    Repeat(WsMessage),
}

/// Spawn a WebSocket server that replays `script` to every connection
///
/// Returns the `ws://` base URL and a channel of observed handshakes.
pub async fn spawn_ws_server(
    script: Vec<WsMessage>,
    finish: Finish,
) -> (String, mpsc::UnboundedReceiver<Handshake>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind ws server");
    let addr = listener.local_addr().expect("local addr");
    let (seen_tx, seen_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let script = script.clone();
            let finish = finish.clone();
            let seen_tx = seen_tx.clone();
            tokio::spawn(async move {
                let mut uri = String::new();
                let callback = |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
                    uri = req.uri().to_string();
                    Ok(resp)
                };
                let Ok(mut ws) = accept_hdr_async(stream, callback).await else {
                    return;
                };

                let auth = match ws.next().await {
                    Some(Ok(WsMessage::Text(text))) => {
                        serde_json::from_str(text.as_str()).unwrap_or(serde_json::Value::Null)
                    }
                    _ => return,
                };
                let _ = seen_tx.send(Handshake { uri, auth });

                for frame in script {
                    if ws.send(frame).await.is_err() {
                        return;
                    }
                }

                match finish {
                    Finish::Close => {
                        let _ = ws.send(WsMessage::Close(None)).await;
                        while let Some(Ok(_)) = ws.next().await {}
                    }
                    Finish::Repeat(frame) => loop {
                        if ws.send(frame.clone()).await.is_err() {
                            return;
                        }
                        tokio::time::sleep(Duration::from_millis(20)).await;
                    },
                }
            });
        }
    });

    (format!("ws://{addr}"), seen_rx)
}

pub fn text(frame: &str) -> WsMessage {
    WsMessage::text(frame.to_string())
}

/// Next handler event, failing the test if none arrives in time
pub async fn next_event(rx: &mut mpsc::UnboundedReceiver<StreamEvent>) -> StreamEvent {
    tokio::time::timeout(EVENT_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for stream event")
        .expect("stream event channel closed")
}

pub async fn next_handshake(rx: &mut mpsc::UnboundedReceiver<Handshake>) -> Handshake {
    tokio::time::timeout(EVENT_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for handshake")
        .expect("handshake channel closed")
}

/// A local port with nothing listening on it
pub async fn dead_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    port
}
