/*
[INPUT]:  WebSocket base URL, API key, StreamOptions and a StreamHandler
[OUTPUT]: Entropy chunks, errors and close notifications via the handler
[POS]:    WebSocket layer - session lifecycle (connect, auth, relay, disconnect)
[UPDATE]: When changing connection logic or reconnect policy
*/

use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::QrngError;
use crate::types::StreamOptions;
use crate::ws::handler::StreamHandler;
use crate::ws::message::StreamFrame;

pub const DEFAULT_STREAM_URL: &str = "wss://qrngapi.com";
const RAW_LOG_MAX_BYTES: usize = 1024;

/// Lifecycle of a stream session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Disconnected,
    Connecting,
    Authenticating,
    Streaming,
    Closed,
}

#[derive(Debug)]
struct Session {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// WebSocket client for the live entropy stream
///
/// Holds at most one session. Calling `connect` again closes the previous
/// session before opening the new one.
pub struct QrngStreamClient {
    api_key: String,
    base_url: String,
    session: Option<Session>,
    state: Arc<watch::Sender<StreamState>>,
}

impl QrngStreamClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_STREAM_URL)
    }

    /// A leading `http` scheme is rewritten to `ws` (`https` becomes `wss`)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl AsRef<str>) -> Self {
        let (state, _) = watch::channel(StreamState::Disconnected);
        Self {
            api_key: api_key.into(),
            base_url: to_ws_scheme(base_url.as_ref()),
            session: None,
            state: Arc::new(state),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn state(&self) -> StreamState {
        *self.state.borrow()
    }

    /// Watch state transitions of the current and future sessions
    pub fn subscribe_state(&self) -> watch::Receiver<StreamState> {
        self.state.subscribe()
    }

    pub fn is_connected(&self) -> bool {
        matches!(
            self.state(),
            StreamState::Connecting | StreamState::Authenticating | StreamState::Streaming
        )
    }

    /// Full socket target for the given options
    pub fn stream_url(&self, options: &StreamOptions) -> String {
        format!(
            "{}/api/stream?chunkSize={}&format={}",
            self.base_url.trim_end_matches('/'),
            options.chunk_size,
            options.format.as_str()
        )
    }

    /// Open a stream session
    ///
    /// Returns once the session task is spawned; connection failures are
    /// reported through `handler.on_error` followed by `handler.on_close`.
    /// Must be called from within a Tokio runtime.
    pub async fn connect<H: StreamHandler>(&mut self, options: StreamOptions, handler: H) {
        if self.session.is_some() {
            info!("replacing existing stream session");
            self.teardown().await;
        }

        let url = self.stream_url(&options);
        info!(
            chunk_size = options.chunk_size,
            format = options.format.as_str(),
            "connecting entropy stream"
        );

        self.state.send_replace(StreamState::Connecting);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_session(
            url,
            self.api_key.clone(),
            handler,
            cancel.clone(),
            self.state.clone(),
        ));
        self.session = Some(Session { cancel, handle });
    }

    /// Close the session if one is held; no handler method fires afterwards
    pub async fn disconnect(&mut self) {
        if self.session.is_none() {
            return;
        }
        self.teardown().await;
        self.state.send_replace(StreamState::Closed);
        info!("entropy stream disconnected");
    }

    async fn teardown(&mut self) {
        if let Some(session) = self.session.take() {
            session.cancel.cancel();
            if let Err(err) = session.handle.await {
                warn!(error = %err, "stream session task ended abnormally");
            }
        }
    }
}

impl std::fmt::Debug for QrngStreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrngStreamClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("state", &self.state())
            .finish()
    }
}

impl Drop for QrngStreamClient {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            session.cancel.cancel();
        }
    }
}

fn to_ws_scheme(base_url: &str) -> String {
    match base_url.strip_prefix("http") {
        Some(rest) => format!("ws{rest}"),
        None => base_url.to_string(),
    }
}

async fn run_session<H: StreamHandler>(
    url: String,
    api_key: String,
    mut handler: H,
    cancel: CancellationToken,
    state: Arc<watch::Sender<StreamState>>,
) {
    let connected = tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        result = connect_async(url.as_str()) => result,
    };

    let mut socket = match connected {
        Ok((socket, _response)) => socket,
        Err(err) => {
            warn!(error = %err, "stream connection failed");
            if !cancel.is_cancelled() {
                finish(&mut handler, &state, Some(QrngError::websocket(err.to_string())));
            }
            return;
        }
    };

    state.send_replace(StreamState::Authenticating);
    let auth = serde_json::json!({ "apiKey": api_key }).to_string();
    if let Err(err) = socket.send(WsMessage::Text(auth.into())).await {
        warn!(error = %err, "stream auth frame failed");
        if !cancel.is_cancelled() {
            finish(&mut handler, &state, Some(QrngError::websocket(err.to_string())));
        }
        return;
    }
    state.send_replace(StreamState::Streaming);
    debug!("stream auth frame sent");

    loop {
        let incoming = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                let _ = socket.send(WsMessage::Close(None)).await;
                return;
            }
            incoming = socket.next() => incoming,
        };

        if cancel.is_cancelled() {
            return;
        }

        match incoming {
            Some(Ok(WsMessage::Text(text))) => dispatch_text(&mut handler, text.as_str()),
            Some(Ok(WsMessage::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                Ok(text) => dispatch_text(&mut handler, text),
                Err(err) => {
                    warn!(error = %err, bytes = bytes.len(), "stream binary frame is not utf-8");
                    handler.on_error(QrngError::websocket(err.to_string()));
                }
            },
            Some(Ok(WsMessage::Close(frame))) => {
                debug!(?frame, "stream closed by server");
                finish(&mut handler, &state, None);
                return;
            }
            Some(Ok(_)) => {}
            Some(Err(err)) => {
                warn!(error = %err, "stream transport error");
                finish(&mut handler, &state, Some(QrngError::websocket(err.to_string())));
                return;
            }
            None => {
                debug!("stream ended");
                finish(&mut handler, &state, None);
                return;
            }
        }
    }
}

fn dispatch_text<H: StreamHandler>(handler: &mut H, text: &str) {
    debug!(bytes = text.len(), "stream frame received");
    match StreamFrame::parse(text) {
        Ok(StreamFrame::Data(data)) => handler.on_data(data),
        Ok(StreamFrame::Error(message)) => {
            warn!(error = %message, "stream server error");
            handler.on_error(QrngError::stream(message));
        }
        Ok(StreamFrame::Other) => {
            debug!(message = %truncate_for_log(text, RAW_LOG_MAX_BYTES), "stream frame ignored");
        }
        Err(err) => {
            debug!(
                error = %err,
                message = %truncate_for_log(text, RAW_LOG_MAX_BYTES),
                "stream frame parse failed"
            );
            handler.on_error(err);
        }
    }
}

fn finish<H: StreamHandler>(
    handler: &mut H,
    state: &watch::Sender<StreamState>,
    error: Option<QrngError>,
) {
    state.send_replace(StreamState::Closed);
    if let Some(error) = error {
        handler.on_error(error);
    }
    handler.on_close();
}

fn truncate_for_log(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(end + 3);
    out.push_str(&value[..end]);
    out.push_str("...");
    out
}
