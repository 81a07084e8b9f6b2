/*
[INPUT]:  WebSocket base URL, API key and stream options
[OUTPUT]: Entropy chunks delivered to a StreamHandler
[POS]:    WebSocket layer - live entropy stream
[UPDATE]: When changing handshake, frame format or session lifecycle
*/

pub mod client;
pub mod handler;
pub mod message;

pub use client::{QrngStreamClient, StreamState, DEFAULT_STREAM_URL};
pub use handler::{ForwardingSender, StreamCallbacks, StreamEvent, StreamHandler};
pub use message::StreamFrame;
