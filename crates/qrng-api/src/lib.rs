/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public QRNG API client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

//! Client SDK for the QRNG API: signed entropy over HTTP and a live
//! entropy stream over WebSocket.

pub mod error;
pub mod http;
pub mod types;
pub mod ws;

pub use error::{ErrorKind, QrngError, Result};

// Re-export commonly used types from http
pub use http::{ClientConfig, QrngClient};

// Re-export all types
pub use types::*;

// Re-export commonly used types from ws
pub use ws::{
    ForwardingSender,
    QrngStreamClient,
    StreamCallbacks,
    StreamEvent,
    StreamFrame,
    StreamHandler,
    StreamState,
};
