/*
[INPUT]:  Error sources (HTTP status, transport, stream frames, JSON)
[OUTPUT]: Typed QrngError variants with status code and response context
[POS]:    Error handling layer - shared by request and stream clients
[UPDATE]: When adding new error sources or changing status mapping
*/

use reqwest::StatusCode;
use serde_json::{Map, Value};
use thiserror::Error;

const AUTHENTICATION_MESSAGE: &str = "Invalid API key";
const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded";
const QUOTA_EXCEEDED_MESSAGE: &str = "Monthly quota exceeded";

/// Coarse error classification for branching on failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    RateLimit,
    QuotaExceeded,
    General,
}

/// Main error type for the QRNG API client
#[derive(Error, Debug)]
pub enum QrngError {
    /// API key rejected (HTTP 401)
    #[error("{message}")]
    Authentication { message: String },

    /// Too many requests (HTTP 429)
    #[error("{message}")]
    RateLimit { message: String },

    /// Monthly quota used up (HTTP 402)
    #[error("{message}")]
    QuotaExceeded { message: String },

    /// Any other non-2xx response from the random endpoint
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        response: Map<String, Value>,
    },

    /// Transport failure, timeout or undecodable body
    #[error("{message}")]
    Request { message: String },

    /// Health endpoint failure
    #[error("{message}")]
    Health { status: Option<u16>, message: String },

    /// Error frame pushed by the stream server
    #[error("{message}")]
    Stream { message: String },

    /// WebSocket transport failure
    #[error("{message}")]
    WebSocket { message: String },

    /// Inbound frame was not valid JSON
    #[error("Invalid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QrngError {
    pub fn authentication() -> Self {
        QrngError::Authentication {
            message: AUTHENTICATION_MESSAGE.to_string(),
        }
    }

    pub fn rate_limit() -> Self {
        QrngError::RateLimit {
            message: RATE_LIMIT_MESSAGE.to_string(),
        }
    }

    pub fn quota_exceeded() -> Self {
        QrngError::QuotaExceeded {
            message: QUOTA_EXCEEDED_MESSAGE.to_string(),
        }
    }

    /// Map a non-2xx status and its raw body to a typed error
    ///
    /// 401, 429 and 402 ignore the body. Everything else keeps the parsed
    /// body (empty when it is not a JSON object) and takes its message from
    /// the body's `error` field, falling back to `HTTP {status}`.
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        match Self::from_typed_status(status) {
            Some(err) => err,
            None => {
                let response = match serde_json::from_slice::<Value>(body) {
                    Ok(Value::Object(map)) => map,
                    _ => Map::new(),
                };
                let message = response
                    .get("error")
                    .and_then(Value::as_str)
                    .filter(|message| !message.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
                QrngError::Api {
                    status: status.as_u16(),
                    message,
                    response,
                }
            }
        }
    }

    /// 401, 429 and 402 map to their dedicated variants; no body needed
    pub fn from_typed_status(status: StatusCode) -> Option<Self> {
        match status {
            StatusCode::UNAUTHORIZED => Some(Self::authentication()),
            StatusCode::TOO_MANY_REQUESTS => Some(Self::rate_limit()),
            StatusCode::PAYMENT_REQUIRED => Some(Self::quota_exceeded()),
            _ => None,
        }
    }

    pub(crate) fn request(cause: impl std::fmt::Display) -> Self {
        QrngError::Request {
            message: format!("Request failed: {cause}"),
        }
    }

    pub(crate) fn health_status(status: StatusCode) -> Self {
        QrngError::Health {
            status: Some(status.as_u16()),
            message: format!("Health check failed: HTTP {}", status.as_u16()),
        }
    }

    pub(crate) fn health_transport(cause: impl std::fmt::Display) -> Self {
        QrngError::Health {
            status: None,
            message: format!("Health check failed: {cause}"),
        }
    }

    pub(crate) fn stream(message: impl Into<String>) -> Self {
        QrngError::Stream {
            message: message.into(),
        }
    }

    pub(crate) fn websocket(message: impl Into<String>) -> Self {
        QrngError::WebSocket {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            QrngError::Authentication { .. } => ErrorKind::Authentication,
            QrngError::RateLimit { .. } => ErrorKind::RateLimit,
            QrngError::QuotaExceeded { .. } => ErrorKind::QuotaExceeded,
            QrngError::Api { .. }
            | QrngError::Request { .. }
            | QrngError::Health { .. }
            | QrngError::Stream { .. }
            | QrngError::WebSocket { .. }
            | QrngError::Serialization(_) => ErrorKind::General,
        }
    }

    /// HTTP status associated with the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            QrngError::Authentication { .. } => Some(401),
            QrngError::RateLimit { .. } => Some(429),
            QrngError::QuotaExceeded { .. } => Some(402),
            QrngError::Api { status, .. } => Some(*status),
            QrngError::Health { status, .. } => *status,
            _ => None,
        }
    }

    /// Snapshot of the parsed error body, if the server sent one
    pub fn response(&self) -> Option<&Map<String, Value>> {
        match self {
            QrngError::Api { response, .. } => Some(response),
            _ => None,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }
}

/// Result type alias for QRNG operations
pub type Result<T> = std::result::Result<T, QrngError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StatusCode::UNAUTHORIZED, ErrorKind::Authentication, "Invalid API key")]
    #[case(StatusCode::TOO_MANY_REQUESTS, ErrorKind::RateLimit, "Rate limit exceeded")]
    #[case(StatusCode::PAYMENT_REQUIRED, ErrorKind::QuotaExceeded, "Monthly quota exceeded")]
    fn test_typed_status_ignores_body(
        #[case] status: StatusCode,
        #[case] kind: ErrorKind,
        #[case] message: &str,
    ) {
        let err = QrngError::from_status(status, br#"{"error":"something else"}"#);
        assert_eq!(err.kind(), kind);
        assert_eq!(err.status_code(), Some(status.as_u16()));
        assert_eq!(err.to_string(), message);
        assert!(err.response().is_none());
    }

    #[test]
    fn test_from_typed_status() {
        assert!(
            QrngError::from_typed_status(StatusCode::UNAUTHORIZED)
                .is_some_and(|err| err.is_auth_error())
        );
        assert!(QrngError::from_typed_status(StatusCode::INTERNAL_SERVER_ERROR).is_none());
    }

    #[test]
    fn test_api_error_uses_body_message() {
        let err = QrngError::from_status(
            StatusCode::BAD_REQUEST,
            br#"{"error":"bytes must be positive","field":"bytes"}"#,
        );
        assert_eq!(err.kind(), ErrorKind::General);
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.to_string(), "bytes must be positive");

        let response = err.response().expect("response snapshot");
        assert_eq!(response.get("field").and_then(Value::as_str), Some("bytes"));
    }

    #[test]
    fn test_api_error_unparseable_body() {
        let err = QrngError::from_status(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");
        assert_eq!(err.to_string(), "HTTP 502");
        assert_eq!(err.response().map(Map::len), Some(0));
    }

    #[test]
    fn test_api_error_non_object_body() {
        let err = QrngError::from_status(StatusCode::INTERNAL_SERVER_ERROR, b"[1,2,3]");
        assert_eq!(err.to_string(), "HTTP 500");
        assert!(err.response().is_some_and(Map::is_empty));
    }

    #[test]
    fn test_health_messages() {
        let err = QrngError::health_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.to_string(), "Health check failed: HTTP 503");
        assert_eq!(err.status_code(), Some(503));

        let err = QrngError::health_transport("connection refused");
        assert_eq!(err.to_string(), "Health check failed: connection refused");
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_is_auth_error() {
        assert!(QrngError::authentication().is_auth_error());
        assert!(!QrngError::rate_limit().is_auth_error());
        assert!(!QrngError::request("timed out").is_auth_error());
    }
}
