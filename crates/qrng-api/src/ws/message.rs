/*
[INPUT]:  Raw inbound WebSocket text
[OUTPUT]: Parsed StreamFrame (data, server error, or ignorable)
[POS]:    WebSocket layer - message parsing
[UPDATE]: When adding new frame fields or changing format
*/

use crate::error::{QrngError, Result};
use serde_json::Value;

/// One inbound frame from `/api/stream`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    Data(String),
    Error(String),
    /// Valid JSON carrying neither `error` nor `data`
    Other,
}

impl StreamFrame {
    /// Parse a text frame; a truthy `error` takes precedence over `data`
    ///
    /// Null, `false`, `0` and `""` count as absent for both fields.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(QrngError::Serialization)?;

        if let Some(error) = value.get("error").filter(|error| is_truthy(error)) {
            return Ok(StreamFrame::Error(payload_text(error)));
        }

        match value.get("data").filter(|data| is_truthy(data)) {
            Some(data) => Ok(StreamFrame::Data(payload_text(data))),
            None => Ok(StreamFrame::Other),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn payload_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
