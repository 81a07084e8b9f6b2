/*
[INPUT]:  Caller-supplied generation and stream parameters
[OUTPUT]: Resolved query parameters with defaults applied
[POS]:    Data layer - request option types
[UPDATE]: When adding query parameters or changing defaults
*/

use serde::{Deserialize, Serialize};

use super::enums::{EntropyMethod, Format, SignatureType};

pub const DEFAULT_BYTES: u32 = 32;
pub const DEFAULT_CHUNK_SIZE: u32 = 32;

/// Parameters for `GET /api/random`
///
/// Values are not validated locally; the server decides what it accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptions {
    #[serde(default = "default_bytes")]
    pub bytes: u32,
    #[serde(default)]
    pub format: Format,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<EntropyMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_type: Option<SignatureType>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            bytes: DEFAULT_BYTES,
            format: Format::default(),
            method: None,
            signature_type: None,
        }
    }
}

impl GenerateOptions {
    pub fn with_bytes(mut self, bytes: u32) -> Self {
        self.bytes = bytes;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_method(mut self, method: EntropyMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_signature_type(mut self, signature_type: SignatureType) -> Self {
        self.signature_type = Some(signature_type);
        self
    }

    /// Query pairs in wire order; unset optional fields are omitted
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("bytes", self.bytes.to_string()),
            ("format", self.format.as_str().to_string()),
        ];
        if let Some(method) = self.method {
            pairs.push(("method", method.as_str().to_string()));
        }
        if let Some(signature_type) = self.signature_type {
            pairs.push(("signatureType", signature_type.as_str().to_string()));
        }
        pairs
    }
}

/// Parameters for the `/api/stream` subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamOptions {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,
    #[serde(default)]
    pub format: Format,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            format: Format::default(),
        }
    }
}

impl StreamOptions {
    pub fn with_chunk_size(mut self, chunk_size: u32) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }
}

fn default_bytes() -> u32 {
    DEFAULT_BYTES
}

fn default_chunk_size() -> u32 {
    DEFAULT_CHUNK_SIZE
}
