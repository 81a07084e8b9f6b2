/*
[INPUT]:  HTTP configuration (API key, base URL, timeout)
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use crate::error::{QrngError, Result};
use reqwest::{Client, RequestBuilder, Url};
use std::fmt;
use std::time::Duration;

/// Default origin for REST calls
pub const DEFAULT_BASE_URL: &str = "https://qrngapi.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

pub(crate) const API_KEY_HEADER: &str = "X-API-Key";

/// HTTP client configuration
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    /// Upper bound for `generate`; `health` is not bounded
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Main HTTP client for the QRNG API
#[derive(Debug, Clone)]
pub struct QrngClient {
    http_client: Client,
    config: ClientConfig,
}

impl QrngClient {
    /// Create a new client against the default origin
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http_client = Client::builder().build().map_err(QrngError::request)?;
        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Build full URL for an API path such as `/api/random`
    pub(crate) fn endpoint_url(&self, path: &str) -> std::result::Result<Url, url::ParseError> {
        let base = self.config.base_url.trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
    }

    /// GET request with the API key attached
    pub(crate) fn authed_get(&self, url: Url) -> RequestBuilder {
        self.http_client
            .get(url)
            .header(API_KEY_HEADER, &self.config.api_key)
    }
}
