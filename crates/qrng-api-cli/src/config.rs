/*
[INPUT]:  Optional YAML file, QRNG_* environment variables, CLI overrides
[OUTPUT]: Resolved CliConfig and SDK ClientConfig
[POS]:    Configuration layer - credentials and endpoint
[UPDATE]: When adding new configuration options
*/

use anyhow::{Context, Result, bail};
use config::{Config, Environment, File, FileFormat};
use qrng_api::ClientConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const ENV_PREFIX: &str = "QRNG";

/// CLI configuration; every field is optional until resolved
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    /// API key sent as `X-API-Key` and in the stream auth frame
    #[serde(default)]
    pub api_key: Option<String>,
    /// Origin for both REST and stream endpoints
    #[serde(default)]
    pub base_url: Option<String>,
    /// Timeout for `generate`, in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl CliConfig {
    /// Load from an optional YAML file, then `QRNG_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    pub fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            let path_str = path.to_str().context("config path must be valid utf-8")?;
            builder = builder.add_source(File::new(path_str, FileFormat::Yaml).required(true));
        }
        builder
            .add_source(env.try_parsing(true))
            .build()
            .context("read configuration sources")?
            .try_deserialize()
            .context("parse configuration")
    }

    /// Fields set in `overrides` win
    pub fn overlay(self, overrides: CliConfig) -> Self {
        Self {
            api_key: overrides.api_key.or(self.api_key),
            base_url: overrides.base_url.or(self.base_url),
            timeout_ms: overrides.timeout_ms.or(self.timeout_ms),
        }
    }

    pub fn api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => bail!("missing API key (use --api-key, QRNG_API_KEY or the config file)"),
        }
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::new(self.api_key()?);
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(timeout_ms));
        }
        Ok(config)
    }
}
