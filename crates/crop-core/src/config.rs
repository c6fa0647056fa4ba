//! Server and client configuration
//!
//! Both configs load from TOML. Every key is optional; missing keys take the
//! defaults below, and binaries apply CLI overrides through the `with_*`
//! builders.

use crate::error::ConfigError;
use crate::types::Language;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default latency of the placeholder Analyzer
pub const DEFAULT_ANALYSIS_DELAY_MS: u64 = 2_000;

/// Default upload limit (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Default client request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Parse a CLI value
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Where completed analyses are appended
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Process-local, lost on exit
    #[default]
    Memory,
    /// Append-only JSON-lines file
    Jsonl {
        /// File path
        path: PathBuf,
    },
}

/// Analysis endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: SocketAddr,
    /// Artificial latency of the placeholder Analyzer, in milliseconds
    pub analysis_delay_ms: u64,
    /// Largest accepted multipart body
    pub max_upload_bytes: u64,
    /// Analysis store
    pub store: StoreConfig,
    /// Logging
    pub log: LogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            analysis_delay_ms: DEFAULT_ANALYSIS_DELAY_MS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            store: StoreConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read_config(path.as_ref()).await?)
    }

    /// With listen address
    #[inline]
    #[must_use]
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// With Analyzer delay
    #[inline]
    #[must_use]
    pub fn with_analysis_delay_ms(mut self, delay_ms: u64) -> Self {
        self.analysis_delay_ms = delay_ms;
        self
    }

    /// With store
    #[inline]
    #[must_use]
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// With log format
    #[inline]
    #[must_use]
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log.format = format;
        self
    }

    /// Analyzer delay as a duration
    #[inline]
    #[must_use]
    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_upload_bytes",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Analyze client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the analysis server
    pub base_url: String,
    /// Per-request timeout, in seconds
    pub request_timeout_secs: u64,
    /// Initial display and analysis language
    pub language: Language,
    /// Logging
    pub log: LogConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            language: Language::En,
            log: LogConfig {
                filter: "warn".to_string(),
                format: LogFormat::Pretty,
            },
        }
    }
}

impl ClientConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        if config.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(config)
    }

    /// Load from a TOML file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read_config(path.as_ref()).await?)
    }

    /// With server base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With language
    #[inline]
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Request timeout as a duration
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

async fn read_config(path: &Path) -> Result<String, ConfigError> {
    tracing::debug!(path = %path.display(), "reading configuration");
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })
}
