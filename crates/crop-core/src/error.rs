//! Error types for Crop Doctor Core

use std::path::PathBuf;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for the expected shape
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// Offending key
        key: &'static str,
        /// Why it was rejected
        reason: String,
    },
}
