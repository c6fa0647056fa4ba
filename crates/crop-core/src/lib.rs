//! Crop Doctor Core - shared contract
//!
//! Everything both sides of the upload-to-result lifecycle agree on:
//! - Domain types (`Language`, `AnalysisResult`, analysis records)
//! - The HTTP contract of the analysis endpoint (paths, field names, error bodies)
//! - The translation provider used by the client views
//! - Configuration for the server and the client
//! - Tracing setup shared by the binaries
//!
//! # Example
//!
//! ```rust
//! use crop_core::{Language, StaticTranslations, TextKey, TranslationProvider};
//!
//! let t = StaticTranslations::new();
//! assert_eq!(t.lookup(Language::En, TextKey::Causes), "Possible Causes");
//! assert_eq!(Language::from_code("fr"), Language::En);
//! ```

#![warn(unreachable_pub)]

pub mod api;
pub mod config;
pub mod error;
pub mod i18n;
pub mod telemetry;
pub mod types;

pub use api::{InternalErrorBody, ValidationErrorBody, ANALYZE_PATH};
pub use config::{ClientConfig, LogConfig, LogFormat, ServerConfig, StoreConfig};
pub use error::ConfigError;
pub use i18n::{StaticTranslations, TextKey, TranslationProvider};
pub use types::{AnalysisRecord, AnalysisResult, Language, NewAnalysisRecord};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
