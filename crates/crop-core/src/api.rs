//! HTTP contract of the analysis endpoint
//!
//! `POST /api/analyze` with a `multipart/form-data` body:
//! - `image`: binary part, required
//! - `language`: text part, optional, `"en"` | `"hi"`, default `"en"`
//!
//! 200 carries an [`AnalysisResult`](crate::AnalysisResult), 400 a
//! [`ValidationErrorBody`], 500 an [`InternalErrorBody`].

use serde::{Deserialize, Serialize};

/// Path of the analysis endpoint
pub const ANALYZE_PATH: &str = "/api/analyze";

/// Multipart field carrying the image bytes
pub const IMAGE_FIELD: &str = "image";

/// Multipart field carrying the language code
pub const LANGUAGE_FIELD: &str = "language";

/// Body of a 400 response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorBody {
    /// Human-readable reason
    pub message: String,
    /// Offending request field, when one can be named
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ValidationErrorBody {
    /// Validation error tied to a field
    #[inline]
    #[must_use]
    pub fn for_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Validation error without a field
    #[inline]
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }
}

/// Body of a 500 response (also used for 404/405)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalErrorBody {
    /// Human-readable reason
    pub message: String,
}

impl InternalErrorBody {
    /// Create a body
    #[inline]
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Join a base URL and a path with exactly one slash between them
#[must_use]
pub fn build_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
