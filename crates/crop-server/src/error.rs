//! Error types for the analysis endpoint
//!
//! - `ApiError`: handler failures, turned into 400/500 responses
//! - `ServerError`: startup failures of the binary

use crop_core::{InternalErrorBody, ValidationErrorBody};
use warp::http::StatusCode;
use warp::reply::{Reply, Response};

/// Message sent for every 500 response
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Handler failure with a client-facing shape
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Request failed inbound validation (HTTP 400)
    #[error("validation failed: {message}")]
    Validation {
        /// Reason shown to the client
        message: String,
        /// Offending field, if any
        field: Option<String>,
    },

    /// Anything else (HTTP 500). The detail is logged, never sent.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Validation error tied to a request field
    #[inline]
    pub fn field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Validation error without a field
    #[inline]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// HTTP status for this error
    #[inline]
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON response carrying the matching error body
    #[must_use]
    pub fn to_response(&self) -> Response {
        match self {
            Self::Validation { message, field } => {
                let body = match field {
                    Some(field) => ValidationErrorBody::for_field(message.as_str(), field.as_str()),
                    None => ValidationErrorBody::new(message.as_str()),
                };
                warp::reply::with_status(warp::reply::json(&body), self.status()).into_response()
            }
            Self::Internal(detail) => {
                tracing::error!(detail = %detail, "request failed");
                json_message(INTERNAL_MESSAGE, self.status())
            }
        }
    }
}

impl warp::reject::Reject for ApiError {}

/// `{message}` body with `status`
pub(crate) fn json_message(message: &str, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(&InternalErrorBody::new(message)), status)
        .into_response()
}

/// Startup failures
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Listener could not bind
    #[error("cannot bind {addr}: {source}")]
    Bind {
        /// Requested address
        addr: std::net::SocketAddr,
        /// Underlying error
        #[source]
        source: warp::Error,
    },

    /// Store could not be opened
    #[error("cannot open analysis store: {0}")]
    Store(#[from] crop_store::StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(ApiError::field("No image file uploaded", "image").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::validation("bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Internal("boom".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    async fn body(err: &ApiError) -> String {
        let bytes = warp::hyper::body::to_bytes(err.to_response().into_body())
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn validation_bodies() {
        assert_eq!(
            body(&ApiError::field("No image file uploaded", "image")).await,
            r#"{"message":"No image file uploaded","field":"image"}"#
        );
        assert_eq!(body(&ApiError::validation("bad")).await, r#"{"message":"bad"}"#);
        assert_eq!(
            body(&ApiError::Internal("disk on fire".into())).await,
            r#"{"message":"Internal server error"}"#
        );
    }

    #[test]
    fn display_includes_reason() {
        let err = ApiError::field("No image file uploaded", "image");
        assert!(err.to_string().contains("No image file uploaded"));
    }
}
