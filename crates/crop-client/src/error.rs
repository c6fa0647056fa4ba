//! Client-side error taxonomy

use crate::state_machine::UiPhase;

/// Shown when a failed request carries no body text
pub const FALLBACK_MESSAGE: &str = "Failed to analyze image";

/// Image Capture rejections. State is never changed by a rejected candidate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    /// Declared content type does not start with `image/`
    #[error("{name} is not an image ({content_type})")]
    NotAnImage {
        /// Candidate file name
        name: String,
        /// Declared content type
        content_type: String,
    },

    /// A drop carried no files
    #[error("nothing was dropped")]
    NothingDropped,

    /// Candidate file could not be read
    #[error("cannot read {path}: {reason}")]
    Unreadable {
        /// Path as given
        path: String,
        /// I/O error text
        reason: String,
    },
}

/// Analyze Request Client failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Transport failure, timeout or non-success status
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Success status with a body that is not an analysis result
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    /// Text for the user-facing notice.
    ///
    /// A malformed body reads the same as a failed request to the user.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::RequestFailed(message) if !message.trim().is_empty() => message,
            Self::RequestFailed(_) | Self::MalformedResponse(_) => FALLBACK_MESSAGE,
        }
    }
}

/// View-State Machine rejections
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// Submit with nothing selected
    #[error("no image selected")]
    NoImageSelected,

    /// Operation not valid in the current phase
    #[error("illegal transition {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current phase
        from: UiPhase,
        /// Requested phase
        to: UiPhase,
    },

    /// Candidate rejected by Image Capture
    #[error(transparent)]
    Capture(#[from] CaptureError),
}
