//! Upload/result view states and the transition table

use crate::capture::SelectedImage;
use crate::error::ViewError;
use crop_core::AnalysisResult;

/// The view's current state. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiState {
    /// No image selected
    #[default]
    Idle,
    /// Image selected, ready to submit
    ImageSelected(SelectedImage),
    /// Request in flight for this image
    Pending(SelectedImage),
    /// Diagnosis shown
    Resolved(AnalysisResult),
    /// Request failed; left immediately for `ImageSelected`
    Errored {
        /// Image that was submitted
        image: SelectedImage,
        /// Failure message shown to the user
        reason: String,
    },
}

impl UiState {
    /// Discriminant of this state
    #[must_use]
    pub fn phase(&self) -> UiPhase {
        match self {
            Self::Idle => UiPhase::Idle,
            Self::ImageSelected(_) => UiPhase::ImageSelected,
            Self::Pending(_) => UiPhase::Pending,
            Self::Resolved(_) => UiPhase::Resolved,
            Self::Errored { .. } => UiPhase::Errored,
        }
    }

    /// Image held by this state, if any
    #[must_use]
    pub fn image(&self) -> Option<&SelectedImage> {
        match self {
            Self::ImageSelected(image) | Self::Pending(image) | Self::Errored { image, .. } => Some(image),
            Self::Idle | Self::Resolved(_) => None,
        }
    }
}

/// [`UiState`] without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiPhase {
    /// See [`UiState::Idle`]
    Idle,
    /// See [`UiState::ImageSelected`]
    ImageSelected,
    /// See [`UiState::Pending`]
    Pending,
    /// See [`UiState::Resolved`]
    Resolved,
    /// See [`UiState::Errored`]
    Errored,
}

/// Phases reachable from `from` in one step.
///
/// `Pending` has no edge back to itself: a second submit while a request is
/// in flight is not a transition.
#[must_use]
pub fn allowed_transitions(from: UiPhase) -> Vec<UiPhase> {
    use UiPhase::{Errored, Idle, ImageSelected, Pending, Resolved};
    match from {
        Idle => vec![ImageSelected],
        ImageSelected => vec![ImageSelected, Idle, Pending],
        Pending => vec![Resolved, Errored],
        Resolved => vec![Idle, ImageSelected],
        Errored => vec![ImageSelected, Idle],
    }
}

/// Validates a phase transition
pub fn validate_transition(from: UiPhase, to: UiPhase) -> Result<(), ViewError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(ViewError::IllegalTransition { from, to })
    }
}
