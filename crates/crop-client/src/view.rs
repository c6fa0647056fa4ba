//! Upload/result view-state machine
//!
//! Wires [`ImageCapture`] to an [`Analyze`] implementation and routes the
//! outcome to either the results state or a user notice. Every state change
//! goes through [`validate_transition`], so "submit while pending" is
//! rejected by the transition table rather than by a disabled button.

use crate::capture::{CaptureEvent, FileCandidate, ImageCapture, SelectedImage};
use crate::client::Analyze;
use crate::error::{CaptureError, ClientError, ViewError};
use crate::preview::PreviewRegistry;
use crate::state_machine::{validate_transition, UiPhase, UiState};
use crop_core::{AnalysisResult, Language, TextKey, TranslationProvider};
use std::sync::Arc;

/// What a notice is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Submit with nothing selected
    NoImageSelected,
    /// Non-image file offered
    NotAnImage,
    /// Analyze request failed
    RequestFailed,
}

/// User-visible notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Category
    pub kind: NoticeKind,
    /// Heading, translated
    pub title: String,
    /// Body text
    pub description: String,
}

/// One submit: the image and language captured when it started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Image being analyzed
    pub image: SelectedImage,
    /// Requested diagnosis language
    pub language: Language,
}

/// Owns the UI state, the capture and the notice queue for one view
pub struct ViewStateMachine<A: Analyze> {
    analyzer: A,
    translations: Arc<dyn TranslationProvider>,
    language: Language,
    capture: ImageCapture,
    state: UiState,
    notices: Vec<Notice>,
}

impl<A: Analyze> ViewStateMachine<A> {
    /// Idle view using `analyzer` and `translations`
    pub fn new(analyzer: A, translations: Arc<dyn TranslationProvider>, language: Language) -> Self {
        Self {
            analyzer,
            translations,
            language,
            capture: ImageCapture::new(Arc::new(PreviewRegistry::new())),
            state: UiState::Idle,
            notices: Vec::new(),
        }
    }

    /// Current state
    #[inline]
    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Current phase
    #[inline]
    pub fn phase(&self) -> UiPhase {
        self.state.phase()
    }

    /// Display and request language
    #[inline]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Image held by the capture
    #[inline]
    pub fn selected_image(&self) -> Option<&SelectedImage> {
        self.capture.selected()
    }

    /// Preview registry backing the capture
    #[inline]
    pub fn previews(&self) -> &Arc<PreviewRegistry> {
        self.capture.previews()
    }

    /// Label for `key` in the current language
    pub fn label(&self, key: TextKey) -> &str {
        self.translations.lookup(self.language, key)
    }

    /// Drain queued notices, oldest first
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Switch language. Allowed in every state; a shown result is kept as is.
    pub fn set_language(&mut self, language: Language) {
        if self.language != language {
            tracing::debug!(from = %self.language, to = %language, "language changed");
            self.language = language;
        }
    }

    /// Manual file pick
    pub fn select_file(&mut self, candidate: FileCandidate) -> Result<&UiState, ViewError> {
        self.ensure(UiPhase::ImageSelected)?;
        let outcome = self.capture.select_file(candidate);
        self.apply_capture(outcome)
    }

    /// Drag-and-drop; only the first item is considered
    pub fn select_dropped(&mut self, items: Vec<FileCandidate>) -> Result<&UiState, ViewError> {
        self.ensure(UiPhase::ImageSelected)?;
        let outcome = self.capture.select_dropped(items);
        self.apply_capture(outcome)
    }

    /// Drop the selected image
    pub fn clear(&mut self) -> Result<&UiState, ViewError> {
        self.to_idle()
    }

    /// Leave the results view, dropping the image as well
    pub fn reset(&mut self) -> Result<&UiState, ViewError> {
        self.to_idle()
    }

    /// Start a submit: `ImageSelected -> Pending`.
    ///
    /// With nothing selected a notice is queued and no request is built.
    pub fn begin_submit(&mut self) -> Result<AnalysisRequest, ViewError> {
        let image = match &self.state {
            UiState::ImageSelected(image) => image.clone(),
            UiState::Idle => {
                tracing::info!("submit without an image");
                self.push_notice(
                    NoticeKind::NoImageSelected,
                    self.label(TextKey::NoFile).to_string(),
                    self.label(TextKey::UploadDesc).to_string(),
                );
                return Err(ViewError::NoImageSelected);
            }
            other => {
                return Err(ViewError::IllegalTransition {
                    from: other.phase(),
                    to: UiPhase::Pending,
                })
            }
        };

        self.ensure(UiPhase::Pending)?;
        tracing::info!(image = %image.name, language = %self.language, "analysis started");
        self.state = UiState::Pending(image.clone());
        Ok(AnalysisRequest {
            image,
            language: self.language,
        })
    }

    /// Finish a submit with the request's outcome.
    ///
    /// Failure passes through `Errored`, queues a notice and lands in
    /// `ImageSelected` with the same image so the user can retry.
    pub fn complete(&mut self, outcome: Result<AnalysisResult, ClientError>) -> Result<&UiState, ViewError> {
        let UiState::Pending(image) = &self.state else {
            let to = if outcome.is_ok() { UiPhase::Resolved } else { UiPhase::Errored };
            return Err(ViewError::IllegalTransition {
                from: self.phase(),
                to,
            });
        };
        let image = image.clone();

        match outcome {
            Ok(result) => {
                self.ensure(UiPhase::Resolved)?;
                tracing::info!(disease = %result.disease_name, "analysis resolved");
                self.state = UiState::Resolved(result);
            }
            Err(error) => {
                self.ensure(UiPhase::Errored)?;
                match &error {
                    ClientError::RequestFailed(message) => {
                        tracing::warn!(%message, "analysis request failed");
                    }
                    ClientError::MalformedResponse(detail) => {
                        tracing::error!(%detail, "analysis response malformed");
                    }
                }
                let reason = error.user_message().to_string();
                self.state = UiState::Errored {
                    image: image.clone(),
                    reason: reason.clone(),
                };
                self.push_notice(NoticeKind::RequestFailed, self.label(TextKey::Error).to_string(), reason);

                self.ensure(UiPhase::ImageSelected)?;
                self.state = UiState::ImageSelected(image);
            }
        }

        Ok(&self.state)
    }

    /// Submit the selected image and wait for the outcome
    pub async fn submit(&mut self) -> Result<&UiState, ViewError> {
        let request = self.begin_submit()?;
        let outcome = self.analyzer.analyze(&request.image, request.language).await;
        self.complete(outcome)
    }

    fn ensure(&self, to: UiPhase) -> Result<(), ViewError> {
        validate_transition(self.phase(), to)
    }

    fn apply_capture(&mut self, outcome: Result<CaptureEvent, CaptureError>) -> Result<&UiState, ViewError> {
        match outcome {
            Ok(CaptureEvent::ImageSelected(image)) => {
                self.state = UiState::ImageSelected(image);
                Ok(&self.state)
            }
            Ok(CaptureEvent::Cleared) => {
                self.state = UiState::Idle;
                Ok(&self.state)
            }
            Err(error) => {
                let description = match &error {
                    CaptureError::NotAnImage { name, .. } => name.clone(),
                    other => other.to_string(),
                };
                self.push_notice(
                    NoticeKind::NotAnImage,
                    self.label(TextKey::NotAnImage).to_string(),
                    description,
                );
                Err(error.into())
            }
        }
    }

    fn to_idle(&mut self) -> Result<&UiState, ViewError> {
        if self.phase() != UiPhase::Idle {
            self.ensure(UiPhase::Idle)?;
        }
        let event = self.capture.clear();
        self.apply_capture(Ok(event))
    }

    fn push_notice(&mut self, kind: NoticeKind, title: String, description: String) {
        self.notices.push(Notice {
            kind,
            title,
            description,
        });
    }
}

impl<A: Analyze> std::fmt::Debug for ViewStateMachine<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewStateMachine")
            .field("language", &self.language)
            .field("phase", &self.phase())
            .field("selected", &self.capture.selected().map(|i| i.name.as_str()))
            .field("queued_notices", &self.notices.len())
            .finish_non_exhaustive()
    }
}
