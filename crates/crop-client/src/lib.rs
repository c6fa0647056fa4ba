//! Crop Client - capture, submit and display
//!
//! [`ImageCapture`] validates and holds the selected image, [`HttpAnalyzeClient`]
//! performs the multipart request, and [`ViewStateMachine`] ties them together
//! under an explicit transition table.
//!
//! # Example
//!
//! ```rust,ignore
//! use crop_client::{FileCandidate, HttpAnalyzeClient, ViewStateMachine};
//! use crop_core::{Language, StaticTranslations};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let client = HttpAnalyzeClient::new("http://127.0.0.1:5000", Duration::from_secs(30))?;
//! let mut view = ViewStateMachine::new(client, Arc::new(StaticTranslations::new()), Language::En);
//!
//! view.select_file(FileCandidate::from_path("leaf.jpg").await?)?;
//! view.submit().await?;
//! ```

#![warn(unreachable_pub)]

pub mod capture;
pub mod client;
pub mod error;
pub mod preview;
pub mod render;
pub mod state_machine;
pub mod view;

pub use capture::{CaptureEvent, FileCandidate, ImageCapture, SelectedImage};
pub use client::{Analyze, HttpAnalyzeClient};
pub use error::{CaptureError, ClientError, ViewError, FALLBACK_MESSAGE};
pub use preview::{PreviewRef, PreviewRegistry};
pub use render::render_results;
pub use state_machine::{allowed_transitions, validate_transition, UiPhase, UiState};
pub use view::{AnalysisRequest, Notice, NoticeKind, ViewStateMachine};
