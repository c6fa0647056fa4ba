//! Image Capture: file acquisition, validation and preview ownership

use crate::error::CaptureError;
use crate::preview::{PreviewRef, PreviewRegistry};
use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;

/// A file offered by manual pick or drop, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// File name without directories
    pub name: String,
    /// Declared MIME type
    pub content_type: String,
    /// File contents
    pub bytes: Bytes,
}

impl FileCandidate {
    /// Candidate from parts
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read `path`; the declared type comes from its extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| CaptureError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(name, content_type_for(path), bytes))
    }

    /// `true` if the declared type is `image/*`
    #[inline]
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// MIME type declared for a file extension
#[must_use]
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "tif" | "tiff" => "image/tiff",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}

/// Accepted image with its live preview reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    /// File name
    pub name: String,
    /// Declared MIME type, always `image/*`
    pub content_type: String,
    /// Image bytes
    pub bytes: Bytes,
    /// Preview handle owned by the capture
    pub preview: PreviewRef,
}

/// `onImageSelect` emission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A new image replaced whatever was selected
    ImageSelected(SelectedImage),
    /// Selection dropped
    Cleared,
}

/// Holds at most one selected image and owns its preview reference
#[derive(Debug)]
pub struct ImageCapture {
    previews: Arc<PreviewRegistry>,
    selected: Option<SelectedImage>,
}

impl ImageCapture {
    /// Empty capture creating previews in `previews`
    #[must_use]
    pub fn new(previews: Arc<PreviewRegistry>) -> Self {
        Self {
            previews,
            selected: None,
        }
    }

    /// Currently selected image
    #[inline]
    #[must_use]
    pub fn selected(&self) -> Option<&SelectedImage> {
        self.selected.as_ref()
    }

    /// Registry the previews live in
    #[inline]
    #[must_use]
    pub fn previews(&self) -> &Arc<PreviewRegistry> {
        &self.previews
    }

    /// Accept `candidate` if it is an image, replacing the current selection.
    ///
    /// A rejected candidate leaves the current selection untouched.
    pub fn select_file(&mut self, candidate: FileCandidate) -> Result<CaptureEvent, CaptureError> {
        if !candidate.is_image() {
            tracing::debug!(
                name = %candidate.name,
                content_type = %candidate.content_type,
                "rejected non-image candidate"
            );
            return Err(CaptureError::NotAnImage {
                name: candidate.name,
                content_type: candidate.content_type,
            });
        }

        self.release();
        let preview = self.previews.create(candidate.bytes.clone());
        let image = SelectedImage {
            name: candidate.name,
            content_type: candidate.content_type,
            bytes: candidate.bytes,
            preview,
        };
        tracing::debug!(name = %image.name, bytes = image.bytes.len(), "image selected");
        self.selected = Some(image.clone());
        Ok(CaptureEvent::ImageSelected(image))
    }

    /// Drag-and-drop entry point. Only the first item counts.
    pub fn select_dropped(&mut self, items: Vec<FileCandidate>) -> Result<CaptureEvent, CaptureError> {
        let mut items = items.into_iter();
        let first = items.next().ok_or(CaptureError::NothingDropped)?;
        let ignored = items.count();
        if ignored > 0 {
            tracing::debug!(ignored, "extra dropped files ignored");
        }
        self.select_file(first)
    }

    /// Drop the selection and release its preview
    pub fn clear(&mut self) -> CaptureEvent {
        self.release();
        CaptureEvent::Cleared
    }

    fn release(&mut self) {
        if let Some(previous) = self.selected.take() {
            self.previews.revoke(&previous.preview);
        }
    }
}

impl Drop for ImageCapture {
    fn drop(&mut self) {
        self.release();
    }
}
