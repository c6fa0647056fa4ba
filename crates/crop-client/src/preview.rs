//! Revocable preview references
//!
//! A [`PreviewRef`] lets a view render a selected image without copying its
//! bytes. Every reference handed out by [`PreviewRegistry::create`] must be
//! given back through [`PreviewRegistry::revoke`] exactly once.

use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;

const SCHEME: &str = "blob:preview/";

/// Opaque preview handle, `blob:preview/<uuid>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewRef(String);

impl PreviewRef {
    /// Handle text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Live preview references and the bytes they point at
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    live: Mutex<HashMap<PreviewRef, Bytes>>,
}

impl PreviewRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// New reference sharing `bytes`
    pub fn create(&self, bytes: Bytes) -> PreviewRef {
        let preview = PreviewRef(format!("{SCHEME}{}", uuid::Uuid::new_v4()));
        self.live.lock().insert(preview.clone(), bytes);
        tracing::trace!(preview = %preview, "preview created");
        preview
    }

    /// Bytes behind a live reference
    #[must_use]
    pub fn resolve(&self, preview: &PreviewRef) -> Option<Bytes> {
        self.live.lock().get(preview).cloned()
    }

    /// Release a reference. Returns `false` if it was not live.
    pub fn revoke(&self, preview: &PreviewRef) -> bool {
        let removed = self.live.lock().remove(preview).is_some();
        if removed {
            tracing::trace!(preview = %preview, "preview revoked");
        } else {
            tracing::warn!(preview = %preview, "revoking unknown preview");
        }
        removed
    }

    /// Number of unreleased references
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.lock().len()
    }
}
