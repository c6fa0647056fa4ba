//! Crop Store - append-only analysis history
//!
//! The analysis endpoint writes one record per completed analysis and never
//! reads it back. Two implementations:
//! - [`MemoryStore`]: process-local, for tests and throwaway servers
//! - [`JsonlStore`]: one JSON object per line in an append-only file
//!
//! Appends are safe under concurrent writers: identity assignment and the
//! write happen under one lock, so records never interleave or share an id.

#![warn(unreachable_pub)]

pub mod error;
pub mod jsonl;
pub mod memory;

pub use error::StoreError;
pub use jsonl::JsonlStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use crop_core::{AnalysisRecord, NewAnalysisRecord, StoreConfig};
use std::sync::Arc;

/// Append-only persistence for completed analyses
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Append a record, returning it with its assigned id and timestamp
    async fn append(&self, record: NewAnalysisRecord) -> Result<AnalysisRecord, StoreError>;
}

/// Open the store described by `config`
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn AnalysisStore>, StoreError> {
    match config {
        StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreConfig::Jsonl { path } => Ok(Arc::new(JsonlStore::open(path).await?)),
    }
}
