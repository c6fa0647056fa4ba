//! In-memory analysis store

use crate::{AnalysisStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use crop_core::{AnalysisRecord, NewAnalysisRecord};
use parking_lot::Mutex;

/// Process-local append-only store
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Vec<AnalysisRecord>>,
}

impl MemoryStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far
    #[must_use]
    pub fn records(&self) -> Vec<AnalysisRecord> {
        self.inner.lock().clone()
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether nothing was appended yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn append(&self, record: NewAnalysisRecord) -> Result<AnalysisRecord, StoreError> {
        let mut guard = self.inner.lock();
        let id = guard.last().map_or(1, |r| r.id + 1);
        let stored = record.into_record(id, Utc::now());
        guard.push(stored.clone());
        tracing::debug!(id, "analysis record appended in memory");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crop_core::Language;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn record(name: &str) -> NewAnalysisRecord {
        NewAnalysisRecord {
            image_ref: None,
            disease_name: name.to_string(),
            description: String::new(),
            causes: String::new(),
            organic_treatment: String::new(),
            chemical_treatment: String::new(),
            language: Language::En,
        }
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        let a = store.append(record("a")).await.unwrap();
        let b = store.append(record("b")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert!(b.created_at >= a.created_at);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn concurrent_appends_get_unique_ids() {
        let store = Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for i in 0..64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.append(record(&format!("r{i}"))).await.unwrap().id
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }

        assert_eq!(ids.len(), 64);
        assert_eq!(store.len(), 64);
        assert_eq!(*ids.iter().max().unwrap(), 64);
    }
}
