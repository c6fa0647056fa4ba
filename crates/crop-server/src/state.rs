//! Shared handler state

use crate::analyzer::{Analyzer, PlaceholderAnalyzer};
use crate::error::ServerError;
use crop_core::ServerConfig;
use crop_store::{open_store, AnalysisStore, StoreError};
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of the store failure channel
const STORE_ERROR_CAPACITY: usize = 64;

/// Analyzer, store and the store's failure channel.
///
/// Cloned into every request; holds no per-request mutable state.
#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<dyn Analyzer>,
    store: Arc<dyn AnalysisStore>,
    store_errors: broadcast::Sender<Arc<StoreError>>,
}

impl AppState {
    /// Assemble state from parts
    #[must_use]
    pub fn new(analyzer: Arc<dyn Analyzer>, store: Arc<dyn AnalysisStore>) -> Self {
        let (store_errors, _) = broadcast::channel(STORE_ERROR_CAPACITY);
        Self {
            analyzer,
            store,
            store_errors,
        }
    }

    /// Placeholder Analyzer and the configured store
    pub async fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let store = open_store(&config.store).await?;
        let analyzer = Arc::new(PlaceholderAnalyzer::new(config.analysis_delay()));
        Ok(Self::new(analyzer, store))
    }

    /// Analyzer used by the endpoint
    #[inline]
    #[must_use]
    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    /// Store receiving completed analyses
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<dyn AnalysisStore> {
        &self.store
    }

    /// Receive store append failures.
    ///
    /// Only failures after the subscription are delivered.
    #[must_use]
    pub fn subscribe_store_errors(&self) -> broadcast::Receiver<Arc<StoreError>> {
        self.store_errors.subscribe()
    }

    pub(crate) fn report_store_error(&self, error: StoreError) {
        // No subscribers is fine: the failure is already logged.
        let _ = self.store_errors.send(Arc::new(error));
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("store_error_subscribers", &self.store_errors.receiver_count())
            .finish_non_exhaustive()
    }
}
