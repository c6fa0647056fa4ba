//! Store errors

/// Analysis store failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be encoded or an existing line could not be decoded
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend refused the write
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
