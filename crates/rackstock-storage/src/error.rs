//! Error types for local persistence.

/// Errors returned by key-value stores and the persistence bridge.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The persisted list could not be decoded or encoded.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Key contains characters that cannot be mapped to a file name.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}
