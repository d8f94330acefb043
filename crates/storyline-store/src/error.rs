//! Error types for local persistence.

/// Errors returned by key-value backends and the stores built on them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Key contains characters that cannot be mapped to a file name.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}
