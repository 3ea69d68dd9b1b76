//! Common error types for MPR

use thiserror::Error;

/// Common result type for MPR operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the store, upload and config layers
#[derive(Error, Debug)]
pub enum Error {
    /// Requested record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Submitted data failed a presence/shape check
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Persisting the store document or an upload failed
    #[error("{0}")]
    Storage(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
