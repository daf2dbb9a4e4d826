//! Error types for the runner.

use thiserror::Error;

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop the runner. Per-event node failures never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed pipeline file or unserializable output
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A node rejected its configuration
    #[error("node error: {0}")]
    Node(#[from] snewdag_core::Error),
}
