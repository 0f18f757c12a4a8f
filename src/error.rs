//! Error types for the voc-eval library.

use thiserror::Error;

/// Result type for voc-eval operations.
pub type Result<T> = std::result::Result<T, VocEvalError>;

/// Error types that can occur during VOC evaluation.
#[derive(Error, Debug)]
pub enum VocEvalError {
    /// Per-image input lists (or the arrays inside one image) disagree in length.
    #[error("Length mismatch: {0}")]
    LengthMismatch(String),

    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
