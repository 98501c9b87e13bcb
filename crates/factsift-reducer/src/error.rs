//! Error types for reduction runs

use factsift_embedding::EmbeddingError;
use thiserror::Error;

/// Errors that abort a reduction run
///
/// Empty or all-blank input is not an error; it reduces to an empty result.
#[derive(Error, Debug)]
pub enum ReducerError {
    /// Unknown method or stage, out-of-range threshold, unusable weights.
    /// Raised before any computation starts.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Embedding provider missing, unreachable, or returning malformed vectors.
    /// Fails the whole similarity batch.
    #[error("Dependency error: {0}")]
    Dependency(String),
}

impl From<EmbeddingError> for ReducerError {
    fn from(e: EmbeddingError) -> Self {
        ReducerError::Dependency(e.to_string())
    }
}

/// Result type alias for reducer operations
pub type Result<T> = std::result::Result<T, ReducerError>;
