//! Errors surfaced by the `factsift` binary.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Everything a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad or unwritable configuration file
    #[error("Configuration error: {0}")]
    Config(String),

    /// The reduction run failed (bad settings or an unreachable provider)
    #[error("{0}")]
    Reducer(#[from] factsift_reducer::ReducerError),

    /// An embedding provider could not be constructed
    #[error("Embedding provider error: {0}")]
    Embedding(#[from] factsift_embedding::EmbeddingError),

    /// Reading input or writing the config file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fact input or JSON output was malformed
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Config file is not valid TOML for [`Config`](crate::Config)
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A flag or input field holds an unusable value
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
