//! Factsift Embedding Providers
//!
//! Implementations of the `EmbeddingProvider` trait from `factsift-domain`.
//!
//! # Providers
//!
//! - `HashEmbeddingModel`: deterministic hashed bag-of-words vectors, no
//!   network and no model files. Useful offline and in tests.
//! - `OllamaEmbedder`: a local Ollama server's `/api/embed` endpoint.
//!
//! # Examples
//!
//! ```
//! use factsift_domain::EmbeddingProvider;
//! use factsift_embedding::{cosine_similarity, HashEmbeddingModel};
//!
//! let model = HashEmbeddingModel::new(256);
//! let vectors = model
//!     .embed_batch(&["The sky is blue", "The sky is blue today"])
//!     .unwrap();
//! assert_eq!(vectors.len(), 2);
//! assert!(cosine_similarity(&vectors[0], &vectors[1]) > 0.5);
//! ```

#![warn(missing_docs)]

pub mod hash;
pub mod ollama;

use thiserror::Error;

pub use hash::HashEmbeddingModel;
pub use ollama::OllamaEmbedder;

/// Errors that can occur during embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Model not loaded or provider not configured
    #[error("Embedding model not loaded")]
    ModelNotLoaded,

    /// Invalid input text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model inference error
    #[error("Model inference failed: {0}")]
    InferenceFailed(String),

    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Provider answered with something that is not a usable batch
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl EmbeddingError {
    /// True when the provider could not be reached or had no model to serve
    ///
    /// Bad input and malformed responses are not unavailability.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            EmbeddingError::ModelNotLoaded | EmbeddingError::Communication(_) | EmbeddingError::InferenceFailed(_)
        )
    }
}

/// Calculate cosine similarity between two embedding vectors
///
/// Returns a value in `[-1, 1]`. Zero vectors and vectors of different
/// lengths have similarity `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

/// Check that a batch returned by a provider can be used as-is
///
/// A batch is rejected as a whole when its length differs from the number of
/// inputs, when any vector has the wrong dimension, or when any value is not
/// finite.
pub fn validate_batch(
    vectors: &[Vec<f32>],
    expected_len: usize,
    dimension: usize,
) -> Result<(), EmbeddingError> {
    if vectors.len() != expected_len {
        return Err(EmbeddingError::InvalidResponse(format!(
            "expected {} vectors, got {}",
            expected_len,
            vectors.len()
        )));
    }

    for (i, vector) in vectors.iter().enumerate() {
        if vector.len() != dimension {
            return Err(EmbeddingError::InvalidResponse(format!(
                "vector {} has dimension {} (expected {})",
                i,
                vector.len(),
                dimension
            )));
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(EmbeddingError::InvalidResponse(format!(
                "vector {} contains non-finite values",
                i
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let vec = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&vec, &vec) - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let similarity = cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!(similarity.abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let similarity = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((similarity + 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_mismatched_lengths() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_validate_batch() {
        let good = vec![vec![0.1, 0.2], vec![0.3, 0.4]];
        assert!(validate_batch(&good, 2, 2).is_ok());

        assert!(validate_batch(&good, 3, 2).is_err());
        assert!(validate_batch(&good, 2, 3).is_err());

        let nan = vec![vec![0.1, f32::NAN]];
        let err = validate_batch(&nan, 1, 2).unwrap_err();
        assert!(err.to_string().contains("non-finite"));
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_is_unavailable() {
        assert!(EmbeddingError::ModelNotLoaded.is_unavailable());
        assert!(EmbeddingError::Communication("refused".into()).is_unavailable());
        assert!(!EmbeddingError::InvalidResponse("dimension 3".into()).is_unavailable());
        assert!(!EmbeddingError::InvalidInput("empty".into()).is_unavailable());
    }
}
