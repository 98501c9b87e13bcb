//! Hashed bag-of-words embeddings
//!
//! Each lowercased word is hashed into one of `dimension` buckets with a
//! hashed sign, and the resulting vector is normalized to unit length.
//! Statements that share words therefore point in similar directions, which
//! is enough to exercise the semantic strategy without a real model.
//!
//! ```rust
//! use factsift_domain::EmbeddingProvider;
//! use factsift_embedding::HashEmbeddingModel;
//!
//! let model = HashEmbeddingModel::new(384);
//! let a = model.embed("The sky is blue").unwrap();
//! let b = model.embed("The sky is blue").unwrap();
//! assert_eq!(a.len(), 384);
//! assert_eq!(a, b);
//! ```

use crate::EmbeddingError;
use factsift_domain::EmbeddingProvider;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic hash-based embedding model
pub struct HashEmbeddingModel {
    dimension: usize,
}

impl HashEmbeddingModel {
    /// Create a new hash embedding model
    ///
    /// # Parameters
    ///
    /// - `dimension`: the embedding dimension (e.g. 384, the size of bge-small)
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn hash_with_seed(token: &str, seed: u64) -> u64 {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        seed.hash(&mut hasher);
        hasher.finish()
    }

    /// Embed a single text
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.dimension == 0 {
            return Err(EmbeddingError::ModelNotLoaded);
        }
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "Empty text cannot be embedded".to_string(),
            ));
        }

        let mut embedding = vec![0.0f32; self.dimension];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let token = token.to_lowercase();
            let bucket = (Self::hash_with_seed(&token, 0) % self.dimension as u64) as usize;
            let sign = if Self::hash_with_seed(&token, 1) & 1 == 0 { 1.0 } else { -1.0 };
            embedding[bucket] += sign;
        }

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

        // Pure punctuation: fall back to hashing the raw text so the vector is non-zero
        if magnitude == 0.0 {
            let bucket = (Self::hash_with_seed(text, 2) % self.dimension as u64) as usize;
            embedding[bucket] = 1.0;
            return Ok(embedding);
        }

        for value in &mut embedding {
            *value /= magnitude;
        }

        Ok(embedding)
    }
}

impl EmbeddingProvider for HashEmbeddingModel {
    type Error = EmbeddingError;

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, Self::Error> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
