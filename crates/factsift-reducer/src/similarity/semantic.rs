//! Semantic-embedding strategy: cosine similarity of dense vectors
//!
//! Vectors come from the fact itself when already attached, otherwise from
//! the injected provider in a single batch call for every missing fact.

use crate::{ReducerError, Result};
use factsift_domain::{EmbeddingProvider, Fact};
use factsift_embedding::{cosine_similarity, validate_batch, EmbeddingError};
use tracing::debug;

/// Object-safe view of an [`EmbeddingProvider`]
pub(crate) trait BatchEmbedder {
    fn embed(&self, texts: &[&str]) -> std::result::Result<Vec<Vec<f32>>, EmbeddingError>;
    fn dimension(&self) -> usize;
}

impl<P> BatchEmbedder for P
where
    P: EmbeddingProvider,
    P::Error: Into<EmbeddingError>,
{
    fn embed(&self, texts: &[&str]) -> std::result::Result<Vec<Vec<f32>>, EmbeddingError> {
        self.embed_batch(texts).map_err(Into::into)
    }

    fn dimension(&self) -> usize {
        EmbeddingProvider::dimension(self)
    }
}

/// Result of collecting vectors for a batch
#[derive(Debug)]
pub(crate) enum Embeddings {
    /// One vector per fact, in fact order
    Ready(Vec<Vec<f32>>),
    /// No provider, or the provider could not be reached
    Unavailable(String),
}

/// Collect one embedding per fact, fetching every missing one in one batch
///
/// Malformed vectors (wrong count, mixed dimensions, NaN) and provider
/// errors other than unavailability are always an error. A missing or
/// unreachable provider is reported as [`Embeddings::Unavailable`] so the
/// caller can decide whether degraded mode applies.
pub(crate) fn gather(facts: &[&Fact], embedder: Option<&dyn BatchEmbedder>) -> Result<Embeddings> {
    let missing: Vec<usize> = facts
        .iter()
        .enumerate()
        .filter(|(_, f)| f.embedding.is_none())
        .map(|(i, _)| i)
        .collect();

    let mut fetched = Vec::new();
    if !missing.is_empty() {
        let Some(embedder) = embedder else {
            return Ok(Embeddings::Unavailable(format!(
                "{} fact(s) have no embedding and no embedding provider is configured",
                missing.len()
            )));
        };

        let texts: Vec<&str> = missing.iter().map(|&i| facts[i].statement.as_str()).collect();
        debug!("Embedding {} statement(s) in one batch", texts.len());

        fetched = match embedder.embed(&texts) {
            Ok(vectors) => vectors,
            Err(e) if e.is_unavailable() => return Ok(Embeddings::Unavailable(e.to_string())),
            Err(e) => return Err(e.into()),
        };
        if fetched.len() != missing.len() {
            return Err(ReducerError::Dependency(format!(
                "embedding provider returned {} vectors for {} statements",
                fetched.len(),
                missing.len()
            )));
        }
    }

    let mut fetched = fetched.into_iter();
    let vectors: Vec<Vec<f32>> = facts
        .iter()
        .map(|fact| match &fact.embedding {
            Some(v) => v.clone(),
            None => fetched.next().unwrap_or_default(),
        })
        .collect();

    let dimension = match embedder.map(|e| e.dimension()).filter(|d| *d > 0) {
        Some(d) => d,
        None => vectors.first().map(Vec::len).unwrap_or(0),
    };
    validate_batch(&vectors, facts.len(), dimension)?;

    Ok(Embeddings::Ready(vectors))
}

/// Cosine similarity clamped into `[0, 1]`
pub fn semantic_similarity(a: &[f32], b: &[f32]) -> f64 {
    (cosine_similarity(a, b) as f64).clamp(0.0, 1.0)
}
