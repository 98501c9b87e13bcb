//! Similarity strategies
//!
//! Four interchangeable strategies, selected by [`SimilarityMethod`]:
//!
//! | Method | Signal | Needs |
//! |--------|--------|-------|
//! | `lexical` | normalized edit distance | nothing |
//! | `statistical-vector` | TF-IDF cosine | the whole batch |
//! | `semantic-embedding` | embedding cosine | an embedding provider or attached vectors |
//! | `hybrid` | weighted blend of the three | whatever its enabled parts need |
//!
//! Every strategy is symmetric, bounded to `[0, 1]`, and scores identical
//! statements `1.0`.

pub mod lexical;
pub mod semantic;
pub mod statistical;

use crate::matrix::SimilarityMatrix;
use crate::{ReducerError, Result};
use factsift_domain::{EmbeddingProvider, Fact};
use factsift_embedding::EmbeddingError;
use semantic::{gather, semantic_similarity, BatchEmbedder, Embeddings};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

pub use lexical::lexical_similarity;
pub use statistical::statistical_matrix;

/// Similarity strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimilarityMethod {
    /// Normalized edit distance between raw statements
    Lexical,
    /// Cosine of TF-IDF vectors over the batch vocabulary
    StatisticalVector,
    /// Cosine of dense embeddings
    SemanticEmbedding,
    /// Weighted blend of the other three
    Hybrid,
}

impl SimilarityMethod {
    /// Get the method name as used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityMethod::Lexical => "lexical",
            SimilarityMethod::StatisticalVector => "statistical-vector",
            SimilarityMethod::SemanticEmbedding => "semantic-embedding",
            SimilarityMethod::Hybrid => "hybrid",
        }
    }

    /// Parse a method name; `_` and `-` are interchangeable
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "lexical" => Some(SimilarityMethod::Lexical),
            "statistical-vector" => Some(SimilarityMethod::StatisticalVector),
            "semantic-embedding" => Some(SimilarityMethod::SemanticEmbedding),
            "hybrid" => Some(SimilarityMethod::Hybrid),
            _ => None,
        }
    }
}

impl std::str::FromStr for SimilarityMethod {
    type Err = ReducerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| {
            ReducerError::Configuration(format!(
                "unknown similarity method '{}' (expected lexical, statistical-vector, semantic-embedding or hybrid)",
                s
            ))
        })
    }
}

impl fmt::Display for SimilarityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weights of the hybrid blend
///
/// A zero weight disables that part; the enabled weights are renormalized
/// to sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HybridWeights {
    /// Weight of the lexical part
    pub lexical: f64,
    /// Weight of the statistical-vector part
    pub statistical_vector: f64,
    /// Weight of the semantic-embedding part
    pub semantic_embedding: f64,
}

impl Default for HybridWeights {
    /// 0.3 / 0.3 / 0.4, a plain blend with a slight lean on embeddings
    fn default() -> Self {
        Self {
            lexical: 0.3,
            statistical_vector: 0.3,
            semantic_embedding: 0.4,
        }
    }
}

impl HybridWeights {
    /// Check every weight is finite and non-negative and at least one is positive
    pub fn validate(&self) -> Result<()> {
        let weights = [self.lexical, self.statistical_vector, self.semantic_embedding];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ReducerError::Configuration(format!(
                "hybrid weights must be non-negative numbers, got {:?}",
                weights
            )));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(ReducerError::Configuration(
                "hybrid weights must sum to a positive value".to_string(),
            ));
        }
        Ok(())
    }

    fn enabled(&self) -> Vec<(SimilarityMethod, f64)> {
        [
            (SimilarityMethod::Lexical, self.lexical),
            (SimilarityMethod::StatisticalVector, self.statistical_vector),
            (SimilarityMethod::SemanticEmbedding, self.semantic_embedding),
        ]
        .into_iter()
        .filter(|(_, w)| *w > 0.0)
        .collect()
    }
}

/// Computes pairwise similarity with one configured strategy
///
/// The embedding provider is injected by the caller and borrowed for the
/// engine's lifetime; the engine never loads a model itself.
///
/// # Examples
///
/// ```
/// use factsift_domain::Fact;
/// use factsift_reducer::{SimilarityEngine, SimilarityMethod};
///
/// let engine = SimilarityEngine::new(SimilarityMethod::Lexical);
/// let a = Fact::new("The sky is blue.");
/// let b = Fact::new("The sky is blue!");
/// assert!(engine.similarity(&a, &b).unwrap() > 0.9);
/// ```
pub struct SimilarityEngine<'a> {
    method: SimilarityMethod,
    hybrid_weights: HybridWeights,
    allow_degraded: bool,
    embedder: Option<&'a dyn BatchEmbedder>,
}

impl<'a> SimilarityEngine<'a> {
    /// Create an engine for `method` with default hybrid weights
    pub fn new(method: SimilarityMethod) -> Self {
        Self {
            method,
            hybrid_weights: HybridWeights::default(),
            allow_degraded: false,
            embedder: None,
        }
    }

    /// Set the hybrid weights, rejecting unusable ones
    pub fn with_hybrid_weights(mut self, weights: HybridWeights) -> Result<Self> {
        weights.validate()?;
        self.hybrid_weights = weights;
        Ok(self)
    }

    /// Inject the embedding provider
    pub fn with_embedder<P>(mut self, provider: &'a P) -> Self
    where
        P: EmbeddingProvider,
        P::Error: Into<EmbeddingError>,
    {
        self.embedder = Some(provider);
        self
    }

    pub(crate) fn with_batch_embedder(mut self, embedder: Option<&'a dyn BatchEmbedder>) -> Self {
        self.embedder = embedder;
        self
    }

    /// Allow running without embeddings when the provider is missing or down
    ///
    /// Hybrid drops its semantic part; a pure semantic engine falls back to
    /// the lexical strategy. Without this, missing embeddings fail the batch.
    pub fn allow_degraded(mut self, allow: bool) -> Self {
        self.allow_degraded = allow;
        self
    }

    /// The configured strategy
    pub fn method(&self) -> SimilarityMethod {
        self.method
    }

    /// True when this engine needs embedding vectors
    pub fn needs_embeddings(&self) -> bool {
        match self.method {
            SimilarityMethod::SemanticEmbedding => true,
            SimilarityMethod::Hybrid => self.hybrid_weights.semantic_embedding > 0.0,
            _ => false,
        }
    }

    /// Similarity of two facts
    ///
    /// The statistical strategy vectorizes the pair as its own corpus.
    pub fn similarity(&self, a: &Fact, b: &Fact) -> Result<f64> {
        let facts = [a, b];
        let vectors = self.resolve_embeddings(&facts)?;
        let matrix = self.build(&facts, vectors.as_deref())?;
        Ok(matrix.get(0, 1))
    }

    /// Similarity matrix over a whole batch
    pub fn similarity_matrix(&self, facts: &[Fact]) -> Result<SimilarityMatrix> {
        let refs: Vec<&Fact> = facts.iter().collect();
        let vectors = self.resolve_embeddings(&refs)?;
        self.build(&refs, vectors.as_deref())
    }

    /// Similarity matrix over a batch, caching fetched embeddings on the facts
    ///
    /// Later stages of the same run reuse the cached vectors instead of
    /// asking the provider again.
    pub fn cached_similarity_matrix(&self, facts: &mut [Fact]) -> Result<SimilarityMatrix> {
        let vectors = {
            let refs: Vec<&Fact> = facts.iter().collect();
            self.resolve_embeddings(&refs)?
        };

        if let Some(vectors) = &vectors {
            for (fact, vector) in facts.iter_mut().zip(vectors) {
                if fact.embedding.is_none() {
                    fact.embedding = Some(vector.clone());
                }
            }
        }

        let refs: Vec<&Fact> = facts.iter().collect();
        self.build(&refs, vectors.as_deref())
    }

    fn resolve_embeddings(&self, facts: &[&Fact]) -> Result<Option<Vec<Vec<f32>>>> {
        if !self.needs_embeddings() || facts.is_empty() {
            return Ok(None);
        }

        match gather(facts, self.embedder)? {
            Embeddings::Ready(vectors) => Ok(Some(vectors)),
            Embeddings::Unavailable(reason) if self.allow_degraded => {
                warn!("Embeddings unavailable, continuing without them: {}", reason);
                Ok(None)
            }
            Embeddings::Unavailable(reason) => Err(ReducerError::Dependency(reason)),
        }
    }

    /// The parts to blend and their weights, given whether vectors exist
    fn components(&self, have_vectors: bool) -> Vec<(SimilarityMethod, f64)> {
        let mut parts = match self.method {
            SimilarityMethod::Hybrid => self.hybrid_weights.enabled(),
            single => vec![(single, 1.0)],
        };
        if !have_vectors {
            parts.retain(|(m, _)| *m != SimilarityMethod::SemanticEmbedding);
        }
        if parts.is_empty() {
            parts.push((SimilarityMethod::Lexical, 1.0));
        }
        parts
    }

    fn build(&self, facts: &[&Fact], vectors: Option<&[Vec<f32>]>) -> Result<SimilarityMatrix> {
        let parts = self.components(vectors.is_some());
        let total_weight: f64 = parts.iter().map(|(_, w)| w).sum();

        let statistical = if parts.iter().any(|(m, _)| *m == SimilarityMethod::StatisticalVector) {
            let texts: Vec<&str> = facts.iter().map(|f| f.statement.as_str()).collect();
            Some(statistical_matrix(&texts)?)
        } else {
            None
        };

        let value = |method: SimilarityMethod, i: usize, j: usize| -> f64 {
            match method {
                SimilarityMethod::Lexical => lexical_similarity(&facts[i].statement, &facts[j].statement),
                SimilarityMethod::StatisticalVector => {
                    statistical.as_ref().map(|m| m.get(i, j)).unwrap_or(0.0)
                }
                SimilarityMethod::SemanticEmbedding => vectors
                    .map(|v| semantic_similarity(&v[i], &v[j]))
                    .unwrap_or(0.0),
                SimilarityMethod::Hybrid => 0.0,
            }
        };

        SimilarityMatrix::from_fn(facts.len(), |i, j| {
            if facts[i].statement == facts[j].statement {
                return Ok(1.0);
            }
            if let [(method, _)] = parts.as_slice() {
                return Ok(value(*method, i, j));
            }
            let blended: f64 = parts.iter().map(|(m, w)| w * value(*m, i, j)).sum();
            Ok(blended / total_weight)
        })
    }
}
