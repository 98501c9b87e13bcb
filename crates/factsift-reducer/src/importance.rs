//! Importance scoring for surviving facts
//!
//! Three normalized factors, each in `[0, 1]`:
//!
//! - **semantic**: distinct entities plus distinct noun-phrase-like spans,
//!   divided by `richness_cap`
//! - **centrality**: degree of the fact in the graph whose edges are pairs
//!   with similarity above `edge_cutoff`, divided by `n - 1`
//! - **length**: trimmed character count divided by `length_cap`
//!
//! Every factor saturates at `1.0`. The score is their weighted mean.

use crate::matrix::SimilarityMatrix;
use crate::similarity::SimilarityMethod;
use crate::text::noun_phrase_spans;
use crate::{ReducerError, Result};
use factsift_domain::Fact;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Relative weight of each importance factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportanceWeights {
    /// Weight of semantic richness
    pub semantic: f64,
    /// Weight of graph centrality
    pub centrality: f64,
    /// Weight of statement length
    pub length: f64,
}

impl Default for ImportanceWeights {
    fn default() -> Self {
        Self {
            semantic: 0.4,
            centrality: 0.3,
            length: 0.3,
        }
    }
}

/// Importance scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportanceConfig {
    /// Pairs more similar than this are edges of the centrality graph
    pub edge_cutoff: f64,

    /// Statement length (characters) at which the length factor saturates
    pub length_cap: usize,

    /// Richness count at which the semantic factor saturates
    pub richness_cap: usize,

    /// Similarity method for the centrality graph, independent of clustering
    pub method: SimilarityMethod,

    /// Factor weights
    pub weights: ImportanceWeights,
}

impl Default for ImportanceConfig {
    fn default() -> Self {
        Self {
            edge_cutoff: 0.5,
            length_cap: 200,
            richness_cap: 10,
            method: SimilarityMethod::Lexical,
            weights: ImportanceWeights::default(),
        }
    }
}

impl ImportanceConfig {
    /// Check weights and caps
    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        let weights = [w.semantic, w.centrality, w.length];
        if weights.iter().any(|x| !x.is_finite() || *x < 0.0) || weights.iter().sum::<f64>() <= 0.0 {
            return Err(ReducerError::Configuration(format!(
                "importance weights must be non-negative and sum to a positive value, got {:?}",
                weights
            )));
        }
        if !(0.0..=1.0).contains(&self.edge_cutoff) {
            return Err(ReducerError::Configuration(format!(
                "importance edge_cutoff must be in [0, 1], got {}",
                self.edge_cutoff
            )));
        }
        if self.length_cap == 0 || self.richness_cap == 0 {
            return Err(ReducerError::Configuration(
                "importance length_cap and richness_cap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Degree centrality of every fact, normalized by `n - 1`
///
/// A collection of zero or one facts has no edges; every centrality is `0.0`.
pub fn degree_centrality(matrix: &SimilarityMatrix, edge_cutoff: f64) -> Vec<f64> {
    let n = matrix.len();
    if n <= 1 {
        return vec![0.0; n];
    }

    (0..n)
        .map(|i| {
            let degree = matrix
                .row(i)
                .iter()
                .enumerate()
                .filter(|&(j, &sim)| j != i && sim > edge_cutoff)
                .count();
            degree as f64 / (n - 1) as f64
        })
        .collect()
}

/// Count of distinct entities plus distinct noun-phrase-like spans
pub fn semantic_richness(fact: &Fact) -> usize {
    let spans: BTreeSet<String> = noun_phrase_spans(&fact.statement).into_iter().collect();
    fact.entity_set().len() + spans.len()
}

/// Scores facts with a fixed [`ImportanceConfig`]
#[derive(Debug, Clone)]
pub struct ImportanceScorer {
    config: ImportanceConfig,
}

impl ImportanceScorer {
    /// Create a scorer, rejecting unusable weights or caps
    pub fn new(config: ImportanceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use
    pub fn config(&self) -> &ImportanceConfig {
        &self.config
    }

    /// Centrality map for one collection
    pub fn centrality(&self, matrix: &SimilarityMatrix) -> Vec<f64> {
        degree_centrality(matrix, self.config.edge_cutoff)
    }

    /// Importance of one fact given its precomputed centrality
    pub fn score(&self, fact: &Fact, centrality: f64) -> f64 {
        let semantic = (semantic_richness(fact) as f64 / self.config.richness_cap as f64).min(1.0);
        let length = (fact.char_len() as f64 / self.config.length_cap as f64).min(1.0);

        let w = &self.config.weights;
        let total = w.semantic + w.centrality + w.length;
        (w.semantic * semantic + w.centrality * centrality.clamp(0.0, 1.0) + w.length * length) / total
    }

    /// Attach an importance score to every fact
    ///
    /// `matrix` must cover `facts` in the same order.
    pub fn score_all(&self, facts: &mut [Fact], matrix: &SimilarityMatrix) -> Result<()> {
        if matrix.len() != facts.len() {
            return Err(ReducerError::Configuration(format!(
                "centrality matrix covers {} facts, expected {}",
                matrix.len(),
                facts.len()
            )));
        }

        let centrality = self.centrality(matrix);
        for (fact, c) in facts.iter_mut().zip(centrality) {
            fact.importance = Some(self.score(fact, c));
        }
        Ok(())
    }
}

impl Default for ImportanceScorer {
    fn default() -> Self {
        Self {
            config: ImportanceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factsift_domain::EntitySpan;

    #[test]
    fn test_degree_centrality() {
        let m = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.9, 0.6],
            vec![0.9, 1.0, 0.5],
            vec![0.6, 0.5, 1.0],
        ])
        .unwrap();
        // 0.5 is not above the cutoff
        assert_eq!(degree_centrality(&m, 0.5), vec![1.0, 0.5, 0.5]);
    }

    #[test]
    fn test_degree_centrality_small_collections() {
        assert!(degree_centrality(&SimilarityMatrix::identity(0), 0.5).is_empty());
        assert_eq!(degree_centrality(&SimilarityMatrix::identity(1), 0.5), vec![0.0]);
    }

    #[test]
    fn test_semantic_richness_counts_distinct() {
        let fact = Fact::new("Paris is the capital of France, and Paris is old").with_entities(vec![
            EntitySpan::new("Paris", "GPE"),
            EntitySpan::new("France", "GPE"),
            EntitySpan::new("Paris", "GPE"),
        ]);
        // entities: paris/GPE, france/GPE; spans: paris, capital, france, old
        assert_eq!(semantic_richness(&fact), 2 + 4);
    }

    #[test]
    fn test_length_saturates() {
        let config = ImportanceConfig {
            weights: ImportanceWeights { semantic: 0.0, centrality: 0.0, length: 1.0 },
            length_cap: 10,
            ..ImportanceConfig::default()
        };
        let scorer = ImportanceScorer::new(config).unwrap();

        assert_eq!(scorer.score(&Fact::new("12345"), 0.0), 0.5);
        assert_eq!(scorer.score(&Fact::new("x".repeat(500)), 0.0), 1.0);
    }

    #[test]
    fn test_weighted_mean() {
        let config = ImportanceConfig {
            weights: ImportanceWeights { semantic: 2.0, centrality: 1.0, length: 1.0 },
            length_cap: 4,
            richness_cap: 1,
            ..ImportanceConfig::default()
        };
        let scorer = ImportanceScorer::new(config).unwrap();
        // "word": richness 1 (saturated), length 4 (saturated), centrality 0
        let score = scorer.score(&Fact::new("word"), 0.0);
        assert!((score - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_score_all() {
        let mut facts = vec![Fact::new("Paris is the capital of France."), Fact::new("Water boils.")];
        let m = SimilarityMatrix::identity(2);
        ImportanceScorer::default().score_all(&mut facts, &m).unwrap();

        assert!(facts.iter().all(|f| f.importance.is_some()));
        assert!(facts[0].importance > facts[1].importance);
    }

    #[test]
    fn test_score_all_rejects_mismatched_matrix() {
        let mut facts = vec![Fact::new("a")];
        let m = SimilarityMatrix::identity(2);
        assert!(ImportanceScorer::default().score_all(&mut facts, &m).is_err());
    }

    #[test]
    fn test_invalid_config() {
        let zero = ImportanceConfig {
            weights: ImportanceWeights { semantic: 0.0, centrality: 0.0, length: 0.0 },
            ..ImportanceConfig::default()
        };
        assert!(ImportanceScorer::new(zero).is_err());

        let cutoff = ImportanceConfig { edge_cutoff: 1.5, ..ImportanceConfig::default() };
        assert!(ImportanceScorer::new(cutoff).is_err());

        let cap = ImportanceConfig { length_cap: 0, ..ImportanceConfig::default() };
        assert!(ImportanceScorer::new(cap).is_err());
    }
}
