//! Configuration for reduction runs
//!
//! Every recognized option lives on [`ReductionConfig`]. Stage entries may
//! override the run-wide thresholds for that stage only.

use crate::importance::ImportanceConfig;
use crate::pipeline::Stage;
use crate::similarity::{HybridWeights, SimilarityMethod};
use crate::{ReducerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of stage a pipeline can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Drop facts shorter than a minimum length
    LengthFilter,
    /// Greedy entity-overlap deduplication
    EntityBased,
    /// Similarity clustering, one representative per cluster
    SimilarityBased,
}

impl StageKind {
    /// Get the stage name as used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::LengthFilter => "length-filter",
            StageKind::EntityBased => "entity-based",
            StageKind::SimilarityBased => "similarity-based",
        }
    }

    /// Parse a stage name; `_` and `-` are interchangeable
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "length-filter" => Some(StageKind::LengthFilter),
            "entity-based" => Some(StageKind::EntityBased),
            "similarity-based" => Some(StageKind::SimilarityBased),
            _ => None,
        }
    }
}

impl std::str::FromStr for StageKind {
    type Err = ReducerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| {
            ReducerError::Configuration(format!(
                "unrecognized stage '{}' (expected length-filter, entity-based or similarity-based)",
                s
            ))
        })
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured stage: a name plus optional parameter overrides
///
/// Overrides that do not apply to the named stage are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageConfig {
    /// Stage name (`length-filter`, `entity-based`, `similarity-based`)
    pub name: String,

    /// Minimum trimmed statement length (length-filter)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    /// Jaccard cutoff (entity-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_overlap_threshold: Option<f64>,

    /// Merge cutoff as a distance (similarity-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_threshold: Option<f64>,

    /// Merge cutoff as a similarity, `distance = 1 - similarity` (similarity-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_threshold: Option<f64>,

    /// Smallest cluster that is reduced to one representative (similarity-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_cluster_size: Option<usize>,

    /// Similarity strategy (similarity-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<SimilarityMethod>,
}

impl StageConfig {
    /// A stage with no overrides
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Override the minimum statement length
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    /// Override the entity-overlap threshold
    pub fn with_entity_overlap_threshold(mut self, threshold: f64) -> Self {
        self.entity_overlap_threshold = Some(threshold);
        self
    }

    /// Override the clustering distance threshold
    pub fn with_distance_threshold(mut self, threshold: f64) -> Self {
        self.distance_threshold = Some(threshold);
        self
    }

    /// Override the clustering cutoff, expressed as a similarity
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = Some(threshold);
        self
    }

    /// Override the minimum cluster size
    pub fn with_min_cluster_size(mut self, size: usize) -> Self {
        self.min_cluster_size = Some(size);
        self
    }

    /// Override the similarity method
    pub fn with_method(mut self, method: SimilarityMethod) -> Self {
        self.method = Some(method);
        self
    }

    fn reject_foreign_overrides(&self, kind: StageKind) -> Result<()> {
        let present = [
            ("min_length", self.min_length.is_some(), StageKind::LengthFilter),
            (
                "entity_overlap_threshold",
                self.entity_overlap_threshold.is_some(),
                StageKind::EntityBased,
            ),
            ("distance_threshold", self.distance_threshold.is_some(), StageKind::SimilarityBased),
            ("similarity_threshold", self.similarity_threshold.is_some(), StageKind::SimilarityBased),
            ("min_cluster_size", self.min_cluster_size.is_some(), StageKind::SimilarityBased),
            ("method", self.method.is_some(), StageKind::SimilarityBased),
        ];

        match present.iter().find(|(_, set, owner)| *set && *owner != kind) {
            Some((field, _, _)) => Err(ReducerError::Configuration(format!(
                "'{}' does not apply to stage '{}'",
                field, kind
            ))),
            None => Ok(()),
        }
    }
}

/// Configuration for a reduction run
///
/// # Examples
///
/// ```
/// use factsift_reducer::ReductionConfig;
///
/// let config = ReductionConfig::default();
/// assert_eq!(config.distance_threshold, 0.2);
///
/// // Merges more
/// assert!(ReductionConfig::aggressive().distance_threshold > config.distance_threshold);
///
/// // Merges less
/// assert!(ReductionConfig::lenient().distance_threshold < config.distance_threshold);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionConfig {
    /// Similarity strategy for similarity-based stages
    /// Default: lexical (needs no embedding provider)
    pub method: SimilarityMethod,

    /// Clustering merge cutoff, in (0, 1]
    /// Default: 0.2 (pairs more than 0.8 similar merge)
    pub distance_threshold: f64,

    /// Clusters smaller than this keep every member
    /// Default: 2
    pub min_cluster_size: usize,

    /// Jaccard cutoff for entity-overlap reduction, in (0, 1]
    /// Default: 0.9
    pub entity_overlap_threshold: f64,

    /// Minimum trimmed statement length kept by the length filter
    /// Default: 15
    pub short_fact_min_length: usize,

    /// Run without embeddings when the provider is missing or down
    /// Default: false (missing embeddings fail the run)
    pub allow_degraded: bool,

    /// Attach an importance score to every surviving fact
    /// Default: true
    pub score_importance: bool,

    /// Sort surviving facts by descending importance
    /// Default: true
    pub rank_by_importance: bool,

    /// Blend weights for the hybrid strategy
    pub hybrid_weights: HybridWeights,

    /// Importance scoring settings
    pub importance: ImportanceConfig,

    /// Stages in execution order; empty means the default order
    pub stages: Vec<StageConfig>,
}

impl Default for ReductionConfig {
    /// Balanced reduction
    ///
    /// - Stages: length-filter, entity-based, similarity-based
    /// - Lexical similarity, distance threshold 0.2
    /// - Entity overlap above 0.9 is a duplicate
    fn default() -> Self {
        Self {
            method: SimilarityMethod::Lexical,
            distance_threshold: 0.2,
            min_cluster_size: 2,
            entity_overlap_threshold: 0.9,
            short_fact_min_length: 15,
            allow_degraded: false,
            score_importance: true,
            rank_by_importance: true,
            hybrid_weights: HybridWeights::default(),
            importance: ImportanceConfig::default(),
            stages: Self::default_stages(),
        }
    }
}

impl ReductionConfig {
    /// Aggressive reduction: looser duplicates, longer minimum length
    ///
    /// - Distance threshold: 0.35
    /// - Entity overlap: 0.6
    /// - Minimum length: 30
    pub fn aggressive() -> Self {
        Self {
            distance_threshold: 0.35,
            entity_overlap_threshold: 0.6,
            short_fact_min_length: 30,
            ..Self::default()
        }
    }

    /// Lenient reduction: only near-verbatim duplicates merge
    ///
    /// - Distance threshold: 0.1
    /// - Entity overlap: 0.95
    /// - Minimum length: 5
    pub fn lenient() -> Self {
        Self {
            distance_threshold: 0.1,
            entity_overlap_threshold: 0.95,
            short_fact_min_length: 5,
            ..Self::default()
        }
    }

    /// The stage order used when none is configured
    pub fn default_stages() -> Vec<StageConfig> {
        [StageKind::LengthFilter, StageKind::EntityBased, StageKind::SimilarityBased]
            .iter()
            .map(|kind| StageConfig::named(kind.as_str()))
            .collect()
    }

    /// Replace the stage list
    pub fn with_stages(mut self, stages: Vec<StageConfig>) -> Self {
        self.stages = stages;
        self
    }

    /// Parse a configuration from TOML
    pub fn from_toml(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ReducerError::Configuration(format!("invalid TOML: {}", e)))
    }

    /// Serialize the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ReducerError::Configuration(e.to_string()))
    }

    /// Check every option and resolve every stage
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("distance_threshold", self.distance_threshold)?;
        check_unit_interval("entity_overlap_threshold", self.entity_overlap_threshold)?;
        if self.min_cluster_size == 0 {
            return Err(ReducerError::Configuration(
                "min_cluster_size must be at least 1".to_string(),
            ));
        }
        self.hybrid_weights.validate()?;
        self.importance.validate()?;
        self.resolve_stages().map(|_| ())
    }

    /// Resolve stage names and overrides into runnable stages
    pub fn resolve_stages(&self) -> Result<Vec<Stage>> {
        let defaults;
        let stages = if self.stages.is_empty() {
            defaults = Self::default_stages();
            &defaults
        } else {
            &self.stages
        };

        stages.iter().map(|stage| self.resolve_stage(stage)).collect()
    }

    fn resolve_stage(&self, stage: &StageConfig) -> Result<Stage> {
        let kind: StageKind = stage.name.parse()?;
        stage.reject_foreign_overrides(kind)?;

        match kind {
            StageKind::LengthFilter => Ok(Stage::LengthFilter {
                min_length: stage.min_length.unwrap_or(self.short_fact_min_length),
            }),
            StageKind::EntityBased => {
                let threshold = stage
                    .entity_overlap_threshold
                    .unwrap_or(self.entity_overlap_threshold);
                check_unit_interval("entity_overlap_threshold", threshold)?;
                Ok(Stage::EntityBased { threshold })
            }
            StageKind::SimilarityBased => {
                let distance_threshold = match (stage.distance_threshold, stage.similarity_threshold) {
                    (Some(_), Some(_)) => {
                        return Err(ReducerError::Configuration(
                            "set either distance_threshold or similarity_threshold, not both".to_string(),
                        ))
                    }
                    (Some(d), None) => d,
                    (None, Some(s)) => {
                        if !(0.0..1.0).contains(&s) {
                            return Err(ReducerError::Configuration(format!(
                                "similarity_threshold must be in [0, 1), got {}",
                                s
                            )));
                        }
                        1.0 - s
                    }
                    (None, None) => self.distance_threshold,
                };
                check_unit_interval("distance_threshold", distance_threshold)?;

                let min_cluster_size = stage.min_cluster_size.unwrap_or(self.min_cluster_size);
                if min_cluster_size == 0 {
                    return Err(ReducerError::Configuration(
                        "min_cluster_size must be at least 1".to_string(),
                    ));
                }

                Ok(Stage::SimilarityBased {
                    method: stage.method.unwrap_or(self.method),
                    distance_threshold,
                    min_cluster_size,
                })
            }
        }
    }
}

/// Thresholds live in (0, 1]
fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ReducerError::Configuration(format!(
            "{} must be in (0, 1], got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReductionConfig::default();
        assert_eq!(config.method, SimilarityMethod::Lexical);
        assert_eq!(config.min_cluster_size, 2);
        assert!(config.validate().is_ok());

        let stages = config.resolve_stages().unwrap();
        assert_eq!(
            stages.iter().map(Stage::kind).collect::<Vec<_>>(),
            vec![StageKind::LengthFilter, StageKind::EntityBased, StageKind::SimilarityBased]
        );
    }

    #[test]
    fn test_presets_validate() {
        assert!(ReductionConfig::aggressive().validate().is_ok());
        assert!(ReductionConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_empty_stage_list_means_defaults() {
        let config = ReductionConfig::default().with_stages(Vec::new());
        assert_eq!(config.resolve_stages().unwrap().len(), 3);
    }

    #[test]
    fn test_stage_names_accept_snake_case() {
        assert_eq!(StageKind::parse("similarity_based"), Some(StageKind::SimilarityBased));
        assert_eq!(StageKind::parse("Length-Filter"), Some(StageKind::LengthFilter));
        assert_eq!(StageKind::parse("dedupe"), None);
    }

    #[test]
    fn test_unknown_stage_is_configuration_error() {
        let config = ReductionConfig::default().with_stages(vec![StageConfig::named("dedupe")]);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ReducerError::Configuration(_)));
        assert!(err.to_string().contains("dedupe"));
    }

    #[test]
    fn test_similarity_threshold_override() {
        let config = ReductionConfig::default().with_stages(vec![StageConfig::named("similarity-based")
            .with_similarity_threshold(0.8)
            .with_method(SimilarityMethod::Lexical)]);

        match config.resolve_stages().unwrap().as_slice() {
            [Stage::SimilarityBased { method, distance_threshold, min_cluster_size }] => {
                assert_eq!(*method, SimilarityMethod::Lexical);
                assert!((distance_threshold - 0.2).abs() < 1e-12);
                assert_eq!(*min_cluster_size, 2);
            }
            other => panic!("unexpected stages {:?}", other),
        }
    }

    #[test]
    fn test_conflicting_thresholds_rejected() {
        let config = ReductionConfig::default().with_stages(vec![StageConfig::named("similarity-based")
            .with_similarity_threshold(0.8)
            .with_distance_threshold(0.3)]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_foreign_override_rejected() {
        let config = ReductionConfig::default()
            .with_stages(vec![StageConfig::named("entity-based").with_min_length(10)]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_length"));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let config = ReductionConfig { distance_threshold: 0.0, ..ReductionConfig::default() };
        assert!(config.validate().is_err());

        let config = ReductionConfig { entity_overlap_threshold: 1.5, ..ReductionConfig::default() };
        assert!(config.validate().is_err());

        let config = ReductionConfig { min_cluster_size: 0, ..ReductionConfig::default() };
        assert!(config.validate().is_err());

        let config = ReductionConfig::default()
            .with_stages(vec![StageConfig::named("similarity-based").with_similarity_threshold(1.0)]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml() {
        let config = ReductionConfig::from_toml(
            r#"
            method = "statistical-vector"
            min_cluster_size = 3

            [hybrid_weights]
            lexical = 1.0
            statistical-vector = 0.0
            semantic-embedding = 0.0

            [importance.weights]
            length = 1.0

            [[stages]]
            name = "length_filter"
            min_length = 50

            [[stages]]
            name = "similarity-based"
            similarity_threshold = 0.8
            "#,
        )
        .unwrap();

        assert_eq!(config.method, SimilarityMethod::StatisticalVector);
        assert_eq!(config.min_cluster_size, 3);
        assert_eq!(config.hybrid_weights.statistical_vector, 0.0);
        assert_eq!(config.importance.weights.length, 1.0);
        assert_eq!(config.importance.weights.semantic, 0.4);
        assert_eq!(config.stages.len(), 2);
        assert_eq!(config.stages[0].min_length, Some(50));
        // Unset fields keep their defaults
        assert_eq!(config.entity_overlap_threshold, 0.9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_rejects_unknown_stage_fields() {
        let result = ReductionConfig::from_toml(
            r#"
            [[stages]]
            name = "entity-based"
            jaccard = 0.5
            "#,
        );
        assert!(matches!(result, Err(ReducerError::Configuration(_))));
    }

    #[test]
    fn test_from_toml_rejects_unknown_method() {
        assert!(ReductionConfig::from_toml(r#"method = "cosine""#).is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ReductionConfig::aggressive()
            .with_stages(vec![StageConfig::named("similarity-based").with_min_cluster_size(3)]);
        let text = config.to_toml().unwrap();
        assert_eq!(ReductionConfig::from_toml(&text).unwrap(), config);
    }
}
