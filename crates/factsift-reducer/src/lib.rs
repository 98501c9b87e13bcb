//! Factsift Reducer
//!
//! Reduces a collection of short factual statements to a smaller,
//! non-redundant, ranked set.
//!
//! ## Stages
//!
//! - **length-filter**: drops statements that are too short to carry a fact
//! - **entity-based**: greedy dedup on Jaccard overlap of entity sets
//! - **similarity-based**: average-linkage clustering over a similarity
//!   matrix, one representative per cluster
//!
//! Survivors are then scored for importance (semantic richness, centrality,
//! length) and ranked.
//!
//! ## Similarity
//!
//! Four strategies share one interface ([`SimilarityEngine`]): lexical,
//! statistical-vector, semantic-embedding and a weighted hybrid. Embeddings
//! come from an [`EmbeddingProvider`](factsift_domain::EmbeddingProvider)
//! injected by the caller.
//!
//! # Examples
//!
//! ```
//! use factsift_domain::{EntitySpan, Fact};
//! use factsift_reducer::{Pipeline, ReductionConfig, SimilarityMethod};
//!
//! let config = ReductionConfig {
//!     method: SimilarityMethod::Lexical,
//!     short_fact_min_length: 10,
//!     ..ReductionConfig::default()
//! };
//! let pipeline = Pipeline::new(config).unwrap();
//!
//! let france = EntitySpan::new("France", "GPE");
//! let facts = vec![
//!     Fact::new("Paris is the capital of France.").with_entities(vec![france.clone()]),
//!     Fact::new("France's capital city is Paris.").with_entities(vec![france]),
//!     Fact::new("Water boils at 100C."),
//!     Fact::new("Too short"),
//! ];
//!
//! let (kept, report) = pipeline.run_with_report(facts).unwrap();
//! assert_eq!(kept.len(), 2);
//! assert_eq!(report.stages.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod annotate;
pub mod cluster;
pub mod config;
pub mod entity;
pub mod error;
pub mod importance;
pub mod matrix;
pub mod pipeline;
pub mod report;
pub mod selector;
pub mod similarity;
pub mod text;

// Re-exports for convenience
pub use annotate::CapitalizedSpanAnnotator;
pub use cluster::{cluster, Cluster};
pub use config::{ReductionConfig, StageConfig, StageKind};
pub use entity::{jaccard, reduce_by_entities};
pub use error::{ReducerError, Result};
pub use importance::{ImportanceConfig, ImportanceScorer, ImportanceWeights};
pub use matrix::SimilarityMatrix;
pub use pipeline::{Pipeline, Stage};
pub use report::{RunReport, StageReport};
pub use selector::{representative_mask, select, select_representatives};
pub use similarity::{HybridWeights, SimilarityEngine, SimilarityMethod};
