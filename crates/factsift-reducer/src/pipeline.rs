//! Pipeline orchestration
//!
//! A run drops blank statements, applies each configured stage to the
//! survivors of the previous one, then scores and ranks what is left. Stages
//! only ever remove facts; a dropped fact never comes back.

use crate::cluster::cluster;
use crate::config::{ReductionConfig, StageConfig, StageKind};
use crate::entity::reduce_by_entities;
use crate::importance::ImportanceScorer;
use crate::report::RunReport;
use crate::selector::representative_mask;
use crate::similarity::semantic::BatchEmbedder;
use crate::similarity::{SimilarityEngine, SimilarityMethod};
use crate::Result;
use factsift_domain::{EmbeddingProvider, Fact};
use factsift_embedding::EmbeddingError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// A resolved, runnable stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
    /// Keep facts whose trimmed statement has at least `min_length` characters
    LengthFilter {
        /// Minimum character count
        min_length: usize,
    },

    /// Drop facts whose entity set overlaps an earlier fact's by more than `threshold`
    EntityBased {
        /// Jaccard cutoff
        threshold: f64,
    },

    /// Cluster by similarity and keep one representative per cluster
    SimilarityBased {
        /// Similarity strategy
        method: SimilarityMethod,
        /// Clusters merge while their distance is below this
        distance_threshold: f64,
        /// Smaller clusters keep every member
        min_cluster_size: usize,
    },
}

impl Stage {
    /// Which kind of stage this is
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::LengthFilter { .. } => StageKind::LengthFilter,
            Stage::EntityBased { .. } => StageKind::EntityBased,
            Stage::SimilarityBased { .. } => StageKind::SimilarityBased,
        }
    }

    /// Stage name as used in configuration and reports
    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Runs the configured stages over a fact collection
///
/// Holds nothing between runs except its configuration and the borrowed
/// embedding provider, so one pipeline can serve any number of runs.
///
/// # Examples
///
/// ```
/// use factsift_domain::Fact;
/// use factsift_reducer::{Pipeline, ReductionConfig, SimilarityMethod, StageConfig};
///
/// let config = ReductionConfig::default().with_stages(vec![
///     StageConfig::named("similarity-based")
///         .with_method(SimilarityMethod::Lexical)
///         .with_similarity_threshold(0.8),
/// ]);
/// let pipeline = Pipeline::new(config).unwrap();
///
/// let facts = vec![Fact::new("The sky is blue."), Fact::new("The sky is blue!")];
/// assert_eq!(pipeline.run(facts).unwrap().len(), 1);
/// ```
pub struct Pipeline<'a> {
    config: ReductionConfig,
    stages: Vec<Stage>,
    scorer: ImportanceScorer,
    embedder: Option<&'a dyn BatchEmbedder>,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline, validating the whole configuration up front
    pub fn new(config: ReductionConfig) -> Result<Self> {
        config.validate()?;
        let stages = config.resolve_stages()?;
        let scorer = ImportanceScorer::new(config.importance.clone())?;

        Ok(Self {
            config,
            stages,
            scorer,
            embedder: None,
        })
    }

    /// Inject the embedding provider used by semantic and hybrid similarity
    pub fn with_embedder<P>(mut self, provider: &'a P) -> Self
    where
        P: EmbeddingProvider,
        P::Error: Into<EmbeddingError>,
    {
        self.embedder = Some(provider);
        self
    }

    /// The configuration this pipeline was built from
    pub fn config(&self) -> &ReductionConfig {
        &self.config
    }

    /// The resolved stages, in execution order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Reduce `facts` with the configured stages
    pub fn run(&self, facts: Vec<Fact>) -> Result<Vec<Fact>> {
        self.run_with_report(facts).map(|(facts, _)| facts)
    }

    /// Reduce `facts` and report how many survived each stage
    pub fn run_with_report(&self, facts: Vec<Fact>) -> Result<(Vec<Fact>, RunReport)> {
        let never = AtomicBool::new(false);
        self.execute(facts, &self.stages, &never)
    }

    /// Reduce `facts` with an explicit stage list instead of the configured one
    ///
    /// Stage overrides fall back to this pipeline's run-wide settings.
    pub fn run_stages(&self, facts: Vec<Fact>, stages: &[StageConfig]) -> Result<(Vec<Fact>, RunReport)> {
        let resolved = self.config.clone().with_stages(stages.to_vec()).resolve_stages()?;
        let never = AtomicBool::new(false);
        self.execute(facts, &resolved, &never)
    }

    /// Reduce `facts`, stopping before the next stage once `cancel` is set
    ///
    /// A cancelled run returns the survivors of the completed stages,
    /// unscored, with `report.cancelled` set.
    pub fn run_until(&self, facts: Vec<Fact>, cancel: &AtomicBool) -> Result<(Vec<Fact>, RunReport)> {
        self.execute(facts, &self.stages, cancel)
    }

    fn execute(&self, facts: Vec<Fact>, stages: &[Stage], cancel: &AtomicBool) -> Result<(Vec<Fact>, RunReport)> {
        let start = Instant::now();
        let mut report = RunReport::new(facts.len());

        let mut facts: Vec<Fact> = facts.into_iter().filter(|f| !f.is_blank()).collect();
        report.blank_dropped = report.input_count - facts.len();
        if report.blank_dropped > 0 {
            info!("Dropped {} blank statement(s)", report.blank_dropped);
        }

        for stage in stages {
            if cancel.load(Ordering::Relaxed) {
                info!("Run cancelled before stage {}", stage.name());
                report.cancelled = true;
                break;
            }

            let input = facts.len();
            facts = self.apply(stage, facts)?;
            info!("Stage {}: {} -> {} facts", stage.name(), input, facts.len());
            report.record_stage(stage.name(), input, facts.len());
        }

        if self.config.score_importance && !report.cancelled && !facts.is_empty() {
            self.score(&mut facts)?;
            report.scored = true;
        }

        report.runtime_ms = start.elapsed().as_millis() as u64;
        info!(
            "Reduced {} facts to {} ({} dropped)",
            report.input_count,
            facts.len(),
            report.total_dropped()
        );

        Ok((facts, report))
    }

    fn apply(&self, stage: &Stage, facts: Vec<Fact>) -> Result<Vec<Fact>> {
        match *stage {
            Stage::LengthFilter { min_length } => {
                Ok(facts.into_iter().filter(|f| f.char_len() >= min_length).collect())
            }
            Stage::EntityBased { threshold } => Ok(reduce_by_entities(facts, threshold)),
            Stage::SimilarityBased {
                method,
                distance_threshold,
                min_cluster_size,
            } => self.reduce_by_similarity(facts, method, distance_threshold, min_cluster_size),
        }
    }

    /// Cluster and select until a pass removes nothing
    ///
    /// Dropping members shifts the average linkage of what remains, so one
    /// pass can leave survivors that would merge on a rerun. Facts are
    /// clustered in (statement, id) order so the outcome depends only on
    /// which facts are present; survivors come back in input order.
    fn reduce_by_similarity(
        &self,
        facts: Vec<Fact>,
        method: SimilarityMethod,
        distance_threshold: f64,
        min_cluster_size: usize,
    ) -> Result<Vec<Fact>> {
        if facts.len() <= 1 {
            return Ok(facts);
        }

        let mut indexed: Vec<(usize, Fact)> = facts.into_iter().enumerate().collect();
        indexed.sort_by(|(_, a), (_, b)| a.statement.cmp(&b.statement).then(a.id.cmp(&b.id)));
        let (mut positions, mut facts): (Vec<usize>, Vec<Fact>) = indexed.into_iter().unzip();

        let engine = self.engine(method)?;
        let mut pass = 0;
        while facts.len() > 1 {
            pass += 1;
            let matrix = engine.cached_similarity_matrix(&mut facts)?;
            let clusters = cluster(&matrix, distance_threshold);
            debug!(
                "Pass {}: {} facts formed {} cluster(s) at distance threshold {}",
                pass,
                facts.len(),
                clusters.len(),
                distance_threshold
            );

            let keep = representative_mask(&clusters, &matrix, min_cluster_size);
            if keep.iter().all(|kept| *kept) {
                break;
            }

            (facts, positions) = facts
                .into_iter()
                .zip(positions)
                .zip(keep)
                .filter(|(_, kept)| *kept)
                .map(|(pair, _)| pair)
                .unzip();
        }

        let mut survivors: Vec<(usize, Fact)> = positions.into_iter().zip(facts).collect();
        survivors.sort_by_key(|(position, _)| *position);
        Ok(survivors.into_iter().map(|(_, fact)| fact).collect())
    }

    fn score(&self, facts: &mut [Fact]) -> Result<()> {
        let matrix = self
            .engine(self.scorer.config().method)?
            .cached_similarity_matrix(facts)?;
        self.scorer.score_all(facts, &matrix)?;

        if self.config.rank_by_importance {
            facts.sort_by(|a, b| {
                b.importance
                    .unwrap_or(0.0)
                    .total_cmp(&a.importance.unwrap_or(0.0))
            });
        }
        Ok(())
    }

    fn engine(&self, method: SimilarityMethod) -> Result<SimilarityEngine<'a>> {
        Ok(SimilarityEngine::new(method)
            .with_hybrid_weights(self.config.hybrid_weights)?
            .allow_degraded(self.config.allow_degraded)
            .with_batch_embedder(self.embedder))
    }
}
