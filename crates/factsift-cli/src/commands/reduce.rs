//! Reduce command implementation.

use crate::cli::ReduceArgs;
use crate::config::{Config, ProviderKind};
use crate::embedder::Embedder;
use crate::error::{CliError, Result};
use crate::input::{parse_facts, read_source};
use crate::output::Formatter;
use factsift_domain::{Annotator, Fact};
use factsift_reducer::{CapitalizedSpanAnnotator, Pipeline, ReductionConfig, RunReport, StageConfig, StageKind};
use tracing::debug;

/// Execute the reduce command.
pub fn execute_reduce(args: ReduceArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let json = read_source(&args.input)?;
    let facts = parse_facts(&json)?;
    debug!("Read {} facts from {}", facts.len(), args.input);

    let show_report = args.report;
    let (facts, report) = reduce_facts(facts, &args, config)?;

    if show_report {
        println!("{}", formatter.format_reduction(&facts, &report)?);
    } else {
        println!("{}", formatter.format_facts(&facts)?);
    }

    Ok(())
}

/// Run the pipeline over `facts` with the command-line overrides applied.
pub fn reduce_facts(mut facts: Vec<Fact>, args: &ReduceArgs, config: &Config) -> Result<(Vec<Fact>, RunReport)> {
    let reduction = reduction_config(args, config)?;

    if args.annotate {
        CapitalizedSpanAnnotator::new().annotate(&mut facts);
    }

    let kind = args.embedder.map(ProviderKind::from).unwrap_or(config.embedding.provider);
    let embedder = Embedder::from_settings(kind, &config.embedding)?;

    let pipeline = Pipeline::new(reduction)?;
    let pipeline = match &embedder {
        Some(embedder) => pipeline.with_embedder(embedder),
        None => pipeline,
    };

    Ok(pipeline.run_with_report(facts)?)
}

/// Layer the command-line overrides over the configured reduction settings.
fn reduction_config(args: &ReduceArgs, config: &Config) -> Result<ReductionConfig> {
    let mut reduction = match args.preset {
        Some(preset) => preset.into(),
        None => config.reduction.clone(),
    };

    // Apply method override
    if let Some(method) = args.method {
        reduction.method = method.into();
    }

    // Apply stage order
    if !args.stages.is_empty() {
        let stages = args
            .stages
            .iter()
            .map(|name| {
                let kind: StageKind = name.parse()?;
                Ok(StageConfig::named(kind.as_str()))
            })
            .collect::<factsift_reducer::Result<Vec<_>>>()?;
        reduction = reduction.with_stages(stages);
    }

    // Apply clustering overrides
    if let Some(threshold) = args.distance_threshold {
        if threshold <= 0.0 || threshold > 1.0 {
            return Err(CliError::InvalidInput(
                "Distance threshold must be in (0.0, 1.0]".to_string(),
            ));
        }
        reduction.distance_threshold = threshold;
    }
    if let Some(size) = args.min_cluster_size {
        reduction.min_cluster_size = size;
    }

    if args.allow_degraded {
        reduction.allow_degraded = true;
    }
    if args.no_score {
        reduction.score_importance = false;
        reduction.rank_by_importance = false;
    }

    Ok(reduction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use factsift_reducer::{ReducerError, SimilarityMethod};

    fn reduce_args(extra: &[&str]) -> ReduceArgs {
        let mut argv = vec!["factsift", "reduce", "facts.json"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Command::Reduce(args) => args,
            _ => panic!("Expected Reduce command"),
        }
    }

    #[test]
    fn test_overrides_applied() {
        let args = reduce_args(&["-m", "lexical", "-d", "0.3", "--min-cluster-size", "3", "--no-score"]);
        let reduction = reduction_config(&args, &Config::default()).unwrap();

        assert_eq!(reduction.method, SimilarityMethod::Lexical);
        assert_eq!(reduction.distance_threshold, 0.3);
        assert_eq!(reduction.min_cluster_size, 3);
        assert!(!reduction.score_importance);
    }

    #[test]
    fn test_preset_replaces_configured_settings() {
        let mut config = Config::default();
        config.reduction.distance_threshold = 0.5;

        let args = reduce_args(&["--preset", "aggressive"]);
        let reduction = reduction_config(&args, &config).unwrap();
        assert_eq!(reduction, ReductionConfig::aggressive());
    }

    #[test]
    fn test_unknown_stage_rejected() {
        let args = reduce_args(&["--stages", "length-filter,summarize"]);
        let result = reduction_config(&args, &Config::default());
        assert!(matches!(result, Err(CliError::Reducer(ReducerError::Configuration(_)))));
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let args = reduce_args(&["-d", "1.5"]);
        assert!(matches!(
            reduction_config(&args, &Config::default()),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_reduce_lexical_duplicates() {
        let args = reduce_args(&["-m", "lexical", "--stages", "similarity-based"]);
        let facts = vec![
            Fact::new("The Eiffel Tower is in Paris."),
            Fact::new("The Eiffel Tower is in Paris!"),
            Fact::new("Mount Everest is the tallest mountain on Earth."),
        ];

        let (kept, report) = reduce_facts(facts, &args, &Config::default()).unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(report.stages.len(), 1);
        assert!(kept.iter().all(|f| f.importance.is_some()));
    }

    #[test]
    fn test_semantic_without_provider_fails() {
        let args = reduce_args(&["-m", "semantic-embedding", "--stages", "similarity-based"]);
        let facts = vec![Fact::new("Cats are mammals."), Fact::new("Dogs are mammals.")];

        let result = reduce_facts(facts, &args, &Config::default());
        assert!(matches!(result, Err(CliError::Reducer(ReducerError::Dependency(_)))));
    }

    #[test]
    fn test_hash_embedder_from_flag() {
        let args = reduce_args(&["-m", "hybrid", "-e", "hash", "--stages", "similarity-based"]);
        let facts = vec![
            Fact::new("The Nile is the longest river in Africa."),
            Fact::new("The Nile is the longest river in Africa."),
        ];

        let (kept, _) = reduce_facts(facts, &args, &Config::default()).unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_annotate_enables_entity_dedup() {
        let args = reduce_args(&["-a", "--stages", "entity-based", "--no-score"]);
        let facts = vec![
            Fact::new("Marie Curie won the Nobel Prize."),
            Fact::new("Marie Curie received the Nobel Prize"),
        ];

        let (kept, _) = reduce_facts(facts, &args, &Config::default()).unwrap();
        assert_eq!(kept.len(), 1);
        assert!(!kept[0].entities.is_empty());
    }
}
