//! Compare command implementation.

use crate::cli::CompareArgs;
use crate::config::{Config, ProviderKind};
use crate::embedder::Embedder;
use crate::error::Result;
use crate::output::Formatter;
use factsift_domain::Fact;
use factsift_reducer::{SimilarityEngine, SimilarityMethod};

/// Execute the compare command.
pub fn execute_compare(args: CompareArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let (method, similarity) = compare(&args, config)?;
    println!("{}", formatter.format_similarity(method, similarity)?);
    Ok(())
}

/// Similarity of the two statements under the selected method.
pub fn compare(args: &CompareArgs, config: &Config) -> Result<(SimilarityMethod, f64)> {
    let method = args.method.map(SimilarityMethod::from).unwrap_or(config.reduction.method);

    let kind = args.embedder.map(ProviderKind::from).unwrap_or(config.embedding.provider);
    let embedder = Embedder::from_settings(kind, &config.embedding)?;

    let engine = SimilarityEngine::new(method)
        .with_hybrid_weights(config.reduction.hybrid_weights)?
        .allow_degraded(config.reduction.allow_degraded);
    let engine = match &embedder {
        Some(embedder) => engine.with_embedder(embedder),
        None => engine,
    };

    let similarity = engine.similarity(&Fact::new(args.a.as_str()), &Fact::new(args.b.as_str()))?;
    Ok((method, similarity))
}
