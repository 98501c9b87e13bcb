//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use factsift_reducer::SimilarityMethod;

/// Factsift CLI - Reduce a collection of facts to a non-redundant, ranked set.
#[derive(Debug, Parser)]
#[command(name = "factsift")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.factsift/config.toml)
    #[arg(short, long, global = true, env = "FACTSIFT_CONFIG")]
    pub config: Option<String>,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reduce a JSON array of facts
    Reduce(ReduceArgs),

    /// Print the similarity of two statements
    Compare(CompareArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the reduce command.
#[derive(Debug, Parser)]
pub struct ReduceArgs {
    /// JSON file of facts, or `-` for stdin
    pub input: String,

    /// Start from a preset instead of the configured reduction settings
    #[arg(short, long, value_enum)]
    pub preset: Option<PresetArg>,

    /// Similarity method for similarity-based stages
    #[arg(short, long, value_enum)]
    pub method: Option<MethodArg>,

    /// Comma-separated stage order (e.g. length-filter,similarity-based)
    #[arg(short, long, value_delimiter = ',')]
    pub stages: Vec<String>,

    /// Clustering distance threshold (0.0-1.0]
    #[arg(short, long)]
    pub distance_threshold: Option<f64>,

    /// Smallest cluster reduced to one representative
    #[arg(long)]
    pub min_cluster_size: Option<usize>,

    /// Embedding provider
    #[arg(short, long, value_enum)]
    pub embedder: Option<EmbedderArg>,

    /// Derive entities for facts that have none
    #[arg(short, long)]
    pub annotate: bool,

    /// Continue without embeddings if the provider is unavailable
    #[arg(long)]
    pub allow_degraded: bool,

    /// Skip importance scoring and ranking
    #[arg(long)]
    pub no_score: bool,

    /// Print the per-stage reduction report
    #[arg(short, long)]
    pub report: bool,
}

/// Arguments for the compare command.
#[derive(Debug, Parser)]
pub struct CompareArgs {
    /// First statement
    pub a: String,

    /// Second statement
    pub b: String,

    /// Similarity method (default: configured method)
    #[arg(short, long, value_enum)]
    pub method: Option<MethodArg>,

    /// Embedding provider
    #[arg(short, long, value_enum)]
    pub embedder: Option<EmbedderArg>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a configuration file
    Init {
        /// Reduction preset to write
        #[arg(short, long, value_enum, default_value = "default")]
        preset: PresetArg,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

/// Similarity method argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum MethodArg {
    /// Normalized edit distance
    Lexical,
    /// TF-IDF cosine
    StatisticalVector,
    /// Embedding cosine
    SemanticEmbedding,
    /// Weighted blend of the other three
    Hybrid,
}

/// Embedding provider argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum EmbedderArg {
    /// No provider; semantic similarity needs attached vectors
    None,
    /// Deterministic hashed bag-of-words vectors
    Hash,
    /// Local Ollama server
    Ollama,
}

/// Reduction preset argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PresetArg {
    /// Balanced reduction
    Default,
    /// Merge more
    Aggressive,
    /// Merge less
    Lenient,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<MethodArg> for SimilarityMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::Lexical => SimilarityMethod::Lexical,
            MethodArg::StatisticalVector => SimilarityMethod::StatisticalVector,
            MethodArg::SemanticEmbedding => SimilarityMethod::SemanticEmbedding,
            MethodArg::Hybrid => SimilarityMethod::Hybrid,
        }
    }
}

impl From<EmbedderArg> for crate::config::ProviderKind {
    fn from(embedder: EmbedderArg) -> Self {
        match embedder {
            EmbedderArg::None => crate::config::ProviderKind::None,
            EmbedderArg::Hash => crate::config::ProviderKind::Hash,
            EmbedderArg::Ollama => crate::config::ProviderKind::Ollama,
        }
    }
}

impl From<PresetArg> for factsift_reducer::ReductionConfig {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Default => factsift_reducer::ReductionConfig::default(),
            PresetArg::Aggressive => factsift_reducer::ReductionConfig::aggressive(),
            PresetArg::Lenient => factsift_reducer::ReductionConfig::lenient(),
        }
    }
}
