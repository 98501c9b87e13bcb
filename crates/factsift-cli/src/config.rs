//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use factsift_embedding::ollama::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use factsift_reducer::ReductionConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingSettings,

    /// Reduction pipeline settings
    #[serde(default)]
    pub reduction: ReductionConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

/// Which embedding provider to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// No provider
    None,
    /// Deterministic hash embeddings
    Hash,
    /// Ollama HTTP API
    Ollama,
}

/// Embedding provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Provider to use
    pub provider: ProviderKind,

    /// Vector dimension
    pub dimension: usize,

    /// Ollama endpoint
    pub endpoint: String,

    /// Ollama model name
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Attempts per batch (1 = no retry)
    pub max_retries: u32,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".factsift").join("config.toml"))
    }

    /// Resolve the configuration file path, honoring an explicit override.
    pub fn path(override_path: Option<&str>) -> Result<PathBuf> {
        match override_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from file, or defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::None,
            dimension: 768,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: "nomic-embed-text".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: 1,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use factsift_reducer::SimilarityMethod;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.embedding.provider, ProviderKind::None);
        assert_eq!(config.reduction, ReductionConfig::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.settings.color = false;
        config.embedding.provider = ProviderKind::Hash;
        config.reduction = ReductionConfig::aggressive();
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [embedding]
            provider = "ollama"
            model = "mxbai-embed-large"
            dimension = 1024

            [reduction]
            method = "statistical-vector"
            "#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.embedding.provider, ProviderKind::Ollama);
        assert_eq!(config.embedding.dimension, 1024);
        assert_eq!(config.embedding.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.reduction.method, SimilarityMethod::StatisticalVector);
        assert!(config.settings.color);
    }

    #[test]
    fn test_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[embedding]\nprovider = \"word2vec\"\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(CliError::Toml(_))));
    }

    #[test]
    fn test_path_override() {
        let path = Config::path(Some("/tmp/custom.toml")).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom.toml"));
    }
}
