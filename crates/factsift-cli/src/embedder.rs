//! Embedding provider selected by configuration.

use crate::config::{EmbeddingSettings, ProviderKind};
use crate::error::Result;
use factsift_domain::EmbeddingProvider;
use factsift_embedding::{EmbeddingError, HashEmbeddingModel, OllamaEmbedder};
use std::time::Duration;
use tracing::debug;

/// One of the built-in embedding providers.
pub enum Embedder {
    /// Hashed bag-of-words vectors
    Hash(HashEmbeddingModel),
    /// Ollama HTTP API
    Ollama(OllamaEmbedder),
}

impl Embedder {
    /// Build the provider described by `settings`, if any.
    pub fn from_settings(kind: ProviderKind, settings: &EmbeddingSettings) -> Result<Option<Self>> {
        let embedder = match kind {
            ProviderKind::None => None,
            ProviderKind::Hash => Some(Embedder::Hash(HashEmbeddingModel::new(settings.dimension))),
            ProviderKind::Ollama => {
                let client = OllamaEmbedder::with_timeout(
                    &settings.endpoint,
                    &settings.model,
                    settings.dimension,
                    Duration::from_secs(settings.timeout_secs),
                )?
                .with_max_retries(settings.max_retries);
                Some(Embedder::Ollama(client))
            }
        };

        if embedder.is_some() {
            debug!("Using {:?} embeddings ({} dimensions)", kind, settings.dimension);
        }
        Ok(embedder)
    }
}

impl EmbeddingProvider for Embedder {
    type Error = EmbeddingError;

    fn embed_batch(&self, texts: &[&str]) -> std::result::Result<Vec<Vec<f32>>, Self::Error> {
        match self {
            Embedder::Hash(model) => model.embed_batch(texts),
            Embedder::Ollama(client) => client.embed_batch(texts),
        }
    }

    fn dimension(&self) -> usize {
        match self {
            Embedder::Hash(model) => model.dimension(),
            Embedder::Ollama(client) => client.dimension(),
        }
    }
}
