//! Ollama Embedding Provider
//!
//! Sends statement batches to a local Ollama server's `/api/embed`
//! endpoint. A whole batch goes out in one request, and a batch that comes
//! back malformed is rejected as a whole.
//!
//! # Examples
//!
//! ```no_run
//! use factsift_domain::EmbeddingProvider;
//! use factsift_embedding::OllamaEmbedder;
//!
//! let embedder = OllamaEmbedder::new("http://localhost:11434", "nomic-embed-text", 768)?;
//! let vectors = embedder.embed_batch(&["The sky is blue."])?;
//! assert_eq!(vectors[0].len(), 768);
//! # Ok::<(), factsift_embedding::EmbeddingError>(())
//! ```

use crate::{validate_batch, EmbeddingError};
use factsift_domain::EmbeddingProvider;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for one embedding request
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Ollama API client for batch embeddings
pub struct OllamaEmbedder {
    endpoint: String,
    model: String,
    dimension: usize,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for the Ollama embed API
#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

/// Response from the Ollama embed API
#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g. "http://localhost:11434")
    /// - `model`: embedding model name (e.g. "nomic-embed-text")
    /// - `dimension`: expected vector dimension; every returned vector is
    ///   checked against it
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Result<Self, EmbeddingError> {
        Self::with_timeout(endpoint, model, dimension, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new Ollama embedder with a custom request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbeddingError::Communication(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            dimension,
            client,
            max_retries: 1,
        })
    }

    /// Set the number of attempts per batch
    ///
    /// Defaults to a single attempt; retrying is an explicit caller choice.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Embed a batch of texts using the Ollama API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running or the request fails
    /// - The model is not available
    /// - The response is not a well-formed batch of the expected dimension
    pub async fn embed_batch_async(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/api/embed", self.endpoint);
        let request_body = OllamaEmbedRequest {
            model: &self.model,
            input: texts,
        };

        debug!("Requesting {} embeddings from {}", texts.len(), url);

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        let parsed = response.json::<OllamaEmbedResponse>().await.map_err(|e| {
                            EmbeddingError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        validate_batch(&parsed.embeddings, texts.len(), self.dimension)?;
                        return Ok(parsed.embeddings);
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(EmbeddingError::InferenceFailed(format!(
                            "model '{}' is not available",
                            self.model
                        )));
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(EmbeddingError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(EmbeddingError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| EmbeddingError::Communication("No attempt was made".to_string())))
    }
}

impl EmbeddingProvider for OllamaEmbedder {
    type Error = EmbeddingError;

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, Self::Error> {
        // Blocking wrapper; callers must not already be inside a tokio runtime
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| EmbeddingError::Communication(format!("Failed to start runtime: {}", e)))?;

        runtime.block_on(self.embed_batch_async(texts))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
