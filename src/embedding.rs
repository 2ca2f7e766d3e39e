//! Text embedding support for the semantic intent path.
//!
//! This module provides a trait-based interface for converting text to vectors,
//! the backends shipped with the crate, and the cache of intent reference vectors.
//!
//! # Feature Flags
//!
//! - `embeddings-http` (default) - OpenAI-compatible HTTP backend
//! - `embeddings-candle` - in-process sentence-transformer via Candle
//!
//! # Backends
//!
//! - [`HttpTextEmbedder`](http_text_embedder::HttpTextEmbedder): remote endpoint,
//!   hosted or self-hosted.
//! - [`LocalTextEmbedder`](local_text_embedder::LocalTextEmbedder): the model runs
//!   inside the process; files come from the HuggingFace Hub.
//! - [`UnavailableEmbedder`](unavailable::UnavailableEmbedder): no backend; every
//!   classification goes through the keyword path.
//!
//! Any other backend can be plugged in by implementing
//! [`TextEmbedder`](text_embedder::TextEmbedder) and passing it to
//! [`TicketClassifier::with_embedder`](crate::triage::TicketClassifier::with_embedder).

pub mod intent_cache;
pub mod text_embedder;
pub mod unavailable;

#[cfg(feature = "embeddings-http")]
pub mod http_text_embedder;

#[cfg(feature = "embeddings-candle")]
pub mod local_text_embedder;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::embedding::text_embedder::TextEmbedder;
use crate::embedding::unavailable::UnavailableEmbedder;
use crate::error::{Result, TriageError};

/// Which embedding backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingBackend {
    /// No backend; keyword classification only.
    #[default]
    Disabled,
    /// OpenAI-compatible HTTP endpoint.
    Http,
    /// Sentence-transformer running in-process.
    Local,
}

/// Configuration for the embedding backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    /// Full URL of the embeddings endpoint.
    pub endpoint: String,
    /// Model name sent with every request, or the HuggingFace repository of the
    /// local model. A bare local model name is looked up under `sentence-transformers/`.
    pub model: String,
    /// Environment variable holding the API key, if the endpoint needs one.
    pub api_key_env: Option<String>,
    /// Requested output dimension, for models that support truncation.
    pub dimensions: Option<usize>,
    /// Upper bound for one embedding call, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Disabled,
            endpoint: "http://localhost:8080/v1/embeddings".to_string(),
            model: "paraphrase-MiniLM-L6-v2".to_string(),
            api_key_env: None,
            dimensions: None,
            timeout_ms: 800,
        }
    }
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Build the configured embedder.
    pub fn build_embedder(&self) -> Result<Arc<dyn TextEmbedder>> {
        match self.backend {
            EmbeddingBackend::Disabled => Ok(Arc::new(UnavailableEmbedder::new())),
            EmbeddingBackend::Http => self.build_http_embedder(),
            EmbeddingBackend::Local => self.build_local_embedder(),
        }
    }

    /// HuggingFace repository id of the local model.
    pub fn hub_repo(&self) -> String {
        let model = self.model.trim();
        if model.contains('/') {
            model.to_string()
        } else {
            format!("sentence-transformers/{model}")
        }
    }

    /// A model that cannot be loaded leaves the classifier on the keyword path.
    #[cfg(feature = "embeddings-candle")]
    fn build_local_embedder(&self) -> Result<Arc<dyn TextEmbedder>> {
        use crate::embedding::local_text_embedder::LocalTextEmbedder;

        let repo = self.hub_repo();
        match LocalTextEmbedder::new(&repo) {
            Ok(embedder) => Ok(Arc::new(embedder)),
            Err(e) => {
                log::warn!("local embedding model {repo} unavailable, using keywords only: {e}");
                Ok(Arc::new(UnavailableEmbedder::new()))
            }
        }
    }

    #[cfg(not(feature = "embeddings-candle"))]
    fn build_local_embedder(&self) -> Result<Arc<dyn TextEmbedder>> {
        Err(TriageError::config(
            "the local embedding backend requires the `embeddings-candle` feature",
        ))
    }

    #[cfg(feature = "embeddings-http")]
    fn build_http_embedder(&self) -> Result<Arc<dyn TextEmbedder>> {
        use crate::embedding::http_text_embedder::HttpTextEmbedder;

        let api_key = match &self.api_key_env {
            Some(var) => Some(std::env::var(var).map_err(|_| {
                TriageError::config(format!("environment variable {var} is not set"))
            })?),
            None => None,
        };

        let mut embedder =
            HttpTextEmbedder::new(&self.endpoint, &self.model, api_key, self.timeout())?;
        if let Some(dimensions) = self.dimensions {
            embedder = embedder.with_dimensions(dimensions);
        }
        Ok(Arc::new(embedder))
    }

    #[cfg(not(feature = "embeddings-http"))]
    fn build_http_embedder(&self) -> Result<Arc<dyn TextEmbedder>> {
        Err(TriageError::config(
            "the http embedding backend requires the `embeddings-http` feature",
        ))
    }
}
