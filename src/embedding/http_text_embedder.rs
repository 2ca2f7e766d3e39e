//! HTTP text embedder for OpenAI-compatible `/embeddings` endpoints.
//!
//! Works against the hosted OpenAI API as well as self-hosted sentence-transformer
//! servers that expose the same request/response shape. Requires the
//! `embeddings-http` feature.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{Result, TriageError};
use crate::vector::Vector;

/// Request structure for the embeddings endpoint.
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    /// Model identifier to use for embeddings.
    model: &'a str,
    /// Input texts to embed (batch).
    input: Vec<&'a str>,
    /// Optional custom dimension (only for models that support it).
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

/// Response structure from the embeddings endpoint.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

/// Individual embedding data from the response.
#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

/// Remote text embedder.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use ticket_triage::embedding::http_text_embedder::HttpTextEmbedder;
/// use ticket_triage::embedding::text_embedder::TextEmbedder;
///
/// # async fn example() -> ticket_triage::error::Result<()> {
/// let embedder = HttpTextEmbedder::new(
///     "http://localhost:8080/v1/embeddings",
///     "paraphrase-MiniLM-L6-v2",
///     None,
///     Duration::from_millis(800),
/// )?;
///
/// let vector = embedder.embed("Mera internet bahut slow hai").await?;
/// println!("dimension: {}", vector.dimension());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpTextEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dimensions: Option<usize>,
}

impl HttpTextEmbedder {
    /// Create a new HTTP embedder.
    ///
    /// `timeout` bounds every request made by the underlying client.
    pub fn new<E: Into<String>, M: Into<String>>(
        endpoint: E,
        model: M,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(TriageError::config(format!(
                "embedding endpoint must be an http(s) URL, got '{endpoint}'"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TriageError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            model: model.into(),
            api_key,
            dimensions: None,
        })
    }

    /// Ask the backend for a reduced output dimension.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    async fn request(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: texts.to_vec(),
            dimensions: self.dimensions,
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let http_response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TriageError::timeout(format!("embedding request to {} timed out", self.endpoint))
            } else {
                TriageError::embedding(format!("embedding request failed: {e}"))
            }
        })?;

        let status = http_response.status();
        let response_text = http_response
            .text()
            .await
            .map_err(|e| TriageError::embedding(format!("failed to read response text: {e}")))?;

        if !status.is_success() {
            return Err(TriageError::embedding(format!(
                "embedding backend error (status {status}): {response_text}"
            )));
        }

        let response: EmbeddingResponse = serde_json::from_str(&response_text).map_err(|e| {
            TriageError::embedding(format!("failed to parse embedding response: {e}"))
        })?;

        if response.data.len() != texts.len() {
            return Err(TriageError::embedding(format!(
                "expected {} embeddings, backend returned {}",
                texts.len(),
                response.data.len()
            )));
        }

        let mut data = response.data;
        // Servers may answer out of order; `index` restores the request order.
        data.sort_by_key(|d| d.index.unwrap_or(usize::MAX));

        Ok(data.into_iter().map(|d| Vector::new(d.embedding)).collect())
    }
}

#[async_trait]
impl TextEmbedder for HttpTextEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        self.request(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TriageError::embedding("no embedding in response"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts).await
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_endpoint() {
        let result = HttpTextEmbedder::new(
            "localhost:8080",
            "paraphrase-MiniLM-L6-v2",
            None,
            Duration::from_millis(100),
        );
        assert!(matches!(result, Err(TriageError::Config(_))));
    }

    #[test]
    fn test_request_serialization_skips_missing_dimensions() {
        let request = EmbeddingRequest {
            model: "m",
            input: vec!["a"],
            dimensions: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"model":"m","input":["a"]}"#);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_backend_failure() {
        // Port 9 (discard) is not expected to serve HTTP.
        let embedder = HttpTextEmbedder::new(
            "http://127.0.0.1:9/v1/embeddings",
            "paraphrase-MiniLM-L6-v2",
            None,
            Duration::from_millis(200),
        )
        .unwrap();

        let err = embedder.embed("hello").await.unwrap_err();
        assert!(err.is_backend_failure());
    }
}
