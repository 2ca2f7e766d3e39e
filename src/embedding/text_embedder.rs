//! Text embedding trait for the semantic intent path.

use async_trait::async_trait;

use crate::error::Result;
use crate::vector::Vector;

/// Trait for converting text to vector embeddings.
///
/// Implementations must be deterministic for identical input and an identical
/// model version, and must not keep per-call state. Failures are reported as
/// [`TriageError::Embedding`](crate::error::TriageError::Embedding) so that the
/// classifier can degrade to keyword matching instead of failing the request.
///
/// # Custom implementation
///
/// ```
/// use async_trait::async_trait;
/// use ticket_triage::embedding::text_embedder::TextEmbedder;
/// use ticket_triage::error::Result;
/// use ticket_triage::vector::Vector;
///
/// #[derive(Debug)]
/// struct ConstantEmbedder {
///     dimension: usize,
/// }
///
/// #[async_trait]
/// impl TextEmbedder for ConstantEmbedder {
///     async fn embed(&self, _text: &str) -> Result<Vector> {
///         Ok(Vector::new(vec![1.0; self.dimension]))
///     }
///
///     fn name(&self) -> &str {
///         "constant"
///     }
/// }
/// ```
#[async_trait]
pub trait TextEmbedder: Send + Sync + std::fmt::Debug {
    /// Generate an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vector>;

    /// Generate embeddings for multiple texts in batch.
    ///
    /// The default implementation calls `embed` sequentially.
    /// Override this method for better performance with batch processing.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Whether the backend can be called at all.
    ///
    /// Returning `false` lets the classifier skip the semantic path without
    /// paying for a failed call.
    fn is_available(&self) -> bool {
        true
    }

    /// Get the name/identifier of this embedder (e.g. the model name).
    fn name(&self) -> &str {
        "unknown"
    }
}
