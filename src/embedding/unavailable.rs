//! Embedder used when no embedding backend is configured.
//!
//! [`UnavailableEmbedder`] never produces a vector. The classifier sees
//! `is_available() == false` and goes straight to keyword matching.

use async_trait::async_trait;

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{Result, TriageError};
use crate::vector::Vector;

/// An embedder that reports the backend as unavailable.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use ticket_triage::embedding::text_embedder::TextEmbedder;
/// use ticket_triage::embedding::unavailable::UnavailableEmbedder;
///
/// let embedder: Arc<dyn TextEmbedder> = Arc::new(UnavailableEmbedder::new());
/// assert!(!embedder.is_available());
/// ```
#[derive(Debug, Clone, Default)]
pub struct UnavailableEmbedder;

impl UnavailableEmbedder {
    /// Creates a new `UnavailableEmbedder`.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextEmbedder for UnavailableEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vector> {
        Err(TriageError::embedding("no embedding backend configured"))
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_available() {
        let embedder = UnavailableEmbedder::new();
        assert!(!embedder.is_available());
        assert_eq!(embedder.name(), "unavailable");
    }

    #[tokio::test]
    async fn test_embed_returns_backend_error() {
        let embedder = UnavailableEmbedder::new();

        let err = embedder.embed("hello").await.unwrap_err();
        assert!(err.is_backend_failure());

        let err = embedder.embed_batch(&["a", "b"]).await.unwrap_err();
        assert!(err.is_backend_failure());
    }

    #[test]
    fn test_debug() {
        let embedder = UnavailableEmbedder::new();
        assert_eq!(format!("{:?}", embedder), "UnavailableEmbedder");
    }
}
