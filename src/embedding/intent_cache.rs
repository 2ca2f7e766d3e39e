//! Process-wide cache of intent reference vectors.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{Result, TriageError};
use crate::intent::{IntentDescriptor, IntentLabel};
use crate::vector::Vector;

/// A normalized reference vector for one intent.
#[derive(Debug, Clone)]
pub struct IntentVector {
    pub label: IntentLabel,
    pub vector: Vector,
}

/// Embeds every intent description exactly once and serves the vectors read-only.
///
/// Initialization happens on first use (or through [`warm_up`](Self::warm_up)) behind
/// a `OnceCell`, so concurrent first callers wait on a single embedding batch. A
/// failed initialization is not stored: the next call tries again.
#[derive(Debug)]
pub struct IntentVectorCache {
    embedder: Arc<dyn TextEmbedder>,
    descriptors: Arc<[IntentDescriptor]>,
    timeout: Duration,
    vectors: OnceCell<Vec<IntentVector>>,
}

impl IntentVectorCache {
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        descriptors: Arc<[IntentDescriptor]>,
        timeout: Duration,
    ) -> Self {
        Self {
            embedder,
            descriptors,
            timeout,
            vectors: OnceCell::new(),
        }
    }

    /// The reference vectors, computing them on the first successful call.
    pub async fn vectors(&self) -> Result<&[IntentVector]> {
        let vectors = self
            .vectors
            .get_or_try_init(|| self.compute())
            .await?;
        Ok(vectors.as_slice())
    }

    /// Eagerly populate the cache.
    pub async fn warm_up(&self) -> Result<()> {
        self.vectors().await.map(|_| ())
    }

    /// Whether the vectors have been computed.
    pub fn is_initialized(&self) -> bool {
        self.vectors.initialized()
    }

    async fn compute(&self) -> Result<Vec<IntentVector>> {
        let texts: Vec<&str> = self
            .descriptors
            .iter()
            .map(|d| d.description.as_str())
            .collect();

        let embedded = tokio::time::timeout(self.timeout, self.embedder.embed_batch(&texts))
            .await
            .map_err(|_| {
                TriageError::timeout(format!(
                    "embedding {} intent descriptions took longer than {:?}",
                    texts.len(),
                    self.timeout
                ))
            })??;

        if embedded.len() != self.descriptors.len() {
            return Err(TriageError::embedding(format!(
                "expected {} reference vectors, got {}",
                self.descriptors.len(),
                embedded.len()
            )));
        }

        let dimension = embedded.first().map(Vector::dimension).unwrap_or(0);
        if dimension == 0 {
            return Err(TriageError::embedding("embedder returned empty vectors"));
        }

        let mut vectors = Vec::with_capacity(embedded.len());
        for (descriptor, vector) in self.descriptors.iter().zip(embedded) {
            if vector.dimension() != dimension || !vector.is_valid() {
                return Err(TriageError::embedding(format!(
                    "invalid reference vector for {}",
                    descriptor.label
                )));
            }
            vectors.push(IntentVector {
                label: descriptor.label,
                vector: vector.normalized(),
            });
        }

        log::info!(
            "cached {} intent vectors (dimension {}) from embedder '{}'",
            vectors.len(),
            dimension,
            self.embedder.name()
        );

        Ok(vectors)
    }
}
