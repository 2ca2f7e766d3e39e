//! Zero-shot intent classifier using embedding similarity.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::embedding::intent_cache::IntentVectorCache;
use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{Result, TriageError};
use crate::intent::{IntentDescriptor, ScoredIntent, rank_intents};

use super::classifier::IntentClassifier;

/// Multi-label classifier comparing the utterance embedding with each intent's
/// reference embedding.
///
/// Every intent whose cosine similarity reaches `threshold` is returned.
#[derive(Debug)]
pub struct SemanticIntentClassifier {
    embedder: Arc<dyn TextEmbedder>,
    cache: IntentVectorCache,
    threshold: f32,
    timeout: Duration,
}

impl SemanticIntentClassifier {
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        descriptors: Arc<[IntentDescriptor]>,
        threshold: f32,
        timeout: Duration,
    ) -> Self {
        let cache = IntentVectorCache::new(embedder.clone(), descriptors, timeout);
        Self {
            embedder,
            cache,
            threshold,
            timeout,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Populate the reference vector cache ahead of the first request.
    pub async fn warm_up(&self) -> Result<()> {
        self.cache.warm_up().await
    }

    /// Similarity of the utterance to every intent, unfiltered and ranked.
    pub async fn similarities(&self, text: &str) -> Result<Vec<ScoredIntent>> {
        if !self.embedder.is_available() {
            return Err(TriageError::embedding(format!(
                "embedder '{}' is unavailable",
                self.embedder.name()
            )));
        }

        let references = self.cache.vectors().await?;

        let query = tokio::time::timeout(self.timeout, self.embedder.embed(text))
            .await
            .map_err(|_| {
                TriageError::timeout(format!(
                    "embedding the utterance took longer than {:?}",
                    self.timeout
                ))
            })??;

        if !query.is_valid() {
            return Err(TriageError::embedding("embedder returned a non-finite vector"));
        }

        let mut scored = Vec::with_capacity(references.len());
        for reference in references {
            let score = query.cosine_similarity(&reference.vector)?;
            scored.push(ScoredIntent::new(reference.label, score));
        }
        rank_intents(&mut scored);

        Ok(scored)
    }
}

#[async_trait]
impl IntentClassifier for SemanticIntentClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<ScoredIntent>> {
        let scored = self.similarities(text).await?;
        log::debug!("semantic similarities for {:?}: {:?}", text, scored);

        // Already ranked, so the filtered list stays ranked.
        Ok(scored
            .into_iter()
            .filter(|intent| intent.score >= self.threshold)
            .collect())
    }

    fn is_available(&self) -> bool {
        self.embedder.is_available()
    }

    fn name(&self) -> &str {
        "semantic"
    }
}
