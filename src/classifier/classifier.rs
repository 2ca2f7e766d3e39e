//! Intent classifier trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::intent::ScoredIntent;

/// Intent classifier trait.
///
/// Implementations return every intent they consider present in the utterance,
/// ordered by score descending with ties broken by intent rank. An empty list
/// means "nothing cleared the bar"; an error means the classifier could not run.
#[async_trait]
pub trait IntentClassifier: Send + Sync + std::fmt::Debug {
    /// Score the utterance against the intent catalog.
    async fn classify(&self, text: &str) -> Result<Vec<ScoredIntent>>;

    /// Whether the classifier can run at all. Callers may skip an unavailable
    /// classifier instead of waiting for its error.
    fn is_available(&self) -> bool {
        true
    }

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}
