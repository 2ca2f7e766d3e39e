//! Semantic-first classification with keyword fallback.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::intent::ScoredIntent;

use super::classifier::IntentClassifier;
use super::keyword_classifier::KeywordIntentClassifier;

/// Which strategy produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationPath {
    /// Embedding similarity cleared the threshold.
    Semantic,
    /// Keyword fallback (backend unavailable, failed, or inconclusive).
    Keyword,
    /// Empty or whitespace-only input; default intent without scoring.
    EmptyInput,
}

/// Output of the cascade: ranked intents plus the diagnostic signal.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeOutcome {
    pub intents: Vec<ScoredIntent>,
    pub path: ClassificationPath,
    /// Why the primary classifier was not used, if it was not.
    pub degraded_reason: Option<String>,
}

/// Runs the primary classifier and falls back to keywords when it errors or
/// returns nothing.
#[derive(Debug)]
pub struct CascadeClassifier {
    primary: Arc<dyn IntentClassifier>,
    fallback: KeywordIntentClassifier,
}

impl CascadeClassifier {
    pub fn new(primary: Arc<dyn IntentClassifier>, fallback: KeywordIntentClassifier) -> Self {
        Self { primary, fallback }
    }

    pub fn fallback(&self) -> &KeywordIntentClassifier {
        &self.fallback
    }

    /// Classify the utterance. Never fails and never returns an empty intent list.
    pub async fn classify(&self, text: &str) -> CascadeOutcome {
        if !self.primary.is_available() {
            let reason = format!("{} classifier is unavailable", self.primary.name());
            log::debug!("{reason}; using keyword fallback");
            return self.fall_back(text, reason);
        }

        let reason = match self.primary.classify(text).await {
            Ok(intents) if !intents.is_empty() => {
                return CascadeOutcome {
                    intents,
                    path: ClassificationPath::Semantic,
                    degraded_reason: None,
                };
            }
            Ok(_) => {
                let reason = format!("no intent cleared the {} threshold", self.primary.name());
                log::debug!("{reason}; using keyword fallback");
                reason
            }
            Err(e) => {
                let reason = format!("{} classifier failed: {e}", self.primary.name());
                log::warn!("{reason}; using keyword fallback");
                reason
            }
        };

        self.fall_back(text, reason)
    }

    fn fall_back(&self, text: &str, reason: String) -> CascadeOutcome {
        CascadeOutcome {
            intents: self.fallback.score(text),
            path: ClassificationPath::Keyword,
            degraded_reason: Some(reason),
        }
    }
}
