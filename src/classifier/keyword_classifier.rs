//! Keyword-based intent classifier.

use async_trait::async_trait;
use regex::RegexSet;

use crate::error::{Result, TriageError};
use crate::intent::{IntentDescriptor, IntentLabel, ScoredIntent, rank_intents};

use super::classifier::IntentClassifier;

/// Deterministic keyword-membership classifier.
///
/// Each intent owns a set of keyword phrases, matched case-insensitively on word
/// boundaries. An intent with `h` distinct matching phrases scores `h / (h + 1)`.
/// When nothing matches, the default intent is returned with score 0, so the
/// result is never empty.
pub struct KeywordIntentClassifier {
    rules: Vec<(IntentLabel, RegexSet)>,
    default_intent: IntentLabel,
}

impl std::fmt::Debug for KeywordIntentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordIntentClassifier")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|(label, set)| (label, set.len()))
                    .collect::<Vec<_>>(),
            )
            .field("default_intent", &self.default_intent)
            .finish()
    }
}

impl KeywordIntentClassifier {
    /// Create a keyword classifier from the descriptors' keyword lists.
    pub fn new(descriptors: &[IntentDescriptor], default_intent: IntentLabel) -> Result<Self> {
        let mut rules = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let keywords: Vec<&str> = descriptor
                .keywords
                .iter()
                .map(|k| k.trim())
                .filter(|k| !k.is_empty())
                .collect();
            if keywords.is_empty() {
                return Err(TriageError::config(format!(
                    "intent {} has no fallback keywords",
                    descriptor.label
                )));
            }
            let patterns = keywords.iter().map(|k| phrase_pattern(k));
            rules.push((descriptor.label, RegexSet::new(patterns)?));
        }

        Ok(Self {
            rules,
            default_intent,
        })
    }

    /// Score the utterance. Never empty.
    pub fn score(&self, text: &str) -> Vec<ScoredIntent> {
        let mut intents: Vec<ScoredIntent> = self
            .rules
            .iter()
            .filter_map(|(label, set)| {
                let hits = set.matches(text).iter().count();
                (hits > 0).then(|| ScoredIntent::new(*label, hits as f32 / (hits as f32 + 1.0)))
            })
            .collect();

        if intents.is_empty() {
            return vec![ScoredIntent::new(self.default_intent, 0.0)];
        }

        rank_intents(&mut intents);
        intents
    }

    pub fn default_intent(&self) -> IntentLabel {
        self.default_intent
    }
}

#[async_trait]
impl IntentClassifier for KeywordIntentClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<ScoredIntent>> {
        Ok(self.score(text))
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

/// Case-insensitive, word-bounded pattern for a keyword phrase; inner whitespace
/// matches any run of whitespace.
fn phrase_pattern(phrase: &str) -> String {
    let body = phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    format!(r"(?i)\b{body}\b")
}
