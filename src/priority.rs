//! Rule-based priority resolution.
//!
//! Rules, first match wins:
//!
//! 1. the text contains an urgent keyword anywhere, even inside a longer word: HIGH
//! 2. otherwise the primary intent's tier from the tier table
//! 3. intents absent from the table: LOW

use std::collections::HashMap;
use std::fmt;

use regex::RegexSet;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::intent::{IntentLabel, ScoredIntent};

/// Ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityLevel {
    High,
    Medium,
    Low,
}

impl PriorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::High => "HIGH",
            PriorityLevel::Medium => "MEDIUM",
            PriorityLevel::Low => "LOW",
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgent keywords and the intent tier table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityConfig {
    /// Phrases that escalate any utterance to HIGH.
    pub urgent_keywords: Vec<String>,
    /// Tier per primary intent; missing intents resolve to LOW.
    pub tiers: HashMap<IntentLabel, PriorityLevel>,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        let urgent_keywords = [
            "not working",
            "stopped",
            "failed",
            "down",
            "emergency",
            "urgent",
            "immediately",
            "nahi chal raha",
            "band",
            "kaam nahi kar raha",
            "nahi kar raha",
        ]
        .iter()
        .map(|k| k.to_string())
        .collect();

        let tiers = HashMap::from([
            (IntentLabel::NetworkIssue, PriorityLevel::High),
            (IntentLabel::BillingComplaint, PriorityLevel::High),
            (IntentLabel::TechnicalSupport, PriorityLevel::High),
            (IntentLabel::RechargeRequest, PriorityLevel::Medium),
            (IntentLabel::PlanChange, PriorityLevel::Medium),
            (IntentLabel::SupportRequest, PriorityLevel::Medium),
        ]);

        Self {
            urgent_keywords,
            tiers,
        }
    }
}

/// Evaluates the priority rules against an utterance and its primary intent.
#[derive(Debug, Clone)]
pub struct PriorityResolver {
    keywords: Vec<String>,
    urgent: RegexSet,
    tiers: HashMap<IntentLabel, PriorityLevel>,
}

impl PriorityResolver {
    pub fn new(config: &PriorityConfig) -> Result<Self> {
        let keywords: Vec<String> = config
            .urgent_keywords
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        let urgent = RegexSet::new(keywords.iter().map(|k| urgent_pattern(k)))?;

        Ok(Self {
            keywords,
            urgent,
            tiers: config.tiers.clone(),
        })
    }

    /// The first configured urgent keyword found in the text, if any.
    pub fn urgent_keyword(&self, text: &str) -> Option<&str> {
        self.urgent
            .matches(text)
            .iter()
            .next()
            .map(|i| self.keywords[i].as_str())
    }

    /// Priority for an utterance whose primary intent is already known.
    pub fn resolve(&self, text: &str, primary: IntentLabel) -> PriorityLevel {
        if let Some(keyword) = self.urgent_keyword(text) {
            log::debug!("urgent keyword {keyword:?} escalates to HIGH");
            return PriorityLevel::High;
        }
        self.tier(primary)
    }

    /// Priority for an utterance and its ranked intent list; the first intent is
    /// the primary one. An empty list only honours urgent keywords.
    pub fn resolve_priority(&self, text: &str, intents: &[ScoredIntent]) -> PriorityLevel {
        match intents.first() {
            Some(primary) => self.resolve(text, primary.label),
            None if self.urgent.is_match(text) => PriorityLevel::High,
            None => PriorityLevel::Low,
        }
    }

    /// Tier-table priority for an intent, ignoring keywords.
    pub fn tier(&self, intent: IntentLabel) -> PriorityLevel {
        self.tiers.get(&intent).copied().unwrap_or(PriorityLevel::Low)
    }
}

/// Case-insensitive substring pattern for an urgent phrase; inner whitespace
/// matches any run of whitespace. Unlike intent keywords there are no word
/// boundaries, so "urgently" and "downtime" escalate.
fn urgent_pattern(phrase: &str) -> String {
    let body = phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    format!("(?i){body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PriorityResolver {
        PriorityResolver::new(&PriorityConfig::default()).unwrap()
    }

    #[test]
    fn test_tiers() {
        let resolver = resolver();
        assert_eq!(resolver.resolve("hello", IntentLabel::NetworkIssue), PriorityLevel::High);
        assert_eq!(resolver.resolve("hello", IntentLabel::BillingComplaint), PriorityLevel::High);
        assert_eq!(resolver.resolve("hello", IntentLabel::PlanChange), PriorityLevel::Medium);
        assert_eq!(resolver.resolve("hello", IntentLabel::SupportRequest), PriorityLevel::Medium);
        assert_eq!(resolver.resolve("hello", IntentLabel::BalanceQuery), PriorityLevel::Low);
        assert_eq!(resolver.resolve("hello", IntentLabel::OfferInquiry), PriorityLevel::Low);
    }

    #[test]
    fn test_urgent_keyword_dominates_tier() {
        let resolver = resolver();
        for text in [
            "offer page not working",
            "balance check URGENT",
            "app band ho gaya",
            "data nahi chal raha",
            "balance app   not   working",
        ] {
            assert_eq!(
                resolver.resolve(text, IntentLabel::OfferInquiry),
                PriorityLevel::High,
                "{text}"
            );
        }
    }

    #[test]
    fn test_urgent_keywords_match_inside_words() {
        let resolver = resolver();
        assert_eq!(resolver.urgent_keyword("balance batao, urgently"), Some("urgent"));
        assert_eq!(resolver.urgent_keyword("site downtime hai"), Some("down"));
        assert_eq!(resolver.urgent_keyword("mera balance check bandh hai"), Some("band"));
        for text in [
            "Kitna data balance bacha hai, urgently batao",
            "koi cashback offer hai? site downtime hai",
            "mera balance check bandh hai",
        ] {
            assert_eq!(
                resolver.resolve(text, IntentLabel::BalanceQuery),
                PriorityLevel::High,
                "{text}"
            );
        }
        assert_eq!(resolver.urgent_keyword("kitna data bacha hai"), None);
    }

    #[test]
    fn test_resolve_priority_uses_first_intent() {
        let resolver = resolver();
        let intents = vec![
            ScoredIntent::new(IntentLabel::BalanceQuery, 0.6),
            ScoredIntent::new(IntentLabel::NetworkIssue, 0.4),
        ];
        assert_eq!(resolver.resolve_priority("kitna bacha", &intents), PriorityLevel::Low);
        assert_eq!(resolver.resolve_priority("", &[]), PriorityLevel::Low);
        assert_eq!(resolver.resolve_priority("urgent", &[]), PriorityLevel::High);
    }

    #[test]
    fn test_custom_table() {
        let config = PriorityConfig {
            urgent_keywords: vec![],
            tiers: HashMap::from([(IntentLabel::OfferInquiry, PriorityLevel::Medium)]),
        };
        let resolver = PriorityResolver::new(&config).unwrap();
        assert_eq!(resolver.resolve("not working", IntentLabel::OfferInquiry), PriorityLevel::Medium);
        assert_eq!(resolver.resolve("not working", IntentLabel::NetworkIssue), PriorityLevel::Low);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&PriorityLevel::High).unwrap(), "\"HIGH\"");
        let config: PriorityConfig =
            serde_json::from_str(r#"{"tiers":{"BALANCE_QUERY":"MEDIUM"}}"#).unwrap();
        assert_eq!(config.tiers.get(&IntentLabel::BalanceQuery), Some(&PriorityLevel::Medium));
        assert!(!config.urgent_keywords.is_empty());
    }
}
