//! Structured entity extraction from free text.
//!
//! Extraction is best-effort pattern matching: amounts next to a currency marker,
//! plus first-hit lookups in fixed vocabularies for services, issues, timeframes,
//! devices and plan names. It is independent of intent classification.

pub mod extractor;
pub mod types;

use serde::{Deserialize, Serialize};

pub use extractor::EntityExtractor;
pub use types::{EntityMap, EntityType};

/// Vocabularies used by the [`EntityExtractor`].
///
/// Phrases are matched case-insensitively on word boundaries; whitespace inside a
/// phrase matches any run of whitespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    pub services: Vec<String>,
    pub issues: Vec<String>,
    pub devices: Vec<String>,
    pub timeframes: Vec<String>,
    /// Operator tokens that start a plan name ("Jio", "Airtel", ...).
    pub plan_operators: Vec<String>,
    /// Optional tier token following an operator ("Premium", "Smart", ...).
    pub plan_tiers: Vec<String>,
    /// Full plan names looked up verbatim.
    pub plan_catalog: Vec<String>,
}

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            services: strings(&[
                "data", "internet", "call", "calls", "calling", "sms", "roaming", "network",
                "hotspot", "wifi", "broadband", "4g", "5g", "volte",
            ]),
            issues: strings(&[
                "slow", "not working", "stopped", "failed", "down", "problem", "issue",
                "nahi chal raha", "nahi ho raha", "kaam nahi kar raha", "band", "kharab",
                "extra charge", "wrong charge", "overcharged", "deducted", "kat gaya",
                "no signal", "disconnect", "call drop", "buffering",
            ]),
            devices: strings(&[
                "sim card", "sim", "esim", "phone", "mobile", "handset", "router", "wifi router",
                "modem", "dongle", "jiofi",
            ]),
            timeframes: strings(&[
                "today", "yesterday", "since yesterday", "morning", "since morning",
                "this morning", "last week", "this week", "this month", "last month", "aaj",
                "kal", "kal se", "subah se", "do din se", "hafte se",
            ]),
            plan_operators: strings(&["Jio", "Airtel", "Vi", "Vodafone", "BSNL"]),
            plan_tiers: strings(&[
                "Basic", "Smart", "Premium", "Value", "Max", "Super", "Unlimited",
            ]),
            plan_catalog: strings(&[
                "Jio Unlimited 299", "Airtel Xstream", "Family Pack", "Student Pack",
                "Data Booster", "Weekend Data Rollover",
            ]),
        }
    }
}
