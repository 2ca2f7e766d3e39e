//! Pattern-driven entity extraction.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::entity::EntityConfig;
use crate::entity::types::{EntityMap, EntityType};
use crate::error::Result;

lazy_static! {
    /// Digits next to a currency marker: `₹500`, `Rs. 500`, `INR 500`, `500 rupees`, `500rs`.
    static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"(?i)(?:₹\s*|\b(?:rs|inr)\.?\s*)(\d[\d,]*)|\b(\d[\d,]*)\s*(?:rupees|rupee|rupaye|rupaiye|rs|inr)\b"
    )
    .expect("amount pattern is valid");
}

/// Extracts amount, service, issue, plan name, timeframe and device entities.
///
/// Each family is evaluated once per call and keeps only its leftmost match.
/// Families are independent of each other and of intent classification.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    vocabularies: Vec<(EntityType, Regex)>,
    plan_catalog: Option<Regex>,
    catalog_names: Vec<String>,
    plan_pattern: Option<Regex>,
    operators: Vec<String>,
    tiers: Vec<String>,
}

impl EntityExtractor {
    pub fn new(config: &EntityConfig) -> Result<Self> {
        let mut vocabularies = Vec::new();
        for (entity_type, words) in [
            (EntityType::Service, &config.services),
            (EntityType::Issue, &config.issues),
            (EntityType::Timeframe, &config.timeframes),
            (EntityType::Device, &config.devices),
        ] {
            if let Some(regex) = alternation(words)? {
                vocabularies.push((entity_type, regex));
            }
        }

        let operators = alternation_body(&config.plan_operators);
        let tiers = alternation_body(&config.plan_tiers);
        let plan_pattern = match (operators.is_empty(), tiers.is_empty()) {
            (true, _) => None,
            (false, true) => Some(Regex::new(&format!(r"(?i)\b({operators})\b"))?),
            (false, false) => Some(Regex::new(&format!(
                r"(?i)\b({operators})(?:\s+({tiers}))?\b"
            ))?),
        };

        Ok(Self {
            vocabularies,
            plan_catalog: alternation(&config.plan_catalog)?,
            catalog_names: config.plan_catalog.clone(),
            plan_pattern,
            operators: config.plan_operators.clone(),
            tiers: config.plan_tiers.clone(),
        })
    }

    /// Extract entities from the utterance. Never fails; unmatched types are absent.
    pub fn extract(&self, text: &str) -> EntityMap {
        let mut entities = EntityMap::new();

        if let Some(amount) = extract_amount(text) {
            entities.insert_first(EntityType::Amount, amount);
        }

        for (entity_type, regex) in &self.vocabularies {
            if let Some(m) = regex.find(text) {
                entities.insert_first(*entity_type, collapse(m.as_str()).to_lowercase());
            }
        }

        if let Some(plan) = self.extract_plan_name(text) {
            entities.insert_first(EntityType::PlanName, plan);
        }

        entities
    }

    fn extract_plan_name(&self, text: &str) -> Option<String> {
        let catalog = self
            .plan_catalog
            .as_ref()
            .and_then(|r| r.find(text))
            .map(|m| (m.start(), m.end(), self.catalog_name(m.as_str())));

        let pattern = self
            .plan_pattern
            .as_ref()
            .and_then(|r| r.captures(text))
            .and_then(|caps| {
                let whole = caps.get(0)?;
                Some((whole.start(), whole.end(), self.operator_plan_name(&caps)))
            });

        // Leftmost wins; on the same start the longer match wins.
        let best = match (catalog, pattern) {
            (Some(c), Some(p)) => {
                if (c.0, std::cmp::Reverse(c.1)) <= (p.0, std::cmp::Reverse(p.1)) {
                    c
                } else {
                    p
                }
            }
            (Some(c), None) => c,
            (None, Some(p)) => p,
            (None, None) => return None,
        };
        Some(best.2)
    }

    fn catalog_name(&self, matched: &str) -> String {
        let key = collapse(matched).to_lowercase();
        self.catalog_names
            .iter()
            .find(|name| collapse(name).to_lowercase() == key)
            .map(|name| collapse(name))
            .unwrap_or_else(|| collapse(matched))
    }

    fn operator_plan_name(&self, caps: &Captures<'_>) -> String {
        let mut parts = Vec::with_capacity(2);
        if let Some(operator) = caps.get(1) {
            parts.push(canonical(&self.operators, operator.as_str()));
        }
        if let Some(tier) = caps.get(2) {
            parts.push(canonical(&self.tiers, tier.as_str()));
        }
        parts.join(" ")
    }
}

/// Leftmost currency-adjacent amount, with grouping commas and leading zeros removed.
pub fn extract_amount(text: &str) -> Option<String> {
    let caps = AMOUNT_PATTERN.captures(text)?;
    let digits = caps.get(1).or_else(|| caps.get(2))?.as_str();
    let plain: String = digits.chars().filter(char::is_ascii_digit).collect();
    let trimmed = plain.trim_start_matches('0');
    Some(if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    })
}

/// Regex body `a|b|c` for the phrases, longest first so that at any position the
/// longest phrase wins.
fn alternation_body(words: &[String]) -> String {
    let mut phrases: Vec<String> = words
        .iter()
        .map(|w| {
            w.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .filter(|p| !p.is_empty())
        .collect();
    phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    phrases.dedup();
    phrases.join("|")
}

fn alternation(words: &[String]) -> Result<Option<Regex>> {
    let body = alternation_body(words);
    if body.is_empty() {
        return Ok(None);
    }
    Ok(Some(Regex::new(&format!(r"(?i)\b(?:{body})\b"))?))
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn canonical(names: &[String], matched: &str) -> String {
    names
        .iter()
        .find(|name| name.eq_ignore_ascii_case(matched))
        .cloned()
        .unwrap_or_else(|| matched.to_string())
}
