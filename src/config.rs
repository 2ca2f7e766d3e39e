//! Static configuration for the triage engine.
//!
//! Everything the engine needs is loaded once, validated, and then treated as
//! read-only for the lifetime of the process.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::embedding::EmbeddingConfig;
use crate::entity::EntityConfig;
use crate::error::{Result, TriageError};
use crate::intent::{IntentDescriptor, IntentLabel, default_descriptors};
use crate::priority::PriorityConfig;
use crate::routing::{Route, RoutingTable, default_routes};

/// Default cosine similarity an intent must reach to be tagged.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.25;

/// Complete engine configuration.
///
/// Every field has a default, so a JSON file only needs the parts it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Minimum cosine similarity for the semantic path.
    pub similarity_threshold: f32,
    pub embedding: EmbeddingConfig,
    /// Intent reference descriptions and fallback keywords.
    pub intents: Vec<IntentDescriptor>,
    pub routes: HashMap<IntentLabel, Route>,
    pub priority: PriorityConfig,
    pub entities: EntityConfig,
    /// Catch-all intent when nothing matches.
    pub default_intent: IntentLabel,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            embedding: EmbeddingConfig::default(),
            intents: default_descriptors(),
            routes: default_routes(),
            priority: PriorityConfig::default(),
            entities: EntityConfig::default(),
            default_intent: IntentLabel::SupportRequest,
        }
    }
}

impl TriageConfig {
    /// Load a JSON configuration file. The result is not validated yet.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the configuration for defects that would make classification partial.
    pub fn validate(&self) -> Result<()> {
        if !self.similarity_threshold.is_finite()
            || !(-1.0..=1.0).contains(&self.similarity_threshold)
        {
            return Err(TriageError::config(format!(
                "similarity_threshold must lie in [-1, 1], got {}",
                self.similarity_threshold
            )));
        }

        if self.embedding.timeout_ms == 0 {
            return Err(TriageError::config("embedding.timeout_ms must be positive"));
        }

        for label in IntentLabel::ALL {
            let described: Vec<&IntentDescriptor> =
                self.intents.iter().filter(|d| d.label == label).collect();
            match described.as_slice() {
                [] => {
                    return Err(TriageError::config(format!(
                        "intent {label} has no descriptor"
                    )));
                }
                [descriptor] => {
                    if descriptor.description.trim().is_empty() {
                        return Err(TriageError::config(format!(
                            "intent {label} has an empty description"
                        )));
                    }
                    if descriptor.keywords.iter().all(|k| k.trim().is_empty()) {
                        return Err(TriageError::config(format!(
                            "intent {label} has no fallback keywords"
                        )));
                    }
                }
                _ => {
                    return Err(TriageError::config(format!(
                        "intent {label} is described {} times",
                        described.len()
                    )));
                }
            }
        }

        RoutingTable::new(self.routes.clone())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TriageConfig::default();
        config.validate().unwrap();
        assert_eq!(config.similarity_threshold, 0.25);
        assert_eq!(config.default_intent, IntentLabel::SupportRequest);
    }

    #[test]
    fn test_round_trip_through_file() {
        let config = TriageConfig::default();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(config.to_json_pretty().unwrap().as_bytes())
            .unwrap();

        let loaded = TriageConfig::from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"similarity_threshold": 0.3}}"#).unwrap();

        let loaded = TriageConfig::from_file(file.path()).unwrap();
        assert_eq!(loaded.similarity_threshold, 0.3);
        assert_eq!(loaded.intents.len(), 8);
        loaded.validate().unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = TriageConfig::from_file("/definitely/not/here.json");
        assert!(matches!(result, Err(TriageError::Io(_))));
    }

    #[test]
    fn test_malformed_file_is_json_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            TriageConfig::from_file(file.path()),
            Err(TriageError::Json(_))
        ));
    }

    #[test]
    fn test_validate_rejects_defects() {
        let config = TriageConfig {
            similarity_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = TriageConfig::default();
        config.intents.retain(|d| d.label != IntentLabel::PlanChange);
        assert!(config.validate().unwrap_err().to_string().contains("PLAN_CHANGE"));

        let mut config = TriageConfig::default();
        let duplicate = config.intents[0].clone();
        config.intents.push(duplicate);
        assert!(config.validate().is_err());

        let mut config = TriageConfig::default();
        config.intents[1].description = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = TriageConfig::default();
        config.routes.remove(&IntentLabel::BalanceQuery);
        assert!(matches!(config.validate(), Err(TriageError::Config(_))));

        let mut config = TriageConfig::default();
        config.embedding.timeout_ms = 0;
        assert!(config.validate().is_err());
    }
}
