//! Entity types and the extracted entity map.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kinds of structured fields pulled from an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Amount,
    Service,
    Issue,
    PlanName,
    Timeframe,
    Device,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Amount => "amount",
            EntityType::Service => "service",
            EntityType::Issue => "issue",
            EntityType::PlanName => "plan_name",
            EntityType::Timeframe => "timeframe",
            EntityType::Device => "device",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracted entities, at most one value per type.
///
/// Keys are present only when a pattern matched. Serializes as a plain JSON
/// object with keys in a fixed order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityMap {
    entries: BTreeMap<EntityType, String>,
}

impl EntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value unless the type is already present (first hit wins).
    pub fn insert_first(&mut self, entity_type: EntityType, value: String) -> bool {
        if self.entries.contains_key(&entity_type) {
            return false;
        }
        self.entries.insert(entity_type, value);
        true
    }

    pub fn get(&self, entity_type: EntityType) -> Option<&str> {
        self.entries.get(&entity_type).map(String::as_str)
    }

    pub fn contains(&self, entity_type: EntityType) -> bool {
        self.entries.contains_key(&entity_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityType, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_hit_wins() {
        let mut map = EntityMap::new();
        assert!(map.insert_first(EntityType::Amount, "500".to_string()));
        assert!(!map.insert_first(EntityType::Amount, "200".to_string()));
        assert_eq!(map.get(EntityType::Amount), Some("500"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_serializes_as_object() {
        let mut map = EntityMap::new();
        map.insert_first(EntityType::Service, "internet".to_string());
        map.insert_first(EntityType::Amount, "500".to_string());
        map.insert_first(EntityType::PlanName, "Jio Premium".to_string());

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(
            json,
            r#"{"amount":"500","service":"internet","plan_name":"Jio Premium"}"#
        );

        let back: EntityMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
