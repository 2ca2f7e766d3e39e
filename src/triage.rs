//! The classification façade.
//!
//! [`TicketClassifier`] composes intent classification, entity extraction,
//! priority and routing into a single call producing an immutable
//! [`ClassificationResult`].
//!
//! # Examples
//!
//! ```
//! use ticket_triage::config::TriageConfig;
//! use ticket_triage::intent::IntentLabel;
//! use ticket_triage::routing::Category;
//! use ticket_triage::triage::TicketClassifier;
//!
//! # tokio_test::block_on(async {
//! let classifier = TicketClassifier::new(TriageConfig::default()).unwrap();
//! let result = classifier.classify_query("Bill mein 200 rupees extra charge hai").await;
//!
//! assert_eq!(result.primary_intent(), IntentLabel::BillingComplaint);
//! assert_eq!(result.category(), Category::Grievance);
//! assert_eq!(result.routing_target(), "billing_team");
//! # });
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::classifier::{
    CascadeClassifier, CascadeOutcome, ClassificationPath, KeywordIntentClassifier,
    SemanticIntentClassifier,
};
use crate::config::TriageConfig;
use crate::embedding::text_embedder::TextEmbedder;
use crate::entity::{EntityExtractor, EntityMap};
use crate::error::Result;
use crate::intent::{IntentDescriptor, IntentLabel, ScoredIntent};
use crate::priority::{PriorityLevel, PriorityResolver};
use crate::routing::{Category, RoutingTable};

/// The outcome of classifying one utterance.
///
/// `tags` is never empty and starts with `primary_intent`; `category` follows from
/// `primary_intent` alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    tags: Vec<IntentLabel>,
    intents: Vec<ScoredIntent>,
    primary_intent: IntentLabel,
    confidence: f32,
    entities: EntityMap,
    priority: PriorityLevel,
    category: Category,
    routing_target: String,
    department: String,
    path: ClassificationPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    degraded_reason: Option<String>,
    raw_input: String,
}

impl ClassificationResult {
    /// Intent labels in rank order.
    pub fn tags(&self) -> &[IntentLabel] {
        &self.tags
    }

    /// Intent labels with their scores, in rank order.
    pub fn intents(&self) -> &[ScoredIntent] {
        &self.intents
    }

    pub fn primary_intent(&self) -> IntentLabel {
        self.primary_intent
    }

    /// Score of the primary intent: cosine similarity on the semantic path,
    /// keyword score otherwise.
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn entities(&self) -> &EntityMap {
        &self.entities
    }

    pub fn priority(&self) -> PriorityLevel {
        self.priority
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn routing_target(&self) -> &str {
        &self.routing_target
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    /// Which classifier produced the intents.
    pub fn path(&self) -> ClassificationPath {
        self.path
    }

    /// Why the semantic path was not used, if it was not.
    pub fn degraded_reason(&self) -> Option<&str> {
        self.degraded_reason.as_deref()
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }
}

/// Entry point of the triage engine.
///
/// Cheap to share behind an `Arc`; all state after construction is read-only
/// except the one-time intent vector cache.
#[derive(Debug)]
pub struct TicketClassifier {
    semantic: Arc<SemanticIntentClassifier>,
    cascade: CascadeClassifier,
    extractor: EntityExtractor,
    priority: PriorityResolver,
    routing: RoutingTable,
    default_intent: IntentLabel,
    threshold: f32,
}

impl TicketClassifier {
    /// Build a classifier with the embedding backend named in the configuration.
    pub fn new(config: TriageConfig) -> Result<Self> {
        config.validate()?;
        let embedder = config.embedding.build_embedder()?;
        Self::build(config, embedder)
    }

    /// Build a classifier around a caller-supplied embedder.
    pub fn with_embedder(config: TriageConfig, embedder: Arc<dyn TextEmbedder>) -> Result<Self> {
        config.validate()?;
        Self::build(config, embedder)
    }

    fn build(config: TriageConfig, embedder: Arc<dyn TextEmbedder>) -> Result<Self> {
        let descriptors: Arc<[IntentDescriptor]> = config.intents.clone().into();
        let keyword = KeywordIntentClassifier::new(&descriptors, config.default_intent)?;
        let semantic = Arc::new(SemanticIntentClassifier::new(
            embedder.clone(),
            descriptors,
            config.similarity_threshold,
            config.embedding.timeout(),
        ));

        log::info!(
            "ticket classifier ready (embedder: {}, available: {}, threshold: {})",
            embedder.name(),
            embedder.is_available(),
            config.similarity_threshold
        );

        Ok(Self {
            cascade: CascadeClassifier::new(semantic.clone(), keyword),
            semantic,
            extractor: EntityExtractor::new(&config.entities)?,
            priority: PriorityResolver::new(&config.priority)?,
            routing: RoutingTable::new(config.routes)?,
            default_intent: config.default_intent,
            threshold: config.similarity_threshold,
        })
    }

    /// Compute the intent reference vectors now instead of on the first request.
    ///
    /// Failure is not fatal: classification keeps working on the keyword path and
    /// the cache is retried on the next request.
    pub async fn warm_up(&self) -> Result<()> {
        self.semantic.warm_up().await
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn default_intent(&self) -> IntentLabel {
        self.default_intent
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    pub fn priority_resolver(&self) -> &PriorityResolver {
        &self.priority
    }

    pub fn entity_extractor(&self) -> &EntityExtractor {
        &self.extractor
    }

    /// Classify one utterance. Never fails.
    pub async fn classify_query(&self, text: &str) -> ClassificationResult {
        if text.trim().is_empty() {
            return self.empty_result(text);
        }

        let CascadeOutcome {
            intents,
            path,
            degraded_reason,
        } = self.cascade.classify(text).await;

        // The cascade never returns an empty list; guard anyway so the result
        // stays well-formed.
        let intents = if intents.is_empty() {
            vec![ScoredIntent::new(self.default_intent, 0.0)]
        } else {
            intents
        };
        let primary = intents[0];

        let entities = self.extractor.extract(text);
        let priority = self.priority.resolve_priority(text, &intents);
        let decision = self.routing.resolve(primary.label);

        log::debug!(
            "classified {:?}: {} ({:.3}) via {:?}, {}, {}",
            text,
            primary.label,
            primary.score,
            path,
            priority,
            decision.routing_target
        );

        ClassificationResult {
            tags: intents.iter().map(|i| i.label).collect(),
            intents,
            primary_intent: primary.label,
            confidence: primary.score,
            entities,
            priority,
            category: decision.category,
            routing_target: decision.routing_target,
            department: decision.department,
            path,
            degraded_reason,
            raw_input: text.to_string(),
        }
    }

    fn empty_result(&self, text: &str) -> ClassificationResult {
        let decision = self.routing.resolve(self.default_intent);
        ClassificationResult {
            tags: vec![self.default_intent],
            intents: vec![ScoredIntent::new(self.default_intent, 0.0)],
            primary_intent: self.default_intent,
            confidence: 0.0,
            entities: EntityMap::new(),
            priority: PriorityLevel::Low,
            category: Category::Query,
            routing_target: decision.routing_target,
            department: decision.department,
            path: ClassificationPath::EmptyInput,
            degraded_reason: None,
            raw_input: text.to_string(),
        }
    }
}
