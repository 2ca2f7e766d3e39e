//! Fake embedders shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use ticket_triage::embedding::text_embedder::TextEmbedder;
use ticket_triage::error::{Result, TriageError};
use ticket_triage::intent::IntentLabel;
use ticket_triage::vector::Vector;

/// Concept words per intent axis, in `IntentLabel::ALL` order.
const CONCEPTS: [(IntentLabel, &[&str]); 8] = [
    (
        IntentLabel::NetworkIssue,
        &["network", "internet", "slow", "signal", "connection"],
    ),
    (
        IntentLabel::BillingComplaint,
        &["bill", "billing", "charge", "charges", "deductions", "refund"],
    ),
    (
        IntentLabel::TechnicalSupport,
        &["technical", "sim", "app", "configuration"],
    ),
    (IntentLabel::RechargeRequest, &["recharge", "top-up", "topup"]),
    (
        IntentLabel::PlanChange,
        &["upgrade", "downgrade", "switch", "subscription"],
    ),
    (
        IntentLabel::SupportRequest,
        &["help", "customer", "care", "complaint"],
    ),
    (
        IntentLabel::BalanceQuery,
        &["balance", "quota", "remaining", "bacha", "kitna"],
    ),
    (
        IntentLabel::OfferInquiry,
        &["offer", "offers", "discounts", "cashback", "deals"],
    ),
];

/// Deterministic embedder: one axis per intent, counting that intent's concept
/// words. Every built-in intent description lands on its own axis only.
#[derive(Debug, Default)]
pub struct ConceptEmbedder;

impl ConceptEmbedder {
    pub fn vector(text: &str) -> Vector {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '-'))
            .filter(|t| !t.is_empty())
            .collect();

        let data = CONCEPTS
            .iter()
            .map(|(_, words)| tokens.iter().filter(|t| words.contains(*t)).count() as f32)
            .collect();
        Vector::new(data)
    }
}

#[async_trait]
impl TextEmbedder for ConceptEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        Ok(Self::vector(text))
    }

    fn name(&self) -> &str {
        "concept"
    }
}

/// Backend that claims to be available but fails every call.
#[derive(Debug, Default)]
pub struct FailingEmbedder;

#[async_trait]
impl TextEmbedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vector> {
        Err(TriageError::embedding("connection refused"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Backend that answers correctly, but only after `delay`.
#[derive(Debug)]
pub struct SlowEmbedder {
    pub delay: Duration,
}

#[async_trait]
impl TextEmbedder for SlowEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        tokio::time::sleep(self.delay).await;
        Ok(ConceptEmbedder::vector(text))
    }

    fn name(&self) -> &str {
        "slow"
    }
}

/// Concept embedder that counts description (batch) and query (single) calls.
#[derive(Debug, Default)]
pub struct CountingEmbedder {
    pub batch_calls: AtomicUsize,
    pub single_calls: AtomicUsize,
}

#[async_trait]
impl TextEmbedder for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ConceptEmbedder::vector(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        // Widen the race window for concurrent first callers.
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(texts.iter().map(|t| ConceptEmbedder::vector(t)).collect())
    }

    fn name(&self) -> &str {
        "counting"
    }
}
