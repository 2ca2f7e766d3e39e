//! Canonical intents, their reference descriptions and scored intent lists.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};

/// Canonical service intents.
///
/// Declaration order is the tie-break rank: ticket-creating intents come before
/// informational ones so equal scores always yield the same primary intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentLabel {
    /// Slow internet, dropped connection, no signal.
    NetworkIssue,
    /// Wrong charges, unexpected deductions, refunds.
    BillingComplaint,
    /// SIM, app or device configuration problems.
    TechnicalSupport,
    /// Recharge or top-up.
    RechargeRequest,
    /// Upgrade, downgrade or switch plan.
    PlanChange,
    /// General help, customer care, catch-all.
    SupportRequest,
    /// Remaining data, balance, quota.
    BalanceQuery,
    /// Discounts, cashback, deals.
    OfferInquiry,
}

impl IntentLabel {
    /// All intents in rank order.
    pub const ALL: [IntentLabel; 8] = [
        IntentLabel::NetworkIssue,
        IntentLabel::BillingComplaint,
        IntentLabel::TechnicalSupport,
        IntentLabel::RechargeRequest,
        IntentLabel::PlanChange,
        IntentLabel::SupportRequest,
        IntentLabel::BalanceQuery,
        IntentLabel::OfferInquiry,
    ];

    /// Stable upper-case name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentLabel::NetworkIssue => "NETWORK_ISSUE",
            IntentLabel::BillingComplaint => "BILLING_COMPLAINT",
            IntentLabel::TechnicalSupport => "TECHNICAL_SUPPORT",
            IntentLabel::RechargeRequest => "RECHARGE_REQUEST",
            IntentLabel::PlanChange => "PLAN_CHANGE",
            IntentLabel::SupportRequest => "SUPPORT_REQUEST",
            IntentLabel::BalanceQuery => "BALANCE_QUERY",
            IntentLabel::OfferInquiry => "OFFER_INQUIRY",
        }
    }

    /// Whether a primary intent of this kind opens a tracked grievance.
    pub fn is_ticket_creating(&self) -> bool {
        matches!(
            self,
            IntentLabel::NetworkIssue | IntentLabel::BillingComplaint | IntentLabel::TechnicalSupport
        )
    }

    /// Position in the tie-break ranking (0 is strongest).
    pub fn rank(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentLabel {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        IntentLabel::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == normalized)
            .ok_or_else(|| TriageError::invalid_argument(format!("unknown intent label: {s}")))
    }
}

/// Reference description of an intent.
///
/// `description` is embedded once at start-up; `keywords` drive the keyword
/// classifier when the embedding path is unavailable or inconclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentDescriptor {
    pub label: IntentLabel,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl IntentDescriptor {
    pub fn new<S: Into<String>>(label: IntentLabel, description: S, keywords: &[&str]) -> Self {
        Self {
            label,
            description: description.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// The built-in intent catalog.
pub fn default_descriptors() -> Vec<IntentDescriptor> {
    vec![
        IntentDescriptor::new(
            IntentLabel::BalanceQuery,
            "User wants to check data balance, remaining quota, or how much data is left",
            &[
                "balance", "data balance", "data", "remaining", "left", "kitna", "kitni",
                "bacha", "baki", "how much", "quota", "usage", "validity",
            ],
        ),
        IntentDescriptor::new(
            IntentLabel::NetworkIssue,
            "User experiencing slow internet, connection problems, network down, poor signal",
            &[
                "network", "internet", "slow", "signal", "connection", "nahi chal raha",
                "tower", "call drop", "no service", "4g", "5g", "speed", "buffering",
            ],
        ),
        IntentDescriptor::new(
            IntentLabel::RechargeRequest,
            "User wants to recharge, top-up, buy a plan, or inquire about recharge options",
            &["recharge", "top up", "top-up", "topup", "buy plan", "recharge karna"],
        ),
        IntentDescriptor::new(
            IntentLabel::BillingComplaint,
            "User has billing issues, wrong charges, unexpected deductions, refund requests",
            &[
                "bill", "billing", "charge", "charged", "extra charge", "wrong charge",
                "deducted", "deduction", "kat gaya", "refund", "overcharged", "payment",
            ],
        ),
        IntentDescriptor::new(
            IntentLabel::SupportRequest,
            "User needs help, wants to talk to customer care, has a general complaint",
            &[
                "help", "support", "customer care", "complaint", "problem", "issue", "agent",
                "baat karni", "madad",
            ],
        ),
        IntentDescriptor::new(
            IntentLabel::OfferInquiry,
            "User asking about discounts, cashback, promotional offers, deals",
            &["offer", "offers", "discount", "cashback", "deal", "deals", "free", "promo"],
        ),
        IntentDescriptor::new(
            IntentLabel::PlanChange,
            "User wants to upgrade, downgrade, switch plans, or modify their subscription",
            &[
                "upgrade", "downgrade", "switch", "change plan", "plan change", "new plan",
                "plan badalna", "subscription", "port",
            ],
        ),
        IntentDescriptor::new(
            IntentLabel::TechnicalSupport,
            "User has technical issues like SIM problems, app not working, configuration issues",
            &[
                "sim", "sim card", "app", "kaam nahi", "configuration", "settings", "apn",
                "otp", "error", "activate", "esim",
            ],
        ),
    ]
}

/// An intent paired with its similarity (or keyword) score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredIntent {
    pub label: IntentLabel,
    pub score: f32,
}

impl ScoredIntent {
    pub fn new(label: IntentLabel, score: f32) -> Self {
        Self { label, score }
    }
}

/// Order intents by score descending, breaking ties by intent rank.
pub fn rank_intents(intents: &mut [ScoredIntent]) {
    intents.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.label.cmp(&b.label))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_creating_set() {
        let creating: Vec<_> = IntentLabel::ALL
            .iter()
            .filter(|l| l.is_ticket_creating())
            .copied()
            .collect();
        assert_eq!(
            creating,
            vec![
                IntentLabel::NetworkIssue,
                IntentLabel::BillingComplaint,
                IntentLabel::TechnicalSupport
            ]
        );
    }

    #[test]
    fn test_label_parse_and_display() {
        assert_eq!(
            "network_issue".parse::<IntentLabel>().unwrap(),
            IntentLabel::NetworkIssue
        );
        assert_eq!(
            "plan-change".parse::<IntentLabel>().unwrap(),
            IntentLabel::PlanChange
        );
        assert!("WEATHER".parse::<IntentLabel>().is_err());
        assert_eq!(IntentLabel::OfferInquiry.to_string(), "OFFER_INQUIRY");
    }

    #[test]
    fn test_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&IntentLabel::BalanceQuery).unwrap();
        assert_eq!(json, "\"BALANCE_QUERY\"");
    }

    #[test]
    fn test_rank_intents_breaks_ties_by_rank() {
        let mut intents = vec![
            ScoredIntent::new(IntentLabel::BalanceQuery, 0.5),
            ScoredIntent::new(IntentLabel::RechargeRequest, 0.7),
            ScoredIntent::new(IntentLabel::BillingComplaint, 0.5),
        ];
        rank_intents(&mut intents);

        let labels: Vec<_> = intents.iter().map(|i| i.label).collect();
        assert_eq!(
            labels,
            vec![
                IntentLabel::RechargeRequest,
                IntentLabel::BillingComplaint,
                IntentLabel::BalanceQuery
            ]
        );
    }

    #[test]
    fn test_default_catalog_covers_every_intent() {
        let descriptors = default_descriptors();
        for label in IntentLabel::ALL {
            let descriptor = descriptors.iter().find(|d| d.label == label).unwrap();
            assert!(!descriptor.description.is_empty());
            assert!(!descriptor.keywords.is_empty());
        }
    }
}
