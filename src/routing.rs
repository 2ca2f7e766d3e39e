//! Category and routing resolution.
//!
//! The routing table is a total map over [`IntentLabel`]; completeness is checked
//! when the table is built, so resolution itself cannot fail.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};
use crate::intent::IntentLabel;

/// Lifecycle category of a classified utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Informational or transactional; resolved on response.
    Query,
    /// Actionable complaint that needs tracked resolution.
    Grievance,
}

impl Category {
    /// GRIEVANCE iff the intent is ticket-creating.
    pub fn for_intent(intent: IntentLabel) -> Self {
        if intent.is_ticket_creating() {
            Category::Grievance
        } else {
            Category::Query
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Query => "QUERY",
            Category::Grievance => "GRIEVANCE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an intent is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Queue or automated handler identifier, e.g. `billing_team`.
    pub routing_target: String,
    /// Human-readable department name.
    pub department: String,
}

impl Route {
    pub fn new<S: Into<String>>(routing_target: S, department: S) -> Self {
        Self {
            routing_target: routing_target.into(),
            department: department.into(),
        }
    }
}

/// Resolved category and route for a primary intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    pub category: Category,
    pub routing_target: String,
    pub department: String,
}

/// The built-in intent to route table.
pub fn default_routes() -> HashMap<IntentLabel, Route> {
    HashMap::from([
        (
            IntentLabel::NetworkIssue,
            Route::new("technical_support", "Network Operations"),
        ),
        (
            IntentLabel::TechnicalSupport,
            Route::new("technical_support", "Technical Support"),
        ),
        (
            IntentLabel::BillingComplaint,
            Route::new("billing_team", "Billing Department"),
        ),
        (
            IntentLabel::RechargeRequest,
            Route::new("automated_system", "Customer Support"),
        ),
        (
            IntentLabel::BalanceQuery,
            Route::new("automated_system", "Customer Support"),
        ),
        (
            IntentLabel::PlanChange,
            Route::new("sales_team", "Sales & Retention"),
        ),
        (
            IntentLabel::OfferInquiry,
            Route::new("sales_team", "Sales & Retention"),
        ),
        (
            IntentLabel::SupportRequest,
            Route::new("customer_support", "Customer Support"),
        ),
    ])
}

/// Intent to route lookup, validated to cover every intent.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    routes: HashMap<IntentLabel, Route>,
}

impl RoutingTable {
    /// Build the table, failing if any intent is unmapped or a route is blank.
    pub fn new(routes: HashMap<IntentLabel, Route>) -> Result<Self> {
        let missing: Vec<&str> = IntentLabel::ALL
            .iter()
            .filter(|label| !routes.contains_key(label))
            .map(|label| label.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(TriageError::config(format!(
                "routing table has no entry for {}",
                missing.join(", ")
            )));
        }

        if let Some((label, _)) = routes
            .iter()
            .find(|(_, route)| route.routing_target.trim().is_empty())
        {
            return Err(TriageError::config(format!(
                "routing target for {label} is empty"
            )));
        }

        Ok(Self { routes })
    }

    pub fn route(&self, intent: IntentLabel) -> Option<&Route> {
        self.routes.get(&intent)
    }

    /// Category and route for the primary intent.
    pub fn resolve(&self, primary: IntentLabel) -> RoutingDecision {
        let (routing_target, department) = match self.routes.get(&primary) {
            Some(route) => (route.routing_target.clone(), route.department.clone()),
            // Unreachable after validation in `new`.
            None => (String::new(), String::new()),
        };
        RoutingDecision {
            category: Category::for_intent(primary),
            routing_target,
            department,
        }
    }
}
