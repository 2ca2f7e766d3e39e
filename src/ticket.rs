//! Ticket lifecycle seed handed to an external record store.
//!
//! The engine never persists tickets. It only supplies the initial status and
//! the fields a record manager needs to open one.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::EntityMap;
use crate::error::{Result, TriageError};
use crate::intent::IntentLabel;
use crate::priority::PriorityLevel;
use crate::routing::Category;
use crate::triage::ClassificationResult;

/// Lifecycle status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// Queries are answered on the spot; grievances start open.
    pub fn initial(category: Category) -> Self {
        match category {
            Category::Query => TicketStatus::Resolved,
            Category::Grievance => TicketStatus::Open,
        }
    }

    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        use TicketStatus::*;
        matches!(
            (*self, next),
            (Open, InProgress) | (Open, Resolved) | (InProgress, Resolved) | (Resolved, Closed)
        )
    }

    /// Advance to `next`, rejecting moves the lifecycle does not allow.
    pub fn transition(self, next: TicketStatus) -> Result<TicketStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TriageError::invalid_argument(format!(
                "cannot move a ticket from {self} to {next}"
            )))
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Initial ticket record derived from a classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSeed {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub category: Category,
    pub status: TicketStatus,
    pub priority: PriorityLevel,
    pub department: String,
    pub routing_target: String,
    pub complaint_type: IntentLabel,
    pub description: String,
    pub entities: EntityMap,
}

impl TicketSeed {
    pub fn from_result(result: &ClassificationResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            category: result.category(),
            status: TicketStatus::initial(result.category()),
            priority: result.priority(),
            department: result.department().to_string(),
            routing_target: result.routing_target().to_string(),
            complaint_type: result.primary_intent(),
            description: result.raw_input().to_string(),
            entities: result.entities().clone(),
        }
    }
}
