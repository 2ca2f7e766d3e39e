//! # ticket-triage
//!
//! Zero-shot classification and triage of customer support utterances.
//!
//! ## Features
//!
//! - Multi-label intent detection by embedding similarity against a small set of
//!   hand-written intent descriptions, without training data
//! - Deterministic keyword fallback when no embedding backend is reachable
//! - Best-effort entity extraction (amounts, services, issues, plan names,
//!   timeframes, devices) for code-switched Hindi/English text
//! - Rule-based priority, category and department routing
//!
//! The entry point is [`TicketClassifier`](triage::TicketClassifier).

pub mod classifier;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod entity;
pub mod error;
pub mod intent;
pub mod priority;
pub mod routing;
pub mod ticket;
pub mod triage;
pub mod vector;

pub mod prelude {
    pub use crate::classifier::ClassificationPath;
    pub use crate::config::TriageConfig;
    pub use crate::entity::{EntityMap, EntityType};
    pub use crate::error::{Result, TriageError};
    pub use crate::intent::{IntentLabel, ScoredIntent};
    pub use crate::priority::PriorityLevel;
    pub use crate::routing::Category;
    pub use crate::ticket::{TicketSeed, TicketStatus};
    pub use crate::triage::{ClassificationResult, TicketClassifier};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
