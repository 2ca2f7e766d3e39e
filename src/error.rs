//! Error types for the triage engine.
//!
//! All fallible operations return [`TriageError`]. Only two kinds of error ever
//! matter to a caller of the classification façade: configuration defects, which
//! surface from constructors before any utterance is classified, and I/O or parse
//! failures while loading a configuration file. Embedding failures are produced by
//! the embedder layer but are absorbed by the cascade classifier.
//!
//! # Examples
//!
//! ```
//! use ticket_triage::error::{Result, TriageError};
//!
//! fn check_threshold(threshold: f32) -> Result<()> {
//!     if !(-1.0..=1.0).contains(&threshold) {
//!         return Err(TriageError::config("threshold must lie in [-1, 1]"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_threshold(0.25).is_ok());
//! assert!(check_threshold(1.5).is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for triage operations.
#[derive(Error, Debug)]
pub enum TriageError {
    /// I/O errors (reading configuration or batch input files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A vocabulary or keyword produced an invalid pattern.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration defects (incomplete routing table, missing descriptors, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The embedding backend failed or is unavailable.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// A bounded-latency call did not finish in time.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Invalid argument supplied by the caller.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for operations that may fail with [`TriageError`].
pub type Result<T> = std::result::Result<T, TriageError>;

impl TriageError {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        TriageError::Config(msg.into())
    }

    /// Create a new embedding error.
    pub fn embedding<S: Into<String>>(msg: S) -> Self {
        TriageError::Embedding(msg.into())
    }

    /// Create a new timeout error.
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        TriageError::Timeout(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        TriageError::InvalidArgument(msg.into())
    }

    /// Whether this error means the semantic path should degrade to keywords.
    pub fn is_backend_failure(&self) -> bool {
        matches!(self, TriageError::Embedding(_) | TriageError::Timeout(_))
    }
}
