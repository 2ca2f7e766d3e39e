//! Multi-label intent classification.
//!
//! Two strategies share the [`IntentClassifier`] interface:
//!
//! - [`SemanticIntentClassifier`]: zero-shot cosine similarity between the
//!   utterance embedding and cached intent description embeddings.
//! - [`KeywordIntentClassifier`]: deterministic keyword membership, used when the
//!   embedding backend is unavailable or nothing clears the similarity threshold.
//!
//! [`CascadeClassifier`] composes them and reports which one answered.

mod cascade;
mod classifier;
mod keyword_classifier;
mod semantic_classifier;

pub use cascade::{CascadeClassifier, CascadeOutcome, ClassificationPath};
pub use classifier::IntentClassifier;
pub use keyword_classifier::KeywordIntentClassifier;
pub use semantic_classifier::SemanticIntentClassifier;
