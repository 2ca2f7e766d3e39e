//! Dense embedding vectors and cosine similarity.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};

/// A dense vector produced by an embedder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// The vector dimensions as floating point values.
    pub data: Vec<f32>,
}

impl Vector {
    /// Create a new vector with the given dimensions.
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Get the dimensionality of this vector.
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Calculate the L2 norm (magnitude) of this vector.
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Normalize this vector to unit length. Zero vectors are left untouched.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for value in &mut self.data {
                *value /= norm;
            }
        }
    }

    /// Get a normalized copy of this vector.
    pub fn normalized(&self) -> Self {
        let mut normalized = self.clone();
        normalized.normalize();
        normalized
    }

    /// Check if this vector contains any NaN or infinite values.
    pub fn is_valid(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// Cosine similarity in [-1, 1]; 0.0 when either vector has zero magnitude.
    pub fn cosine_similarity(&self, other: &Vector) -> Result<f32> {
        if self.data.len() != other.data.len() {
            return Err(TriageError::embedding(format!(
                "Vector dimension mismatch: expected {}, got {}",
                self.data.len(),
                other.data.len()
            )));
        }

        let dot_product: f32 = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(x, y)| x * y)
            .sum();
        let norm_a = self.norm();
        let norm_b = other.norm();

        if norm_a == 0.0 || norm_b == 0.0 {
            Ok(0.0)
        } else {
            Ok((dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0))
        }
    }
}
