//! Sparse weighted term vectors and cosine similarity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sparse vector: dimension index -> non-negative weight.
///
/// Zero weights are never stored, so `len()` is the number of active dimensions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    weights: BTreeMap<usize, f32>,
}

impl SparseVector {
    /// Create an empty (all-zero) vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the weight of a dimension. Zero removes the entry.
    pub fn set(&mut self, dim: usize, weight: f32) {
        if weight == 0.0 {
            self.weights.remove(&dim);
        } else {
            self.weights.insert(dim, weight);
        }
    }

    /// Weight of a dimension (0 if absent).
    pub fn get(&self, dim: usize) -> f32 {
        self.weights.get(&dim).copied().unwrap_or(0.0)
    }

    /// Number of non-zero dimensions.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether every weight is zero.
    pub fn is_zero(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterate `(dim, weight)` in ascending dimension order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.weights.iter().map(|(&d, &w)| (d, w))
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f32 {
        self.weights.values().map(|w| w * w).sum::<f32>().sqrt()
    }

    /// Dot product; iterates the shorter vector.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .weights
            .iter()
            .filter_map(|(d, w)| large.weights.get(d).map(|o| w * o))
            .sum()
    }
}

impl FromIterator<(usize, f32)> for SparseVector {
    fn from_iter<I: IntoIterator<Item = (usize, f32)>>(iter: I) -> Self {
        let mut v = SparseVector::new();
        for (dim, weight) in iter {
            v.set(dim, weight);
        }
        v
    }
}

/// Cosine similarity `dot(a, b) / (|a| * |b|)`.
///
/// Defined as 0 when either norm is zero, so the result is never NaN.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    let sim = a.dot(b) / denom;
    if sim.is_finite() {
        sim
    } else {
        0.0
    }
}
