//! Trait Vector
//!
//! One agent's cultural state: a fixed-length sequence of reals in [0, 1].

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Fixed-length sequence of trait values.
///
/// Values stay in [0, 1] unless mutation clamping is disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitVector(Vec<f64>);

impl TraitVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Creates a vector with every dimension set to `value`.
    pub fn filled(dimensions: usize, value: f64) -> Self {
        Self(vec![value; dimensions])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// True when every value lies in [0, 1].
    pub fn is_normalized(&self) -> bool {
        self.0.iter().all(|v| (0.0..=1.0).contains(v))
    }
}

impl Index<usize> for TraitVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl IndexMut<usize> for TraitVector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

impl From<Vec<f64>> for TraitVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}
