//! Lattice Setup
//!
//! Random initialization of every site's trait vector.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::components::Lattice;
use crate::config::ConfigError;

/// Distribution of initial trait values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitDistribution {
    /// U(0, 1)
    #[default]
    Uniform,
    /// N(0.5, 0.125²) clamped into [0, 1]
    Gaussian,
}

/// Creates a lattice with every value drawn independently from `init`.
pub fn populate_lattice<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    dimensions: usize,
    init: InitDistribution,
    rng: &mut R,
) -> Result<Lattice, ConfigError> {
    match init {
        InitDistribution::Uniform => {
            Lattice::from_fn(width, height, dimensions, || rng.gen::<f64>())
        }
        InitDistribution::Gaussian => {
            let normal = Normal::<f64>::new(0.5, 0.125)?;
            Lattice::from_fn(width, height, dimensions, || {
                normal.sample(rng).clamp(0.0, 1.0)
            })
        }
    }
}
