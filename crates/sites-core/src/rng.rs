//! Seeded randomness.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, NormalError};

/// Seeded random number generator owned by the host loop
pub struct SimRng(pub SmallRng);

impl SimRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

/// Draws from N(mean, std_dev²).
///
/// Fails when `std_dev` is negative or NaN.
pub fn gaussian<R: Rng + ?Sized>(
    rng: &mut R,
    mean: f64,
    std_dev: f64,
) -> Result<f64, NormalError> {
    let normal = Normal::new(mean, std_dev)?;
    Ok(normal.sample(rng))
}

/// Gaussian draw clamped into `[min, max]`.
pub fn clamped_gaussian<R: Rng + ?Sized>(
    rng: &mut R,
    mean: f64,
    std_dev: f64,
    min: f64,
    max: f64,
) -> Result<f64, NormalError> {
    Ok(gaussian(rng, mean, std_dev)?.clamp(min, max))
}
