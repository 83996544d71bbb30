//! Mutation Operators
//!
//! Sway pulls one trait toward a neighbor's value, mill adds independent
//! noise to one trait, and adopt copies a neighbor's value outright.

use rand::Rng;
use tracing::warn;

use crate::components::TraitVector;
use crate::rng::clamped_gaussian;

use super::engine::EngineParams;

fn settle(value: f64, clamp: bool) -> f64 {
    if clamp {
        value.clamp(0.0, 1.0)
    } else {
        value
    }
}

/// Moves `active[index]` toward `neighbor[index]`.
///
/// Gaps at or below epsilon snap exactly. Larger gaps are capped at delta and
/// the step is drawn from N(d/2, d/8) clamped into [0, d], then scaled by the
/// active agent's conformity factor when that role is configured.
pub fn sway<R: Rng + ?Sized>(
    active: &mut TraitVector,
    neighbor: &TraitVector,
    index: usize,
    params: &EngineParams,
    rng: &mut R,
) {
    let a = active[index];
    let n = neighbor[index];
    let diff = a - n;
    let sign = if diff < 0.0 { 1.0 } else { -1.0 };
    let gap = diff.abs();

    if gap <= params.epsilon {
        active[index] = n;
        return;
    }

    let gap = gap.min(params.delta);
    let mut delta = match clamped_gaussian(rng, gap / 2.0, gap / 8.0, 0.0, gap) {
        Ok(delta) => delta,
        Err(e) => {
            warn!(index, gap, "Sway skipped: {}", e);
            return;
        }
    };
    if let Some(conformity) = params.conformity {
        delta *= conformity.factor(active.as_slice());
    }
    active[index] = settle(a + sign * delta, params.clamp_mutations);
}

/// Adds noise from N(0, delta/4), clamped into [-delta, delta], to
/// `active[index]`.
///
/// With a conviction role configured the noise is scaled by
/// `1 - conviction(active)`.
pub fn mill<R: Rng + ?Sized>(
    active: &mut TraitVector,
    index: usize,
    params: &EngineParams,
    rng: &mut R,
) {
    let spread = params.delta / 4.0;
    let mut delta = match clamped_gaussian(rng, 0.0, spread, -params.delta, params.delta) {
        Ok(delta) => delta,
        Err(e) => {
            warn!(index, spread, "Mill skipped: {}", e);
            return;
        }
    };
    if let Some(conviction) = params.conviction {
        delta *= 1.0 - conviction.factor(active.as_slice());
    }
    active[index] = settle(active[index] + delta, params.clamp_mutations);
}

/// Copies the neighbor's value on one uniformly chosen differing dimension.
///
/// Returns the dimension copied, or `None` when the vectors are equal.
pub fn adopt<R: Rng + ?Sized>(
    active: &mut TraitVector,
    neighbor: &TraitVector,
    rng: &mut R,
) -> Option<usize> {
    let differing: Vec<usize> = (0..active.len())
        .filter(|&i| active[i] != neighbor[i])
        .collect();
    if differing.is_empty() {
        return None;
    }
    let index = differing[rng.gen_range(0..differing.len())];
    active[index] = neighbor[index];
    Some(index)
}
