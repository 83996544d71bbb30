//! Event Engine
//!
//! One simulation tick: pick a random site and neighbor, compare them, then
//! either interact (converge) or drift. The engine keeps no state between
//! ticks; everything it touches lives in the [`Lattice`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::components::{Lattice, Modulator, Site, TraitVector};
use crate::config::model_constants;

use super::mutation::{adopt, mill, sway};
use super::similarity::similarity;

/// How the interaction branch changes the active agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionRule {
    /// Sway on the dimension with the largest gap
    #[default]
    ArgmaxSway,
    /// Copy the neighbor's value on a random differing dimension
    RandomCopy,
}

/// Resolved parameters read by every tick.
#[derive(Debug, Clone)]
pub struct EngineParams {
    pub threshold: f64,
    pub delta: f64,
    pub epsilon: f64,
    pub clamp_mutations: bool,
    pub interaction: InteractionRule,
    pub conformity: Option<Modulator>,
    pub conviction: Option<Modulator>,
    /// Dimension watched by the escape check; `None` disables it
    pub escape_index: Option<usize>,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            threshold: model_constants::THRESHOLD,
            delta: model_constants::DELTA,
            epsilon: model_constants::EPSILON,
            clamp_mutations: true,
            interaction: InteractionRule::ArgmaxSway,
            conformity: None,
            conviction: None,
            escape_index: None,
        }
    }
}

/// A trait value that left the unit interval on the escape dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Escape {
    pub site: Site,
    pub dimension: usize,
    pub value: f64,
}

/// Whether the host should keep ticking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Continue,
    Halt(Escape),
}

/// Which branch a tick took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Convergence branch; `dimension` is `None` when nothing changed
    Interact { dimension: Option<usize> },
    /// Independent noise on one dimension
    Drift { dimension: usize },
}

/// Record of a single tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub active: Site,
    pub neighbor: Site,
    pub similarity: f64,
    pub event: TickEvent,
    pub outcome: TickOutcome,
}

impl Tick {
    pub fn is_halt(&self) -> bool {
        matches!(self.outcome, TickOutcome::Halt(_))
    }
}

/// Index of the largest absolute gap; the first index wins ties.
pub fn argmax_difference(a: &[f64], b: &[f64]) -> usize {
    let mut best = 0;
    let mut best_gap = f64::NEG_INFINITY;
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        let gap = (x - y).abs();
        if gap > best_gap {
            best = i;
            best_gap = gap;
        }
    }
    best
}

/// Applies the configured interaction rule to `active`.
///
/// Returns the dimension that was modified, if any.
pub fn interact<R: Rng + ?Sized>(
    active: &mut TraitVector,
    neighbor: &TraitVector,
    params: &EngineParams,
    rng: &mut R,
) -> Option<usize> {
    match params.interaction {
        InteractionRule::ArgmaxSway => {
            let index = argmax_difference(active.as_slice(), neighbor.as_slice());
            if active[index] == neighbor[index] {
                return None;
            }
            sway(active, neighbor, index, params, rng);
            Some(index)
        }
        InteractionRule::RandomCopy => adopt(active, neighbor, rng),
    }
}

/// Reports an escape when the watched dimension exceeds 1.
///
/// With clamped mutations this never fires; it only matters when clamping is
/// turned off.
pub fn check_escape(active: &TraitVector, escape_index: Option<usize>) -> Option<(usize, f64)> {
    let index = escape_index?;
    let value = active.get(index)?;
    (value > 1.0).then_some((index, value))
}

/// Runs one tick against the lattice.
pub fn try_event<R: Rng + ?Sized>(
    lattice: &mut Lattice,
    params: &EngineParams,
    rng: &mut R,
) -> Tick {
    let active = lattice.random_site(rng);
    let neighbor = lattice.random_neighbor(active, rng);

    let mut tick = Tick {
        active,
        neighbor,
        similarity: 0.0,
        event: TickEvent::Interact { dimension: None },
        outcome: TickOutcome::Continue,
    };

    let Some((active_traits, neighbor_traits)) = lattice.pair_mut(active, neighbor) else {
        warn!(?active, ?neighbor, "Neighbor selection returned an unusable pair");
        return tick;
    };

    tick.similarity = similarity(
        active_traits.as_slice(),
        neighbor_traits.as_slice(),
        params.threshold,
    );

    if rng.gen::<f64>() < tick.similarity {
        let dimension = interact(active_traits, neighbor_traits, params, rng);
        tick.event = TickEvent::Interact { dimension };

        if let Some((dimension, value)) = check_escape(active_traits, params.escape_index) {
            debug!(x = active.x, y = active.y, dimension, value, "Escape condition reached");
            tick.outcome = TickOutcome::Halt(Escape {
                site: active,
                dimension,
                value,
            });
        }
    } else {
        let dimension = rng.gen_range(0..active_traits.len());
        mill(active_traits, dimension, params, rng);
        tick.event = TickEvent::Drift { dimension };
    }

    tick
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_argmax_prefers_largest_gap() {
        let a = [0.2, 0.5, 0.9];
        let b = [0.8, 0.5, 0.95];
        assert_eq!(argmax_difference(&a, &b), 0);
    }

    #[test]
    fn test_argmax_tie_takes_first() {
        let a = [0.25, 0.75, 0.5];
        let b = [0.5, 0.5, 0.5];
        assert_eq!(argmax_difference(&a, &b), 0);
    }

    #[test]
    fn test_interact_sways_only_the_widest_gap() {
        let mut rng = SmallRng::seed_from_u64(42);
        let params = EngineParams::default();
        let neighbor = TraitVector::new(vec![0.8, 0.5, 0.95]);

        for _ in 0..200 {
            let mut active = TraitVector::new(vec![0.2, 0.5, 0.9]);
            let changed = interact(&mut active, &neighbor, &params, &mut rng);
            assert_eq!(changed, Some(0));
            assert!(active[0] >= 0.2 && active[0] <= 0.45);
            assert_eq!(active[1], 0.5);
            assert_eq!(active[2], 0.9);
        }
    }

    #[test]
    fn test_interact_equal_vectors_is_noop() {
        let mut rng = SmallRng::seed_from_u64(1);
        let params = EngineParams::default();
        let mut active = TraitVector::new(vec![0.5]);
        let neighbor = TraitVector::new(vec![0.5]);
        assert_eq!(interact(&mut active, &neighbor, &params, &mut rng), None);
        assert_eq!(active[0], 0.5);
    }

    #[test]
    fn test_identical_lattice_always_interacts() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut lattice = Lattice::filled(2, 1, 1, 0.5).unwrap();
        let params = EngineParams {
            escape_index: Some(0),
            ..EngineParams::default()
        };
        let before = lattice.clone();

        for _ in 0..100 {
            let tick = try_event(&mut lattice, &params, &mut rng);
            assert_eq!(tick.similarity, 1.0);
            assert_eq!(tick.event, TickEvent::Interact { dimension: None });
            assert_eq!(tick.outcome, TickOutcome::Continue);
        }
        assert_eq!(lattice, before);
    }

    #[test]
    fn test_dissimilar_lattice_always_drifts() {
        let mut rng = SmallRng::seed_from_u64(8);
        let sites = vec![TraitVector::new(vec![0.0, 0.0]), TraitVector::new(vec![1.0, 1.0])];
        let mut lattice = Lattice::from_sites(2, 1, sites).unwrap();
        let params = EngineParams::default();

        let tick = try_event(&mut lattice, &params, &mut rng);
        assert_eq!(tick.similarity, 0.0);
        assert!(matches!(tick.event, TickEvent::Drift { .. }));
    }

    #[test]
    fn test_escape_check() {
        let traits = TraitVector::new(vec![0.3, 1.2]);
        assert_eq!(check_escape(&traits, Some(1)), Some((1, 1.2)));
        assert_eq!(check_escape(&traits, Some(0)), None);
        assert_eq!(check_escape(&traits, Some(5)), None);
        assert_eq!(check_escape(&traits, None), None);
    }

    #[test]
    fn test_overflowed_lattice_halts_after_interaction() {
        let mut rng = SmallRng::seed_from_u64(9);
        let sites = vec![TraitVector::new(vec![1.5]), TraitVector::new(vec![1.5])];
        let mut lattice = Lattice::from_sites(2, 1, sites).unwrap();
        let params = EngineParams {
            clamp_mutations: false,
            escape_index: Some(0),
            ..EngineParams::default()
        };

        let tick = try_event(&mut lattice, &params, &mut rng);
        assert!(tick.is_halt());
        match tick.outcome {
            TickOutcome::Halt(escape) => {
                assert_eq!(escape.site, tick.active);
                assert_eq!(escape.dimension, 0);
                assert_eq!(escape.value, 1.5);
            }
            TickOutcome::Continue => unreachable!(),
        }
    }

    #[test]
    fn test_random_copy_rule() {
        let mut rng = SmallRng::seed_from_u64(10);
        let params = EngineParams {
            interaction: InteractionRule::RandomCopy,
            ..EngineParams::default()
        };
        let mut active = TraitVector::new(vec![0.2, 0.5, 0.9]);
        let neighbor = TraitVector::new(vec![0.8, 0.5, 0.95]);
        let changed = interact(&mut active, &neighbor, &params, &mut rng).unwrap();
        assert!(changed == 0 || changed == 2);
        assert_eq!(active[changed], neighbor[changed]);
    }
}
