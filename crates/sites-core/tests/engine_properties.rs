//! Engine property tests
//!
//! Range preservation, neighbor validity and the worked scenarios, exercised
//! through the public API.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sites_core::systems::{interact, mill, sway, try_event};
use sites_core::{
    build_simulation, EngineParams, Lattice, Modulator, Shape, SimConfig, Site, TickEvent,
    TickOutcome, TraitVector,
};

fn canonical_params() -> EngineParams {
    EngineParams {
        conformity: Some(Modulator::new(0, Shape::PeakAtOne)),
        conviction: Some(Modulator::new(1, Shape::Linear)),
        escape_index: Some(4),
        ..EngineParams::default()
    }
}

fn random_traits(rng: &mut SmallRng, len: usize) -> TraitVector {
    TraitVector::new((0..len).map(|_| rng.gen::<f64>()).collect())
}

#[test]
fn test_clamped_operators_stay_in_range() {
    let mut rng = SmallRng::seed_from_u64(2024);
    let params = canonical_params();

    for _ in 0..5000 {
        let mut active = random_traits(&mut rng, 5);
        let neighbor = random_traits(&mut rng, 5);
        for _ in 0..10 {
            let index = rng.gen_range(0..5);
            if rng.gen::<bool>() {
                sway(&mut active, &neighbor, index, &params, &mut rng);
            } else {
                mill(&mut active, index, &params, &mut rng);
            }
        }
        assert!(active.is_normalized(), "left [0, 1]: {:?}", active);
    }
}

#[test]
fn test_clamped_engine_never_escapes() {
    let mut config = SimConfig::default();
    config.lattice.width = 6;
    config.lattice.height = 6;
    let mut rng = SmallRng::seed_from_u64(99);
    let mut sim = build_simulation(&config, &mut rng).unwrap();

    for _ in 0..50_000 {
        let tick = sim.step(&mut rng);
        assert_eq!(tick.outcome, TickOutcome::Continue);
    }
    assert!(sim.lattice().is_normalized());
}

#[test]
fn test_unclamped_engine_escapes_on_last_dimension() {
    let mut config = SimConfig::default();
    config.model.clamp_mutations = false;
    let mut rng = SmallRng::seed_from_u64(42);
    let mut sim = build_simulation(&config, &mut rng).unwrap();
    let last = sim.dimensions() - 1;

    let mut halted = None;
    for _ in 0..500_000 {
        let tick = sim.step(&mut rng);
        if let TickOutcome::Halt(escape) = tick.outcome {
            assert!(matches!(tick.event, TickEvent::Interact { .. }));
            halted = Some(escape);
            break;
        }
    }

    let escape = halted.expect("unclamped run should escape");
    assert_eq!(escape.dimension, last);
    assert!(escape.value > 1.0);
    let site = sim.trait_at(escape.site.x, escape.site.y).unwrap();
    assert_eq!(site[last], escape.value);
}

#[test]
fn test_sway_snaps_below_epsilon() {
    let mut rng = SmallRng::seed_from_u64(5);
    let params = canonical_params();

    for _ in 0..1000 {
        let mut active = random_traits(&mut rng, 5);
        let mut neighbor = active.clone();
        let index = rng.gen_range(0..5);
        neighbor[index] = (active[index] + rng.gen_range(-0.0009..=0.0009)).clamp(0.0, 1.0);

        sway(&mut active, &neighbor, index, &params, &mut rng);
        assert_eq!(active[index], neighbor[index]);
    }
}

#[test]
fn test_mill_is_local() {
    let mut rng = SmallRng::seed_from_u64(6);
    let params = canonical_params();

    for _ in 0..2000 {
        let original = random_traits(&mut rng, 5);
        let mut active = original.clone();
        let index = rng.gen_range(0..5);
        mill(&mut active, index, &params, &mut rng);

        for d in (0..5).filter(|&d| d != index) {
            assert_eq!(active[d], original[d]);
        }
    }
}

#[test]
fn test_neighbors_valid_for_every_site() {
    let mut rng = SmallRng::seed_from_u64(8);
    for (width, height) in [(2, 1), (1, 5), (3, 3), (7, 4)] {
        let lattice = Lattice::filled(width, height, 1, 0.5).unwrap();
        for x in 0..width {
            for y in 0..height {
                let site = Site::new(x, y);
                for _ in 0..20 {
                    let neighbor = lattice.random_neighbor(site, &mut rng);
                    assert!(lattice.contains(neighbor));
                    assert_ne!(neighbor, site);
                }
            }
        }
    }
}

#[test]
fn test_widest_gap_scenario() {
    let mut rng = SmallRng::seed_from_u64(11);
    let params = EngineParams::default();
    let neighbor = TraitVector::new(vec![0.8, 0.5, 0.95]);

    let mut active = TraitVector::new(vec![0.2, 0.5, 0.9]);
    let changed = interact(&mut active, &neighbor, &params, &mut rng);

    assert_eq!(changed, Some(0));
    assert_eq!(active[1], 0.5);
    assert_eq!(active[2], 0.9);
}

#[test]
fn test_single_dimension_identical_scenario() {
    let mut rng = SmallRng::seed_from_u64(12);
    let mut lattice = Lattice::filled(2, 1, 1, 0.5).unwrap();
    let params = EngineParams {
        escape_index: Some(0),
        ..EngineParams::default()
    };

    for _ in 0..50 {
        let tick = try_event(&mut lattice, &params, &mut rng);
        assert_eq!(tick.similarity, 1.0);
        assert_eq!(tick.event, TickEvent::Interact { dimension: None });
    }
    assert_eq!(lattice.trait_at(0, 0).unwrap().as_slice(), &[0.5]);
    assert_eq!(lattice.trait_at(1, 0).unwrap().as_slice(), &[0.5]);
}
