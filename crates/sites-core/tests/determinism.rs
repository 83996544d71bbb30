//! Determinism verification tests
//!
//! Tests to ensure the simulation produces identical results given the same seed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sites_core::rng::gaussian;
use sites_core::{build_simulation, InitDistribution, SimConfig, SimulationClock, StopReason};

fn run_ticks(config: &SimConfig, ticks: u64) -> sites_core::Simulation {
    let mut rng = SmallRng::seed_from_u64(config.run.seed);
    let mut sim = build_simulation(config, &mut rng).unwrap();
    for _ in 0..ticks {
        sim.step(&mut rng);
    }
    sim
}

/// Test that SmallRng produces identical sequences with the same seed
#[test]
fn test_rng_determinism() {
    let mut rng1 = SmallRng::seed_from_u64(42);
    let values1: Vec<f64> = (0..100).map(|_| rng1.gen()).collect();

    let mut rng2 = SmallRng::seed_from_u64(42);
    let values2: Vec<f64> = (0..100).map(|_| rng2.gen()).collect();

    assert_eq!(values1, values2, "RNG sequences should be identical with same seed");
}

/// Test that Gaussian draws are reproducible
#[test]
fn test_gaussian_determinism() {
    let mut rng1 = SmallRng::seed_from_u64(7);
    let mut rng2 = SmallRng::seed_from_u64(7);

    let draws1: Vec<f64> = (0..100).map(|_| gaussian(&mut rng1, 0.0, 0.0625).unwrap()).collect();
    let draws2: Vec<f64> = (0..100).map(|_| gaussian(&mut rng2, 0.0, 0.0625).unwrap()).collect();

    assert_eq!(draws1, draws2);
}

/// Two runs with the same seed and configuration end bit-identical
#[test]
fn test_lattice_determinism() {
    let config = SimConfig::default();

    let sim1 = run_ticks(&config, 20_000);
    let sim2 = run_ticks(&config, 20_000);

    assert_eq!(sim1.lattice(), sim2.lattice(), "Lattices should be identical with same seed");
}

/// Determinism also holds for the unclamped, random-copy, Gaussian variant
#[test]
fn test_variant_determinism() {
    let mut config = SimConfig::default();
    config.lattice.init = InitDistribution::Gaussian;
    config.model.clamp_mutations = false;
    config.model.interaction = sites_core::InteractionRule::RandomCopy;
    config.run.seed = 1234;

    let sim1 = run_ticks(&config, 10_000);
    let sim2 = run_ticks(&config, 10_000);

    assert_eq!(sim1.lattice(), sim2.lattice());
}

/// Test that different seeds produce different lattices
#[test]
fn test_different_seeds_differ() {
    let mut config = SimConfig::default();
    let sim1 = run_ticks(&config, 1000);

    config.run.seed = 43;
    let sim2 = run_ticks(&config, 1000);

    assert_ne!(sim1.lattice(), sim2.lattice(), "Different seeds should produce different lattices");
}

/// The clock's counters are reproducible too
#[test]
fn test_clock_determinism() {
    let mut config = SimConfig::default();
    config.run.step_limit = 5000;
    config.run.snapshot_interval = 500;

    let run = || {
        let mut rng = SmallRng::seed_from_u64(config.run.seed);
        let mut sim = build_simulation(&config, &mut rng).unwrap();
        let mut clock = SimulationClock::new(config.run.step_limit, config.run.snapshot_interval);
        let mut steps = Vec::new();
        let summary = clock.run(&mut sim, &mut rng, |_| false, |_, step| steps.push(step));
        (summary, steps, sim.lattice().clone())
    };

    let (summary1, steps1, lattice1) = run();
    let (summary2, steps2, lattice2) = run();

    assert_eq!(summary1, summary2);
    assert_eq!(summary1.stop, StopReason::StepLimit);
    assert_eq!(steps1, steps2);
    assert_eq!(lattice1, lattice2);
}
