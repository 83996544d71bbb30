//! Lattice Cultural Dissemination Engine
//!
//! Agents on a 2D grid each hold a vector of traits in [0, 1]. Every tick a
//! random agent meets a random neighbor: with probability equal to their
//! similarity the agent sways toward the neighbor on the trait where they
//! differ most, otherwise one of its traits drifts at random.
//!
//! # Modules
//!
//! - [`components`]: trait vectors, the lattice, dimension roles and shapes
//! - [`systems`]: similarity, mutation operators, the tick engine and clock
//! - [`setup`]: lattice initialization and assembly from configuration
//! - [`output`]: snapshots and statistics
//! - [`config`]: TOML configuration

use thiserror::Error;

pub mod components;
pub mod config;
pub mod output;
pub mod rng;
pub mod setup;
pub mod simulation;
pub mod systems;

pub use components::*;
pub use config::{ConfigError, SimConfig};
pub use output::OutputError;
pub use rng::SimRng;
pub use setup::{build_simulation, populate_lattice, resolve_params, InitDistribution};
pub use simulation::Simulation;
pub use systems::{
    EngineParams, Escape, HaltPolicy, InteractionRule, RunSummary, SimulationClock, StopReason,
    StopSignal, Tick, TickEvent, TickOutcome,
};

/// Top-level error for hosts driving the engine.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("output error: {0}")]
    Output(#[from] OutputError),
}
