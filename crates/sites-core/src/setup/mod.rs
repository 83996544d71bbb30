//! Simulation Setup
//!
//! Lattice initialization and simulation assembly from configuration.

pub mod lattice;
pub mod simulation;

pub use lattice::*;
pub use simulation::*;
