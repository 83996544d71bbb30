//! Simulation Systems
//!
//! The similarity metric, the mutation operators, the per-tick event engine and
//! the clock that drives it.

pub mod clock;
pub mod engine;
pub mod mutation;
pub mod similarity;

pub use clock::{Frame, HaltPolicy, RunSummary, SimulationClock, StopReason, StopSignal};
pub use engine::{
    argmax_difference, check_escape, interact, try_event, EngineParams, Escape, InteractionRule,
    Tick, TickEvent, TickOutcome,
};
pub use mutation::{adopt, mill, sway};
pub use similarity::{distance, similarity};
