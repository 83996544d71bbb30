//! Simulation Clock
//!
//! Drives the engine one frame at a time. Each frame runs at most one tick
//! (none once the step limit is used up) and advances the snapshot counter;
//! a snapshot is due once more than `snapshot_interval` frames have passed
//! since the last one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};

use crate::simulation::Simulation;

use super::engine::{Escape, Tick, TickEvent, TickOutcome};

/// What the run loop does when a tick reports an escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HaltPolicy {
    /// End the run
    #[default]
    Stop,
    /// Count it and keep ticking
    Ignore,
}

/// Cancellation flag shared between the run loop and whoever stops it.
///
/// Clones observe the same flag, so one can be moved into a signal handler
/// while the loop polls another between frames.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    /// `None` once the step limit is exhausted
    pub tick: Option<Tick>,
    pub snapshot_due: bool,
}

impl Frame {
    pub fn escape(&self) -> Option<Escape> {
        match self.tick?.outcome {
            TickOutcome::Halt(escape) => Some(escape),
            TickOutcome::Continue => None,
        }
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopReason {
    StepLimit,
    Cancelled,
    Halted(Escape),
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub steps: u64,
    pub frames: u64,
    pub interactions: u64,
    pub drifts: u64,
    pub escapes: u64,
    pub snapshots: u64,
    pub stop: StopReason,
}

pub struct SimulationClock {
    step_limit: u64,
    snapshot_interval: u64,
    halt_policy: HaltPolicy,
    steps: u64,
    frames: u64,
    frames_since_snapshot: u64,
    interactions: u64,
    drifts: u64,
    escapes: u64,
    snapshots: u64,
}

impl SimulationClock {
    /// `step_limit` of 0 means unbounded.
    pub fn new(step_limit: u64, snapshot_interval: u64) -> Self {
        Self {
            step_limit,
            snapshot_interval,
            halt_policy: HaltPolicy::default(),
            steps: 0,
            frames: 0,
            frames_since_snapshot: 0,
            interactions: 0,
            drifts: 0,
            escapes: 0,
            snapshots: 0,
        }
    }

    pub fn with_halt_policy(mut self, policy: HaltPolicy) -> Self {
        self.halt_policy = policy;
        self
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_exhausted(&self) -> bool {
        self.step_limit > 0 && self.steps >= self.step_limit
    }

    /// Advances one frame.
    pub fn frame<R: Rng + ?Sized>(&mut self, sim: &mut Simulation, rng: &mut R) -> Frame {
        let tick = if self.is_exhausted() {
            None
        } else {
            let tick = sim.step(rng);
            self.steps += 1;
            self.record(&tick);
            Some(tick)
        };

        self.frames += 1;
        self.frames_since_snapshot += 1;
        let snapshot_due = self.frames_since_snapshot > self.snapshot_interval;
        if snapshot_due {
            self.frames_since_snapshot = 0;
        }

        Frame { tick, snapshot_due }
    }

    fn record(&mut self, tick: &Tick) {
        match tick.event {
            TickEvent::Interact { .. } => self.interactions += 1,
            TickEvent::Drift { .. } => self.drifts += 1,
        }
        if tick.is_halt() {
            self.escapes += 1;
        }
    }

    /// Runs frames until the step limit is reached, `should_stop` returns
    /// true, or an escape occurs under [`HaltPolicy::Stop`].
    ///
    /// `on_snapshot` receives the simulation and the current step whenever a
    /// snapshot is due. With no step limit and a stop predicate that never
    /// fires, this does not return.
    pub fn run<R, S, F>(
        &mut self,
        sim: &mut Simulation,
        rng: &mut R,
        mut should_stop: S,
        mut on_snapshot: F,
    ) -> RunSummary
    where
        R: Rng + ?Sized,
        S: FnMut(&SimulationClock) -> bool,
        F: FnMut(&Simulation, u64),
    {
        let stop = loop {
            if should_stop(self) {
                break StopReason::Cancelled;
            }
            if self.is_exhausted() {
                break StopReason::StepLimit;
            }

            let frame = self.frame(sim, rng);

            if let Some(escape) = frame.escape() {
                match self.halt_policy {
                    HaltPolicy::Stop => {
                        info!(
                            step = self.steps,
                            x = escape.site.x,
                            y = escape.site.y,
                            dimension = escape.dimension,
                            value = escape.value,
                            "Escape condition halted the run"
                        );
                        break StopReason::Halted(escape);
                    }
                    HaltPolicy::Ignore => {
                        debug!(step = self.steps, "Escape ignored");
                    }
                }
            }

            if frame.snapshot_due {
                self.snapshots += 1;
                on_snapshot(sim, self.steps);
            }
        };

        self.summary(stop)
    }

    pub fn summary(&self, stop: StopReason) -> RunSummary {
        RunSummary {
            steps: self.steps,
            frames: self.frames,
            interactions: self.interactions,
            drifts: self.drifts,
            escapes: self.escapes,
            snapshots: self.snapshots,
            stop,
        }
    }
}
