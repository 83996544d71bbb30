//! Shared snapshot types for the lattice simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Renderers and analysis tools depend on it to read engine output without
//! pulling in the engine itself.

pub mod metrics;
pub mod role;
pub mod snapshot;

pub use metrics::{Histogram, LatticeMetrics};
pub use role::DimensionRole;
pub use snapshot::{generate_snapshot_id, DimensionSnapshot, LatticeSnapshot, SiteCoord};
