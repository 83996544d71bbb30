//! Output Generation
//!
//! Snapshot generation and lattice statistics.

pub mod snapshot;
pub mod stats;

pub use snapshot::*;
pub use stats::*;

use thiserror::Error;

/// Errors raised while writing output files.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
