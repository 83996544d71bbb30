//! Snapshot Types
//!
//! Serialization structs for lattice snapshots.
//!
//! A snapshot is an owned, read-only copy of every site's trait vector plus the
//! descriptive metadata a renderer needs. Sites are stored row-major, so the
//! site at `(x, y)` lives at index `y * width + x`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics::LatticeMetrics;
use crate::role::DimensionRole;

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// Lattice coordinate as seen by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteCoord {
    pub x: usize,
    pub y: usize,
}

impl SiteCoord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Descriptive metadata for one trait dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionSnapshot {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<DimensionRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub color: [u8; 3],
}

/// Complete lattice state at one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatticeSnapshot {
    pub snapshot_id: String,
    /// Identifies the run that produced this snapshot
    pub run_id: Uuid,
    /// Number of ticks executed so far
    pub step: u64,
    pub triggered_by: String,
    pub width: usize,
    pub height: usize,
    pub dimensions: usize,
    /// Row-major trait vectors, `width * height` entries of `dimensions` values
    pub sites: Vec<Vec<f64>>,
    #[serde(default)]
    pub dimension_info: Vec<DimensionSnapshot>,
    /// UI selection cursor, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<SiteCoord>,
    #[serde(default)]
    pub metrics: LatticeMetrics,
}

impl LatticeSnapshot {
    /// Creates a snapshot with no sites or metadata.
    pub fn new(
        snapshot_id: impl Into<String>,
        run_id: Uuid,
        step: u64,
        triggered_by: impl Into<String>,
    ) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            run_id,
            step,
            triggered_by: triggered_by.into(),
            width: 0,
            height: 0,
            dimensions: 0,
            sites: Vec::new(),
            dimension_info: Vec::new(),
            selection: None,
            metrics: LatticeMetrics::default(),
        }
    }

    /// Returns the trait values of the site at `(x, y)`.
    pub fn trait_at(&self, x: usize, y: usize) -> Option<&[f64]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.sites.get(y * self.width + x).map(Vec::as_slice)
    }

    /// Returns the trait values of the selected site, if any.
    pub fn selected_traits(&self) -> Option<&[f64]> {
        let sel = self.selection?;
        self.trait_at(sel.x, sel.y)
    }

    pub fn site_count(&self) -> usize {
        self.width * self.height
    }

    /// Finds the dimension carrying `role`.
    pub fn role_dimension(&self, role: DimensionRole) -> Option<&DimensionSnapshot> {
        self.dimension_info.iter().find(|d| d.role == Some(role))
    }
}
