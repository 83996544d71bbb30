//! Snapshot Generation
//!
//! Builds read-only lattice snapshots and writes them to disk.

use sites_events::{generate_snapshot_id, DimensionSnapshot, LatticeSnapshot, SiteCoord};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::simulation::Simulation;

use super::stats::compute_metrics;
use super::OutputError;

/// Assigns snapshot IDs and stamps them with the run ID
pub struct SnapshotGenerator {
    run_id: Uuid,
    next_snapshot_id: u64,
    histogram_bins: usize,
}

impl SnapshotGenerator {
    pub fn new(histogram_bins: usize) -> Self {
        Self::with_run_id(Uuid::new_v4(), histogram_bins)
    }

    pub fn with_run_id(run_id: Uuid, histogram_bins: usize) -> Self {
        Self {
            run_id,
            next_snapshot_id: 1,
            histogram_bins,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn next_id(&mut self) -> String {
        let id = generate_snapshot_id(self.next_snapshot_id);
        self.next_snapshot_id += 1;
        id
    }

    pub fn snapshot_count(&self) -> u64 {
        self.next_snapshot_id - 1
    }

    /// Copies the current simulation state into a snapshot.
    pub fn generate(&mut self, sim: &Simulation, step: u64, triggered_by: &str) -> LatticeSnapshot {
        let snapshot_id = self.next_id();
        let lattice = sim.lattice();

        let mut snapshot = LatticeSnapshot::new(snapshot_id, self.run_id, step, triggered_by);
        snapshot.width = lattice.width();
        snapshot.height = lattice.height();
        snapshot.dimensions = lattice.dimensions();
        snapshot.sites = lattice
            .iter()
            .map(|(_, traits)| traits.as_slice().to_vec())
            .collect();
        snapshot.dimension_info = sim
            .dimension_info()
            .iter()
            .map(|info| DimensionSnapshot {
                index: info.index,
                role: info.role,
                name: info.name.clone(),
                color: info.color,
            })
            .collect();
        snapshot.selection = sim.selection().map(|site| SiteCoord::new(site.x, site.y));
        snapshot.metrics = compute_metrics(lattice, sim.params().threshold, self.histogram_bins);

        snapshot
    }
}

/// Write snapshot to file
pub fn write_snapshot(snapshot: &LatticeSnapshot, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    Ok(())
}

/// Writes snapshots under an output directory.
pub struct SnapshotWriter {
    root: PathBuf,
}

impl SnapshotWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshots_dir(&self) -> PathBuf {
        self.root.join("snapshots")
    }

    /// Creates the output directories.
    pub fn ensure_dirs(&self) -> Result<(), OutputError> {
        fs::create_dir_all(self.snapshots_dir())?;
        Ok(())
    }

    /// Write snapshot to the snapshots directory, named by its ID
    pub fn write_to_dir(&self, snapshot: &LatticeSnapshot) -> Result<PathBuf, OutputError> {
        let path = self
            .snapshots_dir()
            .join(format!("{}.json", snapshot.snapshot_id));
        write_snapshot(snapshot, &path)?;
        Ok(path)
    }

    /// Write current state (overwrites each time)
    pub fn write_current_state(&self, snapshot: &LatticeSnapshot) -> Result<PathBuf, OutputError> {
        let path = self.root.join("current_state.json");
        write_snapshot(snapshot, &path)?;
        Ok(path)
    }
}
