//! Statistics Output
//!
//! Trait histograms, edge similarity and cultural region counts, plus a
//! collector that accumulates them over a run.

use serde::Serialize;
use sites_events::{Histogram, LatticeMetrics};
use std::fs;
use std::path::Path;

use crate::components::{Lattice, Site};
use crate::systems::{similarity, RunSummary, StopReason};

use super::OutputError;

/// Statistics output file name
pub const STATS_FILE_NAME: &str = "stats.json";

/// Bin for `value` among `bins` equal-width bins over [0, 1].
///
/// Values at or above 1 land in the last bin and values below 0 in the first.
pub fn bin_index(value: f64, bins: usize) -> usize {
    if bins == 0 {
        return 0;
    }
    if value >= 1.0 {
        return bins - 1;
    }
    if value <= 0.0 || value.is_nan() {
        return 0;
    }
    ((value * bins as f64) as usize).min(bins - 1)
}

/// Distribution of one dimension across all sites.
pub fn histogram(lattice: &Lattice, dimension: usize, bins: usize) -> Histogram {
    let mut counts = vec![0u32; bins];
    if bins > 0 {
        for (_, traits) in lattice.iter() {
            if let Some(value) = traits.get(dimension) {
                counts[bin_index(value, bins)] += 1;
            }
        }
    }
    Histogram {
        dimension,
        bins: counts,
    }
}

/// Mean similarity over all 4-neighbor edges, with the edge count.
pub fn mean_edge_similarity(lattice: &Lattice, threshold: f64) -> (f64, usize) {
    let mut total = 0.0;
    let mut count = 0;
    for (a, b) in lattice.edges() {
        if let (Some(ta), Some(tb)) = (lattice.get(a), lattice.get(b)) {
            total += similarity(ta.as_slice(), tb.as_slice(), threshold);
            count += 1;
        }
    }
    if count == 0 {
        (0.0, 0)
    } else {
        (total / count as f64, count)
    }
}

/// Number of connected groups of neighboring sites with identical traits.
pub fn count_regions(lattice: &Lattice) -> usize {
    let width = lattice.width();
    let mut visited = vec![false; lattice.site_count()];
    let mut stack = Vec::new();
    let mut regions = 0;

    for (start, _) in lattice.iter() {
        let index = start.y * width + start.x;
        if visited[index] {
            continue;
        }
        regions += 1;
        visited[index] = true;
        stack.push(start);

        while let Some(site) = stack.pop() {
            let traits = lattice.get(site);
            for &next in lattice.neighbors(site).as_slice() {
                let next_index = next.y * width + next.x;
                if !visited[next_index] && lattice.get(next) == traits {
                    visited[next_index] = true;
                    stack.push(next);
                }
            }
        }
    }

    regions
}

/// All metrics attached to a snapshot.
pub fn compute_metrics(lattice: &Lattice, threshold: f64, bins: usize) -> LatticeMetrics {
    let (mean_edge_similarity, edge_count) = mean_edge_similarity(lattice, threshold);
    LatticeMetrics {
        histograms: (0..lattice.dimensions())
            .map(|d| histogram(lattice, d, bins))
            .collect(),
        mean_edge_similarity,
        edge_count,
        region_count: count_regions(lattice),
    }
}

/// One sampled point of the run history
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSample {
    pub step: u64,
    pub mean_edge_similarity: f64,
    pub region_count: usize,
}

/// Overall run statistics
#[derive(Debug, Clone, Serialize)]
pub struct SimulationStats {
    pub total_steps: u64,
    pub total_frames: u64,
    pub interactions: u64,
    pub drifts: u64,
    pub escapes: u64,
    pub snapshots: u64,
    pub interaction_rate: f64,
    pub stop_reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escape_site: Option<(usize, usize)>,
    pub history: Vec<MetricsSample>,
}

/// Accumulates metric samples during a run.
#[derive(Debug, Default)]
pub struct StatsCollector {
    pub history: Vec<MetricsSample>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: u64, metrics: &LatticeMetrics) {
        self.history.push(MetricsSample {
            step,
            mean_edge_similarity: metrics.mean_edge_similarity,
            region_count: metrics.region_count,
        });
    }

    /// Combines the samples with the clock's counters.
    pub fn finish(self, summary: &RunSummary) -> SimulationStats {
        let (stop_reason, escape_site) = match summary.stop {
            StopReason::StepLimit => ("step_limit".to_string(), None),
            StopReason::Cancelled => ("cancelled".to_string(), None),
            StopReason::Halted(escape) => {
                let Site { x, y } = escape.site;
                ("escape".to_string(), Some((x, y)))
            }
        };
        let interaction_rate = if summary.steps > 0 {
            summary.interactions as f64 / summary.steps as f64
        } else {
            0.0
        };

        SimulationStats {
            total_steps: summary.steps,
            total_frames: summary.frames,
            interactions: summary.interactions,
            drifts: summary.drifts,
            escapes: summary.escapes,
            snapshots: summary.snapshots,
            interaction_rate,
            stop_reason,
            escape_site,
            history: self.history,
        }
    }
}

/// Write run statistics as pretty JSON
pub fn write_stats(stats: &SimulationStats, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(stats)?;
    fs::write(path, json)?;
    Ok(())
}
