//! Aggregate metrics attached to each snapshot.

use serde::{Deserialize, Serialize};

/// Value distribution of one trait dimension across all sites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub dimension: usize,
    /// Site counts per equal-width bin over [0, 1]
    pub bins: Vec<u32>,
}

impl Histogram {
    /// Total number of sites counted.
    pub fn total(&self) -> u32 {
        self.bins.iter().sum()
    }

    /// Fraction of sites in each bin.
    pub fn fractions(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.bins.len()];
        }
        self.bins
            .iter()
            .map(|&count| count as f64 / total as f64)
            .collect()
    }
}

/// Lattice-wide summary statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatticeMetrics {
    #[serde(default)]
    pub histograms: Vec<Histogram>,
    /// Mean similarity over all 4-neighbor edges
    pub mean_edge_similarity: f64,
    /// Number of 4-neighbor edges
    pub edge_count: usize,
    /// Connected groups of sites with identical trait vectors
    pub region_count: usize,
}
