//! Configuration System
//!
//! Loads simulation parameters from a TOML file so runs can be tuned without
//! recompiling. Every section falls back to the classic model's defaults.

use serde::{Deserialize, Serialize};
use sites_events::DimensionRole;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::components::{RoleBinding, Shape};
use crate::setup::InitDistribution;
use crate::systems::InteractionRule;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "sites.toml";

/// Model constants of the classic parameterization
pub mod model_constants {
    /// Largest per-step change of a trait value
    pub const DELTA: f64 = 0.25;
    /// Gap below which sway snaps exactly onto the neighbor's value
    pub const EPSILON: f64 = 0.001;
    /// Distance beyond which two agents no longer interact
    pub const THRESHOLD: f64 = 1.0;
    /// Frames between snapshots
    pub const SNAPSHOT_INTERVAL: u64 = 1000;
    /// Histogram resolution
    pub const HISTOGRAM_BINS: usize = 40;
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid trait distribution: {0}")]
    Distribution(#[from] rand_distr::NormalError),
    #[error("lattice must be at least 1x1, got {width}x{height}")]
    EmptyLattice { width: usize, height: usize },
    #[error("lattice needs at least 2 sites, got {sites}")]
    TooFewSites { sites: usize },
    #[error("trait vectors need at least one dimension")]
    NoDimensions,
    #[error("expected {expected} sites, got {actual}")]
    SiteCountMismatch { expected: usize, actual: usize },
    #[error("site {index} has {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{role} index {index} is outside 0..{dimensions}")]
    RoleOutOfRange {
        role: DimensionRole,
        index: usize,
        dimensions: usize,
    },
    #[error("conformity and conviction both bound to dimension {index}")]
    SharedRoleIndex { index: usize },
    #[error("{name} must be {requirement}, got {value}")]
    InvalidParameter {
        name: &'static str,
        requirement: &'static str,
        value: f64,
    },
}

/// Complete simulation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub lattice: LatticeConfig,
    #[serde(default)]
    pub model: ModelConfig,
    /// When the `[roles]` section is present, only the roles it lists are
    /// enabled
    #[serde(default)]
    pub roles: RoleConfig,
    #[serde(default)]
    pub run: RunConfig,
}

/// Grid and trait layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    pub width: usize,
    pub height: usize,
    /// Trait dimensionality D
    pub dimensions: usize,
    pub init: InitDistribution,
    /// Optional display names, by dimension index
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            width: 12,
            height: 12,
            dimensions: 15,
            init: InitDistribution::Uniform,
            labels: Vec::new(),
        }
    }
}

/// Interaction and mutation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub threshold: f64,
    pub delta: f64,
    pub epsilon: f64,
    /// Clamp sway and mill results into [0, 1]
    pub clamp_mutations: bool,
    pub interaction: InteractionRule,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            threshold: model_constants::THRESHOLD,
            delta: model_constants::DELTA,
            epsilon: model_constants::EPSILON,
            clamp_mutations: true,
            interaction: InteractionRule::ArgmaxSway,
        }
    }
}

/// Role assignments and the escape dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conformity: Option<RoleBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conviction: Option<RoleBinding>,
    /// Dimension watched by the escape check; the last dimension when unset.
    /// An out-of-range index disables the check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escape_index: Option<usize>,
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            conformity: Some(RoleBinding::new(0).with_shape(Shape::PeakAtOne)),
            conviction: Some(RoleBinding::new(1).with_shape(Shape::Linear)),
            escape_index: None,
        }
    }
}

impl RoleConfig {
    /// Configuration with no roles and the default escape dimension.
    pub fn none() -> Self {
        Self {
            conformity: None,
            conviction: None,
            escape_index: None,
        }
    }

    pub fn binding(&self, role: DimensionRole) -> Option<&RoleBinding> {
        match role {
            DimensionRole::Conformity => self.conformity.as_ref(),
            DimensionRole::Conviction => self.conviction.as_ref(),
        }
    }
}

/// Host loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub seed: u64,
    /// Maximum number of ticks; 0 runs until stopped
    pub step_limit: u64,
    pub snapshot_interval: u64,
    pub histogram_bins: usize,
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            step_limit: 0,
            snapshot_interval: model_constants::SNAPSHOT_INTERVAL,
            histogram_bins: model_constants::HISTOGRAM_BINS,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks the numeric model parameters.
    ///
    /// Lattice shape and role indices are checked when the simulation is
    /// built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let model = &self.model;
        if !(model.threshold.is_finite() && model.threshold > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "threshold",
                requirement: "finite and positive",
                value: model.threshold,
            });
        }
        if !(model.delta.is_finite() && model.delta >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "delta",
                requirement: "finite and non-negative",
                value: model.delta,
            });
        }
        if !(model.epsilon.is_finite() && model.epsilon >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "epsilon",
                requirement: "finite and non-negative",
                value: model.epsilon,
            });
        }
        if self.run.histogram_bins == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "histogram_bins",
                requirement: "at least 1",
                value: 0.0,
            });
        }
        Ok(())
    }
}
