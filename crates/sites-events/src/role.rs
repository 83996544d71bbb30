//! Dimension roles.

use serde::{Deserialize, Serialize};

/// Behavioral role a trait dimension can carry.
///
/// Roles are consumed by the mutation operators only; every other dimension is
/// a plain cultural feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionRole {
    /// Damps the magnitude of convergence (sway) steps.
    Conformity,
    /// Damps the magnitude of random drift (mill) steps.
    Conviction,
}

impl DimensionRole {
    /// Default display color used when no explicit color is configured.
    pub fn default_color(self) -> [u8; 3] {
        match self {
            DimensionRole::Conformity => [255, 255, 0],
            DimensionRole::Conviction => [0, 255, 255],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DimensionRole::Conformity => "conformity",
            DimensionRole::Conviction => "conviction",
        }
    }
}

impl std::fmt::Display for DimensionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
