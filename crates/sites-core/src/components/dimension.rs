//! Dimension Roles and Shapes
//!
//! Optional behavioral modulation attached to individual trait dimensions.
//! Role bindings come from configuration and are resolved once into plain
//! indices; the engine never looks roles up at tick time.

use serde::{Deserialize, Serialize};
use sites_events::DimensionRole;
use tracing::warn;

use crate::config::ConfigError;

/// Display color for dimensions without a role.
pub const DEFAULT_COLOR: [u8; 3] = [0, 255, 0];

/// Shape function mapping a role-bearing trait value to a scale factor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// f(x) = x
    Linear,
    /// f(x) = 1 - 2(x - 1)²; 1 at x = 1, -1 at x = 0
    PeakAtOne,
    /// f(x) = value
    Constant { value: f64 },
    /// Arbitrary function, library use only
    #[serde(skip)]
    Custom(fn(f64) -> f64),
}

impl Shape {
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Shape::Linear => x,
            Shape::PeakAtOne => 1.0 - 2.0 * (x - 1.0).powi(2),
            Shape::Constant { value } => *value,
            Shape::Custom(f) => f(x),
        }
    }

    /// Shape used when a role binding does not name one.
    pub fn default_for(role: DimensionRole) -> Self {
        match role {
            DimensionRole::Conformity => Shape::PeakAtOne,
            DimensionRole::Conviction => Shape::Linear,
        }
    }
}

/// Configured assignment of a role to a dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleBinding {
    pub index: usize,
    /// Reject the configuration instead of disabling the role when the
    /// index is out of range
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
}

impl RoleBinding {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            shape: None,
            required: false,
        }
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Resolved role: a valid dimension index plus its shape.
#[derive(Debug, Clone, Copy)]
pub struct Modulator {
    pub index: usize,
    pub shape: Shape,
}

impl Modulator {
    pub fn new(index: usize, shape: Shape) -> Self {
        Self { index, shape }
    }

    /// Scale factor for an agent, read from its own role dimension.
    pub fn factor(&self, traits: &[f64]) -> f64 {
        traits
            .get(self.index)
            .map(|&value| self.shape.apply(value))
            .unwrap_or(1.0)
    }
}

/// Resolves a role binding against the trait dimensionality.
///
/// An absent binding disables the role. An out-of-range index disables it as
/// well unless the binding is marked required.
pub fn resolve_role(
    role: DimensionRole,
    binding: Option<&RoleBinding>,
    dimensions: usize,
) -> Result<Option<Modulator>, ConfigError> {
    let Some(binding) = binding else {
        return Ok(None);
    };

    if binding.index >= dimensions {
        if binding.required {
            return Err(ConfigError::RoleOutOfRange {
                role,
                index: binding.index,
                dimensions,
            });
        }
        warn!(
            %role,
            index = binding.index,
            dimensions,
            "Role index out of range, modulation disabled"
        );
        return Ok(None);
    }

    let shape = binding.shape.unwrap_or(Shape::default_for(role));
    Ok(Some(Modulator::new(binding.index, shape)))
}

/// Descriptive metadata for one dimension, consumed by renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionInfo {
    pub index: usize,
    pub role: Option<DimensionRole>,
    pub name: Option<String>,
    pub color: [u8; 3],
}

impl DimensionInfo {
    pub fn new(index: usize, role: Option<DimensionRole>) -> Self {
        Self {
            index,
            role,
            name: None,
            color: role.map(DimensionRole::default_color).unwrap_or(DEFAULT_COLOR),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_at_one_shape() {
        let shape = Shape::PeakAtOne;
        assert_eq!(shape.apply(1.0), 1.0);
        assert_eq!(shape.apply(0.5), 0.5);
        assert_eq!(shape.apply(0.0), -1.0);
    }

    #[test]
    fn test_linear_and_constant_shapes() {
        assert_eq!(Shape::Linear.apply(0.3), 0.3);
        assert_eq!(Shape::Constant { value: 0.7 }.apply(0.1), 0.7);
        assert_eq!(Shape::Custom(|x| x * x).apply(0.5), 0.25);
    }

    #[test]
    fn test_absent_role_is_disabled() {
        let resolved = resolve_role(DimensionRole::Conformity, None, 4).unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn test_out_of_range_role_is_disabled() {
        let binding = RoleBinding::new(9);
        let resolved = resolve_role(DimensionRole::Conviction, Some(&binding), 4).unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn test_required_out_of_range_role_fails() {
        let binding = RoleBinding::new(4).required();
        let err = resolve_role(DimensionRole::Conviction, Some(&binding), 4).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::RoleOutOfRange {
                role: DimensionRole::Conviction,
                index: 4,
                dimensions: 4
            }
        ));
    }

    #[test]
    fn test_resolved_role_uses_default_shape() {
        let binding = RoleBinding::new(0);
        let modulator = resolve_role(DimensionRole::Conformity, Some(&binding), 2)
            .unwrap()
            .unwrap();
        assert_eq!(modulator.index, 0);
        assert_eq!(modulator.factor(&[0.0, 0.4]), -1.0);

        let binding = RoleBinding::new(1).with_shape(Shape::Constant { value: 0.5 });
        let modulator = resolve_role(DimensionRole::Conviction, Some(&binding), 2)
            .unwrap()
            .unwrap();
        assert_eq!(modulator.factor(&[0.0, 0.4]), 0.5);
    }

    #[test]
    fn test_shape_toml_representation() {
        let binding: RoleBinding =
            toml::from_str("index = 1\nshape = { kind = \"constant\", value = 0.2 }").unwrap();
        assert_eq!(binding.index, 1);
        assert!(matches!(binding.shape, Some(Shape::Constant { value }) if value == 0.2));
        assert!(!binding.required);
    }

    #[test]
    fn test_dimension_info_colors() {
        let info = DimensionInfo::new(0, Some(DimensionRole::Conformity));
        assert_eq!(info.color, [255, 255, 0]);

        let info = DimensionInfo::new(3, None).with_name("music");
        assert_eq!(info.color, DEFAULT_COLOR);
        assert_eq!(info.name.as_deref(), Some("music"));
    }
}
