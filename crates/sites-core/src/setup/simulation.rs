//! Simulation Assembly
//!
//! Resolves configuration into engine parameters and builds a ready-to-run
//! [`Simulation`].

use rand::Rng;
use sites_events::DimensionRole;
use tracing::info;

use crate::components::resolve_role;
use crate::config::{ConfigError, SimConfig};
use crate::simulation::Simulation;
use crate::systems::EngineParams;

use super::lattice::populate_lattice;

/// Resolves roles and the escape dimension against the configured D.
pub fn resolve_params(config: &SimConfig) -> Result<EngineParams, ConfigError> {
    config.validate()?;
    let dimensions = config.lattice.dimensions;
    if dimensions == 0 {
        return Err(ConfigError::NoDimensions);
    }

    let conformity = resolve_role(
        DimensionRole::Conformity,
        config.roles.binding(DimensionRole::Conformity),
        dimensions,
    )?;
    let conviction = resolve_role(
        DimensionRole::Conviction,
        config.roles.binding(DimensionRole::Conviction),
        dimensions,
    )?;
    if let (Some(a), Some(b)) = (conformity, conviction) {
        if a.index == b.index {
            return Err(ConfigError::SharedRoleIndex { index: a.index });
        }
    }

    let escape_index = config
        .roles
        .escape_index
        .unwrap_or(dimensions - 1);
    let escape_index = (escape_index < dimensions).then_some(escape_index);

    Ok(EngineParams {
        threshold: config.model.threshold,
        delta: config.model.delta,
        epsilon: config.model.epsilon,
        clamp_mutations: config.model.clamp_mutations,
        interaction: config.model.interaction,
        conformity,
        conviction,
        escape_index,
    })
}

/// Builds a simulation, drawing the initial lattice from `rng`.
pub fn build_simulation<R: Rng + ?Sized>(
    config: &SimConfig,
    rng: &mut R,
) -> Result<Simulation, ConfigError> {
    let params = resolve_params(config)?;
    let lattice = populate_lattice(
        config.lattice.width,
        config.lattice.height,
        config.lattice.dimensions,
        config.lattice.init,
        rng,
    )?;

    info!(
        width = lattice.width(),
        height = lattice.height(),
        dimensions = lattice.dimensions(),
        clamp = params.clamp_mutations,
        "Built lattice"
    );

    Ok(Simulation::new(lattice, params).with_labels(&config.lattice.labels))
}
