//! Model State
//!
//! Trait vectors, the lattice that owns them, and per-dimension metadata.

pub mod dimension;
pub mod lattice;
pub mod trait_vector;

pub use dimension::{resolve_role, DimensionInfo, Modulator, RoleBinding, Shape, DEFAULT_COLOR};
pub use lattice::{Lattice, Neighbors, Site};
pub use trait_vector::TraitVector;
