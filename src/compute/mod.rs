//! Compute module - Physics adapter, evolution and rendering.

pub mod evolution;
pub mod physics;
mod render;

pub use evolution::{Population, PopulationError};
pub use physics::{PhysicsWorld, WallContact};
pub use render::*;
