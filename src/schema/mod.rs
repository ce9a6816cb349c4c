//! Schema module - Scenario, genome and statistics types for dot evolution.

mod evolution;
mod geometry;
mod scenario;

pub use evolution::*;
pub use geometry::*;
pub use scenario::*;
