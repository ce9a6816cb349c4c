//! Dot evolution - evolving impulse-driven point masses toward a goal.
//!
//! A population of dots shares one rigid-body world. Each dot carries a
//! genome of impulses applied at a fixed kick interval; dots die on leaving
//! the arena or touching a kill wall and score on entering the goal box. When
//! a generation's time runs out the roster is ranked by fitness and the
//! bottom half is replaced by mutated children of the top half.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Scenario, genome and statistics types
//! - `compute`: Physics adapter, evolutionary loop and rendering
//!
//! # Example
//!
//! ```rust,no_run
//! use dot_evolution::{FrameBuffer, Population, Scenario};
//!
//! let scenario = Scenario {
//!     size: 200,
//!     ..Scenario::default()
//! };
//! scenario.validate().expect("scenario is valid");
//!
//! let mut population = Population::new(scenario).expect("population");
//! for _ in 0..10_000 {
//!     population.step(1.0 / 60.0);
//! }
//!
//! let mut frame = FrameBuffer::new(640, 480);
//! population.draw(&mut frame);
//! println!("Generation {}", population.generation());
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{FrameBuffer, PhysicsWorld, Population, PopulationError};
pub use schema::{FitnessStrategy, Genome, GenerationStats, Scenario, ScenarioError};
