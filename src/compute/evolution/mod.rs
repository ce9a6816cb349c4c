//! Generational evolution of impulse-driven dots.
//!
//! # Overview
//!
//! - **Dots** (`dot`): a genome bound to one body in the shared physics world
//! - **Genome Operations** (`genome`): random generation, crossover, and mutation
//! - **Fitness Strategies** (`fitness`): pure scoring functions and ranking
//! - **Selection** (`selection`): which ranked parents breed into which slots
//! - **Population** (`population`): the tick loop and the generation boundary
//!
//! # Example
//!
//! ```rust,no_run
//! use dot_evolution::compute::evolution::Population;
//! use dot_evolution::schema::Scenario;
//!
//! let mut population = Population::new(Scenario::default()).expect("valid scenario");
//! while population.generation() < 5 {
//!     population.step(1.0 / 60.0);
//! }
//!
//! for stats in population.history() {
//!     println!("Generation {}: {} scored", stats.generation, stats.scored);
//! }
//! ```
//!
//! # Generation boundary
//!
//! Once a generation's time budget runs out the roster is ranked, the bottom
//! half is replaced by mutated children of adjacent top-half pairs, and every
//! dot returns to spawn. Parents are never mutated; they only age.

mod dot;
mod fitness;
mod genome;
mod population;
mod selection;

pub use dot::{Dot, DotState};
pub use fitness::{
    DEATH_PENALTY, Fitness, FitnessContext, KICK_COST, SCORE_BONUS, best_of, evaluate_all, rank,
};
pub use genome::GenomeRng;
pub use population::{Population, PopulationError};
pub use selection::{Pairing, pairing_plan};
