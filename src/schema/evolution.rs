//! Evolution types: genomes, mutation tuning, fitness selection and statistics.

use serde::{Deserialize, Serialize};

use super::Vec2;

/// Ordered impulse schedule. Entry `i` is applied at the `i`-th kick tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Genome {
    pub kicks: Vec<Vec2>,
}

impl Genome {
    pub fn new(kicks: Vec<Vec2>) -> Self {
        Self { kicks }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.kicks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kicks.is_empty()
    }

    /// Kick scheduled for the given kick tick, if the schedule reaches it.
    #[inline]
    pub fn kick(&self, on_move: usize) -> Option<Vec2> {
        self.kicks.get(on_move).copied()
    }
}

/// Per-mutation probabilities, each applied at most once per child.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chances {
    /// Replace one kick with a fresh random kick.
    pub change_kick: f64,
    /// Drop one kick (never below one kick).
    pub remove_kick: f64,
    /// Insert a fresh random kick.
    pub add_kick: f64,
    /// Exchange two kicks.
    pub swap_kick: f64,
}

impl Chances {
    pub const NONE: Chances = Chances {
        change_kick: 0.0,
        remove_kick: 0.0,
        add_kick: 0.0,
        swap_kick: 0.0,
    };
}

impl Default for Chances {
    fn default() -> Self {
        Self {
            change_kick: 0.1,
            remove_kick: 0.05,
            add_kick: 0.05,
            swap_kick: 0.0,
        }
    }
}

/// Bounds for randomly generated genomes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenomeConstraints {
    /// Number of kicks in a freshly generated genome.
    #[serde(default = "default_genome_length")]
    pub length: usize,
    /// Largest impulse magnitude a random kick may have.
    #[serde(default = "default_max_impulse")]
    pub max_impulse: f32,
}

impl Default for GenomeConstraints {
    fn default() -> Self {
        Self {
            length: default_genome_length(),
            max_impulse: default_max_impulse(),
        }
    }
}

fn default_genome_length() -> usize {
    40
}
fn default_max_impulse() -> f32 {
    60.0
}

/// Ordering that makes one fitness value better than another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitnessSense {
    /// Lower fitness ranks first.
    Ascending,
    /// Higher fitness ranks first.
    Descending,
}

impl FitnessSense {
    /// True if `candidate` strictly beats `incumbent`.
    #[inline]
    pub fn improves(self, candidate: f32, incumbent: f32) -> bool {
        match self {
            FitnessSense::Ascending => candidate < incumbent,
            FitnessSense::Descending => candidate > incumbent,
        }
    }

    /// Value every real fitness improves on.
    #[inline]
    pub fn worst(self) -> f32 {
        match self {
            FitnessSense::Ascending => f32::INFINITY,
            FitnessSense::Descending => f32::NEG_INFINITY,
        }
    }
}

/// Built-in fitness strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FitnessStrategy {
    /// Always 1.
    Constant,
    /// Uniform in [1, 100], non-deterministic.
    Random,
    /// `1 - distance(dot, goal) / distance(spawn, goal)`; higher is better.
    Distance,
    /// Goal distance with score bonus, death penalty and kick cost; lower is better.
    #[default]
    Compound,
}

impl FitnessStrategy {
    /// Natural ranking order for this strategy.
    pub fn sense(self) -> FitnessSense {
        match self {
            FitnessStrategy::Distance => FitnessSense::Descending,
            FitnessStrategy::Constant | FitnessStrategy::Random | FitnessStrategy::Compound => {
                FitnessSense::Ascending
            }
        }
    }
}

/// How ranked parents are paired and which roster slots their children overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PairingScheme {
    /// Pairs `(i, i+1)` for even `i < half - 1`, overwriting `(i+half, i+half+1)`.
    /// With an odd half the last parent and the last roster slot sit out.
    #[default]
    Adjacent,
    /// Like `Adjacent`, but an odd half above one also pairs `(half-1, 0)` so
    /// every bottom-half slot is replaced. A roster of two has no pairs.
    Wrapping,
}

/// Summary of one finished generation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub dead: usize,
    pub scored: usize,
    pub active: usize,
    pub avg_fitness: f32,
    pub avg_age: f32,
    /// Average genome length.
    pub avg_kicks: f32,
    /// Average number of kicks actually applied this generation.
    pub avg_kicks_used: f32,
    /// Best fitness seen during the generation.
    pub best_fitness: Option<f32>,
}
