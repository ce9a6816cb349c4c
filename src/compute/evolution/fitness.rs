//! Fitness strategies and ranking.
//!
//! A strategy maps a dot and a read-only snapshot of population-level values
//! to a scalar. Strategies never touch dot or population state, so they can
//! run any number of times per tick and in parallel.

use rand::Rng;
use rayon::prelude::*;

use crate::schema::{FitnessSense, FitnessStrategy, Vec2};

use super::Dot;

/// Reward for reaching the goal under [`FitnessStrategy::Compound`].
pub const SCORE_BONUS: f32 = 10.0;
/// Penalty for dying under [`FitnessStrategy::Compound`].
pub const DEATH_PENALTY: f32 = 10.0;
/// Cost per kick consumed under [`FitnessStrategy::Compound`].
pub const KICK_COST: f32 = 5.0;

/// Population-level values a fitness strategy may read.
#[derive(Debug, Clone, Copy)]
pub struct FitnessContext {
    pub goal_center: Vec2,
    pub spawn: Vec2,
    /// Kick ticks elapsed in the current generation.
    pub on_move: usize,
}

/// Scores a dot. Implementations must be pure.
pub trait Fitness: Send + Sync {
    fn eval(&self, dot: &Dot, ctx: &FitnessContext) -> f32;

    /// Ordering under which this fitness is ranked and tracked.
    fn sense(&self) -> FitnessSense;
}

impl Fitness for FitnessStrategy {
    fn eval(&self, dot: &Dot, ctx: &FitnessContext) -> f32 {
        match self {
            FitnessStrategy::Constant => 1.0,
            FitnessStrategy::Random => rand::thread_rng().gen_range(1.0..=100.0),
            FitnessStrategy::Distance => {
                let constraint = ctx.spawn.distance(ctx.goal_center);
                if constraint <= f32::EPSILON {
                    return 0.0;
                }
                1.0 - dot.position.distance(ctx.goal_center) / constraint
            }
            FitnessStrategy::Compound => {
                let mut base = dot.position.distance(ctx.goal_center);
                if dot.is_scored() {
                    base -= SCORE_BONUS;
                } else if dot.is_dead() {
                    base += DEATH_PENALTY;
                }
                let consumed = ctx.on_move.min(dot.genome().len());
                base + consumed as f32 * KICK_COST
            }
        }
    }

    fn sense(&self) -> FitnessSense {
        FitnessStrategy::sense(*self)
    }
}

/// Evaluate every dot in parallel.
pub fn evaluate_all(fitness: &dyn Fitness, dots: &[Dot], ctx: &FitnessContext) -> Vec<f32> {
    dots.par_iter().map(|dot| fitness.eval(dot, ctx)).collect()
}

/// Index and value of the best fitness. Ties keep the earliest index.
pub fn best_of(values: &[f32], sense: FitnessSense) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &value) in values.iter().enumerate() {
        let incumbent = best.map_or(sense.worst(), |(_, v)| v);
        if sense.improves(value, incumbent) {
            best = Some((i, value));
        }
    }
    best
}

/// Indices of `values` from best to worst. Stable: equal values keep their order.
pub fn rank(values: &[f32], sense: FitnessSense) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    match sense {
        FitnessSense::Ascending => order.sort_by(|&a, &b| values[a].total_cmp(&values[b])),
        FitnessSense::Descending => order.sort_by(|&a, &b| values[b].total_cmp(&values[a])),
    }
    order
}
