//! Genome manipulation utilities for evolutionary search.
//!
//! Provides random generation, crossover, and mutation of kick schedules.

use rand::prelude::*;
use rand_distr::UnitCircle;

use crate::schema::{Chances, Genome, GenomeConstraints, Vec2};

/// Random number generator wrapper for genome operations.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create from an optional seed, falling back to entropy.
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::random, Self::new)
    }

    /// Generate a random genome of `constraints.length` kicks (at least one).
    pub fn random_genome(&mut self, constraints: &GenomeConstraints) -> Genome {
        let kicks = (0..constraints.length.max(1))
            .map(|_| self.random_kick(constraints))
            .collect();
        Genome::new(kicks)
    }

    /// Uniform direction, uniform magnitude in `[0, max_impulse]`.
    pub fn random_kick(&mut self, constraints: &GenomeConstraints) -> Vec2 {
        let [x, y]: [f32; 2] = UnitCircle.sample(&mut self.rng);
        let magnitude = self.rng.gen_range(0.0..=constraints.max_impulse.max(0.0));
        Vec2::new(x, y) * magnitude
    }

    /// Uniform crossover producing two children.
    ///
    /// Each index shared by both parents goes to one child from each parent,
    /// decided by a fair coin. Past the shorter parent the longer parent's
    /// child keeps its own kicks, so every child has its parent's length.
    pub fn crossover(&mut self, parent1: &Genome, parent2: &Genome) -> (Genome, Genome) {
        let shared = parent1.len().min(parent2.len());
        let mut child1 = Vec::with_capacity(parent1.len());
        let mut child2 = Vec::with_capacity(parent2.len());

        for (k1, k2) in parent1.kicks.iter().zip(&parent2.kicks) {
            if self.rng.gen_bool(0.5) {
                child1.push(*k1);
                child2.push(*k2);
            } else {
                child1.push(*k2);
                child2.push(*k1);
            }
        }
        child1.extend_from_slice(&parent1.kicks[shared..]);
        child2.extend_from_slice(&parent2.kicks[shared..]);

        (Genome::new(child1), Genome::new(child2))
    }

    /// Mutate a genome.
    ///
    /// Each of change, remove, add and swap fires independently with its
    /// chance. Remove never takes a genome below one kick.
    pub fn mutate(
        &mut self,
        genome: &mut Genome,
        chances: &Chances,
        constraints: &GenomeConstraints,
    ) {
        let kicks = &mut genome.kicks;

        if self.roll(chances.change_kick) && !kicks.is_empty() {
            let idx = self.rng.gen_range(0..kicks.len());
            kicks[idx] = self.random_kick(constraints);
        }

        if self.roll(chances.remove_kick) && kicks.len() > 1 {
            let idx = self.rng.gen_range(0..kicks.len());
            kicks.remove(idx);
        }

        if self.roll(chances.add_kick) {
            let idx = self.rng.gen_range(0..=kicks.len());
            let kick = self.random_kick(constraints);
            kicks.insert(idx, kick);
        }

        if self.roll(chances.swap_kick) && kicks.len() > 1 {
            let a = self.rng.gen_range(0..kicks.len());
            // Offset keeps the second index distinct from the first.
            let b = (a + self.rng.gen_range(1..kicks.len())) % kicks.len();
            kicks.swap(a, b);
        }
    }

    fn roll(&mut self, chance: f64) -> bool {
        self.rng.gen_bool(chance.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn genome_of(len: usize, tag: f32) -> Genome {
        Genome::new((0..len).map(|i| Vec2::new(tag, i as f32)).collect())
    }

    #[test]
    fn test_random_genome() {
        let mut rng = GenomeRng::new(42);
        let constraints = GenomeConstraints::default();

        let genome = rng.random_genome(&constraints);
        assert_eq!(genome.len(), constraints.length);
        for kick in &genome.kicks {
            assert!(kick.length() <= constraints.max_impulse + 1e-3);
        }
    }

    #[test]
    fn test_random_genome_never_empty() {
        let mut rng = GenomeRng::new(1);
        let constraints = GenomeConstraints {
            length: 0,
            max_impulse: 10.0,
        };
        assert_eq!(rng.random_genome(&constraints).len(), 1);
    }

    #[test]
    fn test_crossover_takes_each_index_from_one_parent() {
        let mut rng = GenomeRng::new(42);
        let a = genome_of(16, 1.0);
        let b = genome_of(16, 2.0);

        let (c1, c2) = rng.crossover(&a, &b);
        for i in 0..16 {
            let from_a = c1.kicks[i] == a.kicks[i] && c2.kicks[i] == b.kicks[i];
            let from_b = c1.kicks[i] == b.kicks[i] && c2.kicks[i] == a.kicks[i];
            assert!(from_a || from_b);
        }
    }

    #[test]
    fn test_crossover_is_seed_deterministic() {
        let a = genome_of(32, 1.0);
        let b = genome_of(32, 2.0);
        let first = GenomeRng::new(9).crossover(&a, &b);
        let second = GenomeRng::new(9).crossover(&a, &b);
        assert_eq!(first, second);
    }

    #[test]
    fn test_crossover_unequal_lengths_keep_parent_lengths() {
        let mut rng = GenomeRng::new(3);
        let a = genome_of(5, 1.0);
        let b = genome_of(2, 2.0);
        let (c1, c2) = rng.crossover(&a, &b);
        assert_eq!(c1.len(), 5);
        assert_eq!(c2.len(), 2);
        assert_eq!(&c1.kicks[2..], &a.kicks[2..]);
    }

    #[test]
    fn test_mutation_all_zero_is_identity() {
        let mut rng = GenomeRng::new(42);
        let constraints = GenomeConstraints::default();
        let original = rng.random_genome(&constraints);
        let mut genome = original.clone();

        rng.mutate(&mut genome, &Chances::NONE, &constraints);
        assert_eq!(genome, original);
    }

    #[test]
    fn test_mutation_add_and_remove() {
        let mut rng = GenomeRng::new(42);
        let constraints = GenomeConstraints::default();
        let mut genome = genome_of(4, 1.0);

        let add = Chances {
            add_kick: 1.0,
            ..Chances::NONE
        };
        rng.mutate(&mut genome, &add, &constraints);
        assert_eq!(genome.len(), 5);

        let remove = Chances {
            remove_kick: 1.0,
            ..Chances::NONE
        };
        rng.mutate(&mut genome, &remove, &constraints);
        assert_eq!(genome.len(), 4);
    }

    #[test]
    fn test_swap_preserves_multiset() {
        let mut rng = GenomeRng::new(5);
        let constraints = GenomeConstraints::default();
        let original = genome_of(6, 1.0);
        let mut genome = original.clone();
        let swap = Chances {
            swap_kick: 1.0,
            ..Chances::NONE
        };

        rng.mutate(&mut genome, &swap, &constraints);
        assert_ne!(genome, original);
        let mut ys: Vec<f32> = genome.kicks.iter().map(|k| k.y).collect();
        ys.sort_by(f32::total_cmp);
        assert_eq!(ys, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_mutation_on_single_kick() {
        let mut rng = GenomeRng::new(8);
        let constraints = GenomeConstraints::default();
        let all = Chances {
            change_kick: 1.0,
            remove_kick: 1.0,
            add_kick: 0.0,
            swap_kick: 1.0,
        };
        let mut genome = genome_of(1, 1.0);
        rng.mutate(&mut genome, &all, &constraints);
        assert_eq!(genome.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_crossover_preserves_length(len in 1usize..64, seed in any::<u64>()) {
            let mut rng = GenomeRng::new(seed);
            let a = genome_of(len, 1.0);
            let b = genome_of(len, 2.0);
            let (c1, c2) = rng.crossover(&a, &b);
            prop_assert_eq!(c1.len(), len);
            prop_assert_eq!(c2.len(), len);
        }

        #[test]
        fn prop_mutate_never_below_one(len in 1usize..8, rounds in 1usize..32, seed in any::<u64>()) {
            let mut rng = GenomeRng::new(seed);
            let constraints = GenomeConstraints::default();
            let chances = Chances {
                change_kick: 1.0,
                remove_kick: 1.0,
                add_kick: 0.0,
                swap_kick: 1.0,
            };
            let mut genome = genome_of(len, 1.0);
            for _ in 0..rounds {
                rng.mutate(&mut genome, &chances, &constraints);
                prop_assert!(!genome.is_empty());
            }
        }
    }
}
