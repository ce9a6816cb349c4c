//! Population lifecycle: stepping, death and scoring, and generational evolve.

use std::collections::{BTreeSet, HashMap};

use log::{debug, info};
use rapier2d::prelude::RigidBodyHandle;

use crate::compute::physics::{PhysicsWorld, WallContact};
use crate::compute::render::{FrameBuffer, colors};
use crate::schema::{FitnessSense, GenerationStats, Genome, Scenario, ScenarioError};

use super::fitness::{Fitness, FitnessContext, best_of, evaluate_all, rank};
use super::genome::GenomeRng;
use super::selection::pairing_plan;
use super::Dot;

/// Errors raised when building a population.
#[derive(Debug, thiserror::Error)]
pub enum PopulationError {
    #[error("Invalid scenario: {0}")]
    InvalidScenario(#[from] ScenarioError),
}

/// A roster of dots sharing one physics world.
pub struct Population {
    scenario: Scenario,
    world: PhysicsWorld,
    dots: Vec<Dot>,
    /// Dot body to roster index, rebuilt whenever the roster changes.
    owners: HashMap<RigidBodyHandle, usize>,
    fitness: Box<dyn Fitness>,
    sense: FitnessSense,
    rng: GenomeRng,
    next_id: u64,
    /// Paused ticks are complete no-ops.
    pub paused: bool,
    generation: usize,
    time: f32,
    on_move: usize,
    best: Option<(usize, f32)>,
    history: Vec<GenerationStats>,
}

impl Population {
    /// Build a random population using the scenario's fitness strategy.
    pub fn new(scenario: Scenario) -> Result<Self, PopulationError> {
        let fitness = Box::new(scenario.fitness);
        Self::with_fitness(scenario, fitness)
    }

    /// Build a random population ranked by a custom fitness.
    pub fn with_fitness(
        scenario: Scenario,
        fitness: Box<dyn Fitness>,
    ) -> Result<Self, PopulationError> {
        scenario.validate()?;

        let mut world = PhysicsWorld::new(scenario.damping, scenario.solver_iterations);
        for wall in scenario.kill_walls() {
            world.add_kill_wall(wall);
        }

        let mut rng = GenomeRng::from_seed(scenario.seed);
        let dots: Vec<Dot> = (0..scenario.size)
            .map(|id| {
                let genome = rng.random_genome(&scenario.genome);
                Dot::embody(
                    id as u64,
                    genome,
                    &mut world,
                    scenario.spawn,
                    scenario.dot_radius,
                )
            })
            .collect();

        info!(
            "Population '{}': {} dots, {} kill walls",
            scenario.name,
            dots.len(),
            scenario.kill_walls().len()
        );

        let sense = fitness.sense();
        let mut population = Self {
            next_id: dots.len() as u64,
            scenario,
            world,
            dots,
            owners: HashMap::new(),
            fitness,
            sense,
            rng,
            paused: false,
            generation: 0,
            time: 0.0,
            on_move: 0,
            best: None,
            history: Vec::new(),
        };
        population.index_owners();
        population.reset();
        Ok(population)
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Simulated seconds elapsed in the current generation.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Index of the next kick.
    pub fn on_move(&self) -> usize {
        self.on_move
    }

    /// Best dot seen this generation.
    pub fn best_dot(&self) -> Option<&Dot> {
        self.best.and_then(|(i, _)| self.dots.get(i))
    }

    pub fn best_fitness(&self) -> Option<f32> {
        self.best.map(|(_, f)| f)
    }

    pub fn is_best(&self, index: usize) -> bool {
        self.best.is_some_and(|(i, _)| i == index)
    }

    /// Statistics of every finished generation, oldest first.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    fn fitness_context(&self) -> FitnessContext {
        FitnessContext {
            goal_center: self.scenario.target.center,
            spawn: self.scenario.spawn,
            on_move: self.on_move,
        }
    }

    fn index_owners(&mut self) {
        self.owners = self
            .dots
            .iter()
            .enumerate()
            .map(|(i, dot)| (dot.body(), i))
            .collect();
    }

    /// Advance the simulation by `dt` simulated seconds.
    ///
    /// The tick that finds the generation's time budget exceeded evolves and
    /// resets instead of stepping.
    pub fn step(&mut self, dt: f32) {
        if self.paused {
            return;
        }

        if self.time > self.scenario.generation_time {
            self.evolve();
            return;
        }

        let contacts = self.world.step(dt);
        self.time += dt;
        self.resolve_contacts(&contacts);

        if self.time >= self.on_move as f32 * self.scenario.kick_time {
            for dot in self.dots.iter().filter(|d| d.is_active()) {
                if let Some(kick) = dot.genome().kick(self.on_move) {
                    self.world.apply_impulse(dot.body(), kick);
                }
            }
            self.on_move += 1;
        }

        for dot in &mut self.dots {
            dot.sync_position(&self.world);
            if !dot.is_active() {
                continue;
            }
            if self.scenario.out_of_bounds(dot.position) {
                dot.kill(&mut self.world);
            } else if self.scenario.target.contains(dot.position) {
                dot.score(&mut self.world);
            }
        }

        self.track_best();
    }

    /// Kill dots that touched a kill wall during the last physics step.
    fn resolve_contacts(&mut self, contacts: &[WallContact]) {
        for contact in contacts {
            if let Some(&index) = self.owners.get(&contact.body)
                && self.dots[index].kill(&mut self.world)
            {
                debug!("Dot {} hit a kill wall", self.dots[index].id);
            }
        }
    }

    /// Re-score every dot and fold the generation's best with strict improvement.
    fn track_best(&mut self) {
        let ctx = self.fitness_context();
        let values = evaluate_all(self.fitness.as_ref(), &self.dots, &ctx);
        for (dot, &value) in self.dots.iter_mut().zip(&values) {
            dot.fitness = value;
        }

        if let Some((index, value)) = best_of(&values, self.sense) {
            let incumbent = self.best.map_or(self.sense.worst(), |(_, f)| f);
            if self.sense.improves(value, incumbent) {
                self.best = Some((index, value));
            }
        }
    }

    /// Summarize the roster as it stands.
    pub fn stats(&self) -> GenerationStats {
        let mut stats = GenerationStats {
            generation: self.generation,
            best_fitness: self.best_fitness(),
            ..Default::default()
        };
        if self.dots.is_empty() {
            return stats;
        }

        for dot in &self.dots {
            stats.avg_fitness += dot.fitness;
            stats.avg_age += dot.age as f32;
            stats.avg_kicks += dot.genome().len() as f32;
            stats.avg_kicks_used += self.on_move.min(dot.genome().len()) as f32;
            if dot.is_dead() {
                stats.dead += 1;
            } else if dot.is_scored() {
                stats.scored += 1;
            } else {
                stats.active += 1;
            }
        }

        let n = self.dots.len() as f32;
        stats.avg_fitness /= n;
        stats.avg_age /= n;
        stats.avg_kicks /= n;
        stats.avg_kicks_used /= n;
        stats
    }

    /// Close the generation: score, rank, breed the bottom half from the top
    /// half, then reset every dot for the next generation.
    pub fn evolve(&mut self) {
        self.track_best();

        let stats = self.stats();
        info!(
            "Generation {}: dead {} | scored {} | active {} | avg fitness {:.3} | avg age {:.2} | avg kicks {:.1} ({:.1} used)",
            stats.generation,
            stats.dead,
            stats.scored,
            stats.active,
            stats.avg_fitness,
            stats.avg_age,
            stats.avg_kicks,
            stats.avg_kicks_used,
        );
        self.history.push(stats);

        let values: Vec<f32> = self.dots.iter().map(|d| d.fitness).collect();
        let order = rank(&values, self.sense);

        let mut previous: Vec<Option<Dot>> = std::mem::take(&mut self.dots)
            .into_iter()
            .map(Some)
            .collect();
        let ranked: Vec<Dot> = order.iter().filter_map(|&i| previous[i].take()).collect();

        let mut children: Vec<(usize, Genome)> = Vec::new();
        let mut parents = BTreeSet::new();
        for pairing in pairing_plan(ranked.len(), self.scenario.pairing) {
            let (p1, p2) = pairing.parents;
            let (mut a, mut b) = self
                .rng
                .crossover(ranked[p1].genome(), ranked[p2].genome());
            self.rng
                .mutate(&mut a, &self.scenario.chances, &self.scenario.genome);
            self.rng
                .mutate(&mut b, &self.scenario.chances, &self.scenario.genome);

            children.push((pairing.slots.0, a));
            if let Some(slot) = pairing.slots.1 {
                children.push((slot, b));
            }
            parents.insert(p1);
            parents.insert(p2);
        }

        let mut next: Vec<Option<Dot>> = ranked.into_iter().map(Some).collect();
        for (slot, _) in &children {
            if let Some(replaced) = next[*slot].take() {
                replaced.release(&mut self.world);
            }
        }
        for (slot, genome) in children {
            let id = self.next_id;
            self.next_id += 1;
            next[slot] = Some(Dot::embody(
                id,
                genome,
                &mut self.world,
                self.scenario.spawn,
                self.scenario.dot_radius,
            ));
        }
        for &parent in &parents {
            if let Some(dot) = next[parent].as_mut() {
                dot.age += 1;
            }
        }

        self.dots = next.into_iter().flatten().collect();
        self.index_owners();
        self.reset();
    }

    /// Start the next generation with every dot at spawn, at rest and active.
    fn reset(&mut self) {
        self.generation += 1;
        self.time = 0.0;
        self.on_move = 0;
        self.best = None;
        let spawn = self.scenario.spawn;
        for dot in &mut self.dots {
            dot.reset(&mut self.world, spawn);
        }
    }

    /// Draw the goal, every dot as one pixel and every kill wall as a line.
    pub fn draw(&self, frame: &mut FrameBuffer) {
        let target = &self.scenario.target;
        frame.fill_rect(target.min(), target.max(), colors::GREEN);

        for (i, dot) in self.dots.iter().enumerate() {
            let color = if dot.is_dead() {
                colors::RED
            } else if dot.is_scored() {
                colors::GOLD
            } else if self.is_best(i) {
                colors::HOT_PINK
            } else {
                colors::WHITE
            };
            frame.set(
                dot.position.x.floor() as i64,
                dot.position.y.floor() as i64,
                color,
            );
        }

        for wall in self.scenario.kill_walls() {
            frame.draw_line(wall.a, wall.b, colors::ORANGE_RED);
        }
    }
}
