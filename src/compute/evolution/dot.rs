//! The evolvable agent: a genome bound to one physics body.

use rapier2d::prelude::RigidBodyHandle;

use crate::compute::physics::PhysicsWorld;
use crate::schema::{Genome, Vec2};

/// Lifecycle state within one generation. `Dead` and `Scored` are terminal
/// until the generation reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DotState {
    #[default]
    Active,
    Dead,
    Scored,
}

/// One agent of the population. Sole owner of its body.
#[derive(Debug)]
pub struct Dot {
    /// Unique identifier, never reused within a population.
    pub id: u64,
    genome: Genome,
    /// Generations this dot survived as a parent.
    pub age: usize,
    state: DotState,
    /// Last computed fitness.
    pub fitness: f32,
    /// Position read back from the world after the last tick.
    pub position: Vec2,
    body: RigidBodyHandle,
}

impl Dot {
    /// Give `genome` a body in `world` at `position`.
    ///
    /// Consumes the genome so a genome is embodied at most once.
    pub fn embody(
        id: u64,
        genome: Genome,
        world: &mut PhysicsWorld,
        position: Vec2,
        radius: f32,
    ) -> Self {
        let body = world.add_dot(position, radius);
        Self {
            id,
            genome,
            age: 0,
            state: DotState::Active,
            fitness: 0.0,
            position,
            body,
        }
    }

    /// Remove this dot's body from `world`.
    pub fn release(self, world: &mut PhysicsWorld) {
        world.remove_dot(self.body);
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn state(&self) -> DotState {
        self.state
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == DotState::Active
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state == DotState::Dead
    }

    #[inline]
    pub fn is_scored(&self) -> bool {
        self.state == DotState::Scored
    }

    /// Mark dead and freeze the body. Returns false if the dot was not active.
    pub fn kill(&mut self, world: &mut PhysicsWorld) -> bool {
        self.finish(DotState::Dead, world)
    }

    /// Mark scored and freeze the body. Returns false if the dot was not active.
    pub fn score(&mut self, world: &mut PhysicsWorld) -> bool {
        self.finish(DotState::Scored, world)
    }

    fn finish(&mut self, state: DotState, world: &mut PhysicsWorld) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = state;
        world.set_frozen(self.body, true);
        true
    }

    /// Back to spawn at rest and active.
    pub fn reset(&mut self, world: &mut PhysicsWorld, spawn: Vec2) {
        world.reset_body(self.body, spawn);
        self.state = DotState::Active;
        self.position = spawn;
    }

    /// Refresh the cached position from the world.
    pub fn sync_position(&mut self, world: &PhysicsWorld) {
        if let Some(position) = world.position(self.body) {
            self.position = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_dot() -> (PhysicsWorld, Dot) {
        let mut world = PhysicsWorld::new(0.5, 10);
        let genome = Genome::new(vec![Vec2::new(1.0, 0.0)]);
        let dot = Dot::embody(0, genome, &mut world, Vec2::new(50.0, 50.0), 1.0);
        (world, dot)
    }

    #[test]
    fn test_embody_creates_one_body() {
        let (world, dot) = single_dot();
        assert_eq!(world.body_count(), 1);
        assert!(dot.is_active());
        assert_eq!(dot.position, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_states_are_exclusive_and_terminal() {
        let (mut world, mut dot) = single_dot();
        assert!(dot.kill(&mut world));
        assert!(!dot.score(&mut world));
        assert!(dot.is_dead());
        assert!(!dot.is_scored());
        assert!(world.is_frozen(dot.body()));

        dot.reset(&mut world, Vec2::new(10.0, 10.0));
        assert!(dot.is_active());
        assert!(!world.is_frozen(dot.body()));

        assert!(dot.score(&mut world));
        assert!(!dot.kill(&mut world));
        assert_eq!(dot.state(), DotState::Scored);
    }

    #[test]
    fn test_release_removes_body() {
        let (mut world, dot) = single_dot();
        dot.release(&mut world);
        assert_eq!(world.body_count(), 0);
    }
}
