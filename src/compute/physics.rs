//! Rigid-body world adapter.
//!
//! Wraps a zero-gravity rapier2d pipeline behind the handful of operations the
//! population needs: dot bodies, segment kill walls, stepping, kinematic resets
//! and wall-contact reporting.
//!
//! Dots never enter the collider set. Every dot spawns at the same point, so
//! ball colliders would put every dot pair into the broad phase. Only the walls
//! are colliders; each dot's motion over a step is swept against them with a
//! shape cast instead.

use std::collections::HashMap;

use rapier2d::parry::query::ShapeCastOptions;
use rapier2d::prelude::*;

use crate::schema::{KillWall, Vec2};

const DOT_DENSITY: f32 = 1.0;

/// A dot that touched a kill wall during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallContact {
    pub body: RigidBodyHandle,
    pub wall: ColliderHandle,
}

/// Physics world shared by every dot of a population.
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    /// Query shape of every dot body.
    dots: HashMap<RigidBodyHandle, Ball>,
    linear_damping: f32,
}

impl PhysicsWorld {
    /// Create an empty world.
    ///
    /// `damping` is the fraction of velocity a free body keeps after one
    /// simulated second and must lie in (0, 1].
    pub fn new(damping: f32, solver_iterations: usize) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.num_solver_iterations = solver_iterations.max(1);

        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![0.0, 0.0],
            integration_parameters,
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            dots: HashMap::new(),
            linear_damping: damping_coefficient(damping),
        }
    }

    /// Number of bodies currently in the world.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of colliders currently in the world. Only kill walls are colliders.
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Collider pairs currently tracked by the narrow phase.
    pub fn contact_pair_count(&self) -> usize {
        self.narrow_phase.contact_pairs().count()
    }

    /// Add a dynamic body carrying the mass of a ball of `radius` at `position`.
    pub fn add_dot(&mut self, position: Vec2, radius: f32) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y])
            .linear_damping(self.linear_damping)
            .additional_mass_properties(MassProperties::from_ball(DOT_DENSITY, radius))
            .can_sleep(false)
            .build();
        let handle = self.bodies.insert(body);
        if let Some(body) = self.bodies.get_mut(handle) {
            body.recompute_mass_properties_from_colliders(&self.colliders);
        }
        self.dots.insert(handle, Ball::new(radius));
        handle
    }

    /// Remove a dot body.
    pub fn remove_dot(&mut self, handle: RigidBodyHandle) {
        self.dots.remove(&handle);
        self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Add a static segment collider and return its handle.
    pub fn add_kill_wall(&mut self, wall: &KillWall) -> ColliderHandle {
        let collider =
            ColliderBuilder::segment(point![wall.a.x, wall.a.y], point![wall.b.x, wall.b.y])
                .build();
        self.colliders.insert(collider)
    }

    /// Advance the world by `dt` and return the dots whose motion during the
    /// step touched a kill wall. Each such dot is moved back to the point of
    /// contact.
    pub fn step(&mut self, dt: f32) -> Vec<WallContact> {
        if dt <= 0.0 {
            return Vec::new();
        }

        let before: Vec<(RigidBodyHandle, Vector<Real>)> = self
            .bodies
            .iter()
            .filter(|(handle, body)| body.is_dynamic() && self.dots.contains_key(handle))
            .map(|(handle, body)| (handle, *body.translation()))
            .collect();

        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );

        let hits = self.sweep_walls(&before);
        for &(contact, at) in &hits {
            if let Some(body) = self.bodies.get_mut(contact.body) {
                body.set_translation(at, false);
            }
        }
        hits.into_iter().map(|(contact, _)| contact).collect()
    }

    /// Cast each dot from its pre-step position along its step motion against
    /// the walls. Returns the contact and the translation at first touch.
    fn sweep_walls(
        &self,
        before: &[(RigidBodyHandle, Vector<Real>)],
    ) -> Vec<(WallContact, Vector<Real>)> {
        if self.colliders.is_empty() {
            return Vec::new();
        }

        let query = self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            QueryFilter::default(),
        );
        let options = ShapeCastOptions::with_max_time_of_impact(1.0);

        before
            .iter()
            .filter_map(|&(handle, start)| {
                let shape = self.dots.get(&handle)?;
                let end = *self.bodies.get(handle)?.translation();
                let motion = end - start;
                let (wall, hit) = query.cast_shape(
                    &Isometry::translation(start.x, start.y),
                    &motion,
                    shape,
                    options,
                )?;
                let at = start + motion * hit.time_of_impact;
                Some((WallContact { body: handle, wall }, at))
            })
            .collect()
    }

    pub fn position(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.bodies.get(handle).map(|body| {
            let t = body.translation();
            Vec2::new(t.x, t.y)
        })
    }

    pub fn set_position(&mut self, handle: RigidBodyHandle, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_translation(vector![position.x, position.y], true);
        }
    }

    pub fn velocity(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.bodies.get(handle).map(|body| {
            let v = body.linvel();
            Vec2::new(v.x, v.y)
        })
    }

    pub fn set_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_linvel(vector![velocity.x, velocity.y], true);
        }
    }

    pub fn angle(&self, handle: RigidBodyHandle) -> Option<f32> {
        self.bodies.get(handle).map(|body| body.rotation().angle())
    }

    /// Apply an impulse at the body's local origin.
    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.apply_impulse(vector![impulse.x, impulse.y], true);
        }
    }

    /// Freeze (static) or release (dynamic) a body.
    pub fn set_frozen(&mut self, handle: RigidBodyHandle, frozen: bool) {
        if let Some(body) = self.bodies.get_mut(handle) {
            let body_type = if frozen {
                RigidBodyType::Fixed
            } else {
                RigidBodyType::Dynamic
            };
            body.set_body_type(body_type, true);
        }
    }

    pub fn is_frozen(&self, handle: RigidBodyHandle) -> bool {
        self.bodies
            .get(handle)
            .is_some_and(|body| body.body_type() == RigidBodyType::Fixed)
    }

    /// Put a body back at `position` at rest: zero angle, angular velocity,
    /// torque, force and velocity, dynamics re-enabled.
    pub fn reset_body(&mut self, handle: RigidBodyHandle, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_body_type(RigidBodyType::Dynamic, true);
            body.set_rotation(Rotation::identity(), true);
            body.reset_torques(true);
            body.set_angvel(0.0, true);
            body.set_translation(vector![position.x, position.y], true);
            body.set_linvel(vector![0.0, 0.0], true);
            body.reset_forces(true);
        }
    }
}

/// Linear damping coefficient that keeps `retained` of the velocity per second.
fn damping_coefficient(retained: f32) -> f32 {
    if retained > 0.0 && retained < 1.0 {
        -retained.ln()
    } else {
        0.0
    }
}
