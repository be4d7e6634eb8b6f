use std::num::NonZeroUsize;

use rapier2d::prelude::{
    CCDSolver, Collider, ColliderHandle, ColliderSet, DefaultBroadPhase, GenericJoint,
    ImpulseJoint, ImpulseJointHandle, ImpulseJointSet, IntegrationParameters, IslandManager,
    MultibodyJointSet, NarrowPhase, PhysicsPipeline, Real, RigidBody, RigidBodyBuilder,
    RigidBodyHandle, RigidBodySet, Vector,
};
use tracing::trace;

use crate::bodies::BodyKind;
use crate::core::WorldSettings;
use crate::Vec2;

/// One independent simulation universe.
///
/// Owns the engine-side object sets. Engine objects are addressed here by the
/// engine's own handles; mapping to bridge handles is the registry's job.
pub struct World {
    gravity: Vector<Real>,
    settings: WorldSettings,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    pub(crate) narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,

    /// The total elapsed simulation time
    time: f32,

    /// Number of completed steps
    steps: u64,
}

impl World {
    /// Creates an empty world
    pub fn new(gravity: Vec2, settings: WorldSettings) -> Self {
        Self {
            gravity,
            settings,
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            time: 0.0,
            steps: 0,
        }
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    pub fn settings(&self) -> WorldSettings {
        self.settings
    }

    pub fn allows_sleep(&self) -> bool {
        self.settings.contains(WorldSettings::ALLOW_SLEEP)
    }

    pub fn is_continuous(&self) -> bool {
        self.settings.contains(WorldSettings::CONTINUOUS)
    }

    /// Switches continuous collision on or off for every body, present and future
    pub fn set_continuous(&mut self, enabled: bool) {
        self.settings.set(WorldSettings::CONTINUOUS, enabled);
        for (_, body) in self.bodies.iter_mut() {
            body.enable_ccd(enabled);
        }
    }

    /// Resets the accumulated forces and torques of every body
    pub fn clear_forces(&mut self) {
        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
            body.reset_torques(false);
        }
    }

    /// Returns the total elapsed simulation time
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Returns the number of steps taken so far
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Returns the number of bodies held by the engine
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Builds and inserts a body at the given position, tagged with `tag`
    pub(crate) fn insert_body(&mut self, kind: BodyKind, position: Vec2, tag: u128) -> RigidBodyHandle {
        let body = RigidBodyBuilder::new(kind.into())
            .translation(position)
            .can_sleep(self.allows_sleep())
            .ccd_enabled(self.is_continuous())
            .user_data(tag)
            .build();
        self.bodies.insert(body)
    }

    /// Removes a body together with its colliders and joints
    pub(crate) fn remove_body(&mut self, handle: RigidBodyHandle) -> Option<RigidBody> {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        )
    }

    pub(crate) fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub(crate) fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    pub(crate) fn insert_collider(&mut self, collider: Collider, parent: RigidBodyHandle) -> ColliderHandle {
        self.colliders.insert_with_parent(collider, parent, &mut self.bodies)
    }

    pub(crate) fn remove_collider(&mut self, handle: ColliderHandle) -> Option<Collider> {
        self.colliders.remove(handle, &mut self.islands, &mut self.bodies, true)
    }

    pub(crate) fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    pub(crate) fn collider_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider> {
        self.colliders.get_mut(handle)
    }

    pub(crate) fn insert_joint(
        &mut self,
        body_a: RigidBodyHandle,
        body_b: RigidBodyHandle,
        joint: impl Into<GenericJoint>,
    ) -> ImpulseJointHandle {
        self.impulse_joints.insert(body_a, body_b, joint, true)
    }

    pub(crate) fn remove_joint(&mut self, handle: ImpulseJointHandle) -> Option<ImpulseJoint> {
        self.impulse_joints.remove(handle, true)
    }

    /// Advances the simulation by `dt`.
    ///
    /// Velocity iterations drive the engine's solver iterations and position
    /// iterations its internal stabilisation passes. Both are at least 1.
    pub(crate) fn advance(&mut self, dt: f32, velocity_iterations: u32, position_iterations: u32) {
        self.integration_parameters.dt = dt;
        self.integration_parameters.num_solver_iterations =
            NonZeroUsize::new(velocity_iterations.max(1) as usize).unwrap_or(NonZeroUsize::MIN);
        self.integration_parameters.num_internal_pgs_iterations = position_iterations.max(1) as usize;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        if self.settings.contains(WorldSettings::AUTO_CLEAR_FORCES) {
            self.clear_forces();
        }

        self.time += dt;
        self.steps += 1;
        trace!(dt, steps = self.steps, bodies = self.bodies.len(), "world advanced");
    }
}
