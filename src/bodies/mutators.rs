use rapier2d::prelude::{Isometry, Point};

use crate::core::{BodyHandle, Bridge, WorldHandle};
use crate::{Result, Vec2};

// Every operation here resolves both handles first and forwards to the engine
// body unchanged. `wake` arguments are passed through as given.
impl Bridge {
    /// Teleports a body to `(x, y)` with the given orientation
    pub fn set_body_transform(&mut self, world: WorldHandle, body: BodyHandle, x: f32, y: f32, angle: f32) -> Result<()> {
        self.with_body_mut(world, body, |b| {
            b.set_position(Isometry::new(Vec2::new(x, y), angle), true)
        })
    }

    /// Returns the position of the body origin
    pub fn position(&self, world: WorldHandle, body: BodyHandle) -> Result<Vec2> {
        self.with_body(world, body, |b| *b.translation())
    }

    /// Returns the orientation of the body in radians
    pub fn angle(&self, world: WorldHandle, body: BodyHandle) -> Result<f32> {
        self.with_body(world, body, |b| b.rotation().angle())
    }

    pub fn set_linear_velocity(&mut self, world: WorldHandle, body: BodyHandle, x: f32, y: f32) -> Result<()> {
        self.with_body_mut(world, body, |b| b.set_linvel(Vec2::new(x, y), true))
    }

    pub fn linear_velocity(&self, world: WorldHandle, body: BodyHandle) -> Result<Vec2> {
        self.with_body(world, body, |b| *b.linvel())
    }

    pub fn set_angular_velocity(&mut self, world: WorldHandle, body: BodyHandle, omega: f32) -> Result<()> {
        self.with_body_mut(world, body, |b| b.set_angvel(omega, true))
    }

    pub fn angular_velocity(&self, world: WorldHandle, body: BodyHandle) -> Result<f32> {
        self.with_body(world, body, |b| b.angvel())
    }

    /// Applies an impulse at a world-space point
    #[allow(clippy::too_many_arguments)]
    pub fn apply_linear_impulse(
        &mut self,
        world: WorldHandle,
        body: BodyHandle,
        impulse_x: f32,
        impulse_y: f32,
        point_x: f32,
        point_y: f32,
        wake: bool,
    ) -> Result<()> {
        self.with_body_mut(world, body, |b| {
            b.apply_impulse_at_point(
                Vec2::new(impulse_x, impulse_y),
                Point::new(point_x, point_y),
                wake,
            )
        })
    }

    /// Adds a force at the center of mass for the next step
    pub fn apply_force_to_center(&mut self, world: WorldHandle, body: BodyHandle, x: f32, y: f32, wake: bool) -> Result<()> {
        self.with_body_mut(world, body, |b| b.add_force(Vec2::new(x, y), wake))
    }

    pub fn set_linear_damping(&mut self, world: WorldHandle, body: BodyHandle, damping: f32) -> Result<()> {
        self.with_body_mut(world, body, |b| b.set_linear_damping(damping))
    }

    pub fn linear_damping(&self, world: WorldHandle, body: BodyHandle) -> Result<f32> {
        self.with_body(world, body, |b| b.linear_damping())
    }

    /// Enables or disables a body. Inactive bodies keep their handle but take
    /// no part in the simulation.
    pub fn set_active(&mut self, world: WorldHandle, body: BodyHandle, active: bool) -> Result<()> {
        self.with_body_mut(world, body, |b| b.set_enabled(active))
    }

    pub fn is_active(&self, world: WorldHandle, body: BodyHandle) -> Result<bool> {
        self.with_body(world, body, |b| b.is_enabled())
    }

    /// Wakes a body up or puts it to sleep
    pub fn set_awake(&mut self, world: WorldHandle, body: BodyHandle, awake: bool) -> Result<()> {
        self.with_body_mut(world, body, |b| {
            if awake {
                b.wake_up(true);
            } else {
                b.sleep();
            }
        })
    }

    pub fn is_awake(&self, world: WorldHandle, body: BodyHandle) -> Result<bool> {
        self.with_body(world, body, |b| !b.is_sleeping())
    }

    /// Returns the center of mass in world coordinates
    pub fn world_center(&self, world: WorldHandle, body: BodyHandle) -> Result<Vec2> {
        self.with_body(world, body, |b| b.center_of_mass().coords)
    }

    /// Returns the center of mass relative to the body origin
    pub fn local_center(&self, world: WorldHandle, body: BodyHandle) -> Result<Vec2> {
        self.with_body(world, body, |b| {
            b.position().inverse_transform_point(b.center_of_mass()).coords
        })
    }
}
