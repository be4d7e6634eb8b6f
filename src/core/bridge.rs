use rapier2d::prelude::{Collider, RigidBody};
use tracing::debug;

use crate::core::{
    BodyHandle, BridgeConfig, FixtureHandle, Registry, World, WorldHandle, WorldSettings,
};
use crate::error::BridgeError;
use crate::{Result, Vec2};

/// Entry point for foreign callers.
///
/// Every operation takes the handles it acts on, resolves them through the
/// registry and reports a `*NotFound` error instead of faulting when a handle
/// is stale, forged or belongs to another world.
#[derive(Default)]
pub struct Bridge {
    pub(crate) registry: Registry,
    config: BridgeConfig,
}

impl Bridge {
    /// Creates a bridge with the default configuration
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    /// Creates a bridge with the given configuration
    pub fn with_config(config: BridgeConfig) -> Self {
        Self {
            registry: Registry::new(),
            config,
        }
    }

    /// Returns a reference to the bridge configuration
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Returns the handle registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Creates a world and returns its handle
    pub fn create_world(&mut self, gravity_x: f32, gravity_y: f32, allow_sleep: bool) -> Result<WorldHandle> {
        let settings = WorldSettings::for_new_world(allow_sleep, &self.config);
        let world = World::new(Vec2::new(gravity_x, gravity_y), settings);
        let handle = self.registry.worlds.insert(world)?;
        debug!(%handle, gravity_x, gravity_y, allow_sleep, "world created");
        Ok(handle)
    }

    /// Destroys a world and releases every body, fixture and joint handle it owns
    pub fn destroy_world(&mut self, world: WorldHandle) -> Result<()> {
        self.registry.worlds.release(world)?;

        let registry = &mut self.registry;
        let fixtures = registry.fixtures.handles_where(|f| f.world == world);
        for handle in &fixtures {
            let _ = registry.fixtures.release(*handle);
        }
        let joints = registry.joints.handles_where(|j| j.world == world);
        for handle in &joints {
            let _ = registry.joints.release(*handle);
        }
        let bodies = registry.bodies.handles_where(|b| b.world == world);
        for handle in &bodies {
            let _ = registry.bodies.release(*handle);
        }

        debug!(
            handle = %world,
            bodies = bodies.len(),
            fixtures = fixtures.len(),
            joints = joints.len(),
            "world destroyed"
        );
        Ok(())
    }

    /// Returns the handles of all live worlds
    pub fn worlds(&self) -> Vec<WorldHandle> {
        self.registry.worlds.handles()
    }

    pub fn set_gravity(&mut self, world: WorldHandle, x: f32, y: f32) -> Result<()> {
        self.registry.world_mut(world)?.set_gravity(Vec2::new(x, y));
        Ok(())
    }

    pub fn gravity(&self, world: WorldHandle) -> Result<Vec2> {
        Ok(self.registry.world(world)?.gravity())
    }

    /// Turns continuous collision detection on or off for the whole world
    pub fn set_continuous(&mut self, world: WorldHandle, enabled: bool) -> Result<()> {
        self.registry.world_mut(world)?.set_continuous(enabled);
        Ok(())
    }

    pub fn is_continuous(&self, world: WorldHandle) -> Result<bool> {
        Ok(self.registry.world(world)?.is_continuous())
    }

    pub fn allows_sleep(&self, world: WorldHandle) -> Result<bool> {
        Ok(self.registry.world(world)?.allows_sleep())
    }

    /// Resets the forces and torques accumulated on every body of the world
    pub fn clear_forces(&mut self, world: WorldHandle) -> Result<()> {
        self.registry.world_mut(world)?.clear_forces();
        Ok(())
    }

    /// Returns the bodies of a world in ascending handle order
    pub fn bodies_of(&self, world: WorldHandle) -> Result<Vec<BodyHandle>> {
        self.registry.world(world)?;
        Ok(self.registry.bodies.handles_where(|b| b.world == world))
    }

    /// Returns the number of live bodies in a world
    pub fn body_count(&self, world: WorldHandle) -> Result<usize> {
        Ok(self.registry.world(world)?.body_count())
    }

    /// Runs `f` on the engine body behind a handle
    pub(crate) fn with_body<R>(
        &self,
        world: WorldHandle,
        body: BodyHandle,
        f: impl FnOnce(&RigidBody) -> R,
    ) -> Result<R> {
        let record = self.registry.body(world, body)?;
        let world = self.registry.world(world)?;
        world
            .body(record.native)
            .map(f)
            .ok_or(BridgeError::BodyNotFound(body))
    }

    /// Runs `f` on the engine body behind a handle, mutably
    pub(crate) fn with_body_mut<R>(
        &mut self,
        world: WorldHandle,
        body: BodyHandle,
        f: impl FnOnce(&mut RigidBody) -> R,
    ) -> Result<R> {
        let (world, record) = self.registry.world_and_body_mut(world, body)?;
        world
            .body_mut(record.native)
            .map(f)
            .ok_or(BridgeError::BodyNotFound(body))
    }

    /// Runs `f` on the engine collider behind a fixture handle
    pub(crate) fn with_collider<R>(
        &self,
        world: WorldHandle,
        fixture: FixtureHandle,
        f: impl FnOnce(&Collider) -> R,
    ) -> Result<R> {
        let record = self.registry.fixture(world, fixture)?;
        let world = self.registry.world(world)?;
        world
            .collider(record.native)
            .map(f)
            .ok_or(BridgeError::FixtureNotFound(fixture))
    }
}
