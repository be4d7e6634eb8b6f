use rapier2d::prelude::{Collider, ColliderBuilder, CoefficientCombineRule};
use tracing::debug;

use super::material::check_coefficient;
use crate::bodies::Material;
use crate::core::{BodyHandle, Bridge, FixtureHandle, FixtureRecord, Handle, WorldHandle};
use crate::error::BridgeError;
use crate::shapes::{ShapeDescriptor, ShapeInfo};
use crate::Result;

impl Bridge {
    /// Attaches a fixture with the given shape and material to a body.
    ///
    /// The shape is built before any handle is resolved; if the world or body
    /// turns out to be missing the shape is dropped and nothing is registered.
    pub fn create_fixture(
        &mut self,
        world: WorldHandle,
        body: BodyHandle,
        shape: ShapeDescriptor,
        material: Material,
    ) -> Result<FixtureHandle> {
        let geometry = shape.build()?;
        material.validate()?;

        let record = self.registry.body(world, body)?;
        let registry = &mut self.registry;
        let target = registry.worlds.lookup_mut(world)?;

        let handle = registry.fixtures.allocate()?;
        let collider = ColliderBuilder::new(geometry)
            .friction(material.friction)
            .restitution(material.restitution)
            .restitution_combine_rule(CoefficientCombineRule::Max)
            .density(material.density)
            .sensor(material.is_sensor)
            .user_data(handle.to_tag())
            .build();
        let native = target.insert_collider(collider, record.native);
        registry.fixtures.bind(
            handle,
            FixtureRecord {
                world,
                body,
                native,
                material,
            },
        )?;
        self.reset_mass_data(world, body)?;

        debug!(%handle, %body, kind = %shape.kind, "fixture created");
        Ok(handle)
    }

    /// Detaches a fixture from its body and releases its handle
    pub fn delete_fixture(&mut self, world: WorldHandle, fixture: FixtureHandle) -> Result<()> {
        let record = self.registry.fixture(world, fixture)?;
        self.registry.fixtures.release(fixture)?;
        self.registry.world_mut(world)?.remove_collider(record.native);
        self.reset_mass_data(world, record.body)?;
        debug!(handle = %fixture, body = %record.body, "fixture deleted");
        Ok(())
    }

    /// Returns the body a fixture is attached to
    pub fn fixture_body(&self, world: WorldHandle, fixture: FixtureHandle) -> Result<BodyHandle> {
        Ok(self.registry.fixture(world, fixture)?.body)
    }

    /// Returns the fixtures attached to a body in ascending handle order
    pub fn fixtures_of(&self, world: WorldHandle, body: BodyHandle) -> Result<Vec<FixtureHandle>> {
        self.registry.body(world, body)?;
        Ok(self.registry.fixtures.handles_where(|f| f.body == body))
    }

    /// Returns the current material of a fixture
    pub fn fixture_material(&self, world: WorldHandle, fixture: FixtureHandle) -> Result<Material> {
        Ok(self.registry.fixture(world, fixture)?.material)
    }

    /// Reads the fixture's geometry back from the engine
    pub fn fixture_shape(&self, world: WorldHandle, fixture: FixtureHandle) -> Result<ShapeInfo> {
        self.with_collider(world, fixture, ShapeInfo::from_collider)?
            .ok_or(BridgeError::FixtureNotFound(fixture))
    }

    pub fn set_sensor(&mut self, world: WorldHandle, fixture: FixtureHandle, is_sensor: bool) -> Result<()> {
        self.update_fixture(world, fixture, |collider, material| {
            collider.set_sensor(is_sensor);
            material.is_sensor = is_sensor;
        })
    }

    pub fn set_density(&mut self, world: WorldHandle, fixture: FixtureHandle, density: f32) -> Result<()> {
        let density = check_coefficient("density", density)?;
        let body = self.registry.fixture(world, fixture)?.body;
        self.update_fixture(world, fixture, |collider, material| {
            collider.set_density(density);
            material.density = density;
        })?;
        self.reset_mass_data(world, body)
    }

    pub fn set_friction(&mut self, world: WorldHandle, fixture: FixtureHandle, friction: f32) -> Result<()> {
        let friction = check_coefficient("friction", friction)?;
        self.update_fixture(world, fixture, |collider, material| {
            collider.set_friction(friction);
            material.friction = friction;
        })
    }

    pub fn set_restitution(&mut self, world: WorldHandle, fixture: FixtureHandle, restitution: f32) -> Result<()> {
        let restitution = check_coefficient("restitution", restitution)?;
        self.update_fixture(world, fixture, |collider, material| {
            collider.set_restitution(restitution);
            material.restitution = restitution;
        })
    }

    /// Applies a change to both the engine collider and the registry's copy of its material
    fn update_fixture(
        &mut self,
        world: WorldHandle,
        fixture: FixtureHandle,
        f: impl FnOnce(&mut Collider, &mut Material),
    ) -> Result<()> {
        let (target, record) = self.registry.world_and_fixture_mut(world, fixture)?;
        let collider = target
            .collider_mut(record.native)
            .ok_or(BridgeError::FixtureNotFound(fixture))?;
        let mut material = record.material;
        f(collider, &mut material);
        self.registry.fixtures.lookup_mut(fixture)?.material = material;
        Ok(())
    }
}
