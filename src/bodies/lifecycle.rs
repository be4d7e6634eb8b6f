use tracing::debug;

use crate::bodies::BodyKind;
use crate::core::{BodyHandle, BodyRecord, Bridge, Handle, WorldHandle};
use crate::{Result, Vec2};

/// Mass given to a dynamic body none of whose fixtures has any density
const UNIT_MASS: f32 = 1.0;

impl Bridge {
    /// Creates a body of the given kind at `(x, y)` and returns its handle.
    ///
    /// The handle is written into the body's user data so engine-side
    /// iteration can recover it.
    pub fn create_body(&mut self, world: WorldHandle, kind: BodyKind, x: f32, y: f32) -> Result<BodyHandle> {
        let registry = &mut self.registry;
        let target = registry.worlds.lookup_mut(world)?;

        let handle = registry.bodies.allocate()?;
        let native = target.insert_body(kind, Vec2::new(x, y), handle.to_tag());
        registry.bodies.bind(handle, BodyRecord { world, native })?;
        self.reset_mass_data(world, handle)?;

        debug!(%handle, %world, ?kind, x, y, "body created");
        Ok(handle)
    }

    /// Deletes a body along with its fixtures and joints.
    ///
    /// Every fixture and joint handle attached to the body is released, so
    /// none of them is left pointing at the destroyed body.
    pub fn delete_body(&mut self, world: WorldHandle, body: BodyHandle) -> Result<()> {
        let record = self.registry.body(world, body)?;
        self.registry.bodies.release(body)?;
        let fixtures = self.registry.release_fixtures_of(body);
        let joints = self.registry.release_joints_of(body);

        self.registry.world_mut(world)?.remove_body(record.native);

        debug!(
            handle = %body,
            %world,
            fixtures = fixtures.len(),
            joints = joints.len(),
            "body deleted"
        );
        Ok(())
    }

    /// Returns the kind of a body
    pub fn body_kind(&self, world: WorldHandle, body: BodyHandle) -> Result<BodyKind> {
        self.with_body(world, body, |b| b.body_type().into())
    }

    /// Keeps every dynamic body movable.
    ///
    /// A dynamic body none of whose fixtures has a positive density gets a unit
    /// mass; the extra mass is removed again once a dense fixture is attached.
    pub(crate) fn reset_mass_data(&mut self, world: WorldHandle, body: BodyHandle) -> Result<()> {
        let dense = self
            .registry
            .fixtures
            .iter()
            .any(|(_, f)| f.body == body && f.material.density > 0.0);
        self.with_body_mut(world, body, |b| {
            if b.is_dynamic() {
                b.set_additional_mass(if dense { 0.0 } else { UNIT_MASS }, false);
            }
        })
    }
}
