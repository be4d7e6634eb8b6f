use rapier2d::prelude::{ColliderHandle, ImpulseJointHandle, RigidBodyHandle};

use crate::bodies::Material;
use crate::core::{BodyHandle, FixtureHandle, HandleTable, JointHandle, World, WorldHandle};
use crate::Result;

/// Registry entry of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyRecord {
    /// The world that owns the body
    pub world: WorldHandle,

    /// The engine's handle for the body
    pub native: RigidBodyHandle,
}

/// Registry entry of a fixture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixtureRecord {
    /// The world that owns the fixture's body
    pub world: WorldHandle,

    /// The body the fixture is attached to
    pub body: BodyHandle,

    /// The engine's handle for the collider
    pub native: ColliderHandle,

    /// The material the fixture was created or last updated with
    pub material: Material,
}

/// Registry entry of a joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointRecord {
    /// The world that owns the joint
    pub world: WorldHandle,

    /// The first body of the joint
    pub body_a: BodyHandle,

    /// The second body of the joint
    pub body_b: BodyHandle,

    /// The engine's handle for the joint
    pub native: ImpulseJointHandle,
}

impl JointRecord {
    /// Checks if the joint is attached to the given body
    pub fn involves(&self, body: BodyHandle) -> bool {
        self.body_a == body || self.body_b == body
    }
}

/// Owns every handle-to-object association of a bridge.
///
/// One table per kind; handles of different kinds never share a table. Worlds
/// are owned outright, bodies, fixtures and joints are owned by their world and
/// only referenced here.
#[derive(Default)]
pub struct Registry {
    pub(crate) worlds: HandleTable<WorldHandle, World>,
    pub(crate) bodies: HandleTable<BodyHandle, BodyRecord>,
    pub(crate) fixtures: HandleTable<FixtureHandle, FixtureRecord>,
    pub(crate) joints: HandleTable<JointHandle, JointRecord>,
}

impl Registry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    pub fn worlds(&self) -> &HandleTable<WorldHandle, World> {
        &self.worlds
    }

    pub fn bodies(&self) -> &HandleTable<BodyHandle, BodyRecord> {
        &self.bodies
    }

    pub fn fixtures(&self) -> &HandleTable<FixtureHandle, FixtureRecord> {
        &self.fixtures
    }

    pub fn joints(&self) -> &HandleTable<JointHandle, JointRecord> {
        &self.joints
    }

    /// Resolves a world handle
    pub fn world(&self, world: WorldHandle) -> Result<&World> {
        self.worlds.lookup(world)
    }

    /// Resolves a world handle for mutation
    pub fn world_mut(&mut self, world: WorldHandle) -> Result<&mut World> {
        self.worlds.lookup_mut(world)
    }

    /// Resolves a body inside a world.
    ///
    /// The world is checked first. A body that exists but lives in another
    /// world is reported as not found.
    pub fn body(&self, world: WorldHandle, body: BodyHandle) -> Result<BodyRecord> {
        self.worlds.lookup(world)?;
        match self.bodies.lookup(body) {
            Ok(record) if record.world == world => Ok(*record),
            _ => Err(crate::error::BridgeError::BodyNotFound(body)),
        }
    }

    /// Resolves a fixture inside a world
    pub fn fixture(&self, world: WorldHandle, fixture: FixtureHandle) -> Result<FixtureRecord> {
        self.worlds.lookup(world)?;
        match self.fixtures.lookup(fixture) {
            Ok(record) if record.world == world => Ok(*record),
            _ => Err(crate::error::BridgeError::FixtureNotFound(fixture)),
        }
    }

    /// Resolves a joint inside a world
    pub fn joint(&self, world: WorldHandle, joint: JointHandle) -> Result<JointRecord> {
        self.worlds.lookup(world)?;
        match self.joints.lookup(joint) {
            Ok(record) if record.world == world => Ok(*record),
            _ => Err(crate::error::BridgeError::JointNotFound(joint)),
        }
    }

    /// Resolves a world and one of its bodies, borrowing the world mutably
    pub(crate) fn world_and_body_mut(
        &mut self,
        world: WorldHandle,
        body: BodyHandle,
    ) -> Result<(&mut World, BodyRecord)> {
        let record = self.body(world, body)?;
        let world = self.worlds.lookup_mut(world)?;
        Ok((world, record))
    }

    /// Resolves a world and one of its fixtures, borrowing the world mutably
    pub(crate) fn world_and_fixture_mut(
        &mut self,
        world: WorldHandle,
        fixture: FixtureHandle,
    ) -> Result<(&mut World, FixtureRecord)> {
        let record = self.fixture(world, fixture)?;
        let world = self.worlds.lookup_mut(world)?;
        Ok((world, record))
    }

    /// Releases every fixture attached to the body and returns their handles
    pub(crate) fn release_fixtures_of(&mut self, body: BodyHandle) -> Vec<FixtureHandle> {
        let handles = self.fixtures.handles_where(|f| f.body == body);
        for handle in &handles {
            let _ = self.fixtures.release(*handle);
        }
        handles
    }

    /// Releases every joint attached to the body and returns their handles
    pub(crate) fn release_joints_of(&mut self, body: BodyHandle) -> Vec<JointHandle> {
        let handles = self.joints.handles_where(|j| j.involves(body));
        for handle in &handles {
            let _ = self.joints.release(*handle);
        }
        handles
    }
}
