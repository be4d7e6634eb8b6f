use rapier2d::prelude::{Point, SpringJointBuilder};
use tracing::debug;

use crate::core::{BodyHandle, Bridge, JointHandle, JointRecord, WorldHandle};
use crate::error::BridgeError;
use crate::{Result, Vec2};

/// Parameters of a distance joint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceJointDef {
    /// The anchor point on the first body (in local space)
    pub local_anchor_a: Vec2,

    /// The anchor point on the second body (in local space)
    pub local_anchor_b: Vec2,

    /// The rest length. `None` uses the distance between the anchors at creation time.
    pub length: Option<f32>,

    /// The spring stiffness pulling the anchors back to the rest length
    pub stiffness: f32,

    /// The damping factor
    pub damping: f32,
}

impl DistanceJointDef {
    /// Creates a definition anchored at both body origins
    pub fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            local_anchor_a: Vec2::zeros(),
            local_anchor_b: Vec2::zeros(),
            length: None,
            stiffness,
            damping,
        }
    }

    /// Sets an explicit rest length
    pub fn with_length(mut self, length: f32) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the local anchor points
    pub fn with_anchors(mut self, local_anchor_a: Vec2, local_anchor_b: Vec2) -> Self {
        self.local_anchor_a = local_anchor_a;
        self.local_anchor_b = local_anchor_b;
        self
    }

    fn validate(&self) -> Result<()> {
        let values = [
            ("stiffness", Some(self.stiffness)),
            ("damping", Some(self.damping)),
            ("length", self.length),
        ];
        for (name, value) in values {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(BridgeError::InvalidParameter(format!(
                        "joint {name} must be a non-negative finite number, got {value}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Bridge {
    /// Joins two bodies of a world with a distance joint using the configured
    /// stiffness and damping, anchored at the body origins
    pub fn create_distance_joint(
        &mut self,
        world: WorldHandle,
        body_a: BodyHandle,
        body_b: BodyHandle,
    ) -> Result<JointHandle> {
        let def = DistanceJointDef::new(self.config().joint_stiffness, self.config().joint_damping);
        self.create_distance_joint_with(world, body_a, body_b, def)
    }

    /// Joins two bodies of a world with a distance joint
    pub fn create_distance_joint_with(
        &mut self,
        world: WorldHandle,
        body_a: BodyHandle,
        body_b: BodyHandle,
        def: DistanceJointDef,
    ) -> Result<JointHandle> {
        let record_a = self.registry.body(world, body_a)?;
        let record_b = self.registry.body(world, body_b)?;
        if body_a == body_b {
            return Err(BridgeError::InvalidParameter(format!(
                "cannot join {body_a} to itself"
            )));
        }
        def.validate()?;

        let registry = &mut self.registry;
        let target = registry.worlds.lookup_mut(world)?;

        let anchor_a = Point::from(def.local_anchor_a);
        let anchor_b = Point::from(def.local_anchor_b);
        let length = match def.length {
            Some(length) => length,
            None => {
                let a = target
                    .body(record_a.native)
                    .ok_or(BridgeError::BodyNotFound(body_a))?
                    .position()
                    .transform_point(&anchor_a);
                let b = target
                    .body(record_b.native)
                    .ok_or(BridgeError::BodyNotFound(body_b))?
                    .position()
                    .transform_point(&anchor_b);
                (b - a).norm()
            }
        };

        let handle = registry.joints.allocate()?;
        let joint = SpringJointBuilder::new(length, def.stiffness, def.damping)
            .local_anchor1(anchor_a)
            .local_anchor2(anchor_b)
            .build();
        let native = target.insert_joint(record_a.native, record_b.native, joint);
        registry.joints.bind(
            handle,
            JointRecord {
                world,
                body_a,
                body_b,
                native,
            },
        )?;

        debug!(%handle, %body_a, %body_b, length, "distance joint created");
        Ok(handle)
    }

    /// Removes a joint and releases its handle
    pub fn delete_joint(&mut self, world: WorldHandle, joint: JointHandle) -> Result<()> {
        let record = self.registry.joint(world, joint)?;
        self.registry.joints.release(joint)?;
        self.registry.world_mut(world)?.remove_joint(record.native);
        debug!(handle = %joint, "joint deleted");
        Ok(())
    }

    /// Returns the two bodies a joint connects
    pub fn joint_bodies(&self, world: WorldHandle, joint: JointHandle) -> Result<(BodyHandle, BodyHandle)> {
        let record = self.registry.joint(world, joint)?;
        Ok((record.body_a, record.body_b))
    }
}
