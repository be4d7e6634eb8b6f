#[cfg(feature = "protocol")]
use serde::{Serialize, Deserialize};
use tracing::trace;

use crate::core::{BodyHandle, Bridge, Handle, World, WorldHandle};
use crate::error::BridgeError;
use crate::Result;

/// Pose of one body right after a step
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "protocol", derive(Serialize, Deserialize))]
pub struct BodyPose {
    pub body: BodyHandle,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

/// Poses of every live body of a world, in the engine's iteration order.
///
/// The order is not creation order and carries no meaning beyond every live
/// body appearing exactly once.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "protocol", derive(Serialize, Deserialize))]
pub struct Snapshot {
    pub poses: Vec<BodyPose>,
}

impl Snapshot {
    /// Collects the pose of every body the engine holds
    pub(crate) fn capture(world: &World) -> Self {
        let poses = world
            .bodies
            .iter()
            .filter_map(|(_, body)| {
                let handle = BodyHandle::from_tag(body.user_data)?;
                let translation = body.translation();
                Some(BodyPose {
                    body: handle,
                    x: translation.x,
                    y: translation.y,
                    angle: body.rotation().angle(),
                })
            })
            .collect();
        Self { poses }
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Finds the pose of a body
    pub fn pose_of(&self, body: BodyHandle) -> Option<&BodyPose> {
        self.poses.iter().find(|p| p.body == body)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BodyPose> {
        self.poses.iter()
    }

    /// Flattens into the length-prefixed layout `[count, id, x, y, angle, ...]`
    pub fn to_flat(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(1 + self.poses.len() * 4);
        flat.push(self.poses.len() as f64);
        for pose in &self.poses {
            flat.push(pose.body.to_raw() as f64);
            flat.push(pose.x as f64);
            flat.push(pose.y as f64);
            flat.push(pose.angle as f64);
        }
        flat
    }
}

impl Bridge {
    /// Advances a world by `dt` and returns the pose of every body afterwards.
    ///
    /// `dt` must be finite and non-negative; a zero `dt` only captures the
    /// snapshot. Iteration counts below 1 are raised to 1.
    pub fn step(
        &mut self,
        world: WorldHandle,
        dt: f32,
        velocity_iterations: u32,
        position_iterations: u32,
    ) -> Result<Snapshot> {
        let target = self.registry.world_mut(world)?;
        if !dt.is_finite() || dt < 0.0 {
            return Err(BridgeError::InvalidParameter(format!(
                "time step must be a non-negative finite number, got {dt}"
            )));
        }

        if dt > 0.0 {
            target.advance(dt, velocity_iterations, position_iterations);
        }
        let snapshot = Snapshot::capture(target);
        trace!(%world, dt, bodies = snapshot.len(), "step");
        Ok(snapshot)
    }

    /// Steps with the iteration counts from the bridge configuration
    pub fn step_default(&mut self, world: WorldHandle, dt: f32) -> Result<Snapshot> {
        let velocity_iterations = self.config().velocity_iterations;
        let position_iterations = self.config().position_iterations;
        self.step(world, dt, velocity_iterations, position_iterations)
    }
}
