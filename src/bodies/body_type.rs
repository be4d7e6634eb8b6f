use rapier2d::prelude::RigidBodyType;

use crate::error::BridgeError;
use crate::Result;

/// Type of body, determining how it behaves in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Static bodies don't move and aren't affected by forces or collisions
    Static,

    /// Kinematic bodies move with the velocity they are given and push dynamic bodies
    Kinematic,

    /// Dynamic bodies are fully simulated
    Dynamic,
}

impl BodyKind {
    /// Decodes the integer kind used by foreign callers (0 static, 1 kinematic, 2 dynamic)
    pub fn from_raw(raw: i32) -> Result<Self> {
        match raw {
            0 => Ok(Self::Static),
            1 => Ok(Self::Kinematic),
            2 => Ok(Self::Dynamic),
            other => Err(BridgeError::InvalidParameter(format!("unknown body kind {other}"))),
        }
    }

    /// Returns the integer kind used by foreign callers
    pub fn to_raw(self) -> i32 {
        match self {
            Self::Static => 0,
            Self::Kinematic => 1,
            Self::Dynamic => 2,
        }
    }
}

impl From<BodyKind> for RigidBodyType {
    fn from(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Static => RigidBodyType::Fixed,
            BodyKind::Kinematic => RigidBodyType::KinematicVelocityBased,
            BodyKind::Dynamic => RigidBodyType::Dynamic,
        }
    }
}

impl From<RigidBodyType> for BodyKind {
    fn from(body_type: RigidBodyType) -> Self {
        match body_type {
            RigidBodyType::Fixed => BodyKind::Static,
            RigidBodyType::KinematicVelocityBased | RigidBodyType::KinematicPositionBased => {
                BodyKind::Kinematic
            }
            RigidBodyType::Dynamic => BodyKind::Dynamic,
        }
    }
}
