pub mod core;
pub mod bodies;
pub mod shapes;
pub mod collision;
pub mod constraints;
pub mod shared;
#[cfg(feature = "protocol")]
pub mod protocol;

/// Re-export common types for easier usage
pub use crate::core::{
    Bridge, BridgeConfig, WorldSettings, Registry, Snapshot, BodyPose,
    Handle, HandleKind, RawHandle, WorldHandle, BodyHandle, FixtureHandle, JointHandle,
    INVALID_HANDLE,
};
pub use crate::bodies::{BodyKind, Material};
pub use crate::shapes::{ShapeKind, ShapeDescriptor, ShapeInfo};
pub use crate::collision::{Contact, ContactList};
pub use crate::constraints::DistanceJointDef;
pub use crate::shared::SharedBridge;

/// The nalgebra version used by the simulation engine
pub use rapier2d::na;

/// A 2D vector as exchanged with the simulation engine
pub type Vec2 = rapier2d::na::Vector2<f32>;

/// Error types for the bridge
pub mod error {
    use thiserror::Error;
    use crate::core::{HandleKind, WorldHandle, BodyHandle, FixtureHandle, JointHandle};

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum BridgeError {
        #[error("World not found: {0}")]
        WorldNotFound(WorldHandle),

        #[error("Body not found: {0}")]
        BodyNotFound(BodyHandle),

        #[error("Fixture not found: {0}")]
        FixtureNotFound(FixtureHandle),

        #[error("Joint not found: {0}")]
        JointNotFound(JointHandle),

        #[error("Unsupported shape kind: {0}")]
        UnsupportedShapeKind(String),

        #[error("Invalid {kind} handle: {raw}")]
        InvalidHandle {
            kind: HandleKind,
            raw: i64,
        },

        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("No {0} handles left to allocate")]
        HandlesExhausted(HandleKind),
    }

    impl BridgeError {
        /// Whether the error reports a missing world, body, fixture or joint
        pub fn is_not_found(&self) -> bool {
            matches!(
                self,
                Self::WorldNotFound(_)
                    | Self::BodyNotFound(_)
                    | Self::FixtureNotFound(_)
                    | Self::JointNotFound(_)
            )
        }
    }
}

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, error::BridgeError>;

/// Bridge version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
