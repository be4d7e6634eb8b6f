pub mod storage;
pub mod registry;
pub mod config;
pub mod world;
pub mod bridge;
pub mod step;

pub use self::storage::HandleTable;
pub use self::registry::{Registry, BodyRecord, FixtureRecord, JointRecord};
pub use self::config::{BridgeConfig, WorldSettings};
pub use self::world::World;
pub use self::bridge::Bridge;
pub use self::step::{Snapshot, BodyPose};

use crate::error::BridgeError;
use crate::Result;
use std::fmt;
use std::hash::Hash;

/// Handle value as exchanged with foreign callers
pub type RawHandle = i32;

/// Sentinel returned to foreign callers when no handle could be issued.
/// The allocator never produces negative handles.
pub const INVALID_HANDLE: RawHandle = -1;

/// The kind of object a handle refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    World,
    Body,
    Fixture,
    Joint,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::World => "world",
            Self::Body => "body",
            Self::Fixture => "fixture",
            Self::Joint => "joint",
        };
        f.write_str(name)
    }
}

/// Common behaviour of the typed handles issued by the registry
pub trait Handle: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display {
    /// The kind of object this handle refers to
    const KIND: HandleKind;

    /// Wraps an allocator index
    fn from_index(index: u32) -> Self;

    /// Returns the allocator index
    fn index(self) -> u32;

    /// The error reported when this handle does not resolve
    fn not_found(self) -> BridgeError;

    /// Converts a caller-supplied value, rejecting negative values
    fn from_raw(raw: RawHandle) -> Result<Self> {
        u32::try_from(raw)
            .map(Self::from_index)
            .map_err(|_| BridgeError::InvalidHandle { kind: Self::KIND, raw: raw as i64 })
    }

    /// Returns the value handed out to foreign callers
    fn to_raw(self) -> RawHandle {
        // Allocation stops at i32::MAX, see HandleTable::allocate
        self.index() as RawHandle
    }

    /// Encodes the handle for the engine's per-object user data slot
    fn to_tag(self) -> u128 {
        self.index() as u128
    }

    /// Decodes a handle previously stored with `to_tag`
    fn from_tag(tag: u128) -> Option<Self> {
        u32::try_from(tag).ok().map(Self::from_index)
    }
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $kind:ident, $error:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl Handle for $name {
            const KIND: HandleKind = HandleKind::$kind;

            fn from_index(index: u32) -> Self {
                Self(index)
            }

            fn index(self) -> u32 {
                self.0
            }

            fn not_found(self) -> BridgeError {
                BridgeError::$error(self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", HandleKind::$kind, self.0)
            }
        }

        // Handles travel as their raw i32 value
        #[cfg(feature = "protocol")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_i32(self.to_raw())
            }
        }

        #[cfg(feature = "protocol")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let raw = <i32 as serde::Deserialize>::deserialize(deserializer)?;
                Self::from_raw(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

define_handle!(
    /// Identifies a simulation world
    WorldHandle, World, WorldNotFound
);
define_handle!(
    /// Identifies a body, unique across all worlds
    BodyHandle, Body, BodyNotFound
);
define_handle!(
    /// Identifies a fixture, unique across all bodies
    FixtureHandle, Fixture, FixtureNotFound
);
define_handle!(
    /// Identifies a joint between two bodies
    JointHandle, Joint, JointNotFound
);
