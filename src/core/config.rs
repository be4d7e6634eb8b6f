use bitflags::bitflags;

#[cfg(feature = "protocol")]
use serde::{Serialize, Deserialize};

/// Configuration parameters shared by every world of a bridge
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "protocol", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "protocol", serde(default))]
pub struct BridgeConfig {
    /// Velocity iterations used by `Bridge::step_default`
    pub velocity_iterations: u32,

    /// Position iterations used by `Bridge::step_default`
    pub position_iterations: u32,

    /// Whether forces applied between steps are cleared after each step
    pub auto_clear_forces: bool,

    /// Spring stiffness of distance joints created without an explicit definition.
    /// The default is stiff enough for the joint to act as a rigid link.
    pub joint_stiffness: f32,

    /// Spring damping of distance joints created without an explicit definition
    pub joint_damping: f32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            velocity_iterations: 8,
            position_iterations: 3,
            auto_clear_forces: true,
            joint_stiffness: 1.0e6,
            joint_damping: 2.0e3,
        }
    }
}

bitflags! {
    /// Per-world simulation switches
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WorldSettings: u32 {
        /// Bodies created in this world may fall asleep
        const ALLOW_SLEEP = 0x01;

        /// Continuous collision detection is enabled on every body
        const CONTINUOUS = 0x02;

        /// Forces and torques are reset after every step
        const AUTO_CLEAR_FORCES = 0x04;
    }
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self::ALLOW_SLEEP | Self::AUTO_CLEAR_FORCES
    }
}

impl WorldSettings {
    /// Builds the settings for a new world
    pub fn for_new_world(allow_sleep: bool, config: &BridgeConfig) -> Self {
        let mut settings = Self::empty();
        settings.set(Self::ALLOW_SLEEP, allow_sleep);
        settings.set(Self::AUTO_CLEAR_FORCES, config.auto_clear_forces);
        settings
    }
}
