#[cfg(feature = "protocol")]
use serde::{Serialize, Deserialize};

use crate::error::BridgeError;
use crate::Result;

/// Material properties of a fixture
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "protocol", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "protocol", serde(default))]
pub struct Material {
    /// Coefficient of friction
    pub friction: f32,

    /// Coefficient of restitution (bounciness)
    pub restitution: f32,

    /// Density, used to derive the body's mass
    pub density: f32,

    /// Sensors report overlaps but never produce a collision response
    pub is_sensor: bool,
}

impl Material {
    /// Creates a new solid material with the specified properties
    pub fn new(friction: f32, restitution: f32, density: f32) -> Self {
        Self {
            friction,
            restitution,
            density,
            is_sensor: false,
        }
    }

    /// Returns the same material turned into a sensor
    pub fn sensor(mut self) -> Self {
        self.is_sensor = true;
        self
    }

    /// Checks that every coefficient is finite and non-negative
    pub fn validate(&self) -> Result<()> {
        check_coefficient("friction", self.friction)?;
        check_coefficient("restitution", self.restitution)?;
        check_coefficient("density", self.density)?;
        Ok(())
    }
}

pub(crate) fn check_coefficient(name: &str, value: f32) -> Result<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(BridgeError::InvalidParameter(format!(
            "{name} must be a non-negative finite number, got {value}"
        )))
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            friction: 0.2,
            restitution: 0.0,
            density: 0.0,
            is_sensor: false,
        }
    }
}
