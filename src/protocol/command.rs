use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::ProtocolError;
use crate::bodies::BodyKind;
use crate::core::{BodyHandle, FixtureHandle, Handle, JointHandle, RawHandle, WorldHandle};
use crate::shapes::ShapeDescriptor;

/// Highest positional argument a message may carry (`param10`)
pub const MAX_PARAMS: usize = 10;

const KEY_COMMAND: &str = "command";
const KEY_PARAM_PREFIX: &str = "param";

/// Positional arguments of a message. `param1` is index 0.
///
/// Keys that are not `command` or `param1`..`param10` are ignored, as are
/// explicit `null` values.
#[derive(Debug, Clone, Default)]
pub struct Params {
    command: String,
    values: [Option<Value>; MAX_PARAMS],
}

impl Params {
    /// Splits a decoded message into its command name and arguments
    pub fn from_object(object: Map<String, Value>) -> Result<Self, ProtocolError> {
        let mut command = None;
        let mut values: [Option<Value>; MAX_PARAMS] = Default::default();

        for (key, value) in object {
            if key == KEY_COMMAND {
                command = value.as_str().map(str::to_owned);
                continue;
            }
            let Some(index) = key
                .strip_prefix(KEY_PARAM_PREFIX)
                .and_then(|suffix| suffix.parse::<usize>().ok())
            else {
                continue;
            };
            if (1..=MAX_PARAMS).contains(&index) && !value.is_null() {
                values[index - 1] = Some(value);
            }
        }

        let command = command.ok_or(ProtocolError::MissingCommand)?;
        Ok(Self { command, values })
    }

    /// The command name the arguments belong to
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Fails unless the first `count` arguments are all present
    pub fn expect(&self, count: usize) -> Result<(), ProtocolError> {
        if self.values.iter().take(count).all(Option::is_some) {
            Ok(())
        } else {
            Err(ProtocolError::MissingParams(self.command.clone()))
        }
    }

    fn value(&self, index: usize) -> Result<&Value, ProtocolError> {
        self.values
            .get(index)
            .and_then(Option::as_ref)
            .ok_or_else(|| ProtocolError::MissingParams(self.command.clone()))
    }

    fn invalid(&self, index: usize, reason: impl Into<String>) -> ProtocolError {
        ProtocolError::InvalidParams {
            command: self.command.clone(),
            reason: format!("param{}: {}", index + 1, reason.into()),
        }
    }

    pub fn int(&self, index: usize) -> Result<i32, ProtocolError> {
        let value = self.value(index)?;
        value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| self.invalid(index, format!("expected an integer, got {value}")))
    }

    /// Reads a number; integers are accepted where a float is expected
    pub fn float(&self, index: usize) -> Result<f32, ProtocolError> {
        let value = self.value(index)?;
        value
            .as_f64()
            .map(|v| v as f32)
            .ok_or_else(|| self.invalid(index, format!("expected a number, got {value}")))
    }

    pub fn boolean(&self, index: usize) -> Result<bool, ProtocolError> {
        let value = self.value(index)?;
        value
            .as_bool()
            .ok_or_else(|| self.invalid(index, format!("expected a boolean, got {value}")))
    }

    /// Reads a raw handle and converts it to the requested kind
    pub fn handle<H: Handle>(&self, index: usize) -> Result<H, ProtocolError> {
        let raw: RawHandle = self.int(index)?;
        Ok(H::from_raw(raw)?)
    }

    /// Decodes a nested object argument
    pub fn object<T: DeserializeOwned>(&self, index: usize) -> Result<T, ProtocolError> {
        let value = self.value(index)?;
        T::deserialize(value).map_err(|e| self.invalid(index, e.to_string()))
    }
}

/// A position inside a body definition. Missing coordinates read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PositionDef {
    pub x: f32,
    pub y: f32,
}

/// The `param2` object of `createBody`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BodyDef {
    #[serde(rename = "type")]
    pub kind: i32,
    #[serde(default)]
    pub position: PositionDef,
}

/// The `shape` object inside a fixture definition
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShapeDef {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub radius: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
}

impl ShapeDef {
    /// Maps the named fields onto the positional shape parameters.
    ///
    /// Circles read `radius`, boxes read `width` and `height`.
    pub fn descriptor(&self) -> crate::Result<ShapeDescriptor> {
        match self.kind.as_str() {
            "circle" => ShapeDescriptor::parse(&self.kind, self.radius, 0.0),
            _ => ShapeDescriptor::parse(&self.kind, self.width, self.height),
        }
    }
}

/// The `param3` object of `createFixture`. Missing coefficients read as zero.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FixtureDef {
    #[serde(default)]
    pub friction: f32,
    #[serde(default)]
    pub restitution: f32,
    #[serde(default)]
    pub density: f32,
    #[serde(default, rename = "isSensor")]
    pub is_sensor: bool,
    pub shape: ShapeDef,
}

/// A decoded request
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateWorld { gravity_x: f32, gravity_y: f32, allow_sleep: bool },
    DestroyWorld { world: WorldHandle },
    SetContinuous { world: WorldHandle, enabled: bool },
    SetGravity { world: WorldHandle, x: f32, y: f32 },
    ClearForces { world: WorldHandle },
    Step { world: WorldHandle, dt: f32, velocity_iterations: u32, position_iterations: u32 },
    GetLastContacts { world: WorldHandle },

    CreateBody { world: WorldHandle, kind: BodyKind, x: f32, y: f32 },
    DeleteBody { world: WorldHandle, body: BodyHandle },
    SetBodyTransform { world: WorldHandle, body: BodyHandle, x: f32, y: f32, angle: f32 },
    SetLinearVelocity { world: WorldHandle, body: BodyHandle, x: f32, y: f32 },
    GetLinearVelocity { world: WorldHandle, body: BodyHandle },
    SetAngularVelocity { world: WorldHandle, body: BodyHandle, omega: f32 },
    GetAngularVelocity { world: WorldHandle, body: BodyHandle },
    ApplyImpulse { world: WorldHandle, body: BodyHandle, impulse_x: f32, impulse_y: f32, point_x: f32, point_y: f32, wake: bool },
    ApplyForceToCenter { world: WorldHandle, body: BodyHandle, x: f32, y: f32, wake: bool },
    SetLinearDamping { world: WorldHandle, body: BodyHandle, damping: f32 },
    SetActive { world: WorldHandle, body: BodyHandle, active: bool },
    SetAwake { world: WorldHandle, body: BodyHandle, awake: bool },
    IsAwake { world: WorldHandle, body: BodyHandle },
    GetWorldCenter { world: WorldHandle, body: BodyHandle },
    GetLocalCenter { world: WorldHandle, body: BodyHandle },
    GetObjectContacts { world: WorldHandle, body: BodyHandle },

    CreateFixture { world: WorldHandle, body: BodyHandle, fixture: FixtureDef },
    DeleteFixture { world: WorldHandle, fixture: FixtureHandle },
    SetSensor { world: WorldHandle, fixture: FixtureHandle, is_sensor: bool },
    SetDensity { world: WorldHandle, fixture: FixtureHandle, density: f32 },
    SetFriction { world: WorldHandle, fixture: FixtureHandle, friction: f32 },
    SetRestitution { world: WorldHandle, fixture: FixtureHandle, restitution: f32 },

    CreateDistanceJoint { world: WorldHandle, body_a: BodyHandle, body_b: BodyHandle },
    DeleteJoint { world: WorldHandle, joint: JointHandle },
}

impl Command {
    /// Decodes a JSON message into a command
    pub fn parse(message: &str) -> Result<Self, ProtocolError> {
        let object: Map<String, Value> = serde_json::from_str(message)?;
        let params = Params::from_object(object)?;
        Self::from_params(params.command(), &params)
    }

    /// Builds a command from its name and positional arguments
    pub fn from_params(name: &str, p: &Params) -> Result<Self, ProtocolError> {
        let arity = match name {
            "clearForces" | "getLastContacts" | "destroyWorld" => 1,
            "setContinuous" | "deleteBody" | "getLinearVelocity" | "getAngularVelocity"
            | "isAwake" | "getWorldCenter" | "getLocalCenter" | "getObjectContacts"
            | "deleteFixture" | "deleteJoint" | "createBody" => 2,
            "createWorld" | "setGravity" | "createDistanceJoint" | "setAngularVelocity"
            | "setLinearDamping" | "setActive" | "setAwake" | "createFixture" | "setSensor"
            | "setDensity" | "setFriction" | "setRestitution" => 3,
            "step" | "setLinearVelocity" => 4,
            "setBodyTransform" | "applyForceToCenter" => 5,
            "applyImpulse" => 7,
            other => return Err(ProtocolError::UnknownCommand(other.to_owned())),
        };
        p.expect(arity)?;

        let command = match name {
            "createWorld" => Self::CreateWorld {
                gravity_x: p.float(0)?,
                gravity_y: p.float(1)?,
                allow_sleep: p.boolean(2)?,
            },
            "destroyWorld" => Self::DestroyWorld { world: p.handle(0)? },
            "setContinuous" => Self::SetContinuous { world: p.handle(0)?, enabled: p.boolean(1)? },
            "setGravity" => Self::SetGravity { world: p.handle(0)?, x: p.float(1)?, y: p.float(2)? },
            "clearForces" => Self::ClearForces { world: p.handle(0)? },
            "step" => Self::Step {
                world: p.handle(0)?,
                dt: p.float(1)?,
                // Negative counts are clamped to 1 by the bridge
                velocity_iterations: p.int(2)?.max(0) as u32,
                position_iterations: p.int(3)?.max(0) as u32,
            },
            "getLastContacts" => Self::GetLastContacts { world: p.handle(0)? },

            "createBody" => {
                let def: BodyDef = p.object(1)?;
                Self::CreateBody {
                    world: p.handle(0)?,
                    kind: BodyKind::from_raw(def.kind)?,
                    x: def.position.x,
                    y: def.position.y,
                }
            }
            "deleteBody" => Self::DeleteBody { world: p.handle(0)?, body: p.handle(1)? },
            "setBodyTransform" => Self::SetBodyTransform {
                world: p.handle(0)?,
                body: p.handle(1)?,
                x: p.float(2)?,
                y: p.float(3)?,
                angle: p.float(4)?,
            },
            "setLinearVelocity" => Self::SetLinearVelocity {
                world: p.handle(0)?,
                body: p.handle(1)?,
                x: p.float(2)?,
                y: p.float(3)?,
            },
            "getLinearVelocity" => Self::GetLinearVelocity { world: p.handle(0)?, body: p.handle(1)? },
            "setAngularVelocity" => Self::SetAngularVelocity {
                world: p.handle(0)?,
                body: p.handle(1)?,
                omega: p.float(2)?,
            },
            "getAngularVelocity" => Self::GetAngularVelocity { world: p.handle(0)?, body: p.handle(1)? },
            "applyImpulse" => Self::ApplyImpulse {
                world: p.handle(0)?,
                body: p.handle(1)?,
                impulse_x: p.float(2)?,
                impulse_y: p.float(3)?,
                point_x: p.float(4)?,
                point_y: p.float(5)?,
                wake: p.boolean(6)?,
            },
            "applyForceToCenter" => Self::ApplyForceToCenter {
                world: p.handle(0)?,
                body: p.handle(1)?,
                x: p.float(2)?,
                y: p.float(3)?,
                wake: p.boolean(4)?,
            },
            "setLinearDamping" => Self::SetLinearDamping {
                world: p.handle(0)?,
                body: p.handle(1)?,
                damping: p.float(2)?,
            },
            "setActive" => Self::SetActive { world: p.handle(0)?, body: p.handle(1)?, active: p.boolean(2)? },
            "setAwake" => Self::SetAwake { world: p.handle(0)?, body: p.handle(1)?, awake: p.boolean(2)? },
            "isAwake" => Self::IsAwake { world: p.handle(0)?, body: p.handle(1)? },
            "getWorldCenter" => Self::GetWorldCenter { world: p.handle(0)?, body: p.handle(1)? },
            "getLocalCenter" => Self::GetLocalCenter { world: p.handle(0)?, body: p.handle(1)? },
            "getObjectContacts" => Self::GetObjectContacts { world: p.handle(0)?, body: p.handle(1)? },

            "createFixture" => Self::CreateFixture {
                world: p.handle(0)?,
                body: p.handle(1)?,
                fixture: p.object(2)?,
            },
            "deleteFixture" => Self::DeleteFixture { world: p.handle(0)?, fixture: p.handle(1)? },
            "setSensor" => Self::SetSensor {
                world: p.handle(0)?,
                fixture: p.handle(1)?,
                is_sensor: p.boolean(2)?,
            },
            "setDensity" => Self::SetDensity {
                world: p.handle(0)?,
                fixture: p.handle(1)?,
                density: p.float(2)?,
            },
            "setFriction" => Self::SetFriction {
                world: p.handle(0)?,
                fixture: p.handle(1)?,
                friction: p.float(2)?,
            },
            "setRestitution" => Self::SetRestitution {
                world: p.handle(0)?,
                fixture: p.handle(1)?,
                restitution: p.float(2)?,
            },

            "createDistanceJoint" => Self::CreateDistanceJoint {
                world: p.handle(0)?,
                body_a: p.handle(1)?,
                body_b: p.handle(2)?,
            },
            "deleteJoint" => Self::DeleteJoint { world: p.handle(0)?, joint: p.handle(1)? },
            other => return Err(ProtocolError::UnknownCommand(other.to_owned())),
        };
        Ok(command)
    }
}
