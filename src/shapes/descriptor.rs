use std::fmt;
use std::str::FromStr;

use rapier2d::prelude::{Collider, SharedShape};

use crate::error::BridgeError;
use crate::{Result, Vec2};

/// The shape kinds a fixture can be requested with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// A circle centered on the body origin, `param1` is the radius
    Circle,

    /// A rectangle centered on the body origin, `param1` is the width and `param2` the height
    Box,

    /// A line segment. Recognized but not supported.
    Edge,

    /// A convex polygon. Recognized but not supported.
    Polygon,
}

impl ShapeKind {
    /// Returns the name foreign callers use for the kind
    pub fn name(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Box => "box",
            Self::Edge => "edge",
            Self::Polygon => "polygon",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "circle" => Ok(Self::Circle),
            "box" => Ok(Self::Box),
            "edge" => Ok(Self::Edge),
            "polygon" => Ok(Self::Polygon),
            other => Err(BridgeError::UnsupportedShapeKind(other.to_string())),
        }
    }
}

/// Transient description of a fixture's geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDescriptor {
    pub kind: ShapeKind,
    pub param1: f32,
    pub param2: f32,
}

impl ShapeDescriptor {
    pub fn new(kind: ShapeKind, param1: f32, param2: f32) -> Self {
        Self { kind, param1, param2 }
    }

    /// A circle of the given radius
    pub fn circle(radius: f32) -> Self {
        Self::new(ShapeKind::Circle, radius, 0.0)
    }

    /// A box of the given full width and height
    pub fn rect(width: f32, height: f32) -> Self {
        Self::new(ShapeKind::Box, width, height)
    }

    /// Builds a descriptor from a kind name as sent by foreign callers
    pub fn parse(kind: &str, param1: f32, param2: f32) -> Result<Self> {
        Ok(Self::new(kind.parse()?, param1, param2))
    }

    /// Builds the engine shape. Edge and polygon kinds are rejected.
    pub fn build(&self) -> Result<SharedShape> {
        match self.kind {
            ShapeKind::Circle => {
                let radius = positive("radius", self.param1)?;
                Ok(SharedShape::ball(radius))
            }
            ShapeKind::Box => {
                let width = positive("width", self.param1)?;
                let height = positive("height", self.param2)?;
                Ok(SharedShape::cuboid(width / 2.0, height / 2.0))
            }
            ShapeKind::Edge | ShapeKind::Polygon => {
                Err(BridgeError::UnsupportedShapeKind(self.kind.name().to_string()))
            }
        }
    }
}

fn positive(name: &str, value: f32) -> Result<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(BridgeError::InvalidParameter(format!(
            "{name} must be a positive finite number, got {value}"
        )))
    }
}

/// Geometry of an existing fixture, as read back from the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeInfo {
    Circle {
        radius: f32,
    },
    Box {
        half_width: f32,
        half_height: f32,
    },
}

impl ShapeInfo {
    pub(crate) fn from_collider(collider: &Collider) -> Option<Self> {
        let shape = collider.shape();
        if let Some(ball) = shape.as_ball() {
            return Some(Self::Circle { radius: ball.radius });
        }
        shape.as_cuboid().map(|cuboid| Self::Box {
            half_width: cuboid.half_extents.x,
            half_height: cuboid.half_extents.y,
        })
    }

    /// Returns the kind the shape was created with
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Box { .. } => ShapeKind::Box,
        }
    }

    /// Returns the half-extents of a box shape
    pub fn half_extents(&self) -> Option<Vec2> {
        match *self {
            Self::Box { half_width, half_height } => Some(Vec2::new(half_width, half_height)),
            Self::Circle { .. } => None,
        }
    }
}
