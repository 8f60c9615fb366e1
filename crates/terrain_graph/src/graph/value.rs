//! Payloads exchanged along links and the typed slots that carry them.
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::terrain::{Layer, Terrain};

/// The kind of payload a port produces or accepts.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Terrain,
    Scalar,
    Grid,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Terrain => "terrain",
            ValueKind::Scalar => "scalar",
            ValueKind::Grid => "grid",
        };
        f.write_str(name)
    }
}

/// A value produced by a node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    Terrain(Terrain),
    Scalar(f32),
    Grid(Layer),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Terrain(_) => ValueKind::Terrain,
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Grid(_) => ValueKind::Grid,
        }
    }

    pub fn as_terrain(&self) -> Option<&Terrain> {
        match self {
            Value::Terrain(t) => Some(t),
            _ => None,
        }
    }

    pub fn into_terrain(self) -> Option<Terrain> {
        match self {
            Value::Terrain(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_grid(&self) -> Option<&Layer> {
        match self {
            Value::Grid(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Value::Scalar(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<Terrain> for Value {
    fn from(value: Terrain) -> Self {
        Value::Terrain(value)
    }
}

impl From<Layer> for Value {
    fn from(value: Layer) -> Self {
        Value::Grid(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Scalar(value)
    }
}

/// A named, typed input or output slot of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Port {
    pub name: &'static str,
    pub kind: ValueKind,
}

impl Port {
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self { name, kind }
    }

    pub const fn terrain(name: &'static str) -> Self {
        Self::new(name, ValueKind::Terrain)
    }

    pub const fn grid(name: &'static str) -> Self {
        Self::new(name, ValueKind::Grid)
    }

    pub const fn scalar(name: &'static str) -> Self {
        Self::new(name, ValueKind::Scalar)
    }

    /// Whether a link from this output port may feed `input`.
    pub fn accepts_into(&self, input: &Port) -> bool {
        self.kind == input.kind
    }
}
