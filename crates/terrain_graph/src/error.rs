//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid grid dimensions, layer and node lookups, structural graph failures detected before
//! execution, node parameter and input failures raised while a pass runs, and generic errors.
use thiserror::Error;

use crate::graph::value::ValueKind;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid dimension {width}x{height}: width and height must be > 0")]
    InvalidDimension { width: i64, height: i64 },

    #[error(
        "dimension mismatch: expected {}x{}, found {}x{}",
        expected.0, expected.1, found.0, found.1
    )]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("layer '{name}' not found")]
    LayerNotFound { name: String },

    #[error("node '{name}' not found")]
    NodeNotFound { name: String },

    #[error("node '{node}' is missing required input '{input}'")]
    MissingInput { node: String, input: String },

    #[error("graph contains a cycle through {nodes:?}")]
    GraphCycle { nodes: Vec<String> },

    #[error("node '{node}' has no slot named '{slot}'")]
    UnknownSlot { node: String, slot: String },

    #[error(
        "cannot link '{source_node}.{source_slot}' ({source_kind}) to \
         '{target_node}.{target_slot}' ({target_kind})"
    )]
    IncompatibleLink {
        source_node: String,
        source_slot: String,
        source_kind: ValueKind,
        target_node: String,
        target_slot: String,
        target_kind: ValueKind,
    },

    #[error("input '{input}' of node '{node}' is already linked")]
    InputAlreadyLinked { node: String, input: String },

    #[error("node '{node}' is missing parameter '{name}'")]
    MissingParameter { node: String, name: String },

    #[error("node '{node}' has invalid parameter '{name}': {reason}")]
    InvalidParameter {
        node: String,
        name: String,
        reason: String,
    },

    #[error("node '{node}' expected a {expected} value but got {found}")]
    UnexpectedValue {
        node: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn invalid_dimension(width: usize, height: usize) -> Self {
        Error::InvalidDimension {
            width: i64::try_from(width).unwrap_or(i64::MAX),
            height: i64::try_from(height).unwrap_or(i64::MAX),
        }
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        matches!(err, Error::Other(_))
            .then_some(())
            .expect("expected Other variant");
    }

    #[test]
    fn dimension_mismatch_message_names_both_sizes() {
        let err = Error::DimensionMismatch {
            expected: (20, 20),
            found: (10, 10),
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch: expected 20x20, found 10x10"
        );
    }

    #[test]
    fn incompatible_link_message_names_kinds() {
        let err = Error::IncompatibleLink {
            source_node: "c".into(),
            source_slot: "value".into(),
            source_kind: ValueKind::Scalar,
            target_node: "n".into(),
            target_slot: "terrain".into(),
            target_kind: ValueKind::Terrain,
        };
        assert_eq!(
            err.to_string(),
            "cannot link 'c.value' (scalar) to 'n.terrain' (terrain)"
        );
    }
}
