//! Errors raised while building, reading or reconstructing model objects.

use thiserror::Error;

/// Failure of a single construction or computation call.
///
/// Every operation that returns this error is pure, so retrying with the
/// same inputs reproduces the same failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A builder was finalized without its discriminator staged.
    #[error("missing required field `{0}`")]
    MissingRequiredField(String),

    /// Coordinate tuples of different dimensionality were combined.
    #[error("dimensionality mismatch: expected {expected} dimensions, found {found}")]
    DimensionalityMismatch { expected: usize, found: usize },

    /// A coordinate tuple with fewer than two ordinates.
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// A bounding box was requested for geometries without any coordinates.
    #[error("cannot compute a bounding box without any coordinates")]
    EmptyGeometrySet,

    /// A property held a value of an unusable shape.
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },

    /// No factory is registered for a discriminator value.
    #[error("unknown object type `{0}`")]
    UnknownType(String),

    /// A reconstructed object does not have the expected discriminator value.
    #[error("expected object of type `{expected}`, found `{found}`")]
    TypeMismatch { expected: String, found: String },

    /// The flat representation nests deeper than allowed.
    #[error("nesting exceeds the maximum depth of {0}")]
    NestingTooDeep(usize),
}

impl ModelError {
    pub fn invalid_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
