use crate::projection::ProjectionError;
use crate::style::{AccessorError, StyleKey};

/// Failure of a geometry rebuild.
///
/// A failed rebuild never replaces previously built geometry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("{key} accessor failed at line {line}, point {point}: {error}")]
    Accessor {
        key: StyleKey,
        line: usize,
        point: usize,
        error: AccessorError,
    },

    #[error("invalid {key} value at line {line}, point {point}: {detail}")]
    InvalidStyle {
        key: StyleKey,
        line: usize,
        point: usize,
        detail: String,
    },

    #[error("coordinate projection failed: {0}")]
    Projection(#[from] ProjectionError),

    #[error("projection returned {got} coordinates, expected {expected}")]
    ProjectionLength { expected: usize, got: usize },

    #[error("{0} vertices exceed the 32-bit index range")]
    TooManyVertices(usize),
}
