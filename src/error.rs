//! Error types shared by the library.

use thiserror::Error;
use tracing::warn;

use crate::matrix::ElementType;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, HashError>;

/// Errors produced while validating or hashing a matrix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    /// The matrix element type has no byte-extraction policy.
    #[error("element type {0} is not supported")]
    UnsupportedElementType(ElementType),
    /// The declared dimensions disagree with the number of elements supplied.
    #[error("matrix shape {rows}x{cols} does not match {len} elements")]
    ShapeMismatch {
        /// Declared row count.
        rows: usize,
        /// Declared column count.
        cols: usize,
        /// Number of elements actually supplied.
        len: usize,
    },
}

pub(crate) fn unsupported(element_type: ElementType) -> HashError {
    warn!(%element_type, "rejecting unsupported element type");
    HashError::UnsupportedElementType(element_type)
}
