//! Error type for fallible construction.
//!
//! Programmer errors such as division by zero or undersized destination
//! buffers panic instead; only failures caused by caller-supplied data are
//! surfaced as values.

use thiserror::Error;

/// Errors produced when constructing values from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithError {
    /// A hexadecimal string contained a character outside `[0-9a-fA-F]`.
    #[error("invalid hexadecimal digit {0:?}")]
    InvalidHexDigit(char),

    /// An empty string was given where an integer was expected.
    #[error("empty integer input")]
    EmptyInput,

    /// Affine coordinates that do not satisfy the curve equation.
    #[error("point is not on the curve")]
    PointNotOnCurve,

    /// An affine coordinate outside the field of definition.
    #[error("coordinate out of range")]
    CoordinateOutOfRange,
}
