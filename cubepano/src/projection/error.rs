//! Errors raised by projectors.

use thiserror::Error;

use crate::coord::Face;

/// Reasons a set of faces cannot be projected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("face {face} is {width}x{height}, faces must be square")]
    NotSquare { face: Face, width: u32, height: u32 },

    #[error("face {face} is {actual}px wide, expected {expected}px")]
    UnequalFaces {
        face: Face,
        expected: u32,
        actual: u32,
    },

    #[error("faces have no pixels")]
    EmptyFaces,

    #[error("output image has no pixels")]
    EmptyOutput,
}
