//! Error types for banded factorization and solve
//!
//! Configuration and contract violations are reported before any numeric work
//! touches the caller's data. Zero pivots in the specialized elimination are
//! not detected: they surface as non-finite values in the solution.

use thiserror::Error;

/// Errors raised by the banded solvers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BandedError {
    #[error("Unsupported right-hand side rank {ndim}: expected 1 (single system) or 3 (batched)")]
    UnsupportedRank { ndim: usize },

    #[error("Matrix has no diagonal at offset {offset}")]
    MissingDiagonal { offset: isize },

    #[error("Unsupported diagonal offset {offset}: only even offsets 0, 2 and 4 are allowed")]
    UnsupportedOffset { offset: isize },

    #[error("Diagonal at offset {offset} has length {got}, expected {expected}")]
    DiagonalLength {
        offset: isize,
        expected: usize,
        got: usize,
    },

    #[error("Valid row slice has {got} rows but the matrix has {expected}")]
    SliceMismatch { expected: usize, got: usize },

    #[error("Row slice excludes {leading} leading and {trailing} trailing rows of a {len}-row array")]
    SliceOutOfBounds {
        leading: usize,
        trailing: usize,
        len: usize,
    },

    #[error("Band needs at least {required} rows, got {got}")]
    TooFewRows { required: usize, got: usize },

    #[error("Matrix is not positive definite: non-positive pivot at row {row}")]
    NotPositiveDefinite { row: usize },

    #[error("Invalid solver configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for BandedError {
    fn from(err: serde_json::Error) -> Self {
        BandedError::Config(err.to_string())
    }
}
