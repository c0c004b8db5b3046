//! Direct solvers for symmetric banded systems
//!
//! This module provides the factorization kernels:
//! - [`SymmetricTridiagonalLu`]: pivot-free symmetric LU for offsets {-2, 0, 2}
//! - [`SymmetricPentadiagonalLu`]: pivot-free symmetric LU for offsets {-4, -2, 0, 2, 4}
//! - [`BandedCholesky`]: dense-band Cholesky, the pentadiagonal fallback

mod cholesky_banded;
mod pentadiagonal;
mod tridiagonal;

pub use cholesky_banded::{BandedCholesky, PENTADIAGONAL_KD, pentadiagonal_band};
pub use pentadiagonal::{SymmetricPentadiagonalLu, pdma_sym_lu, pdma_sym_solve};
pub use tridiagonal::{SymmetricTridiagonalLu, tdma_sym_lu, tdma_sym_solve};

/// Fewest rows accepted by the tridiagonal factorization
pub const TRIDIAGONAL_MIN_ROWS: usize = tridiagonal::MIN_ROWS;

/// Fewest rows accepted by the pentadiagonal factorization
pub const PENTADIAGONAL_MIN_ROWS: usize = pentadiagonal::MIN_ROWS;
