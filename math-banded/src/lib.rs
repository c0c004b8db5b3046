//! Direct solvers for symmetric banded systems of spectral-Galerkin methods
//!
//! Galerkin discretizations with Chebyshev or Legendre bases produce mass and
//! stiffness matrices whose bands only couple modes of equal parity. This
//! crate solves the two shapes that occur:
//!
//! - **Tridiagonal**: diagonals at offsets {-2, 0, 2}
//! - **Pentadiagonal**: diagonals at offsets {-4, -2, 0, 2, 4}
//!
//! Both use pivot-free symmetric LU elimination. The pentadiagonal solver can
//! instead run a dense-band Cholesky factorization. A solver factorizes
//! lazily, caches the factors for the leading length of the right-hand side,
//! and overwrites 1-D or batched 3-D coefficient arrays in place.
//!
//! # Stability
//!
//! No pivoting is done and pivots are not checked. The caller supplies bands
//! for which elimination without pivoting is stable (diagonally dominant or
//! positive definite); a zero pivot shows up as non-finite coefficients.
//!
//! # Example
//!
//! ```
//! use math_audio_banded::{BandedSolve, RowSlice, SymmetricBandedMatrix, TridiagonalSolver};
//! use ndarray::{Array1, Array3};
//!
//! // Dirichlet basis of size 8: the last two coefficients are boundary rows
//! let matrix = SymmetricBandedMatrix::tridiagonal(
//!     Array1::from_elem(6, 4.0),
//!     Array1::from_elem(4, 1.0),
//! )
//! .unwrap()
//! .with_row_slice(RowSlice::trailing(2));
//!
//! let mut solver = TridiagonalSolver::new(&matrix).unwrap();
//!
//! let mut u = Array1::from_elem(8, 1.0);
//! solver.solve(&mut u).unwrap();
//!
//! // The same factors serve a batch of 4x3 independent systems
//! let mut batch = Array3::from_elem((8, 4, 3), 1.0);
//! solver.solve(&mut batch).unwrap();
//! assert_eq!(solver.factorizations(), 1);
//! ```

pub mod cache;
pub mod config;
pub mod direct;
pub mod error;
pub mod matrix;
pub mod parallel;
pub mod rhs;
pub mod solver;
pub mod traits;

// Re-export main types
pub use cache::FactorizationCache;
pub use config::{PentadiagonalStrategy, SolverConfig};
pub use error::BandedError;
pub use matrix::{BandDiagonal, RowSlice, SymmetricBandedMatrix};
pub use rhs::RightHandSide;
pub use traits::{BandedFactorization, BandedOperator, ComplexField, RealField};

// Re-export solvers
pub use solver::{BandedSolve, BandedSolver, PentadiagonalSolver, TridiagonalSolver};

// Re-export factorizations
pub use direct::{BandedCholesky, SymmetricPentadiagonalLu, SymmetricTridiagonalLu};
