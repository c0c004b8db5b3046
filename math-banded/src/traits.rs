//! Core traits for banded solves
//!
//! This module defines the abstractions shared by the solvers:
//! - [`RealField`]: scalar type of the matrix diagonals
//! - [`ComplexField`]: scalar type of right-hand sides (real or complex)
//! - [`BandedOperator`]: the assembled symmetric band handed to a solver
//! - [`BandedFactorization`]: a factorize/solve strategy for one band shape

use crate::error::BandedError;
use ndarray::{Array1, ArrayViewMut1};
use num_complex::{Complex32, Complex64};
use num_traits::{Float, FromPrimitive, NumAssign, One, ToPrimitive, Zero};
use std::fmt::Debug;
use std::ops::{Neg, Range};
use std::sync::Arc;

/// Real scalar type stored in the matrix diagonals
pub trait RealField:
    Float + NumAssign + FromPrimitive + ToPrimitive + Send + Sync + Debug + 'static
{
}

impl<R> RealField for R where
    R: Float + NumAssign + FromPrimitive + ToPrimitive + Send + Sync + Debug + 'static
{
}

/// Trait for scalar types that can be used as right-hand side coefficients.
///
/// Spectral coefficients along Fourier directions are complex while the
/// banded operator itself is real, so every operation between the two goes
/// through [`ComplexField::mul_real`] and [`ComplexField::div_real`].
///
/// # Implementations
///
/// Provided for:
/// - `Complex64`
/// - `Complex32`
/// - `f64`
/// - `f32`
pub trait ComplexField:
    NumAssign + Clone + Copy + Send + Sync + Debug + Zero + One + Neg<Output = Self> + 'static
{
    /// The real number type underlying this field
    type Real: RealField;

    /// Multiply by a real scalar
    fn mul_real(self, r: Self::Real) -> Self;

    /// Divide by a real scalar
    fn div_real(self, r: Self::Real) -> Self;
}

impl ComplexField for Complex64 {
    type Real = f64;

    #[inline]
    fn mul_real(self, r: f64) -> Self {
        self * r
    }

    #[inline]
    fn div_real(self, r: f64) -> Self {
        self / r
    }
}

impl ComplexField for Complex32 {
    type Real = f32;

    #[inline]
    fn mul_real(self, r: f32) -> Self {
        self * r
    }

    #[inline]
    fn div_real(self, r: f32) -> Self {
        self / r
    }
}

impl ComplexField for f64 {
    type Real = f64;

    #[inline]
    fn mul_real(self, r: f64) -> Self {
        self * r
    }

    #[inline]
    fn div_real(self, r: f64) -> Self {
        self / r
    }
}

impl ComplexField for f32 {
    type Real = f32;

    #[inline]
    fn mul_real(self, r: f32) -> Self {
        self * r
    }

    #[inline]
    fn div_real(self, r: f32) -> Self {
        self / r
    }
}

/// A symmetric banded matrix as seen by the solvers.
///
/// Only the upper half of the band is queried; a negative offset returns the
/// same diagonal as its positive mirror. The matrix is assembled elsewhere and
/// never mutated by a solver.
pub trait BandedOperator: Send + Sync {
    /// Scalar type of the diagonals
    type Real: RealField;

    /// Number of rows taking part in the elimination
    fn num_rows(&self) -> usize;

    /// Non-negative offsets of the stored diagonals, ascending
    fn offsets(&self) -> Vec<usize>;

    /// Diagonal at `offset` expanded to its full length (`num_rows - |offset|`)
    fn diagonal(&self, offset: isize) -> Option<Array1<Self::Real>>;

    /// Rows of a right-hand side with leading length `n` that take part in
    /// the elimination; rows outside are boundary rows owned by the caller
    fn valid_slice(&self, n: usize) -> Result<Range<usize>, BandedError>;

    /// Fetch a diagonal or report it missing
    fn require_diagonal(&self, offset: isize) -> Result<Array1<Self::Real>, BandedError> {
        self.diagonal(offset)
            .ok_or(BandedError::MissingDiagonal { offset })
    }
}

impl<M: BandedOperator + ?Sized> BandedOperator for &M {
    type Real = M::Real;

    fn num_rows(&self) -> usize {
        (**self).num_rows()
    }

    fn offsets(&self) -> Vec<usize> {
        (**self).offsets()
    }

    fn diagonal(&self, offset: isize) -> Option<Array1<Self::Real>> {
        (**self).diagonal(offset)
    }

    fn valid_slice(&self, n: usize) -> Result<Range<usize>, BandedError> {
        (**self).valid_slice(n)
    }
}

impl<M: BandedOperator + ?Sized> BandedOperator for Arc<M> {
    type Real = M::Real;

    fn num_rows(&self) -> usize {
        (**self).num_rows()
    }

    fn offsets(&self) -> Vec<usize> {
        (**self).offsets()
    }

    fn diagonal(&self, offset: isize) -> Option<Array1<Self::Real>> {
        (**self).diagonal(offset)
    }

    fn valid_slice(&self, n: usize) -> Result<Range<usize>, BandedError> {
        (**self).valid_slice(n)
    }
}

/// A factorization strategy for one band shape.
///
/// Implementations read the matrix once in [`BandedFactorization::factorize`]
/// and afterwards only hold their own factors, so a factorization can be
/// shared read-only between concurrent substitutions.
pub trait BandedFactorization: Sized + Send + Sync {
    /// Scalar type of the factors
    type Real: RealField;

    /// Short name used in log output
    const NAME: &'static str;

    /// Factorize the band of `matrix` over all of its rows
    fn factorize<M>(matrix: &M) -> Result<Self, BandedError>
    where
        M: BandedOperator<Real = Self::Real> + ?Sized;

    /// Number of rows the factors were computed for
    fn rows(&self) -> usize;

    /// Overwrite `b` (of length [`BandedFactorization::rows`]) with the solution
    fn solve_in_place<T>(&self, b: ArrayViewMut1<'_, T>)
    where
        T: ComplexField<Real = Self::Real>;
}
