//! Symmetric LU for bands at offsets {-2, 0, 2}
//!
//! Because the off-diagonals sit two rows away, even and odd rows form two
//! independent scalar chains. Both chains are handled in one pass: row `i + 2`
//! only ever reads row `i`.

use crate::error::BandedError;
use crate::traits::{BandedFactorization, BandedOperator, ComplexField, RealField};
use ndarray::{Array1, ArrayViewMut1};

/// Fewest rows the tridiagonal factorization accepts
pub const MIN_ROWS: usize = 2;

/// Eliminate the offset -2 diagonal in place.
///
/// On return `d` holds the pivots and `l` the multipliers
/// `l[i] = u[i] / d[i]`; `u` is left untouched.
pub fn tdma_sym_lu<R: RealField>(d: &mut [R], u: &[R], l: &mut [R]) {
    let n = d.len();
    debug_assert_eq!(u.len(), n - 2);
    debug_assert_eq!(l.len(), n - 2);

    for i in 0..n - 2 {
        l[i] = u[i] / d[i];
        d[i + 2] -= l[i] * u[i];
    }
}

/// Forward elimination and back substitution with factors from [`tdma_sym_lu`]
pub fn tdma_sym_solve<R, T>(d: &[R], u: &[R], l: &[R], mut b: ArrayViewMut1<'_, T>)
where
    R: RealField,
    T: ComplexField<Real = R>,
{
    let n = d.len();
    debug_assert_eq!(b.len(), n);

    for i in 2..n {
        let prev = b[i - 2];
        b[i] -= prev.mul_real(l[i - 2]);
    }

    b[n - 1] = b[n - 1].div_real(d[n - 1]);
    b[n - 2] = b[n - 2].div_real(d[n - 2]);
    for i in (0..n - 2).rev() {
        let next = b[i + 2];
        b[i] = (b[i] - next.mul_real(u[i])).div_real(d[i]);
    }
}

/// Cached factors of a symmetric tridiagonal band
#[derive(Debug, Clone)]
pub struct SymmetricTridiagonalLu<R> {
    /// Pivots after elimination
    pivots: Vec<R>,
    /// Offset +2 diagonal, unchanged by elimination
    upper: Vec<R>,
    /// Multipliers of the offset -2 diagonal
    multipliers: Vec<R>,
}

impl<R: RealField> SymmetricTridiagonalLu<R> {
    /// Factorize from the main and offset-2 diagonals
    pub fn from_diagonals(main: Array1<R>, upper: Array1<R>) -> Result<Self, BandedError> {
        let n = main.len();
        if n < MIN_ROWS {
            return Err(BandedError::TooFewRows {
                required: MIN_ROWS,
                got: n,
            });
        }
        if upper.len() != n - 2 {
            return Err(BandedError::DiagonalLength {
                offset: 2,
                expected: n - 2,
                got: upper.len(),
            });
        }

        let mut pivots = main.to_vec();
        let upper = upper.to_vec();
        let mut multipliers = vec![R::zero(); n - 2];
        tdma_sym_lu(&mut pivots, &upper, &mut multipliers);

        Ok(Self {
            pivots,
            upper,
            multipliers,
        })
    }

    pub fn pivots(&self) -> &[R] {
        &self.pivots
    }

    pub fn multipliers(&self) -> &[R] {
        &self.multipliers
    }
}

impl<R: RealField> BandedFactorization for SymmetricTridiagonalLu<R> {
    type Real = R;

    const NAME: &'static str = "tridiagonal symmetric LU";

    fn factorize<M>(matrix: &M) -> Result<Self, BandedError>
    where
        M: BandedOperator<Real = R> + ?Sized,
    {
        let main = matrix.require_diagonal(0)?;
        let upper = matrix.require_diagonal(2)?;
        Self::from_diagonals(main, upper)
    }

    fn rows(&self) -> usize {
        self.pivots.len()
    }

    fn solve_in_place<T>(&self, b: ArrayViewMut1<'_, T>)
    where
        T: ComplexField<Real = R>,
    {
        tdma_sym_solve(&self.pivots, &self.upper, &self.multipliers, b);
    }
}
