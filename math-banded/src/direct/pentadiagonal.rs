//! Symmetric LU for bands at offsets {-4, -2, 0, 2, 4}
//!
//! The elimination walks two bandwidths at once. Rows `n - 4` and `n - 3`
//! have no offset-4 entry left, so their offset-2 coupling is eliminated by
//! an explicit tail step. Substitution mirrors that split at both ends.

use crate::error::BandedError;
use crate::traits::{BandedFactorization, BandedOperator, ComplexField, RealField};
use ndarray::{Array1, ArrayViewMut1};

/// Fewest rows the pentadiagonal factorization accepts
pub const MIN_ROWS: usize = 4;

/// Eliminate the lower half of the band in place.
///
/// `d`, `e` and `f` enter as the offset 0, 2 and 4 diagonals. On return `d`
/// holds the pivots and `e`, `f` the multipliers of the offset -2 and -4
/// diagonals. Each `e[i]` and `f[i]` is read as a matrix entry before it is
/// overwritten with its multiplier.
pub fn pdma_sym_lu<R: RealField>(d: &mut [R], e: &mut [R], f: &mut [R]) {
    let n = d.len();
    debug_assert!(n >= MIN_ROWS);
    debug_assert_eq!(e.len(), n - 2);
    debug_assert_eq!(f.len(), n - 4);

    for i in 0..n - 4 {
        let lam = e[i] / d[i];
        d[i + 2] -= lam * e[i];
        e[i + 2] -= lam * f[i];
        e[i] = lam;

        let lam = f[i] / d[i];
        d[i + 4] -= lam * f[i];
        f[i] = lam;
    }

    let lam = e[n - 4] / d[n - 4];
    d[n - 2] -= lam * e[n - 4];
    e[n - 4] = lam;

    let lam = e[n - 3] / d[n - 3];
    d[n - 1] -= lam * e[n - 3];
    e[n - 3] = lam;
}

/// Forward elimination and back substitution with factors from [`pdma_sym_lu`]
pub fn pdma_sym_solve<R, T>(d: &[R], e: &[R], f: &[R], mut b: ArrayViewMut1<'_, T>)
where
    R: RealField,
    T: ComplexField<Real = R>,
{
    let n = d.len();
    debug_assert_eq!(b.len(), n);

    let (b0, b1) = (b[0], b[1]);
    b[2] -= b0.mul_real(e[0]);
    b[3] -= b1.mul_real(e[1]);
    for k in 4..n {
        let correction = b[k - 2].mul_real(e[k - 2]) + b[k - 4].mul_real(f[k - 4]);
        b[k] -= correction;
    }

    b[n - 1] = b[n - 1].div_real(d[n - 1]);
    b[n - 2] = b[n - 2].div_real(d[n - 2]);
    let last = b[n - 1];
    b[n - 3] = b[n - 3].div_real(d[n - 3]) - last.mul_real(e[n - 3]);
    let second_last = b[n - 2];
    b[n - 4] = b[n - 4].div_real(d[n - 4]) - second_last.mul_real(e[n - 4]);
    for k in (0..n - 4).rev() {
        let correction = b[k + 2].mul_real(e[k]) + b[k + 4].mul_real(f[k]);
        b[k] = b[k].div_real(d[k]) - correction;
    }
}

/// Cached factors of a symmetric pentadiagonal band
#[derive(Debug, Clone)]
pub struct SymmetricPentadiagonalLu<R> {
    /// Pivots after elimination
    pivots: Vec<R>,
    /// Multipliers of the offset -2 diagonal
    multipliers2: Vec<R>,
    /// Multipliers of the offset -4 diagonal
    multipliers4: Vec<R>,
}

impl<R: RealField> SymmetricPentadiagonalLu<R> {
    /// Factorize from the offset 0, 2 and 4 diagonals
    pub fn from_diagonals(
        main: Array1<R>,
        upper2: Array1<R>,
        upper4: Array1<R>,
    ) -> Result<Self, BandedError> {
        let n = main.len();
        if n < MIN_ROWS {
            return Err(BandedError::TooFewRows {
                required: MIN_ROWS,
                got: n,
            });
        }
        for (offset, len) in [(2, upper2.len()), (4, upper4.len())] {
            if len + offset != n {
                return Err(BandedError::DiagonalLength {
                    offset: offset as isize,
                    expected: n - offset,
                    got: len,
                });
            }
        }

        let mut pivots = main.to_vec();
        let mut multipliers2 = upper2.to_vec();
        let mut multipliers4 = upper4.to_vec();
        pdma_sym_lu(&mut pivots, &mut multipliers2, &mut multipliers4);

        Ok(Self {
            pivots,
            multipliers2,
            multipliers4,
        })
    }

    pub fn pivots(&self) -> &[R] {
        &self.pivots
    }
}

impl<R: RealField> BandedFactorization for SymmetricPentadiagonalLu<R> {
    type Real = R;

    const NAME: &'static str = "pentadiagonal symmetric LU";

    fn factorize<M>(matrix: &M) -> Result<Self, BandedError>
    where
        M: BandedOperator<Real = R> + ?Sized,
    {
        Self::from_diagonals(
            matrix.require_diagonal(0)?,
            matrix.require_diagonal(2)?,
            matrix.require_diagonal(4)?,
        )
    }

    fn rows(&self) -> usize {
        self.pivots.len()
    }

    fn solve_in_place<T>(&self, b: ArrayViewMut1<'_, T>)
    where
        T: ComplexField<Real = R>,
    {
        pdma_sym_solve(&self.pivots, &self.multipliers2, &self.multipliers4, b);
    }
}
