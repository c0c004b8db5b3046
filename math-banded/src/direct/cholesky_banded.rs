//! Banded Cholesky factorization
//!
//! Dense band storage in the LAPACK `pbtrf` upper layout:
//! `ab[kd + i - j, j] = A[i, j]` for `i <= j`, with `kd` super-diagonals and
//! shape `(kd + 1, n)`. The factor `U` with `A = Uᵀ U` overwrites the same
//! layout. Used as the fallback strategy for pentadiagonal bands and as the
//! reference the specialized elimination is checked against.

use crate::error::BandedError;
use crate::traits::{BandedFactorization, BandedOperator, ComplexField, RealField};
use ndarray::{Array2, ArrayViewMut1};

/// Super-diagonals stored for a pentadiagonal band
pub const PENTADIAGONAL_KD: usize = 4;

/// Upper Cholesky factor of a symmetric positive definite band
#[derive(Debug, Clone)]
pub struct BandedCholesky<R> {
    /// Factor `U` in upper band storage
    factor: Array2<R>,
    kd: usize,
}

impl<R: RealField> BandedCholesky<R> {
    /// Factorize a band given in upper band storage
    pub fn from_band(mut ab: Array2<R>) -> Result<Self, BandedError> {
        let n = ab.ncols();
        if ab.nrows() == 0 && n > 0 {
            return Err(BandedError::TooFewRows {
                required: 1,
                got: 0,
            });
        }
        let kd = ab.nrows().saturating_sub(1);

        for j in 0..n {
            let first = j.saturating_sub(kd);

            let mut ajj = ab[[kd, j]];
            for k in first..j {
                let ukj = ab[[kd + k - j, j]];
                ajj -= ukj * ukj;
            }
            if !(ajj > R::zero()) {
                return Err(BandedError::NotPositiveDefinite { row: j });
            }
            let ujj = ajj.sqrt();
            ab[[kd, j]] = ujj;

            // Row j of U to the right of the diagonal
            for i in j + 1..(j + kd + 1).min(n) {
                let mut aji = ab[[kd + j - i, i]];
                for k in i.saturating_sub(kd)..j {
                    aji -= ab[[kd + k - j, j]] * ab[[kd + k - i, i]];
                }
                ab[[kd + j - i, i]] = aji / ujj;
            }
        }

        Ok(Self { factor: ab, kd })
    }

    /// Number of super-diagonals in the factor
    pub fn kd(&self) -> usize {
        self.kd
    }

    /// Factor `U` in upper band storage
    pub fn factor(&self) -> &Array2<R> {
        &self.factor
    }
}

/// Upper band storage of a pentadiagonal band, rows 1 and 3 stay zero
pub fn pentadiagonal_band<M>(matrix: &M) -> Result<Array2<M::Real>, BandedError>
where
    M: BandedOperator + ?Sized,
{
    let n = matrix.num_rows();
    let main = matrix.require_diagonal(0)?;
    let upper2 = matrix.require_diagonal(2)?;
    let upper4 = matrix.require_diagonal(4)?;

    for (offset, len) in [(0, main.len()), (2, upper2.len()), (4, upper4.len())] {
        if len + offset != n {
            return Err(BandedError::DiagonalLength {
                offset: offset as isize,
                expected: n.saturating_sub(offset),
                got: len,
            });
        }
    }

    let kd = PENTADIAGONAL_KD;
    let mut ab = Array2::zeros((kd + 1, n));
    for (j, &v) in upper4.iter().enumerate() {
        ab[[0, j + 4]] = v;
    }
    for (j, &v) in upper2.iter().enumerate() {
        ab[[2, j + 2]] = v;
    }
    for (j, &v) in main.iter().enumerate() {
        ab[[kd, j]] = v;
    }
    Ok(ab)
}

impl<R: RealField> BandedFactorization for BandedCholesky<R> {
    type Real = R;

    const NAME: &'static str = "banded Cholesky";

    fn factorize<M>(matrix: &M) -> Result<Self, BandedError>
    where
        M: BandedOperator<Real = R> + ?Sized,
    {
        Self::from_band(pentadiagonal_band(matrix)?)
    }

    fn rows(&self) -> usize {
        self.factor.ncols()
    }

    fn solve_in_place<T>(&self, mut b: ArrayViewMut1<'_, T>)
    where
        T: ComplexField<Real = R>,
    {
        let n = self.rows();
        let kd = self.kd;
        let u = &self.factor;
        debug_assert_eq!(b.len(), n);

        // Uᵀ y = b
        for j in 0..n {
            let mut acc = b[j];
            for k in j.saturating_sub(kd)..j {
                acc -= b[k].mul_real(u[[kd + k - j, j]]);
            }
            b[j] = acc.div_real(u[[kd, j]]);
        }

        // U x = y
        for j in (0..n).rev() {
            let mut acc = b[j];
            for i in j + 1..(j + kd + 1).min(n) {
                acc -= b[i].mul_real(u[[kd + j - i, i]]);
            }
            b[j] = acc.div_real(u[[kd, j]]);
        }
    }
}
