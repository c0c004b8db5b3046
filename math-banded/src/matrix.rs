//! Symmetric banded matrix with even-offset diagonals
//!
//! Spectral-Galerkin mass and stiffness matrices for Dirichlet and biharmonic
//! bases only couple modes of equal parity, so their bands live at offsets
//! 0, ±2 and ±4. The matrix stores the upper half and mirrors it.

use crate::error::BandedError;
use crate::traits::{BandedOperator, ComplexField, RealField};
use ndarray::{Array1, Array2, ArrayView1};
use std::collections::BTreeMap;
use std::ops::Range;

/// Largest supported diagonal offset
pub const MAX_OFFSET: usize = 4;

/// Storage for one diagonal of the band
#[derive(Debug, Clone, PartialEq)]
pub enum BandDiagonal<R> {
    /// Explicit values, one per entry on the diagonal
    Values(Array1<R>),
    /// A single value repeated along the whole diagonal
    Constant(R),
}

impl<R: RealField> BandDiagonal<R> {
    fn expand(&self, len: usize) -> Array1<R> {
        match self {
            BandDiagonal::Values(values) => values.clone(),
            BandDiagonal::Constant(value) => Array1::from_elem(len, *value),
        }
    }

    #[inline]
    fn get(&self, i: usize) -> R {
        match self {
            BandDiagonal::Values(values) => values[i],
            BandDiagonal::Constant(value) => *value,
        }
    }
}

impl<R> From<Array1<R>> for BandDiagonal<R> {
    fn from(values: Array1<R>) -> Self {
        BandDiagonal::Values(values)
    }
}

impl<R> From<Vec<R>> for BandDiagonal<R> {
    fn from(values: Vec<R>) -> Self {
        BandDiagonal::Values(Array1::from_vec(values))
    }
}

/// Leading and trailing rows of a coefficient array excluded from elimination
///
/// Boundary-condition rows are handled by the caller; for a Dirichlet basis
/// of size `N` only the first `N - 2` coefficients are solved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowSlice {
    /// Rows skipped at the start
    pub leading: usize,
    /// Rows skipped at the end
    pub trailing: usize,
}

impl RowSlice {
    /// Use every row
    pub fn full() -> Self {
        Self::default()
    }

    /// Skip `leading` rows at the start and `trailing` rows at the end
    pub fn new(leading: usize, trailing: usize) -> Self {
        Self { leading, trailing }
    }

    /// Skip `trailing` rows at the end
    pub fn trailing(trailing: usize) -> Self {
        Self {
            leading: 0,
            trailing,
        }
    }

    /// Row range for an array with leading length `n`
    pub fn resolve(&self, n: usize) -> Result<Range<usize>, BandedError> {
        if self.leading + self.trailing > n {
            return Err(BandedError::SliceOutOfBounds {
                leading: self.leading,
                trailing: self.trailing,
                len: n,
            });
        }
        Ok(self.leading..n - self.trailing)
    }
}

/// Symmetric banded matrix with diagonals at even offsets up to [`MAX_OFFSET`]
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricBandedMatrix<R> {
    num_rows: usize,
    diagonals: BTreeMap<usize, BandDiagonal<R>>,
    row_slice: RowSlice,
}

impl<R: RealField> SymmetricBandedMatrix<R> {
    /// Create an empty `num_rows × num_rows` band using every row
    pub fn new(num_rows: usize) -> Self {
        Self {
            num_rows,
            diagonals: BTreeMap::new(),
            row_slice: RowSlice::full(),
        }
    }

    /// Tridiagonal band with diagonals at offsets 0 and ±2
    pub fn tridiagonal(main: Array1<R>, upper2: Array1<R>) -> Result<Self, BandedError> {
        Self::new(main.len())
            .with_diagonal(0, main)?
            .with_diagonal(2, upper2)
    }

    /// Pentadiagonal band with diagonals at offsets 0, ±2 and ±4
    pub fn pentadiagonal(
        main: Array1<R>,
        upper2: Array1<R>,
        upper4: Array1<R>,
    ) -> Result<Self, BandedError> {
        Self::new(main.len())
            .with_diagonal(0, main)?
            .with_diagonal(2, upper2)?
            .with_diagonal(4, upper4)
    }

    /// Set the diagonal at `offset` (and by symmetry at `-offset`)
    pub fn with_diagonal(
        mut self,
        offset: usize,
        diagonal: impl Into<BandDiagonal<R>>,
    ) -> Result<Self, BandedError> {
        if offset % 2 != 0 || offset > MAX_OFFSET {
            return Err(BandedError::UnsupportedOffset {
                offset: offset as isize,
            });
        }
        let expected = self
            .num_rows
            .checked_sub(offset)
            .ok_or(BandedError::TooFewRows {
                required: offset,
                got: self.num_rows,
            })?;

        let diagonal = diagonal.into();
        if let BandDiagonal::Values(values) = &diagonal {
            if values.len() != expected {
                return Err(BandedError::DiagonalLength {
                    offset: offset as isize,
                    expected,
                    got: values.len(),
                });
            }
        }

        self.diagonals.insert(offset, diagonal);
        Ok(self)
    }

    /// Set the rows excluded from elimination
    pub fn with_row_slice(mut self, row_slice: RowSlice) -> Self {
        self.row_slice = row_slice;
        self
    }

    /// Entry `(i, j)` of the full symmetric matrix
    pub fn get(&self, i: usize, j: usize) -> R {
        let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
        match self.diagonals.get(&(hi - lo)) {
            Some(diagonal) if hi < self.num_rows => diagonal.get(lo),
            _ => R::zero(),
        }
    }

    /// Matrix-vector product y = A * x
    pub fn apply<T>(&self, x: &ArrayView1<'_, T>) -> Array1<T>
    where
        T: ComplexField<Real = R>,
    {
        assert_eq!(x.len(), self.num_rows, "Input vector size mismatch");

        let mut y = Array1::from_elem(self.num_rows, T::zero());
        for (&offset, diagonal) in &self.diagonals {
            for i in 0..self.num_rows - offset {
                let a = diagonal.get(i);
                y[i] += x[i + offset].mul_real(a);
                if offset > 0 {
                    y[i + offset] += x[i].mul_real(a);
                }
            }
        }
        y
    }

    /// Dense copy of the full symmetric matrix
    pub fn to_dense(&self) -> Array2<R> {
        Array2::from_shape_fn((self.num_rows, self.num_rows), |(i, j)| self.get(i, j))
    }
}

impl<R: RealField> BandedOperator for SymmetricBandedMatrix<R> {
    type Real = R;

    fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn offsets(&self) -> Vec<usize> {
        self.diagonals.keys().copied().collect()
    }

    fn diagonal(&self, offset: isize) -> Option<Array1<R>> {
        let offset = offset.unsigned_abs();
        self.diagonals
            .get(&offset)
            .map(|diagonal| diagonal.expand(self.num_rows - offset))
    }

    fn valid_slice(&self, n: usize) -> Result<Range<usize>, BandedError> {
        self.row_slice.resolve(n)
    }
}
