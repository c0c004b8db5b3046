//! Right-hand side containers
//!
//! A right-hand side is either a single system (1-D, length `N`) or a batch of
//! independent systems packed along the two trailing axes of a 3-D array whose
//! first axis has length `N`. Both are overwritten with the solution.

use crate::error::BandedError;
use ndarray::{Array1, Array3, ArrayViewMut1, ArrayViewMut3, ArrayViewMutD, Axis, Ix1, Ix3};

/// Mutable right-hand side of a banded solve
#[derive(Debug)]
pub enum RightHandSide<'a, T> {
    /// One system with the coefficients along the only axis
    Single(ArrayViewMut1<'a, T>),
    /// Independent systems indexed by the two trailing axes
    Batched(ArrayViewMut3<'a, T>),
}

impl<'a, T> RightHandSide<'a, T> {
    /// Length of the leading (coefficient) axis
    pub fn leading_len(&self) -> usize {
        match self {
            RightHandSide::Single(b) => b.len(),
            RightHandSide::Batched(b) => b.len_of(Axis(0)),
        }
    }

    /// Number of independent systems
    pub fn batch_size(&self) -> usize {
        match self {
            RightHandSide::Single(_) => 1,
            RightHandSide::Batched(b) => b.len_of(Axis(1)) * b.len_of(Axis(2)),
        }
    }

    /// Classify a dynamic-rank view, rejecting anything but rank 1 or 3
    pub fn from_dyn(view: ArrayViewMutD<'a, T>) -> Result<Self, BandedError> {
        let ndim = view.ndim();
        match ndim {
            1 => view
                .into_dimensionality::<Ix1>()
                .map(RightHandSide::Single)
                .map_err(|_| BandedError::UnsupportedRank { ndim }),
            3 => view
                .into_dimensionality::<Ix3>()
                .map(RightHandSide::Batched)
                .map_err(|_| BandedError::UnsupportedRank { ndim }),
            _ => Err(BandedError::UnsupportedRank { ndim }),
        }
    }
}

impl<'a, T> TryFrom<ArrayViewMutD<'a, T>> for RightHandSide<'a, T> {
    type Error = BandedError;

    fn try_from(view: ArrayViewMutD<'a, T>) -> Result<Self, Self::Error> {
        Self::from_dyn(view)
    }
}

impl<'a, T> From<ArrayViewMut1<'a, T>> for RightHandSide<'a, T> {
    fn from(view: ArrayViewMut1<'a, T>) -> Self {
        RightHandSide::Single(view)
    }
}

impl<'a, T> From<ArrayViewMut3<'a, T>> for RightHandSide<'a, T> {
    fn from(view: ArrayViewMut3<'a, T>) -> Self {
        RightHandSide::Batched(view)
    }
}

impl<'a, T> From<&'a mut Array1<T>> for RightHandSide<'a, T> {
    fn from(array: &'a mut Array1<T>) -> Self {
        RightHandSide::Single(array.view_mut())
    }
}

impl<'a, T> From<&'a mut Array3<T>> for RightHandSide<'a, T> {
    fn from(array: &'a mut Array3<T>) -> Self {
        RightHandSide::Batched(array.view_mut())
    }
}
