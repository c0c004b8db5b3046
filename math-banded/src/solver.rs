//! Banded solvers bound to one matrix
//!
//! A solver owns (or borrows, via `&M`) an assembled band and lazily
//! factorizes it the first time it sees a right-hand side, and again whenever
//! the leading length of the right-hand side changes. Substitution overwrites
//! the rows of the valid slice in place; boundary rows are left untouched.
//!
//! # Solver Types
//!
//! - [`TridiagonalSolver`]: offsets {-2, 0, 2}
//! - [`PentadiagonalSolver`]: offsets {-4, -2, 0, 2, 4}, with the
//!   factorization picked by [`PentadiagonalStrategy`]
//! - [`BandedSolver`]: either of the above, chosen from the band structure

use crate::cache::FactorizationCache;
use crate::config::{PentadiagonalStrategy, SolverConfig};
use crate::direct::{
    BandedCholesky, PENTADIAGONAL_MIN_ROWS, SymmetricPentadiagonalLu, SymmetricTridiagonalLu,
    TRIDIAGONAL_MIN_ROWS,
};
use crate::error::BandedError;
use crate::parallel::{for_each_system, num_threads};
use crate::rhs::RightHandSide;
use crate::traits::{BandedFactorization, BandedOperator, ComplexField, RealField};
use ndarray::{ArrayD, ArrayViewMutD, s};

/// Common interface of the banded solvers
pub trait BandedSolve {
    /// Scalar type of the matrix
    type Real: RealField;

    /// Solve in place for a classified right-hand side
    fn solve_rhs<T>(&mut self, rhs: RightHandSide<'_, T>) -> Result<(), BandedError>
    where
        T: ComplexField<Real = Self::Real>;

    /// Factorize for right-hand sides of leading length `n` unless already cached
    fn factorize(&mut self, n: usize) -> Result<(), BandedError>;

    /// True when a solve with leading length `n` would factorize first
    fn needs_refactor(&self, n: usize) -> bool;

    /// Number of factorizations performed so far
    fn factorizations(&self) -> usize;

    /// Solve in place for a 1-D or 3-D right-hand side
    fn solve<'a, T>(&mut self, rhs: impl Into<RightHandSide<'a, T>>) -> Result<(), BandedError>
    where
        T: ComplexField<Real = Self::Real>,
    {
        self.solve_rhs(rhs.into())
    }

    /// Solve in place for a right-hand side of unchecked rank.
    ///
    /// Anything but rank 1 or 3 is rejected before any element is touched.
    fn solve_dyn<T>(&mut self, rhs: ArrayViewMutD<'_, T>) -> Result<(), BandedError>
    where
        T: ComplexField<Real = Self::Real>,
    {
        let rhs = RightHandSide::from_dyn(rhs)?;
        self.solve_rhs(rhs)
    }

    /// Solve and hand the overwritten array back
    fn solve_into<T>(&mut self, mut rhs: ArrayD<T>) -> Result<ArrayD<T>, BandedError>
    where
        T: ComplexField<Real = Self::Real>,
    {
        self.solve_dyn(rhs.view_mut())?;
        Ok(rhs)
    }
}

/// Check that `matrix` carries exactly the diagonals at `offsets` with
/// consistent lengths and enough rows for the elimination
fn validate_band<M: BandedOperator + ?Sized>(
    matrix: &M,
    offsets: &[usize],
    min_rows: usize,
) -> Result<(), BandedError> {
    let n = matrix.num_rows();
    if n < min_rows {
        return Err(BandedError::TooFewRows {
            required: min_rows,
            got: n,
        });
    }

    let present = matrix.offsets();
    if let Some(&extra) = present.iter().find(|&&o| !offsets.contains(&o)) {
        return Err(BandedError::UnsupportedOffset {
            offset: extra as isize,
        });
    }

    for &offset in offsets {
        let diagonal = matrix.require_diagonal(offset as isize)?;
        if diagonal.len() + offset != n {
            return Err(BandedError::DiagonalLength {
                offset: offset as isize,
                expected: n - offset,
                got: diagonal.len(),
            });
        }
    }
    Ok(())
}

/// Matrix, cached factors and execution settings shared by every solver
#[derive(Debug)]
struct CachedSolver<M, F> {
    matrix: M,
    cache: FactorizationCache<F>,
    parallel_min_batch: usize,
}

impl<M, F> CachedSolver<M, F>
where
    M: BandedOperator,
    F: BandedFactorization<Real = M::Real>,
{
    fn new(matrix: M, config: &SolverConfig) -> Self {
        Self {
            matrix,
            cache: FactorizationCache::new(),
            parallel_min_batch: config.parallel_min_batch,
        }
    }

    fn factors_for(&mut self, n: usize) -> Result<&F, BandedError> {
        let matrix = &self.matrix;
        self.cache.get_or_factorize(n, || {
            let rows = matrix.valid_slice(n)?;
            if rows.len() != matrix.num_rows() {
                return Err(BandedError::SliceMismatch {
                    expected: matrix.num_rows(),
                    got: rows.len(),
                });
            }
            log::debug!(
                "Factorizing {} over rows {}..{} of {}",
                F::NAME,
                rows.start,
                rows.end,
                n
            );
            F::factorize(matrix)
        })
    }
}

impl<M, F> BandedSolve for CachedSolver<M, F>
where
    M: BandedOperator,
    F: BandedFactorization<Real = M::Real>,
{
    type Real = M::Real;

    fn solve_rhs<T>(&mut self, rhs: RightHandSide<'_, T>) -> Result<(), BandedError>
    where
        T: ComplexField<Real = Self::Real>,
    {
        let n = rhs.leading_len();
        let batch = rhs.batch_size();
        let rows = self.matrix.valid_slice(n)?;
        let min_batch = self.parallel_min_batch;
        let factors = self.factors_for(n)?;

        match rhs {
            RightHandSide::Single(mut b) => {
                factors.solve_in_place(b.slice_mut(s![rows]));
            }
            RightHandSide::Batched(mut b) => {
                let parallel = for_each_system(b.slice_mut(s![rows, .., ..]), min_batch, |lane| {
                    factors.solve_in_place(lane)
                });
                if parallel {
                    log::trace!(
                        "{} batched solve over {} systems on {} threads",
                        F::NAME,
                        batch,
                        num_threads()
                    );
                } else {
                    log::trace!(
                        "{} batched solve over {} systems (sequential)",
                        F::NAME,
                        batch
                    );
                }
            }
        }
        Ok(())
    }

    fn factorize(&mut self, n: usize) -> Result<(), BandedError> {
        self.factors_for(n).map(|_| ())
    }

    fn needs_refactor(&self, n: usize) -> bool {
        self.cache.needs_refactor(n)
    }

    fn factorizations(&self) -> usize {
        self.cache.factorizations()
    }
}

/// Solver for symmetric bands at offsets {-2, 0, 2}
#[derive(Debug)]
pub struct TridiagonalSolver<M: BandedOperator> {
    inner: CachedSolver<M, SymmetricTridiagonalLu<M::Real>>,
}

impl<M: BandedOperator> TridiagonalSolver<M> {
    /// Bind a solver to `matrix` with the default configuration
    pub fn new(matrix: M) -> Result<Self, BandedError> {
        Self::with_config(matrix, &SolverConfig::default())
    }

    /// Bind a solver to `matrix`
    pub fn with_config(matrix: M, config: &SolverConfig) -> Result<Self, BandedError> {
        validate_band(&matrix, &[0, 2], TRIDIAGONAL_MIN_ROWS)?;
        Ok(Self {
            inner: CachedSolver::new(matrix, config),
        })
    }

    /// Band the solver is bound to
    pub fn matrix(&self) -> &M {
        &self.inner.matrix
    }

    /// Cached factors, if a factorization has run
    pub fn factors(&self) -> Option<&SymmetricTridiagonalLu<M::Real>> {
        self.inner.cache.factors()
    }
}

impl<M: BandedOperator> BandedSolve for TridiagonalSolver<M> {
    type Real = M::Real;

    fn solve_rhs<T>(&mut self, rhs: RightHandSide<'_, T>) -> Result<(), BandedError>
    where
        T: ComplexField<Real = Self::Real>,
    {
        self.inner.solve_rhs(rhs)
    }

    fn factorize(&mut self, n: usize) -> Result<(), BandedError> {
        self.inner.factorize(n)
    }

    fn needs_refactor(&self, n: usize) -> bool {
        self.inner.needs_refactor(n)
    }

    fn factorizations(&self) -> usize {
        self.inner.factorizations()
    }
}

#[derive(Debug)]
enum PentadiagonalBackend<M: BandedOperator> {
    Specialized(CachedSolver<M, SymmetricPentadiagonalLu<M::Real>>),
    Cholesky(CachedSolver<M, BandedCholesky<M::Real>>),
}

/// Solver for symmetric bands at offsets {-4, -2, 0, 2, 4}
///
/// The strategy is fixed at construction.
#[derive(Debug)]
pub struct PentadiagonalSolver<M: BandedOperator> {
    backend: PentadiagonalBackend<M>,
}

impl<M: BandedOperator> PentadiagonalSolver<M> {
    /// Bind a solver using the specialized elimination
    pub fn new(matrix: M) -> Result<Self, BandedError> {
        Self::with_config(matrix, &SolverConfig::default())
    }

    /// Bind a solver using `strategy` and default execution settings
    pub fn with_strategy(matrix: M, strategy: PentadiagonalStrategy) -> Result<Self, BandedError> {
        let config = SolverConfig {
            pentadiagonal_strategy: strategy,
            ..SolverConfig::default()
        };
        Self::with_config(matrix, &config)
    }

    /// Bind a solver to `matrix`
    pub fn with_config(matrix: M, config: &SolverConfig) -> Result<Self, BandedError> {
        validate_band(&matrix, &[0, 2, 4], PENTADIAGONAL_MIN_ROWS)?;
        let backend = match config.pentadiagonal_strategy {
            PentadiagonalStrategy::Specialized => {
                PentadiagonalBackend::Specialized(CachedSolver::new(matrix, config))
            }
            PentadiagonalStrategy::Cholesky => {
                PentadiagonalBackend::Cholesky(CachedSolver::new(matrix, config))
            }
        };
        Ok(Self { backend })
    }

    /// Factorization chosen at construction
    pub fn strategy(&self) -> PentadiagonalStrategy {
        match &self.backend {
            PentadiagonalBackend::Specialized(_) => PentadiagonalStrategy::Specialized,
            PentadiagonalBackend::Cholesky(_) => PentadiagonalStrategy::Cholesky,
        }
    }

    /// Band the solver is bound to
    pub fn matrix(&self) -> &M {
        match &self.backend {
            PentadiagonalBackend::Specialized(inner) => &inner.matrix,
            PentadiagonalBackend::Cholesky(inner) => &inner.matrix,
        }
    }
}

impl<M: BandedOperator> BandedSolve for PentadiagonalSolver<M> {
    type Real = M::Real;

    fn solve_rhs<T>(&mut self, rhs: RightHandSide<'_, T>) -> Result<(), BandedError>
    where
        T: ComplexField<Real = Self::Real>,
    {
        match &mut self.backend {
            PentadiagonalBackend::Specialized(inner) => inner.solve_rhs(rhs),
            PentadiagonalBackend::Cholesky(inner) => inner.solve_rhs(rhs),
        }
    }

    fn factorize(&mut self, n: usize) -> Result<(), BandedError> {
        match &mut self.backend {
            PentadiagonalBackend::Specialized(inner) => inner.factorize(n),
            PentadiagonalBackend::Cholesky(inner) => inner.factorize(n),
        }
    }

    fn needs_refactor(&self, n: usize) -> bool {
        match &self.backend {
            PentadiagonalBackend::Specialized(inner) => inner.needs_refactor(n),
            PentadiagonalBackend::Cholesky(inner) => inner.needs_refactor(n),
        }
    }

    fn factorizations(&self) -> usize {
        match &self.backend {
            PentadiagonalBackend::Specialized(inner) => inner.factorizations(),
            PentadiagonalBackend::Cholesky(inner) => inner.factorizations(),
        }
    }
}

/// A tridiagonal or pentadiagonal solver picked from the matrix offsets
#[derive(Debug)]
pub enum BandedSolver<M: BandedOperator> {
    Tridiagonal(TridiagonalSolver<M>),
    Pentadiagonal(PentadiagonalSolver<M>),
}

impl<M: BandedOperator> BandedSolver<M> {
    /// Build the solver matching the band of `matrix`
    pub fn new(matrix: M, config: &SolverConfig) -> Result<Self, BandedError> {
        if matrix.offsets().contains(&4) {
            PentadiagonalSolver::with_config(matrix, config).map(BandedSolver::Pentadiagonal)
        } else {
            TridiagonalSolver::with_config(matrix, config).map(BandedSolver::Tridiagonal)
        }
    }
}

impl<M: BandedOperator> BandedSolve for BandedSolver<M> {
    type Real = M::Real;

    fn solve_rhs<T>(&mut self, rhs: RightHandSide<'_, T>) -> Result<(), BandedError>
    where
        T: ComplexField<Real = Self::Real>,
    {
        match self {
            BandedSolver::Tridiagonal(solver) => solver.solve_rhs(rhs),
            BandedSolver::Pentadiagonal(solver) => solver.solve_rhs(rhs),
        }
    }

    fn factorize(&mut self, n: usize) -> Result<(), BandedError> {
        match self {
            BandedSolver::Tridiagonal(solver) => solver.factorize(n),
            BandedSolver::Pentadiagonal(solver) => solver.factorize(n),
        }
    }

    fn needs_refactor(&self, n: usize) -> bool {
        match self {
            BandedSolver::Tridiagonal(solver) => solver.needs_refactor(n),
            BandedSolver::Pentadiagonal(solver) => solver.needs_refactor(n),
        }
    }

    fn factorizations(&self) -> usize {
        match self {
            BandedSolver::Tridiagonal(solver) => solver.factorizations(),
            BandedSolver::Pentadiagonal(solver) => solver.factorizations(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{RowSlice, SymmetricBandedMatrix};
    use approx::assert_relative_eq;
    use ndarray::{Array1, Array3, IxDyn, array};

    fn dirichlet_mass(m: usize) -> SymmetricBandedMatrix<f64> {
        SymmetricBandedMatrix::tridiagonal(
            Array1::from_iter((0..m).map(|k| 3.0 + k as f64)),
            Array1::from_elem(m - 2, -1.0),
        )
        .unwrap()
        .with_row_slice(RowSlice::trailing(2))
    }

    #[test]
    fn test_boundary_rows_untouched() {
        let mut solver = TridiagonalSolver::new(dirichlet_mass(6)).unwrap();
        let mut u = Array1::from_elem(8, 1.0);
        u[6] = 42.0;
        u[7] = -7.0;

        solver.solve(&mut u).unwrap();

        assert_eq!(u[6], 42.0);
        assert_eq!(u[7], -7.0);
        let residual = solver.matrix().apply(&u.slice(s![..6]));
        for &r in residual.iter() {
            assert_relative_eq!(r, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_factorizes_once_per_length() {
        let mut solver = TridiagonalSolver::new(dirichlet_mass(6)).unwrap();
        assert!(solver.needs_refactor(8));
        assert!(solver.factors().is_none());

        for _ in 0..3 {
            let mut u = Array1::from_elem(8, 1.0);
            solver.solve(&mut u).unwrap();
        }
        assert_eq!(solver.factorizations(), 1);
        assert!(!solver.needs_refactor(8));
        assert!(solver.factors().is_some());
    }

    #[test]
    fn test_length_without_matching_slice_is_rejected() {
        let mut solver = TridiagonalSolver::new(dirichlet_mass(6)).unwrap();
        let mut u = Array1::from_elem(10, 1.0);
        let err = solver.solve(&mut u).unwrap_err();
        assert_eq!(
            err,
            BandedError::SliceMismatch {
                expected: 6,
                got: 8
            }
        );
        assert!(u.iter().all(|&x| x == 1.0));
        assert_eq!(solver.factorizations(), 0);
    }

    #[test]
    fn test_rank_two_rejected_without_mutation() {
        let mut solver = TridiagonalSolver::new(dirichlet_mass(6)).unwrap();
        let mut u = ArrayD::from_elem(IxDyn(&[8, 2]), 1.0);
        let err = solver.solve_dyn(u.view_mut()).unwrap_err();
        assert_eq!(err, BandedError::UnsupportedRank { ndim: 2 });
        assert!(u.iter().all(|&x| x == 1.0));
        assert_eq!(solver.factorizations(), 0);
    }

    #[test]
    fn test_tridiagonal_rejects_offset4() {
        let matrix = SymmetricBandedMatrix::pentadiagonal(
            Array1::from_elem(6, 4.0),
            Array1::from_elem(4, 1.0),
            Array1::from_elem(2, 0.5),
        )
        .unwrap();
        let err = TridiagonalSolver::new(matrix).unwrap_err();
        assert_eq!(err, BandedError::UnsupportedOffset { offset: 4 });
    }

    #[test]
    fn test_pentadiagonal_requires_offset4() {
        let err = PentadiagonalSolver::new(dirichlet_mass(6)).unwrap_err();
        assert_eq!(err, BandedError::MissingDiagonal { offset: 4 });
    }

    #[test]
    fn test_dispatch_from_offsets() {
        let config = SolverConfig::default();
        let tri = BandedSolver::new(dirichlet_mass(6), &config).unwrap();
        assert!(matches!(tri, BandedSolver::Tridiagonal(_)));

        let penta = SymmetricBandedMatrix::pentadiagonal(
            Array1::from_elem(6, 6.0),
            Array1::from_elem(4, 1.0),
            Array1::from_elem(2, 0.5),
        )
        .unwrap();
        let config = SolverConfig {
            pentadiagonal_strategy: PentadiagonalStrategy::Cholesky,
            ..SolverConfig::default()
        };
        match BandedSolver::new(&penta, &config).unwrap() {
            BandedSolver::Pentadiagonal(solver) => {
                assert_eq!(solver.strategy(), PentadiagonalStrategy::Cholesky)
            }
            BandedSolver::Tridiagonal(_) => panic!("expected a pentadiagonal solver"),
        }
    }

    #[test]
    fn test_solve_into_returns_solution() {
        let matrix = SymmetricBandedMatrix::tridiagonal(array![2.0, 2.0, 2.0], array![1.0]).unwrap();
        let mut solver = TridiagonalSolver::new(&matrix).unwrap();
        let u = ArrayD::from_shape_vec(IxDyn(&[3]), vec![3.0, 2.0, 3.0]).unwrap();
        let x = solver.solve_into(u).unwrap();
        for &v in x.iter() {
            assert_relative_eq!(v, 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_batched_matches_columns() {
        let mut solver = TridiagonalSolver::new(dirichlet_mass(6)).unwrap();
        let mut u = Array3::from_shape_fn((8, 2, 3), |(i, j, k)| (i + 3 * j + k) as f64);
        let mut columns: Vec<Array1<f64>> = (0..2)
            .flat_map(|j| (0..3).map(move |k| (j, k)))
            .map(|(j, k)| u.slice(s![.., j, k]).to_owned())
            .collect();

        solver.solve(&mut u).unwrap();
        for column in columns.iter_mut() {
            solver.solve(column).unwrap();
        }

        for (idx, column) in columns.iter().enumerate() {
            let (j, k) = (idx / 3, idx % 3);
            assert_eq!(u.slice(s![.., j, k]), column.view());
        }
    }
}
