//! Shared helpers for the integration tests: a dense LU reference solver and
//! generators for well-conditioned even-offset bands.

#![allow(dead_code)]

use math_audio_banded::SymmetricBandedMatrix;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Solve A x = b with LU decomposition and partial pivoting
pub fn dense_solve(a: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "Matrix must be square");
    assert_eq!(n, b.len(), "Right-hand side size mismatch");

    let mut lu = a.clone();
    let mut x = b.clone();

    for k in 0..n {
        // Find pivot
        let mut max_row = k;
        for i in (k + 1)..n {
            if lu[[i, k]].abs() > lu[[max_row, k]].abs() {
                max_row = i;
            }
        }
        assert!(lu[[max_row, k]].abs() > 1e-30, "Matrix is singular");

        if max_row != k {
            for j in 0..n {
                lu.swap([k, j], [max_row, j]);
            }
            x.swap(k, max_row);
        }

        let pivot = lu[[k, k]];
        for i in (k + 1)..n {
            let mult = lu[[i, k]] / pivot;
            for j in (k + 1)..n {
                lu[[i, j]] -= mult * lu[[k, j]];
            }
            x[i] -= mult * x[k];
        }
    }

    for i in (0..n).rev() {
        for j in (i + 1)..n {
            x[i] -= lu[[i, j]] * x[j];
        }
        x[i] /= lu[[i, i]];
    }
    x
}

/// Seeded generator so failures are reproducible
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Random vector with entries in [-1, 1)
pub fn random_vector(rng: &mut StdRng, n: usize) -> Array1<f64> {
    Array1::from_iter((0..n).map(|_| rng.random_range(-1.0..1.0)))
}

/// Random strictly diagonally dominant tridiagonal band
pub fn random_tridiagonal(rng: &mut StdRng, n: usize) -> SymmetricBandedMatrix<f64> {
    let upper = random_vector(rng, n - 2);
    let main = Array1::from_iter((0..n).map(|i| {
        let left = if i >= 2 { upper[i - 2].abs() } else { 0.0 };
        let right = if i + 2 < n { upper[i].abs() } else { 0.0 };
        left + right + rng.random_range(0.5..2.0)
    }));
    SymmetricBandedMatrix::tridiagonal(main, upper).expect("valid tridiagonal band")
}

/// Random strictly diagonally dominant pentadiagonal band
pub fn random_pentadiagonal(rng: &mut StdRng, n: usize) -> SymmetricBandedMatrix<f64> {
    let upper2 = random_vector(rng, n - 2);
    let upper4 = random_vector(rng, n - 4);
    let main = Array1::from_iter((0..n).map(|i| {
        let mut off = 0.0;
        if i >= 2 {
            off += upper2[i - 2].abs();
        }
        if i + 2 < n {
            off += upper2[i].abs();
        }
        if i >= 4 {
            off += upper4[i - 4].abs();
        }
        if i + 4 < n {
            off += upper4[i].abs();
        }
        off + rng.random_range(0.5..2.0)
    }));
    SymmetricBandedMatrix::pentadiagonal(main, upper2, upper4).expect("valid pentadiagonal band")
}

/// Largest absolute difference between two vectors
pub fn max_abs_diff(a: &Array1<f64>, b: &Array1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
