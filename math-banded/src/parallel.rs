//! Batched lane execution with feature-gated parallelism
//!
//! A batched right-hand side holds one independent system per position in
//! its two trailing axes. Each system is a lane along axis 0; lanes share no
//! mutable state, so they run in parallel with rayon when the `rayon` feature
//! is enabled and sequentially otherwise.

use ndarray::{ArrayViewMut1, ArrayViewMut3, Axis};

/// Check if parallel processing is available
#[cfg(feature = "rayon")]
pub fn is_parallel_available() -> bool {
    true
}

/// Check if parallel processing is available
#[cfg(not(feature = "rayon"))]
pub fn is_parallel_available() -> bool {
    false
}

/// Number of worker threads batched solves may use
#[cfg(feature = "rayon")]
pub fn num_threads() -> usize {
    rayon::current_num_threads()
}

/// Number of worker threads batched solves may use
#[cfg(not(feature = "rayon"))]
pub fn num_threads() -> usize {
    1
}

/// Apply `f` to every lane along axis 0 of `block`.
///
/// Lanes run in parallel when there are at least `min_batch` of them and
/// rayon is available. Returns whether the parallel path was taken.
#[cfg(feature = "rayon")]
pub fn for_each_system<T, F>(mut block: ArrayViewMut3<'_, T>, min_batch: usize, f: F) -> bool
where
    T: Send + Sync,
    F: Fn(ArrayViewMut1<'_, T>) + Sync + Send,
{
    use ndarray::Zip;

    let batch = block.len_of(Axis(1)) * block.len_of(Axis(2));
    if batch >= min_batch.max(2) {
        Zip::from(block.lanes_mut(Axis(0))).par_for_each(f);
        true
    } else {
        block.lanes_mut(Axis(0)).into_iter().for_each(f);
        false
    }
}

/// Apply `f` to every lane along axis 0 of `block` (sequential fallback)
#[cfg(not(feature = "rayon"))]
pub fn for_each_system<T, F>(mut block: ArrayViewMut3<'_, T>, _min_batch: usize, f: F) -> bool
where
    F: Fn(ArrayViewMut1<'_, T>),
{
    block.lanes_mut(Axis(0)).into_iter().for_each(f);
    false
}
