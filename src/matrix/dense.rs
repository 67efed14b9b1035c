//! Dense-matrix API on top of faer.
//!
//! Any `faer::Mat<T>` already satisfies the solver's `MatVec` + `MatShape`
//! seam (see `core::wrappers`); this module adds a construction helper for
//! callers holding raw column-major storage.

use crate::core::traits::{MatShape, MatVec};
use faer::Mat;
use num_traits::Float;

/// Dense coefficient matrices the solver can consume directly.
pub trait DenseMatrix<T>: MatVec<T> + MatShape {
    /// Construct from raw column-major storage.
    fn from_raw(nrows: usize, ncols: usize, data: Vec<T>) -> Self;
}

impl<T: Float> DenseMatrix<T> for Mat<T> {
    fn from_raw(nrows: usize, ncols: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), nrows * ncols, "storage length mismatch");
        Mat::from_fn(nrows, ncols, |i, j| data[j * nrows + i])
    }
}
