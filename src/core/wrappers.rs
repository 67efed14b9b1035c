//! Trait impls for faer dense matrices and slice-backed vectors.
//!
//! These wrappers let `faer::Mat` and plain `Vec<T>`/slices flow through the
//! generic solver. Dot products and norms are sequential on purpose: the
//! solver's only parallelism is the orthogonalization fan-out in the Arnoldi
//! step, which keeps reductions deterministic (see `solver::gmres`).

use crate::core::traits::{InnerProduct, MatShape, MatVec};
use faer::{Mat, MatRef};
use num_traits::Float;

/// Dense matrix-vector product, iterating column-major to match faer's
/// storage layout.
impl<'a, T: Float> MatVec<T> for MatRef<'a, T> {
    fn matvec(&self, x: &[T], y: &mut [T]) {
        assert_eq!(self.ncols(), x.len(), "input vector x has incorrect length");
        assert_eq!(self.nrows(), y.len(), "output vector y has incorrect length");
        y.fill(T::zero());
        for (j, &xj) in x.iter().enumerate() {
            for (i, yi) in y.iter_mut().enumerate() {
                *yi = *yi + self[(i, j)] * xj;
            }
        }
    }
}

impl<T: Float> MatVec<T> for Mat<T> {
    fn matvec(&self, x: &[T], y: &mut [T]) {
        self.as_ref().matvec(x, y);
    }
}

impl<'a, T> MatShape for MatRef<'a, T> {
    fn nrows(&self) -> usize {
        (*self).nrows()
    }
    fn ncols(&self) -> usize {
        (*self).ncols()
    }
}

impl<T> MatShape for Mat<T> {
    fn nrows(&self) -> usize {
        (*self).nrows()
    }
    fn ncols(&self) -> usize {
        (*self).ncols()
    }
}

/// Sequential inner product and Euclidean norm for slices.
impl<T: Float> InnerProduct<T> for () {
    fn dot(&self, x: &[T], y: &[T]) -> T {
        assert_eq!(x.len(), y.len(), "vectors must have the same length");
        x.iter()
            .zip(y)
            .fold(T::zero(), |acc, (&xi, &yi)| acc + xi * yi)
    }

    fn norm(&self, x: &[T]) -> T {
        x.iter().fold(T::zero(), |acc, &xi| acc + xi * xi).sqrt()
    }
}
