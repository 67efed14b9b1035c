//! Core linear-algebra traits consumed by the solver.
//!
//! The solver sees the coefficient matrix only through [`MatVec`] and
//! [`MatShape`]; any matrix representation providing a matrix-vector
//! product can be handed to it.

/// Matrix–vector product: y ← A x.
pub trait MatVec<T> {
    /// Compute y = A · x. `x.len()` must equal the column count and
    /// `y.len()` the row count.
    fn matvec(&self, x: &[T], y: &mut [T]);
}

/// Matrix dimensions.
pub trait MatShape {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
}

/// Inner products & norms over dense vectors.
pub trait InnerProduct<T> {
    /// Compute dot(x, y).
    fn dot(&self, x: &[T], y: &[T]) -> T;
    /// Compute ‖x‖₂.
    fn norm(&self, x: &[T]) -> T;
}
