//! Compressed sparse row (CSR) matrix with y = A x.

use crate::core::traits::{MatShape, MatVec};
use num_traits::Float;

/// An owned, read-only CSR matrix.
pub struct CsrMatrix<T> {
    nrows: usize,
    ncols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<T>,
}

impl<T: Float> CsrMatrix<T> {
    /// Build a CSR matrix from raw row-pointer, column-index, and value
    /// arrays. `row_ptr` must have `nrows + 1` entries with
    /// `row_ptr[nrows] == values.len()`.
    pub fn from_csr(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        assert_eq!(row_ptr.len(), nrows + 1, "row_ptr length mismatch");
        assert_eq!(col_idx.len(), values.len(), "col_idx/values length mismatch");
        assert_eq!(row_ptr[nrows], values.len(), "row_ptr terminator mismatch");
        debug_assert!(col_idx.iter().all(|&j| j < ncols));
        Self { nrows, ncols, row_ptr, col_idx, values }
    }

    /// Build a CSR matrix from (row, col, value) triplets. Duplicate
    /// positions are kept as-is and sum during `matvec`.
    pub fn from_triplets(nrows: usize, ncols: usize, triplets: &[(usize, usize, T)]) -> Self {
        let mut entries = triplets.to_vec();
        entries.sort_by_key(|&(i, j, _)| (i, j));
        let mut row_ptr = vec![0usize; nrows + 1];
        let mut col_idx = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());
        for &(i, j, v) in &entries {
            assert!(i < nrows && j < ncols, "triplet ({i}, {j}) out of bounds");
            row_ptr[i + 1] += 1;
            col_idx.push(j);
            values.push(v);
        }
        for i in 0..nrows {
            row_ptr[i + 1] += row_ptr[i];
        }
        Self { nrows, ncols, row_ptr, col_idx, values }
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }
}

impl<T: Float> MatVec<T> for CsrMatrix<T> {
    fn matvec(&self, x: &[T], y: &mut [T]) {
        assert_eq!(x.len(), self.ncols, "input vector x has incorrect length");
        assert_eq!(y.len(), self.nrows, "output vector y has incorrect length");
        for (i, yi) in y.iter_mut().enumerate() {
            let range = self.row_ptr[i]..self.row_ptr[i + 1];
            *yi = self.col_idx[range.clone()]
                .iter()
                .zip(&self.values[range])
                .fold(T::zero(), |acc, (&j, &v)| acc + v * x[j]);
        }
    }
}

impl<T> MatShape for CsrMatrix<T> {
    fn nrows(&self) -> usize {
        self.nrows
    }
    fn ncols(&self) -> usize {
        self.ncols
    }
}
