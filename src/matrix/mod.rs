//! Matrix module: dense and sparse coefficient-matrix types.

pub mod dense;
pub use dense::DenseMatrix;
pub mod sparse;
pub use sparse::CsrMatrix;
