//! gmres: restarted GMRES for dense and sparse linear systems
//!
//! This crate solves A·x = b iteratively for square, possibly non-symmetric
//! systems via the restarted Generalized Minimal Residual method: an Arnoldi
//! process builds an orthonormal Krylov basis while Givens rotations maintain
//! a QR factorization of the Hessenberg matrix column by column, so the
//! residual norm is tracked per step and the least-squares solution is
//! reconstructed on exit.
//!
//! Matrices are consumed through the [`core::traits::MatVec`] /
//! [`core::traits::MatShape`] seam; impls ship for `faer::Mat` and an owned
//! CSR type.
//!
//! ```
//! use faer::Mat;
//! use gmres::GmresSolver;
//!
//! let a = Mat::<f64>::identity(4, 4);
//! let b = vec![1.0, 2.0, 3.0, 4.0];
//! let result = GmresSolver::new().solve(&a, &b).unwrap();
//! assert!(result.is_converged);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod matrix;
pub mod parallel;
pub mod solver;

// Re-exports for convenience
pub use config::*;
pub use core::*;
pub use error::*;
pub use matrix::*;
pub use parallel::*;
pub use solver::*;
