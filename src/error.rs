use thiserror::Error;

// Error types for the gmres crate.
//
// `GmresError` covers caller mistakes caught before any iteration runs.
// `Breakdown` names the numeric degeneracies GMRES can hit mid-cycle; those
// are reported on the result record rather than returned as `Err`, since the
// solver still produces a best-effort solution.

#[derive(Error, Debug)]
pub enum GmresError {
    #[error("coefficient matrix must be square (got {rows}x{cols})")]
    NotSquare { rows: usize, cols: usize },
    #[error("matrix dimension {matrix} does not match vector length {vector}")]
    DimensionMismatch { matrix: usize, vector: usize },
    #[error("tolerance must be positive")]
    NonPositiveTolerance,
}

/// Degenerate conditions that end an inner cycle early.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakdown {
    #[error("zero Arnoldi norm at step {step} (invariant Krylov subspace)")]
    ZeroArnoldiNorm { step: usize },
    #[error("singular triangular system (zero diagonal at row {row})")]
    SingularTriangular { row: usize },
}
