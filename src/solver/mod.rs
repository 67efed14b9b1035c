//! Solver interface: the restarted GMRES driver and its result record.

use crate::error::Breakdown;

/// Immutable record of a finished solve.
///
/// Built once when the outer loop exits; `errors` concatenates the relative
/// residual traces of every restart in chronological order, including each
/// restart's pre-step error.
#[derive(Clone, Debug)]
pub struct GmresResult<T> {
    /// Final approximate solution.
    pub x: Vec<T>,
    /// Whether the relative residual reached the tolerance.
    pub is_converged: bool,
    /// 0-based restart index at convergence, or the restart budget if the
    /// solve did not converge.
    pub outer_iterations: usize,
    /// Inner steps taken by the last restart.
    pub inner_iterations: usize,
    /// Relative residual norm after each inner step, across all restarts.
    pub errors: Vec<T>,
    /// Set when the solve ended on a numeric degeneracy; `x` is then the
    /// best solution available up to that point.
    pub breakdown: Option<Breakdown>,
}

pub mod rotation;
pub use rotation::Rotation;

pub mod gmres;
pub use gmres::GmresSolver;
