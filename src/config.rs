//! Solver options and iteration-budget resolution.
//!
//! The optional inner/outer budgets are resolved once, before any iteration
//! runs, by the pure functions [`resolve_max_inner`] and
//! [`resolve_max_outer`]. Caller-supplied values are clamped by the same
//! rules as the derived defaults (an inner budget can never exceed the
//! system order).

use num_traits::Float;

/// Default convergence threshold (relative residual norm).
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Orthogonalization strategy for the Arnoldi step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Orthogonalization {
    /// Sequential modified Gram-Schmidt: each subtraction sees the result of
    /// the previous one. Deterministic; ignores the worker pool.
    #[default]
    ModifiedGramSchmidt,
    /// Classical Gram-Schmidt: all projection coefficients are computed
    /// against the unmodified vector (a read-only fan-out that may run on
    /// the worker pool), then subtracted in a single sequential pass.
    /// Slightly less stable than the modified variant.
    ClassicalGramSchmidt,
}

/// Requested solver parameters, before budget resolution.
#[derive(Clone, Debug)]
pub struct SolveOptions<T> {
    /// Krylov steps per restart; `None` derives `min(n, 10)`.
    pub max_inner: Option<usize>,
    /// Restart budget; `None` derives `min(n / max_inner, 10)`.
    pub max_outer: Option<usize>,
    /// Relative residual threshold.
    pub epsilon: T,
    /// Arnoldi orthogonalization strategy.
    pub orthogonalization: Orthogonalization,
    /// Worker threads for the classical fan-out; `None` sizes the pool by
    /// the available CPUs.
    pub threads: Option<usize>,
}

impl<T: Float> Default for SolveOptions<T> {
    fn default() -> Self {
        Self {
            max_inner: None,
            max_outer: None,
            epsilon: num_traits::cast(DEFAULT_EPSILON).unwrap(),
            orthogonalization: Orthogonalization::default(),
            threads: None,
        }
    }
}

/// Iteration budgets after resolution against the system order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SolveConfig {
    pub max_inner: usize,
    pub max_outer: usize,
}

/// Inner budget: requested or `min(n, 10)`, clamped to `[1, n]`.
pub fn resolve_max_inner(requested: Option<usize>, n: usize) -> usize {
    requested.unwrap_or_else(|| n.min(10)).clamp(1, n.max(1))
}

/// Outer budget: requested or `min(n / max_inner, 10)`, at least 1.
pub fn resolve_max_outer(requested: Option<usize>, n: usize, max_inner: usize) -> usize {
    requested.unwrap_or_else(|| (n / max_inner).min(10)).max(1)
}

impl<T: Float> SolveOptions<T> {
    /// Resolve the optional budgets against the system order `n`.
    pub fn resolve(&self, n: usize) -> SolveConfig {
        let max_inner = resolve_max_inner(self.max_inner, n);
        let max_outer = resolve_max_outer(self.max_outer, n, max_inner);
        SolveConfig { max_inner, max_outer }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_defaults_to_ten_capped_by_order() {
        assert_eq!(resolve_max_inner(None, 100), 10);
        assert_eq!(resolve_max_inner(None, 7), 7);
        assert_eq!(resolve_max_inner(None, 1), 1);
    }

    #[test]
    fn inner_clamps_explicit_values() {
        assert_eq!(resolve_max_inner(Some(15), 11), 11);
        assert_eq!(resolve_max_inner(Some(0), 11), 1);
        assert_eq!(resolve_max_inner(Some(5), 11), 5);
    }

    #[test]
    fn outer_defaults_to_quotient_capped_by_ten() {
        assert_eq!(resolve_max_outer(None, 100, 10), 10);
        assert_eq!(resolve_max_outer(None, 200, 10), 10);
        assert_eq!(resolve_max_outer(None, 30, 10), 3);
        // quotient rounds to zero for small systems; floor at one restart
        assert_eq!(resolve_max_outer(None, 5, 5), 1);
    }

    #[test]
    fn outer_floors_explicit_values_at_one() {
        assert_eq!(resolve_max_outer(Some(0), 100, 10), 1);
        assert_eq!(resolve_max_outer(Some(4), 100, 10), 4);
    }

    #[test]
    fn options_resolve_together() {
        let opts = SolveOptions::<f64>::default();
        assert_eq!(
            opts.resolve(100),
            SolveConfig { max_inner: 10, max_outer: 10 }
        );
        let opts = SolveOptions::<f64> {
            max_inner: Some(15),
            max_outer: Some(1),
            ..Default::default()
        };
        assert_eq!(
            opts.resolve(11),
            SolveConfig { max_inner: 11, max_outer: 1 }
        );
    }
}
