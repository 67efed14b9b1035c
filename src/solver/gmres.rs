//! Generalized Minimal Residual method with fixed restart (Saad §6.4).
//!
//! Solves A·x = b for square, possibly non-symmetric A by minimizing the
//! residual over a Krylov subspace of bounded dimension, restarting from the
//! best solution when the subspace fills up. Each inner step runs one Arnoldi
//! iteration and folds the new Hessenberg column into an incrementally
//! maintained QR factorization via Givens rotations, so the residual norm is
//! available after every step without solving the least-squares problem.
//!
//! # Orthogonalization
//! The default is sequential modified Gram-Schmidt. Classical Gram-Schmidt is
//! available as an opt-in: all projection coefficients are computed against
//! the unmodified candidate vector (a read-only parallel fan-out over the
//! basis), then subtracted in one sequential pass. The classical variant is
//! parallel-safe but slightly less numerically stable.
//!
//! # References
//! - Saad, Y. (2003). Iterative Methods for Sparse Linear Systems, 2nd
//!   Edition. SIAM. §6.4
//! - https://en.wikipedia.org/wiki/Generalized_minimal_residual_method

use crate::config::{Orthogonalization, SolveConfig, SolveOptions};
use crate::core::traits::{InnerProduct, MatShape, MatVec};
use crate::error::{Breakdown, GmresError};
use crate::parallel::Workers;
use crate::solver::GmresResult;
use crate::solver::rotation::Rotation;
use num_traits::Float;

/// Restarted GMRES solver.
///
/// # Type Parameters
/// * `T` - Scalar type (e.g., f32, f64)
#[derive(Clone, Debug)]
pub struct GmresSolver<T> {
    /// Solve parameters; budgets are resolved against the system order when
    /// `solve` is called.
    pub options: SolveOptions<T>,
}

impl<T: Float> Default for GmresSolver<T> {
    fn default() -> Self {
        Self { options: SolveOptions::default() }
    }
}

impl<T: Float + Send + Sync> GmresSolver<T> {
    /// Create a solver with default options (derived budgets, tolerance
    /// 1e-6, sequential modified Gram-Schmidt).
    pub fn new() -> Self {
        Self { options: SolveOptions::default() }
    }

    /// Set the Krylov steps per restart (clamped to the system order).
    pub fn with_max_inner(mut self, max_inner: usize) -> Self {
        self.options.max_inner = Some(max_inner);
        self
    }

    /// Set the restart budget.
    pub fn with_max_outer(mut self, max_outer: usize) -> Self {
        self.options.max_outer = Some(max_outer);
        self
    }

    /// Set the relative residual tolerance.
    pub fn with_epsilon(mut self, epsilon: T) -> Self {
        self.options.epsilon = epsilon;
        self
    }

    /// Select the orthogonalization strategy.
    pub fn with_orthogonalization(mut self, orthogonalization: Orthogonalization) -> Self {
        self.options.orthogonalization = orthogonalization;
        self
    }

    /// Bound the worker count for the classical Gram-Schmidt fan-out.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.options.threads = Some(threads);
        self
    }

    /// Solve A·x = b from a zero initial guess.
    pub fn solve<M>(&self, a: &M, b: &[T]) -> Result<GmresResult<T>, GmresError>
    where
        M: MatVec<T> + MatShape,
    {
        let x0 = vec![T::zero(); b.len()];
        self.solve_with_guess(a, b, &x0)
    }

    /// Solve A·x = b starting from `x0`.
    ///
    /// Runs up to `max_outer` restarts of at most `max_inner` Arnoldi steps
    /// each, reseeding every restart with the best solution so far. Returns
    /// `Err` only for invalid arguments; numeric degeneracies are reported
    /// through [`GmresResult::breakdown`] together with the best available
    /// solution.
    pub fn solve_with_guess<M>(
        &self,
        a: &M,
        b: &[T],
        x0: &[T],
    ) -> Result<GmresResult<T>, GmresError>
    where
        M: MatVec<T> + MatShape,
    {
        validate(a, b, x0, self.options.epsilon)?;
        let config = self.options.resolve(b.len());
        let workers = match self.options.orthogonalization {
            Orthogonalization::ClassicalGramSchmidt => Workers::new(self.options.threads),
            Orthogonalization::ModifiedGramSchmidt => Workers::serial(),
        };

        let mut x = x0.to_vec();
        let mut errors = Vec::new();
        for outer in 0..config.max_outer {
            log::debug!(
                "restart {outer}: inner budget {}, {} worker(s)",
                config.max_inner,
                workers.threads()
            );
            let cycle = inner_cycle(
                a,
                b,
                &x,
                &config,
                self.options.epsilon,
                self.options.orthogonalization,
                &workers,
            );
            x = cycle.x;
            errors.extend(cycle.errors);

            if cycle.converged {
                return Ok(GmresResult {
                    x,
                    is_converged: true,
                    outer_iterations: outer,
                    inner_iterations: cycle.steps,
                    errors,
                    breakdown: None,
                });
            }
            if let Some(breakdown) = cycle.breakdown {
                log::warn!("GMRES stopped during restart {outer}: {breakdown}");
                return Ok(GmresResult {
                    x,
                    is_converged: false,
                    outer_iterations: outer,
                    inner_iterations: cycle.steps,
                    errors,
                    breakdown: Some(breakdown),
                });
            }
        }
        Ok(GmresResult {
            x,
            is_converged: false,
            outer_iterations: config.max_outer,
            inner_iterations: config.max_inner,
            errors,
            breakdown: None,
        })
    }
}

/// Outcome of one restart cycle.
struct InnerCycle<T> {
    x: Vec<T>,
    converged: bool,
    steps: usize,
    errors: Vec<T>,
    breakdown: Option<Breakdown>,
}

/// Run up to `max_inner` Arnoldi/QR steps from `x0`.
///
/// The Krylov basis, Hessenberg columns, rotations, and projected residual
/// are allocated fresh per cycle and dropped on return; only the solution
/// and the error trace outlive it.
fn inner_cycle<M, T>(
    a: &M,
    b: &[T],
    x0: &[T],
    config: &SolveConfig,
    epsilon: T,
    orthogonalization: Orthogonalization,
    workers: &Workers,
) -> InnerCycle<T>
where
    M: MatVec<T>,
    T: Float + Send + Sync,
{
    let ip = ();
    let m = config.max_inner;

    let r0 = residual(a, b, x0);
    let r0_norm = ip.norm(&r0);
    // Relative error scale; a zero right-hand side falls back to the
    // absolute residual norm.
    let b_norm = ip.norm(b);
    let scale = if b_norm > T::zero() { b_norm } else { T::one() };

    let mut errors = vec![r0_norm / scale];
    if errors[0] <= epsilon {
        // Converged at step 0: the start vector already satisfies the
        // tolerance.
        return InnerCycle {
            x: x0.to_vec(),
            converged: true,
            steps: 0,
            errors,
            breakdown: None,
        };
    }

    let mut basis: Vec<Vec<T>> = Vec::with_capacity(m + 1);
    basis.push(r0.iter().map(|&ri| ri / r0_norm).collect());
    let mut h_columns: Vec<Vec<T>> = Vec::with_capacity(m);
    let mut rotations: Vec<Rotation<T>> = Vec::with_capacity(m);
    let mut beta = vec![T::zero(); m + 1];
    beta[0] = r0_norm;

    for k in 0..m {
        let (mut h, next_basis_vector) =
            arnoldi_step(a, &basis, orthogonalization, workers);
        let rotation = apply_rotations(&mut h, &rotations);
        rotations.push(rotation);
        h_columns.push(h);

        beta[k + 1] = -rotation.sin * beta[k];
        beta[k] = rotation.cos * beta[k];
        let error = beta[k + 1].abs() / scale;
        errors.push(error);

        if error <= epsilon {
            return match solution(x0, &basis, &h_columns, &beta, k + 1) {
                Ok(x) => InnerCycle {
                    x,
                    converged: true,
                    steps: k + 1,
                    errors,
                    breakdown: None,
                },
                Err(breakdown) => InnerCycle {
                    x: x0.to_vec(),
                    converged: false,
                    steps: k + 1,
                    errors,
                    breakdown: Some(breakdown),
                },
            };
        }

        match next_basis_vector {
            Some(q) => basis.push(q),
            None => {
                // The Krylov subspace stopped growing without reaching the
                // tolerance; report the best solution the completed steps
                // can produce.
                let x = solution(x0, &basis, &h_columns, &beta, k + 1)
                    .unwrap_or_else(|_| x0.to_vec());
                return InnerCycle {
                    x,
                    converged: false,
                    steps: k + 1,
                    errors,
                    breakdown: Some(Breakdown::ZeroArnoldiNorm { step: k }),
                };
            }
        }
    }

    match solution(x0, &basis, &h_columns, &beta, m) {
        Ok(x) => InnerCycle {
            x,
            converged: false,
            steps: m,
            errors,
            breakdown: None,
        },
        Err(breakdown) => InnerCycle {
            x: x0.to_vec(),
            converged: false,
            steps: m,
            errors,
            breakdown: Some(breakdown),
        },
    }
}

/// Compute r = b − A·x.
fn residual<M, T>(a: &M, b: &[T], x: &[T]) -> Vec<T>
where
    M: MatVec<T>,
    T: Float,
{
    let mut ax = vec![T::zero(); b.len()];
    a.matvec(x, &mut ax);
    ax.iter().zip(b).map(|(&axi, &bi)| bi - axi).collect()
}

/// One Arnoldi iteration against the current basis.
///
/// Returns the Hessenberg column (length `basis.len() + 1`, last entry the
/// post-orthogonalization norm) and the normalized new basis vector, or
/// `None` for the vector when the norm is numerically zero — the caller
/// decides whether that is exact convergence or a breakdown.
fn arnoldi_step<M, T>(
    a: &M,
    basis: &[Vec<T>],
    orthogonalization: Orthogonalization,
    workers: &Workers,
) -> (Vec<T>, Option<Vec<T>>)
where
    M: MatVec<T>,
    T: Float + Send + Sync,
{
    let ip = ();
    let k = basis.len();
    let mut q = vec![T::zero(); basis[0].len()];
    a.matvec(&basis[k - 1], &mut q);

    let mut h = vec![T::zero(); k + 1];
    match orthogonalization {
        Orthogonalization::ModifiedGramSchmidt => {
            for (hi, v) in h[..k].iter_mut().zip(basis) {
                *hi = ip.dot(&q, v);
                for (qj, &vj) in q.iter_mut().zip(v) {
                    *qj = *qj - *hi * vj;
                }
            }
        }
        Orthogonalization::ClassicalGramSchmidt => {
            // Every coefficient is taken against the unmodified q, so the
            // dot products are a read-only fan-out; the subtraction is a
            // single sequential pass once all of them are known.
            let coefficients = projection_coefficients(&q, basis, workers);
            h[..k].copy_from_slice(&coefficients);
            for (&hi, v) in coefficients.iter().zip(basis) {
                for (qj, &vj) in q.iter_mut().zip(v) {
                    *qj = *qj - hi * vj;
                }
            }
        }
    }

    let q_norm = ip.norm(&q);
    h[k] = q_norm;
    if q_norm <= T::epsilon() {
        return (h, None);
    }
    for qj in q.iter_mut() {
        *qj = *qj / q_norm;
    }
    (h, Some(q))
}

#[cfg(feature = "rayon")]
fn projection_coefficients<T: Float + Send + Sync>(
    q: &[T],
    basis: &[Vec<T>],
    workers: &Workers,
) -> Vec<T> {
    use rayon::prelude::*;
    let ip = ();
    workers.install(|| basis.par_iter().map(|v| ip.dot(q, v)).collect())
}

#[cfg(not(feature = "rayon"))]
fn projection_coefficients<T: Float>(q: &[T], basis: &[Vec<T>], _workers: &Workers) -> Vec<T> {
    let ip = ();
    basis.iter().map(|v| ip.dot(q, v)).collect()
}

/// Fold a new Hessenberg column into the QR factorization.
///
/// Applies the accumulated rotations in order, then derives the rotation
/// that eliminates the sub-diagonal entry. The column's last entry is forced
/// to exactly zero.
fn apply_rotations<T: Float>(h: &mut [T], rotations: &[Rotation<T>]) -> Rotation<T> {
    for (i, rotation) in rotations.iter().enumerate() {
        let (hi, hi1) = rotation.apply(h[i], h[i + 1]);
        h[i] = hi;
        h[i + 1] = hi1;
    }
    let k = rotations.len();
    let rotation = Rotation::zeroing(h[k], h[k + 1]);
    h[k] = rotation.cos * h[k] + rotation.sin * h[k + 1];
    h[k + 1] = T::zero();
    rotation
}

/// Reconstruct x = x0 + Q·y from the factored least-squares system.
fn solution<T: Float>(
    x0: &[T],
    basis: &[Vec<T>],
    h_columns: &[Vec<T>],
    beta: &[T],
    k: usize,
) -> Result<Vec<T>, Breakdown> {
    let y = back_substitute(h_columns, beta, k)?;
    let mut x = x0.to_vec();
    for (&yj, v) in y.iter().zip(basis) {
        for (xi, &vi) in x.iter_mut().zip(v) {
            *xi = *xi + yj * vi;
        }
    }
    Ok(x)
}

/// Solve the k×k upper-triangular system H·y = beta by back-substitution.
///
/// `h_columns[j]` holds Hessenberg column j after rotations, so the (i, j)
/// triangle entry is `h_columns[j][i]`.
fn back_substitute<T: Float>(
    h_columns: &[Vec<T>],
    beta: &[T],
    k: usize,
) -> Result<Vec<T>, Breakdown> {
    let mut y = vec![T::zero(); k];
    for i in (0..k).rev() {
        let mut sum = beta[i];
        for j in (i + 1)..k {
            sum = sum - h_columns[j][i] * y[j];
        }
        let pivot = h_columns[i][i];
        if pivot.abs() <= T::epsilon() {
            return Err(Breakdown::SingularTriangular { row: i });
        }
        y[i] = sum / pivot;
    }
    Ok(y)
}

fn validate<M: MatShape, T: Float>(
    a: &M,
    b: &[T],
    x0: &[T],
    epsilon: T,
) -> Result<(), GmresError> {
    if a.nrows() != a.ncols() {
        return Err(GmresError::NotSquare { rows: a.nrows(), cols: a.ncols() });
    }
    if a.nrows() != b.len() {
        return Err(GmresError::DimensionMismatch { matrix: a.nrows(), vector: b.len() });
    }
    if x0.len() != b.len() {
        return Err(GmresError::DimensionMismatch { matrix: a.nrows(), vector: x0.len() });
    }
    if epsilon.is_nan() || epsilon <= T::zero() {
        return Err(GmresError::NonPositiveTolerance);
    }
    Ok(())
}
