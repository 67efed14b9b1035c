//! End-to-end tests for the restarted GMRES solver.
//!
//! Fixtures: sparse identities, the 100×100 Poisson 5-point-stencil matrix,
//! a deterministic tridiagonal regression system, and random
//! diagonally-shifted dense systems cross-checked against faer's direct QR
//! solver.

use approx::assert_abs_diff_eq;
use faer::Mat;
use gmres::config::Orthogonalization;
use gmres::core::traits::MatVec;
use gmres::matrix::CsrMatrix;
use gmres::solver::GmresSolver;
use rand::Rng;

const EPSILON: f64 = 1e-10;

/// 5-point-stencil Poisson matrix on a 10×10 grid: diagonal 4, −1 at
/// distance 1 and at distance equal to the grid width.
fn poisson_100() -> CsrMatrix<f64> {
    const GRID: usize = 10;
    let n = GRID * GRID;
    let mut triplets = Vec::new();
    for i in 0..n {
        if i >= GRID {
            triplets.push((i, i - GRID, -1.0));
        }
        if i >= 1 {
            triplets.push((i, i - 1, -1.0));
        }
        triplets.push((i, i, 4.0));
        if i + 1 < n {
            triplets.push((i, i + 1, -1.0));
        }
        if i + GRID < n {
            triplets.push((i, i + GRID, -1.0));
        }
    }
    CsrMatrix::from_triplets(n, n, &triplets)
}

/// Order-11 tridiagonal system with distinct eigenvalues and a full-grade
/// right-hand side; GMRES terminates at exactly n = 11 steps on it.
fn tridiagonal_11() -> (CsrMatrix<f64>, Vec<f64>) {
    let n = 11;
    let mut triplets = Vec::new();
    for i in 0..n {
        triplets.push((i, i, (i + 2) as f64));
        if i + 1 < n {
            triplets.push((i, i + 1, 0.5));
            triplets.push((i + 1, i, 0.5));
        }
    }
    let a = CsrMatrix::from_triplets(n, n, &triplets);
    let ones = vec![1.0; n];
    let mut b = vec![0.0; n];
    a.matvec(&ones, &mut b);
    (a, b)
}

fn check_solution(a: &impl MatVec<f64>, b: &[f64], x: &[f64], tol: f64) {
    assert_eq!(x.len(), b.len());
    let mut ax = vec![0.0; b.len()];
    a.matvec(x, &mut ax);
    for (axi, bi) in ax.iter().zip(b) {
        assert_abs_diff_eq!(axi, bi, epsilon = tol);
    }
}

#[test]
fn solves_sparse_identity() {
    let n = 100;
    let row_ptr: Vec<usize> = (0..=n).collect();
    let col_idx: Vec<usize> = (0..n).collect();
    let a = CsrMatrix::from_csr(n, n, row_ptr, col_idx, vec![1.0; n]);
    let b = vec![1.0; n];
    let solver = GmresSolver::new()
        .with_max_inner(100)
        .with_max_outer(100)
        .with_epsilon(EPSILON);
    let result = solver.solve(&a, &b).unwrap();
    assert!(result.is_converged);
    assert!(result.inner_iterations <= 1);
    check_solution(&a, &b, &result.x, 2.0 * EPSILON);
}

#[test]
fn solves_scaled_identity() {
    let n = 100;
    let row_ptr: Vec<usize> = (0..=n).collect();
    let col_idx: Vec<usize> = (0..n).collect();
    let a = CsrMatrix::from_csr(n, n, row_ptr, col_idx, vec![std::f64::consts::PI; n]);
    let b = vec![1.0; n];
    let solver = GmresSolver::new()
        .with_max_inner(100)
        .with_max_outer(100)
        .with_epsilon(EPSILON);
    let result = solver.solve(&a, &b).unwrap();
    assert!(result.is_converged);
    assert!(result.inner_iterations <= 1);
    check_solution(&a, &b, &result.x, 2.0 * EPSILON);
}

#[test]
fn solves_poisson_system() {
    let a = poisson_100();
    let b = vec![1.0; 100];
    let solver = GmresSolver::new()
        .with_max_inner(100)
        .with_max_outer(100)
        .with_epsilon(EPSILON);
    let result = solver.solve(&a, &b).unwrap();
    assert!(result.is_converged);
    check_solution(&a, &b, &result.x, 2.0 * EPSILON);
}

#[test]
fn tridiagonal_regression_iteration_count() {
    let (a, b) = tridiagonal_11();
    // maxInner 15 clamps to the order 11; the system needs the full Krylov
    // space, so the solve lands on exactly 11 inner steps of restart 0.
    let solver = GmresSolver::new().with_max_inner(15).with_max_outer(1);
    let result = solver.solve(&a, &b).unwrap();
    assert!(result.is_converged);
    assert_eq!(result.outer_iterations, 0);
    assert_eq!(result.inner_iterations, 11);
    for xi in &result.x {
        assert_abs_diff_eq!(*xi, 1.0, epsilon = gmres::config::DEFAULT_EPSILON);
    }
}

#[test]
fn resolving_from_solution_takes_no_steps() {
    let (a, b) = tridiagonal_11();
    let solver = GmresSolver::new().with_max_inner(15).with_max_outer(1);
    let first = solver.solve(&a, &b).unwrap();
    assert!(first.is_converged);

    let again = GmresSolver::new()
        .solve_with_guess(&a, &b, &first.x)
        .unwrap();
    assert!(again.is_converged);
    assert_eq!(again.outer_iterations, 0);
    assert_eq!(again.inner_iterations, 0);
    assert_eq!(again.errors.len(), 1);
}

#[test]
fn error_trace_is_mostly_non_increasing() {
    let a = poisson_100();
    let b = vec![1.0; 100];
    let solver = GmresSolver::new()
        .with_max_inner(30)
        .with_max_outer(10)
        .with_epsilon(1e-8);
    let result = solver.solve(&a, &b).unwrap();
    assert!(result.is_converged);
    assert!(result.errors.len() >= 2);
    let non_increasing = result
        .errors
        .windows(2)
        .filter(|w| w[1] <= w[0])
        .count();
    let fraction = non_increasing as f64 / (result.errors.len() - 1) as f64;
    // Soft statistical property, not a hard invariant.
    assert!(
        fraction >= 0.9,
        "only {:.0}% of consecutive errors were non-increasing",
        fraction * 100.0
    );
}

#[test]
fn classical_orthogonalization_solves_poisson() {
    let a = poisson_100();
    let b = vec![1.0; 100];
    let solver = GmresSolver::new()
        .with_max_inner(100)
        .with_max_outer(100)
        .with_epsilon(EPSILON)
        .with_orthogonalization(Orthogonalization::ClassicalGramSchmidt)
        .with_threads(4);
    let result = solver.solve(&a, &b).unwrap();
    assert!(result.is_converged);
    check_solution(&a, &b, &result.x, 2.0 * EPSILON);
}

/// Random diagonally-shifted dense systems, cross-checked against faer's
/// direct QR solve.
#[test]
fn random_dense_matches_direct_qr() {
    let mut rng = rand::thread_rng();
    for n in [4usize, 8] {
        let data: Vec<f64> = (0..n * n).map(|_| rng.r#gen()).collect();
        let shift = n as f64;
        let a = Mat::from_fn(n, n, |i, j| {
            data[j * n + i] + if i == j { shift } else { 0.0 }
        });
        let b: Vec<f64> = (0..n).map(|_| rng.r#gen()).collect();

        let solver = GmresSolver::new().with_epsilon(EPSILON);
        let result = solver.solve(&a, &b).unwrap();
        assert!(result.is_converged, "GMRES did not converge for n = {n}");

        let mut x_direct = b.clone();
        let qr = faer::linalg::solvers::Qr::new(a.as_ref());
        let x_mat = faer::MatMut::from_column_major_slice_mut(&mut x_direct, n, 1);
        use faer::linalg::solvers::SolveCore;
        qr.solve_in_place_with_conj(faer::Conj::No, x_mat);

        for i in 0..n {
            assert_abs_diff_eq!(result.x[i], x_direct[i], epsilon = 1e-6);
        }
    }
}
