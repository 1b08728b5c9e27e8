//! Clarabel-backed QP solver
//!
//! Adapts the dense `QpProblem` form to clarabel's conic interface: the
//! equality rows map to a zero cone and the stacked `<=` rows to a
//! nonnegative cone.

use clarabel::algebra::CscMatrix;
use clarabel::solver::{
    DefaultSettings, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};
use ndarray::{s, Array1, Array2};

use crate::core::{Result, SvmError};
use crate::qp::{QpProblem, QpSolver};

/// Interior-point QP solver backed by the clarabel crate.
///
/// Progress output is disabled by default; the iteration cap bounds the
/// solve time for large problems.
#[derive(Debug, Clone)]
pub struct ClarabelSolver {
    max_iterations: u32,
    verbose: bool,
}

impl ClarabelSolver {
    /// Create a solver with default settings (silent, 200 iterations)
    pub fn new() -> Self {
        Self {
            max_iterations: 200,
            verbose: false,
        }
    }

    /// Set the iteration cap
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Enable or disable solver progress output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for ClarabelSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl QpSolver for ClarabelSolver {
    fn solve(&self, problem: &QpProblem) -> Result<Array1<f64>> {
        let n = problem.n_unknowns();
        let n_eq = problem.eq_coeffs.nrows();
        let n_ineq = problem.ineq_coeffs.nrows();

        // One stacked constraint matrix, equality rows first so each cone
        // covers a contiguous row block.
        let mut constraints = Array2::zeros((n_eq + n_ineq, n));
        constraints
            .slice_mut(s![..n_eq, ..])
            .assign(&problem.eq_coeffs);
        constraints
            .slice_mut(s![n_eq.., ..])
            .assign(&problem.ineq_coeffs);

        let mut bounds = Vec::with_capacity(n_eq + n_ineq);
        bounds.extend(problem.eq_bounds.iter().copied());
        bounds.extend(problem.ineq_bounds.iter().copied());

        let hessian = dense_to_csc(&problem.hessian);
        let constraints = dense_to_csc(&constraints);
        let linear = problem.linear.to_vec();
        let cones = [
            SupportedConeT::ZeroConeT(n_eq),
            SupportedConeT::NonnegativeConeT(n_ineq),
        ];

        let mut settings = DefaultSettings::default();
        settings.verbose = self.verbose;
        settings.max_iter = self.max_iterations;

        let mut solver = DefaultSolver::new(
            &hessian,
            &linear,
            &constraints,
            &bounds,
            &cones,
            settings,
        );
        solver.solve();

        match solver.solution.status {
            SolverStatus::Solved => Ok(Array1::from(solver.solution.x.clone())),
            status => Err(SvmError::NumericalError(format!(
                "solver finished with status {status:?}"
            ))),
        }
    }
}

/// Convert a dense matrix to compressed sparse column form, dropping zeros
fn dense_to_csc(matrix: &Array2<f64>) -> CscMatrix<f64> {
    let (rows, cols) = matrix.dim();
    let mut colptr = Vec::with_capacity(cols + 1);
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();
    colptr.push(0);
    for j in 0..cols {
        for i in 0..rows {
            let value = matrix[[i, j]];
            if value != 0.0 {
                rowval.push(i);
                nzval.push(value);
            }
        }
        colptr.push(rowval.len());
    }
    CscMatrix::new(rows, cols, colptr, rowval, nzval)
}
