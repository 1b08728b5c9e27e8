//! Dual-problem construction
//!
//! The SVM dual is the convex quadratic program
//!
//! ```text
//! minimize   (1/2) a^T H a - 1^T a
//! subject to  0 <= a_i <= C     (box constraint per example)
//!             y^T a = 0         (single equality constraint)
//! ```
//!
//! with H = diag(y) K diag(y) and K the Gram matrix.

use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::core::Result;

/// A dense convex QP in standard solver form:
///
/// ```text
/// minimize   (1/2) x^T H x + f^T x
/// subject to  A x <= a
///             B x  = b
/// ```
#[derive(Debug, Clone)]
pub struct QpProblem {
    /// Quadratic term H (symmetric, positive semi-definite for valid kernels)
    pub hessian: Array2<f64>,
    /// Linear term f
    pub linear: Array1<f64>,
    /// Inequality coefficient matrix A, one `<=` row per constraint
    pub ineq_coeffs: Array2<f64>,
    /// Inequality bounds a
    pub ineq_bounds: Array1<f64>,
    /// Equality coefficient matrix B
    pub eq_coeffs: Array2<f64>,
    /// Equality bounds b
    pub eq_bounds: Array1<f64>,
}

impl QpProblem {
    /// Number of unknowns in the primal solution vector
    pub fn n_unknowns(&self) -> usize {
        self.linear.len()
    }
}

/// External QP solver collaborator.
///
/// The trainer only requires a correct convex solve of the dense problem;
/// any active-set or interior-point solver qualifies. Implementations must
/// report failure to converge instead of returning a partial solution.
pub trait QpSolver: Send + Sync {
    /// Solve the problem, returning the primal solution vector
    fn solve(&self, problem: &QpProblem) -> Result<Array1<f64>>;
}

/// Formulate the SVM dual QP from a Gram matrix, labels and the C parameter.
///
/// The box constraint 0 <= a <= C becomes two stacked inequality blocks —
/// identity rows bounding the multipliers above by C, negated identity rows
/// bounding them below by 0 — because the solver form accepts only one-sided
/// `<=` rows. The label vector itself is the single equality row.
pub fn dual_problem(gram: &Array2<f64>, labels: ArrayView1<'_, f64>, c: f64) -> QpProblem {
    let n = labels.len();
    debug_assert_eq!(gram.dim(), (n, n));

    let mut hessian = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            hessian[[i, j]] = labels[i] * labels[j] * gram[[i, j]];
        }
    }
    let linear = Array1::from_elem(n, -1.0);

    let mut ineq_coeffs = Array2::zeros((2 * n, n));
    let mut ineq_bounds = Array1::zeros(2 * n);
    for i in 0..n {
        ineq_coeffs[[i, i]] = 1.0;
        ineq_bounds[i] = c;
        ineq_coeffs[[n + i, i]] = -1.0;
    }

    let eq_coeffs = labels.to_owned().insert_axis(Axis(0));
    let eq_bounds = Array1::zeros(1);

    QpProblem {
        hessian,
        linear,
        ineq_coeffs,
        ineq_bounds,
        eq_coeffs,
        eq_bounds,
    }
}
