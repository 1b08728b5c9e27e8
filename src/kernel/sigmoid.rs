//! Sigmoid (hyperbolic tangent) kernel implementation
//!
//! K(x, y) = tanh(kappa * <x, y> + coef0)
//!
//! The sigmoid kernel is not positive semi-definite for all parameter
//! choices; when it is indefinite the dual problem may be rejected by the
//! QP solver, which surfaces as a `NumericalError` from fit.

use ndarray::ArrayView1;

use crate::kernel::Kernel;

/// Hyperbolic tangent kernel: K(x, y) = tanh(kappa * x^T y + coef0)
#[derive(Debug, Clone, Copy)]
pub struct SigmoidKernel {
    kappa: f64,
    coef0: f64,
}

impl SigmoidKernel {
    /// Create a new sigmoid kernel with slope `kappa` and offset `coef0`
    pub fn new(kappa: f64, coef0: f64) -> Self {
        Self { kappa, coef0 }
    }

    /// Get the slope parameter
    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    /// Get the offset parameter
    pub fn coef0(&self) -> f64 {
        self.coef0
    }
}

impl Kernel for SigmoidKernel {
    fn compute(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
        (self.kappa * x.dot(&y) + self.coef0).tanh()
    }
}
