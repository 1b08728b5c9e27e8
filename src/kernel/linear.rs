//! Linear kernel implementation

use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::kernel::Kernel;

/// Linear kernel: K(x, y) = x^T * y
///
/// The simplest kernel function, computing the dot product between two
/// vectors. Training with it is equivalent to an untransformed soft-margin
/// SVM.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearKernel;

impl LinearKernel {
    /// Create a new linear kernel
    pub fn new() -> Self {
        Self
    }
}

impl Kernel for LinearKernel {
    fn compute(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
        x.dot(&y)
    }

    fn compute_batch(&self, xs: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Array1<f64> {
        xs.dot(&y)
    }
}
