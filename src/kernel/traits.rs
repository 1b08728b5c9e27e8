//! Kernel trait definition

use ndarray::{Array1, ArrayView1, ArrayView2};

/// Kernel function trait
///
/// A kernel function K(x, y) must satisfy Mercer's condition to be valid for
/// SVM training. Implementations are stateless beyond their hyperparameters
/// and must be symmetric in their arguments.
///
/// The trait carries the dual-shaped contract required by the predictor: a
/// scalar evaluation on a pair of vectors and a broadcast evaluation of one
/// vector against every row of a matrix. The default broadcast applies the
/// scalar form row by row; implementations may override it without changing
/// results.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y) for a pair of feature vectors
    fn compute(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64;

    /// Compute K(row, y) for every row of `xs`
    fn compute_batch(&self, xs: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Array1<f64> {
        Array1::from_iter(xs.outer_iter().map(|row| self.compute(row, y)))
    }
}

impl Kernel for Box<dyn Kernel> {
    fn compute(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
        (**self).compute(x, y)
    }

    fn compute_batch(&self, xs: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Array1<f64> {
        (**self).compute_batch(xs, y)
    }
}
