//! Gaussian (RBF) kernel implementation
//!
//! The Gaussian kernel is defined as: K(x, y) = exp(-gamma * ||x - y||^2)
//! where gamma controls the kernel width.

use ndarray::ArrayView1;

use crate::core::{Result, SvmError};
use crate::kernel::Kernel;

/// Gaussian kernel: K(x, y) = exp(-gamma * ||x - y||^2)
///
/// The most common non-linear kernel. The gamma parameter controls the reach
/// of each training example:
/// - high gamma: only close points influence each other (risk of overfitting)
/// - low gamma: distant points still interact (risk of underfitting)
#[derive(Debug, Clone, Copy)]
pub struct GaussianKernel {
    gamma: f64,
}

impl GaussianKernel {
    /// Create a new Gaussian kernel with the given gamma parameter.
    ///
    /// Fails with `InvalidParameter` unless gamma is positive and finite.
    pub fn new(gamma: f64) -> Result<Self> {
        if !gamma.is_finite() || gamma <= 0.0 {
            return Err(SvmError::InvalidParameter(format!(
                "gamma must be positive, got: {gamma}"
            )));
        }
        Ok(Self { gamma })
    }

    /// Create a Gaussian kernel with gamma = 1.0 / n_features.
    ///
    /// A common default that scales inversely with dimensionality.
    pub fn with_auto_gamma(n_features: usize) -> Result<Self> {
        if n_features == 0 {
            return Err(SvmError::InvalidParameter(
                "number of features must be positive".to_string(),
            ));
        }
        Self::new(1.0 / n_features as f64)
    }

    /// Get the gamma parameter
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Kernel for GaussianKernel {
    fn compute(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
        let diff = &x - &y;
        let squared_distance = diff.dot(&diff);
        (-self.gamma * squared_distance).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_gaussian_kernel_creation() {
        let kernel = GaussianKernel::new(0.5).unwrap();
        assert_eq!(kernel.gamma(), 0.5);

        let kernel_auto = GaussianKernel::with_auto_gamma(10).unwrap();
        assert_eq!(kernel_auto.gamma(), 0.1);
    }

    #[test]
    fn test_gaussian_kernel_invalid_gamma() {
        assert!(matches!(
            GaussianKernel::new(-0.5),
            Err(SvmError::InvalidParameter(_))
        ));
        assert!(matches!(
            GaussianKernel::new(0.0),
            Err(SvmError::InvalidParameter(_))
        ));
        assert!(matches!(
            GaussianKernel::new(f64::NAN),
            Err(SvmError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_gaussian_kernel_zero_features() {
        assert!(GaussianKernel::with_auto_gamma(0).is_err());
    }

    #[test]
    fn test_gaussian_kernel_identical_vectors() {
        let kernel = GaussianKernel::new(1.0).unwrap();
        let x = array![1.0, 2.0, 3.0];

        // K(x, x) is always 1.0 for a Gaussian kernel
        assert!((kernel.compute(x.view(), x.view()) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_gaussian_kernel_known_value() {
        let kernel = GaussianKernel::new(1.0).unwrap();
        let x = array![1.0, 1.0];
        let y = array![0.0, 0.0];

        // ||x - y||^2 = 2, so K(x, y) = exp(-2)
        let expected = (-2.0_f64).exp();
        assert!((kernel.compute(x.view(), y.view()) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_gaussian_kernel_symmetry() {
        let kernel = GaussianKernel::new(0.5).unwrap();
        let x = array![1.0, 2.0, -0.5];
        let y = array![0.0, 1.5, 2.0];

        assert_eq!(
            kernel.compute(x.view(), y.view()),
            kernel.compute(y.view(), x.view())
        );
    }

    #[test]
    fn test_gaussian_kernel_distance_monotonicity() {
        let kernel = GaussianKernel::new(1.0).unwrap();
        let origin = array![0.0];

        let k1 = kernel.compute(origin.view(), array![1.0].view());
        let k2 = kernel.compute(origin.view(), array![2.0].view());
        let k3 = kernel.compute(origin.view(), array![3.0].view());

        assert!(k1 > k2);
        assert!(k2 > k3);
        assert!(k3 > 0.0);
    }

    #[test]
    fn test_gaussian_kernel_batch_matches_scalar() {
        let kernel = GaussianKernel::new(0.7).unwrap();
        let xs = array![[0.0, 0.0], [1.0, 1.0], [2.0, -1.0]];
        let y = array![0.5, 0.5];

        let batch = kernel.compute_batch(xs.view(), y.view());
        for (row, &value) in xs.outer_iter().zip(batch.iter()) {
            assert!((value - kernel.compute(row, y.view())).abs() < 1e-15);
        }
    }
}
