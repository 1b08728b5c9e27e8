//! Polynomial kernel implementation
//!
//! The polynomial kernel is defined as:
//! K(x, y) = (offset + <x, y>)^degree
//!
//! The homogenous variant uses offset = 0 and the inhomogenous variant
//! offset = 1.

use ndarray::ArrayView1;

use crate::core::{Result, SvmError};
use crate::kernel::Kernel;

/// Polynomial kernel: K(x, y) = (offset + x^T y)^degree
#[derive(Debug, Clone, Copy)]
pub struct PolynomialKernel {
    degree: u32,
    offset: f64,
}

impl PolynomialKernel {
    /// Create a new polynomial kernel.
    ///
    /// Fails with `InvalidParameter` unless the degree is a positive integer
    /// and the offset is finite.
    pub fn new(degree: u32, offset: f64) -> Result<Self> {
        if degree < 1 {
            return Err(SvmError::InvalidParameter(format!(
                "polynomial degree must be a positive integer, got: {degree}"
            )));
        }
        if !offset.is_finite() {
            return Err(SvmError::InvalidParameter(format!(
                "polynomial offset must be finite, got: {offset}"
            )));
        }
        Ok(Self { degree, offset })
    }

    /// Homogenous polynomial kernel: K(x, y) = (x^T y)^degree
    pub fn homogenous(degree: u32) -> Result<Self> {
        Self::new(degree, 0.0)
    }

    /// Inhomogenous polynomial kernel: K(x, y) = (1 + x^T y)^degree
    pub fn inhomogenous(degree: u32) -> Result<Self> {
        Self::new(degree, 1.0)
    }

    /// Get the polynomial degree
    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Get the additive offset
    pub fn offset(&self) -> f64 {
        self.offset
    }
}

impl Kernel for PolynomialKernel {
    fn compute(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
        (self.offset + x.dot(&y)).powi(self.degree as i32)
    }
}
