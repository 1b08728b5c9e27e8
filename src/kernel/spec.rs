//! Serializable kernel descriptions

use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::kernel::{GaussianKernel, Kernel, LinearKernel, PolynomialKernel, SigmoidKernel};

/// Tagged kernel description.
///
/// Carries the kernel choice and its hyperparameters as plain data, so it can
/// travel through configuration, sweep trials, and saved models. `build`
/// validates the parameters and produces the concrete kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KernelSpec {
    Linear,
    Gaussian { gamma: f64 },
    Polynomial { degree: u32, offset: f64 },
    Sigmoid { kappa: f64, coef0: f64 },
}

impl KernelSpec {
    /// Construct the kernel this spec describes.
    ///
    /// Fails with `InvalidParameter` if the hyperparameters are out of range.
    pub fn build(&self) -> Result<Box<dyn Kernel>> {
        match *self {
            KernelSpec::Linear => Ok(Box::new(LinearKernel::new())),
            KernelSpec::Gaussian { gamma } => Ok(Box::new(GaussianKernel::new(gamma)?)),
            KernelSpec::Polynomial { degree, offset } => {
                Ok(Box::new(PolynomialKernel::new(degree, offset)?))
            }
            KernelSpec::Sigmoid { kappa, coef0 } => Ok(Box::new(SigmoidKernel::new(kappa, coef0))),
        }
    }

    /// Short human-readable name for logs and summaries
    pub fn name(&self) -> &'static str {
        match self {
            KernelSpec::Linear => "linear",
            KernelSpec::Gaussian { .. } => "gaussian",
            KernelSpec::Polynomial { .. } => "polynomial",
            KernelSpec::Sigmoid { .. } => "sigmoid",
        }
    }
}
