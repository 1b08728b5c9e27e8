//! Dual-formulation (kernelized) Support Vector Machine
//!
//! Trains a binary classifier by solving the SVM dual quadratic program with
//! an external convex QP solver, then predicts with the resulting
//! support-vector expansion.

pub mod api;
pub mod core;
pub mod data;
pub mod kernel;
pub mod persistence;
pub mod qp;
pub mod sweep;
pub mod trainer;

// Re-export main types for convenience
pub use crate::api::{accuracy, EvaluationMetrics, FittedClassifier, ModelInfo, Svm};
pub use crate::core::error::{Result, SvmError};
pub use crate::core::traits::Dataset;
pub use crate::core::types::{BiasDiagnostics, Prediction};
pub use crate::data::DenseDataset;
pub use crate::kernel::{
    gram_matrix, GaussianKernel, Kernel, KernelSpec, LinearKernel, PolynomialKernel, SigmoidKernel,
};
pub use crate::qp::{dual_problem, ClarabelSolver, QpProblem, QpSolver};
pub use crate::sweep::{run_sweep, SweepReport, TrialConfig, TrialOutcome};
pub use crate::trainer::{DualSvm, FitDiagnostics, TrainedModel};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
