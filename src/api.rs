//! High-level API for SVM training and evaluation
//!
//! A builder-style front door over the dual-SVM trainer, plus accuracy and
//! confusion-matrix style evaluation helpers.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dualsvm::api::Svm;
//! use dualsvm::DenseDataset;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let train = DenseDataset::from_csv_file("train.csv")?;
//! let model = Svm::new().with_c(1.0).train(&train)?;
//!
//! let test = DenseDataset::from_csv_file("test.csv")?;
//! println!("Accuracy: {:.2}%", model.evaluate(&test)? * 100.0);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::core::{BiasDiagnostics, Dataset, Prediction, Result};
use crate::data::DenseDataset;
use crate::kernel::{Kernel, LinearKernel};
use crate::trainer::DualSvm;

/// High-level SVM interface with builder pattern
pub struct Svm<K: Kernel = LinearKernel> {
    kernel: K,
    c: f64,
    max_iterations: u32,
}

impl Svm<LinearKernel> {
    /// Create a new SVM with linear kernel and default parameters
    pub fn new() -> Self {
        Self::with_kernel(LinearKernel::new())
    }
}

impl Default for Svm<LinearKernel> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Kernel> Svm<K> {
    /// Create an SVM with a custom kernel
    pub fn with_kernel(kernel: K) -> Self {
        Self {
            kernel,
            c: 1.0,
            max_iterations: 200,
        }
    }

    /// Set regularization parameter C
    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Set the QP solver iteration cap
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Train on a dataset
    pub fn train<D: Dataset>(self, dataset: &D) -> Result<FittedClassifier<K>> {
        self.train_arrays(dataset.features(), dataset.labels())
    }

    /// Train on a feature matrix and label vector
    pub fn train_arrays(
        self,
        features: ArrayView2<'_, f64>,
        labels: ArrayView1<'_, f64>,
    ) -> Result<FittedClassifier<K>> {
        let solver = crate::qp::ClarabelSolver::new().with_max_iterations(self.max_iterations);
        let mut svm = DualSvm::with_solver(self.kernel, self.c, solver)?;
        svm.fit(features, labels)?;
        Ok(FittedClassifier { svm })
    }

    /// Train from a CSV file
    pub fn train_from_csv<P: AsRef<Path>>(self, path: P) -> Result<FittedClassifier<K>> {
        let dataset = DenseDataset::from_csv_file(path)?;
        self.train(&dataset)
    }
}

/// A fitted classifier with prediction and evaluation helpers
pub struct FittedClassifier<K: Kernel> {
    svm: DualSvm<K>,
}

impl<K: Kernel> FittedClassifier<K> {
    /// Predict ±1 labels for every row
    pub fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        self.svm.predict(features)
    }

    /// Predict labels together with raw decision values
    pub fn predictions(&self, features: ArrayView2<'_, f64>) -> Result<Vec<Prediction>> {
        let scores = self.svm.decision_function(features)?;
        Ok(scores
            .iter()
            .map(|&score| Prediction::new(if score >= 0.0 { 1.0 } else { -1.0 }, score))
            .collect())
    }

    /// Evaluate accuracy on a dataset
    pub fn evaluate<D: Dataset>(&self, dataset: &D) -> Result<f64> {
        let predicted = self.predict(dataset.features())?;
        Ok(accuracy(predicted.view(), dataset.labels()))
    }

    /// Evaluate accuracy from a CSV file
    pub fn evaluate_from_csv<P: AsRef<Path>>(&self, path: P) -> Result<f64> {
        let dataset = DenseDataset::from_csv_file(path)?;
        self.evaluate(&dataset)
    }

    /// Get detailed evaluation metrics
    pub fn evaluate_detailed<D: Dataset>(&self, dataset: &D) -> Result<EvaluationMetrics> {
        let predicted = self.predict(dataset.features())?;

        let mut tp = 0;
        let mut tn = 0;
        let mut fp = 0;
        let mut fn_ = 0;
        for (&pred, &actual) in predicted.iter().zip(dataset.labels().iter()) {
            match (pred > 0.0, actual > 0.0) {
                (true, true) => tp += 1,
                (false, false) => tn += 1,
                (true, false) => fp += 1,
                (false, true) => fn_ += 1,
            }
        }
        Ok(EvaluationMetrics::new(tp, tn, fp, fn_))
    }

    /// Get model information
    pub fn info(&self) -> ModelInfo {
        let model = self.svm.model();
        ModelInfo {
            n_support_vectors: model.map_or(0, |m| m.n_support_vectors()),
            bias: model.map_or(0.0, |m| m.bias()),
            bias_diagnostics: self.svm.diagnostics().map(|d| d.bias),
        }
    }

    /// Get the underlying trainer
    pub fn inner(&self) -> &DualSvm<K> {
        &self.svm
    }
}

/// Fraction of predictions matching the reference labels
pub fn accuracy(predicted: ArrayView1<'_, f64>, actual: ArrayView1<'_, f64>) -> f64 {
    if predicted.is_empty() {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .zip(actual.iter())
        .filter(|(p, a)| p == a)
        .count();
    correct as f64 / predicted.len() as f64
}

/// Detailed evaluation metrics
#[derive(Debug, Clone)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    fn new(tp: usize, tn: usize, fp: usize, fn_: usize) -> Self {
        Self {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    /// Calculate accuracy: (TP + TN) / (TP + TN + FP + FN)
    pub fn accuracy(&self) -> f64 {
        let total =
            self.true_positives + self.true_negatives + self.false_positives + self.false_negatives;
        if total == 0 {
            0.0
        } else {
            (self.true_positives + self.true_negatives) as f64 / total as f64
        }
    }

    /// Calculate precision: TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        let denominator = self.true_positives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate recall (sensitivity): TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        let denominator = self.true_positives + self.false_negatives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate F1 score: 2 * (precision * recall) / (precision + recall)
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }

    /// Calculate specificity: TN / (TN + FP)
    pub fn specificity(&self) -> f64 {
        let denominator = self.true_negatives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_negatives as f64 / denominator as f64
        }
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub n_support_vectors: usize,
    pub bias: f64,
    pub bias_diagnostics: Option<BiasDiagnostics>,
}
