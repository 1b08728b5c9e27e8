//! Dual-formulation SVM training and prediction
//!
//! `DualSvm` builds the Gram matrix for its kernel, formulates the dual QP,
//! hands it to the solver collaborator, and turns the returned Lagrange
//! multipliers into a `TrainedModel`: support vectors, their weights and
//! labels, and the averaged bias.

use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::core::{BiasDiagnostics, Result, SvmError};
use crate::kernel::{gram_matrix, Kernel};
use crate::qp::{dual_problem, ClarabelSolver, QpSolver};

/// Multipliers at or below this threshold are treated as zero when selecting
/// support vectors; QP solutions carry numerical slack around the bounds.
pub const SUPPORT_VECTOR_THRESHOLD: f64 = 1e-5;

/// A support vector whose multiplier is below `C - MARGIN_THRESHOLD` lies
/// exactly on the margin and qualifies for bias estimation.
pub const MARGIN_THRESHOLD: f64 = 1e-5;

/// Dual-formulation SVM trainer and predictor.
///
/// Holds the kernel, the regularization parameter C, the QP solver and, after
/// a successful `fit`, the trained model. A second `fit` call replaces the
/// model wholesale; a failed `fit` leaves the previous model untouched.
pub struct DualSvm<K: Kernel, S: QpSolver = ClarabelSolver> {
    kernel: K,
    c: f64,
    solver: S,
    model: Option<TrainedModel>,
    diagnostics: Option<FitDiagnostics>,
}

/// The four artifacts derived from a successful fit.
///
/// Support vectors are copied out of the training matrix, so the model is
/// independent of the caller's data lifetime. The struct is immutable after
/// construction.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    bias: f64,
    weights: Array1<f64>,
    support_vectors: Array2<f64>,
    support_vector_labels: Array1<f64>,
}

/// Training diagnostics kept alongside the model
#[derive(Debug, Clone)]
pub struct FitDiagnostics {
    /// Full multiplier vector returned by the QP solver, one entry per
    /// training example
    pub multipliers: Array1<f64>,
    /// Number of examples selected as support vectors
    pub n_support_vectors: usize,
    /// Bias estimate statistics over the margin support vectors
    pub bias: BiasDiagnostics,
}

impl<K: Kernel> DualSvm<K> {
    /// Create an untrained SVM with the default QP solver.
    ///
    /// Fails with `InvalidParameter` unless `c` is positive and finite.
    pub fn new(kernel: K, c: f64) -> Result<Self> {
        Self::with_solver(kernel, c, ClarabelSolver::new())
    }
}

impl<K: Kernel, S: QpSolver> DualSvm<K, S> {
    /// Create an untrained SVM with an explicit QP solver
    pub fn with_solver(kernel: K, c: f64, solver: S) -> Result<Self> {
        if !c.is_finite() || c <= 0.0 {
            return Err(SvmError::InvalidParameter(format!(
                "C must be positive, got: {c}"
            )));
        }
        Ok(Self {
            kernel,
            c,
            solver,
            model: None,
            diagnostics: None,
        })
    }

    /// Fit the model to a feature matrix and aligned label vector.
    ///
    /// Labels are canonicalized to {-1, +1} before training: the {0, 1}
    /// convention is remapped (0 becomes -1) and any other value is rejected
    /// with `InvalidLabel`. On any error the previously fitted model, if one
    /// exists, is left untouched.
    pub fn fit(&mut self, features: ArrayView2<'_, f64>, labels: ArrayView1<'_, f64>) -> Result<()> {
        if features.nrows() == 0 {
            return Err(SvmError::EmptyDataset);
        }
        if features.nrows() != labels.len() {
            return Err(SvmError::DimensionMismatch {
                expected: features.nrows(),
                actual: labels.len(),
            });
        }
        let labels = canonicalize_labels(labels)?;
        if labels.iter().all(|&y| y == 1.0) || labels.iter().all(|&y| y == -1.0) {
            return Err(SvmError::InvalidDataset(
                "training data must contain both classes".to_string(),
            ));
        }

        let gram = gram_matrix(features, &self.kernel);
        let problem = dual_problem(&gram, labels.view(), self.c);
        let multipliers = self.solver.solve(&problem)?;

        let (model, diagnostics) =
            construct_model(features, labels.view(), &gram, multipliers, self.c)?;
        debug!(
            "fit complete: {} support vectors, bias {:.6} (std {:.6} over {} margin vectors)",
            diagnostics.n_support_vectors,
            diagnostics.bias.mean,
            diagnostics.bias.std_dev,
            diagnostics.bias.n_margin_vectors,
        );
        self.model = Some(model);
        self.diagnostics = Some(diagnostics);
        Ok(())
    }

    /// Predict a ±1 label for every row of the feature matrix.
    ///
    /// The decision rule is sign(score) with sign(0) = +1. Fails with
    /// `NotFitted` before the first successful `fit`.
    pub fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        Ok(self
            .decision_function(features)?
            .mapv(|score| if score >= 0.0 { 1.0 } else { -1.0 }))
    }

    /// Raw decision scores for every row of the feature matrix
    pub fn decision_function(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let model = self.model.as_ref().ok_or(SvmError::NotFitted)?;
        if features.ncols() != model.support_vectors.ncols() {
            return Err(SvmError::DimensionMismatch {
                expected: model.support_vectors.ncols(),
                actual: features.ncols(),
            });
        }
        Ok(Array1::from_iter(
            features
                .outer_iter()
                .map(|row| model.score(&self.kernel, row)),
        ))
    }

    /// The trained model, if `fit` has succeeded
    pub fn model(&self) -> Option<&TrainedModel> {
        self.model.as_ref()
    }

    /// Diagnostics from the most recent fit.
    ///
    /// Absent before training and for models restored from storage.
    pub fn diagnostics(&self) -> Option<&FitDiagnostics> {
        self.diagnostics.as_ref()
    }

    /// Whether a model is available for prediction
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// The regularization parameter
    pub fn c(&self) -> f64 {
        self.c
    }

    /// The kernel in use
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Install an externally constructed model, e.g. one loaded from storage.
    ///
    /// The model replaces any previously fitted state; diagnostics are
    /// cleared because the multipliers of the original solve are gone.
    pub fn restore(&mut self, model: TrainedModel) {
        self.model = Some(model);
        self.diagnostics = None;
    }
}

impl TrainedModel {
    /// Assemble a model from its four artifacts.
    ///
    /// Fails with `DimensionMismatch` unless weights, labels and support
    /// vector rows agree in count.
    pub fn from_parts(
        bias: f64,
        weights: Array1<f64>,
        support_vectors: Array2<f64>,
        support_vector_labels: Array1<f64>,
    ) -> Result<Self> {
        let n = support_vectors.nrows();
        if weights.len() != n {
            return Err(SvmError::DimensionMismatch {
                expected: n,
                actual: weights.len(),
            });
        }
        if support_vector_labels.len() != n {
            return Err(SvmError::DimensionMismatch {
                expected: n,
                actual: support_vector_labels.len(),
            });
        }
        Ok(Self {
            bias,
            weights,
            support_vectors,
            support_vector_labels,
        })
    }

    /// Decision score for a single example:
    /// sum over support vectors of w_sv * y_sv * K(sv, x), plus the bias
    pub fn score<K: Kernel + ?Sized>(&self, kernel: &K, x: ArrayView1<'_, f64>) -> f64 {
        let kernel_values = kernel.compute_batch(self.support_vectors.view(), x);
        let weighted: f64 = self
            .weights
            .iter()
            .zip(self.support_vector_labels.iter())
            .zip(kernel_values.iter())
            .map(|((&w, &y), &k)| w * y * k)
            .sum();
        weighted + self.bias
    }

    /// The bias term
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Multipliers of the support vectors
    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// The support vector rows
    pub fn support_vectors(&self) -> &Array2<f64> {
        &self.support_vectors
    }

    /// Labels of the support vectors
    pub fn support_vector_labels(&self) -> &Array1<f64> {
        &self.support_vector_labels
    }

    /// Number of support vectors
    pub fn n_support_vectors(&self) -> usize {
        self.support_vectors.nrows()
    }
}

/// Canonicalize a label vector to the {-1, +1} convention.
///
/// Accepts -1, 0 and +1; zeros are remapped to -1 so datasets using the
/// {0, 1} convention train correctly. Any other value is rejected, because
/// the bias estimator divides by the label.
pub fn canonicalize_labels(labels: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
    let mut canonical = labels.to_owned();
    for value in canonical.iter_mut() {
        *value = match *value {
            v if v == 1.0 => 1.0,
            v if v == -1.0 => -1.0,
            v if v == 0.0 => -1.0,
            other => return Err(SvmError::InvalidLabel(other)),
        };
    }
    Ok(canonical)
}

/// Extract support vectors and estimate the bias from a QP solution.
fn construct_model(
    features: ArrayView2<'_, f64>,
    labels: ArrayView1<'_, f64>,
    gram: &Array2<f64>,
    multipliers: Array1<f64>,
    c: f64,
) -> Result<(TrainedModel, FitDiagnostics)> {
    let support_indices: Vec<usize> = multipliers
        .iter()
        .enumerate()
        .filter(|&(_, &alpha)| alpha > SUPPORT_VECTOR_THRESHOLD)
        .map(|(i, _)| i)
        .collect();

    let weights = Array1::from_iter(support_indices.iter().map(|&i| multipliers[i]));
    let support_vectors = features.select(Axis(0), &support_indices);
    let support_vector_labels = Array1::from_iter(support_indices.iter().map(|&i| labels[i]));

    // Each margin support vector (multiplier strictly below the C bound)
    // pins the bias exactly: b_k = 1/y_k - sum_i alpha_i y_i K(x_i, x_k).
    // The model bias is the mean of these estimates; their spread is kept as
    // a fit-quality diagnostic.
    let mut estimates = Vec::new();
    for (k, &idx) in support_indices.iter().enumerate() {
        if weights[k] < c - MARGIN_THRESHOLD {
            let column = gram.column(idx);
            let weighted: f64 = multipliers
                .iter()
                .zip(labels.iter())
                .zip(column.iter())
                .map(|((&alpha, &y), &k_val)| alpha * y * k_val)
                .sum();
            estimates.push(1.0 / support_vector_labels[k] - weighted);
        }
    }
    if estimates.is_empty() {
        return Err(SvmError::DegenerateBias);
    }

    let mean = estimates.iter().sum::<f64>() / estimates.len() as f64;
    let variance =
        estimates.iter().map(|b| (b - mean).powi(2)).sum::<f64>() / estimates.len() as f64;
    let bias = BiasDiagnostics {
        mean,
        std_dev: variance.sqrt(),
        n_margin_vectors: estimates.len(),
    };

    let model = TrainedModel {
        bias: mean,
        weights,
        support_vectors,
        support_vector_labels,
    };
    let diagnostics = FitDiagnostics {
        multipliers,
        n_support_vectors: support_indices.len(),
        bias,
    };
    Ok((model, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{GaussianKernel, LinearKernel};
    use crate::qp::QpProblem;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Delegates to clarabel until `fail` is flipped, then reports a
    /// numerical error without touching the problem.
    struct FlakySolver {
        fail: Arc<AtomicBool>,
        inner: ClarabelSolver,
    }

    impl QpSolver for FlakySolver {
        fn solve(&self, problem: &QpProblem) -> Result<Array1<f64>> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(SvmError::NumericalError("injected failure".to_string()));
            }
            self.inner.solve(problem)
        }
    }

    fn toy_features() -> Array2<f64> {
        array![
            [2.0, 2.0],
            [3.0, 3.0],
            [3.0, 2.0],
            [0.0, 0.0],
            [0.0, 1.0],
            [1.0, 0.0],
        ]
    }

    fn toy_labels() -> Array1<f64> {
        array![1.0, 1.0, 1.0, -1.0, -1.0, -1.0]
    }

    #[test]
    fn test_invalid_c_rejected() {
        assert!(DualSvm::new(LinearKernel::new(), 0.0).is_err());
        assert!(DualSvm::new(LinearKernel::new(), -1.0).is_err());
        assert!(DualSvm::new(LinearKernel::new(), f64::NAN).is_err());
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let svm = DualSvm::new(LinearKernel::new(), 1.0).unwrap();
        let features = array![[1.0, 1.0]];
        assert!(matches!(
            svm.predict(features.view()),
            Err(SvmError::NotFitted)
        ));
        assert!(!svm.is_fitted());
    }

    #[test]
    fn test_separable_training_set_recovered_exactly() {
        let features = toy_features();
        let labels = toy_labels();

        let mut svm = DualSvm::new(LinearKernel::new(), 1.0).unwrap();
        svm.fit(features.view(), labels.view()).unwrap();

        let predicted = svm.predict(features.view()).unwrap();
        assert_eq!(predicted, labels);
    }

    #[test]
    fn test_dual_feasibility_after_fit() {
        let features = toy_features();
        let labels = toy_labels();
        let c = 1.0;

        let mut svm = DualSvm::new(LinearKernel::new(), c).unwrap();
        svm.fit(features.view(), labels.view()).unwrap();

        let diagnostics = svm.diagnostics().unwrap();
        let multipliers = &diagnostics.multipliers;
        assert_eq!(multipliers.len(), features.nrows());

        let equality: f64 = multipliers
            .iter()
            .zip(labels.iter())
            .map(|(&alpha, &y)| alpha * y)
            .sum();
        assert_abs_diff_eq!(equality, 0.0, epsilon = 1e-6);
        for &alpha in multipliers.iter() {
            assert!(alpha >= -1e-6);
            assert!(alpha <= c + 1e-6);
        }
    }

    #[test]
    fn test_bias_estimates_agree_on_separable_data() {
        let features = toy_features();
        let labels = toy_labels();

        let mut svm = DualSvm::new(LinearKernel::new(), 1.0).unwrap();
        svm.fit(features.view(), labels.view()).unwrap();

        let bias = svm.diagnostics().unwrap().bias;
        assert!(bias.n_margin_vectors > 0);
        assert!(
            bias.std_dev < 1e-4,
            "margin support vectors should agree on the bias, std was {}",
            bias.std_dev
        );
        // Known optimum for this dataset: w = (2/3, 2/3), b = -5/3
        assert_abs_diff_eq!(bias.mean, -5.0 / 3.0, epsilon = 1e-3);
    }

    #[test]
    fn test_prediction_is_idempotent() {
        let features = toy_features();
        let labels = toy_labels();

        let mut svm = DualSvm::new(LinearKernel::new(), 1.0).unwrap();
        svm.fit(features.view(), labels.view()).unwrap();

        let first = svm.predict(features.view()).unwrap();
        let second = svm.predict(features.view()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_degenerate_margin_is_rejected() {
        // Identical points with opposite labels force every multiplier to
        // the C bound, leaving no margin vector to estimate the bias from.
        let features = array![[1.0, 1.0], [1.0, 1.0]];
        let labels = array![1.0, -1.0];

        let mut svm = DualSvm::new(LinearKernel::new(), 1.0).unwrap();
        let err = svm.fit(features.view(), labels.view()).unwrap_err();
        assert!(matches!(err, SvmError::DegenerateBias));
        assert!(!svm.is_fitted());
    }

    #[test]
    fn test_solver_failure_propagates_and_preserves_model() {
        let features = toy_features();
        let labels = toy_labels();
        let fail = Arc::new(AtomicBool::new(false));
        let solver = FlakySolver {
            fail: Arc::clone(&fail),
            inner: ClarabelSolver::new(),
        };

        let mut svm = DualSvm::with_solver(LinearKernel::new(), 1.0, solver).unwrap();
        svm.fit(features.view(), labels.view()).unwrap();
        let before = svm.predict(features.view()).unwrap();

        fail.store(true, Ordering::SeqCst);
        let err = svm.fit(features.view(), labels.view()).unwrap_err();
        assert!(matches!(err, SvmError::NumericalError(_)));

        // The earlier model is still in place and unchanged
        let after = svm.predict(features.view()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_refit_replaces_model() {
        let features = toy_features();
        let labels = toy_labels();

        let mut svm = DualSvm::new(LinearKernel::new(), 1.0).unwrap();
        svm.fit(features.view(), labels.view()).unwrap();
        let bias_first = svm.model().unwrap().bias();

        // Shift every point, refit, and expect the bias to move with it
        let shifted = &features + 10.0;
        svm.fit(shifted.view(), labels.view()).unwrap();
        let bias_second = svm.model().unwrap().bias();
        assert!((bias_first - bias_second).abs() > 1e-3);

        let predicted = svm.predict(shifted.view()).unwrap();
        assert_eq!(predicted, labels);
    }

    #[test]
    fn test_zero_one_labels_are_remapped() {
        let features = toy_features();
        let labels = array![1.0, 1.0, 1.0, 0.0, 0.0, 0.0];

        let mut svm = DualSvm::new(LinearKernel::new(), 1.0).unwrap();
        svm.fit(features.view(), labels.view()).unwrap();

        let predicted = svm.predict(features.view()).unwrap();
        assert_eq!(predicted, toy_labels());
    }

    #[test]
    fn test_other_labels_are_rejected() {
        let features = array![[1.0], [2.0], [3.0]];
        let labels = array![1.0, -1.0, 2.0];

        let mut svm = DualSvm::new(LinearKernel::new(), 1.0).unwrap();
        let err = svm.fit(features.view(), labels.view()).unwrap_err();
        assert!(matches!(err, SvmError::InvalidLabel(v) if v == 2.0));
    }

    #[test]
    fn test_single_class_is_rejected() {
        let features = array![[1.0], [2.0]];
        let labels = array![1.0, 1.0];

        let mut svm = DualSvm::new(LinearKernel::new(), 1.0).unwrap();
        assert!(matches!(
            svm.fit(features.view(), labels.view()),
            Err(SvmError::InvalidDataset(_))
        ));
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let features = array![[1.0], [2.0]];
        let labels = array![1.0, -1.0, 1.0];

        let mut svm = DualSvm::new(LinearKernel::new(), 1.0).unwrap();
        assert!(matches!(
            svm.fit(features.view(), labels.view()),
            Err(SvmError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let features = Array2::<f64>::zeros((0, 2));
        let labels = Array1::<f64>::zeros(0);

        let mut svm = DualSvm::new(LinearKernel::new(), 1.0).unwrap();
        assert!(matches!(
            svm.fit(features.view(), labels.view()),
            Err(SvmError::EmptyDataset)
        ));
    }

    #[test]
    fn test_predict_dimension_mismatch() {
        let features = toy_features();
        let labels = toy_labels();

        let mut svm = DualSvm::new(LinearKernel::new(), 1.0).unwrap();
        svm.fit(features.view(), labels.view()).unwrap();

        let wrong_width = array![[1.0, 2.0, 3.0]];
        assert!(matches!(
            svm.predict(wrong_width.view()),
            Err(SvmError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_gaussian_kernel_solves_xor() {
        // Not linearly separable; the Gaussian kernel lifts it.
        let features = array![[0.0, 0.0], [1.0, 1.0], [0.0, 1.0], [1.0, 0.0]];
        let labels = array![1.0, 1.0, -1.0, -1.0];

        let kernel = GaussianKernel::new(1.0).unwrap();
        let mut svm = DualSvm::new(kernel, 10.0).unwrap();
        svm.fit(features.view(), labels.view()).unwrap();

        let predicted = svm.predict(features.view()).unwrap();
        assert_eq!(predicted, labels);
    }

    #[test]
    fn test_canonicalize_labels() {
        let canonical = canonicalize_labels(array![1.0, 0.0, -1.0].view()).unwrap();
        assert_eq!(canonical, array![1.0, -1.0, -1.0]);

        assert!(matches!(
            canonicalize_labels(array![0.5].view()),
            Err(SvmError::InvalidLabel(_))
        ));
    }

    #[test]
    fn test_model_from_parts_validates_lengths() {
        let model = TrainedModel::from_parts(
            0.5,
            array![1.0, 2.0],
            array![[1.0, 0.0], [0.0, 1.0]],
            array![1.0, -1.0],
        );
        assert!(model.is_ok());

        let mismatched = TrainedModel::from_parts(
            0.5,
            array![1.0],
            array![[1.0, 0.0], [0.0, 1.0]],
            array![1.0, -1.0],
        );
        assert!(matches!(
            mismatched,
            Err(SvmError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_restored_model_predicts() {
        let features = toy_features();
        let labels = toy_labels();

        let mut svm = DualSvm::new(LinearKernel::new(), 1.0).unwrap();
        svm.fit(features.view(), labels.view()).unwrap();
        let model = svm.model().unwrap().clone();

        let mut restored = DualSvm::new(LinearKernel::new(), 1.0).unwrap();
        restored.restore(model);
        assert!(restored.is_fitted());
        assert!(restored.diagnostics().is_none());

        let predicted = restored.predict(features.view()).unwrap();
        assert_eq!(predicted, labels);
    }
}
