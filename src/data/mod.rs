//! Labeled dataset loading

pub mod csv;

pub use self::csv::*;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::core::{Dataset, Result, SvmError};
use crate::trainer::canonicalize_labels;

/// An owned dense dataset: a feature matrix with an aligned label vector.
///
/// Labels are canonicalized to {-1, +1} on construction, so downstream
/// accuracy comparisons match the predictor's output convention.
#[derive(Debug, Clone)]
pub struct DenseDataset {
    features: Array2<f64>,
    labels: Array1<f64>,
}

impl DenseDataset {
    /// Build a dataset from a feature matrix and label vector.
    ///
    /// Fails if the lengths disagree, the dataset is empty, or a label is
    /// outside {-1, 0, +1}.
    pub fn new(features: Array2<f64>, labels: Array1<f64>) -> Result<Self> {
        if features.nrows() == 0 {
            return Err(SvmError::EmptyDataset);
        }
        if features.nrows() != labels.len() {
            return Err(SvmError::DimensionMismatch {
                expected: features.nrows(),
                actual: labels.len(),
            });
        }
        let labels = canonicalize_labels(labels.view())?;
        Ok(Self { features, labels })
    }
}

impl Dataset for DenseDataset {
    fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    fn labels(&self) -> ArrayView1<'_, f64> {
        self.labels.view()
    }
}
