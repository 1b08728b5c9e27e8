//! Core traits for the SVM implementation

use ndarray::{ArrayView1, ArrayView2};

/// Labeled dense dataset abstraction
///
/// A dataset is a feature matrix (one row per example) together with an
/// aligned label vector. The trainer reads both through views and never
/// mutates them.
pub trait Dataset: Send + Sync {
    /// Feature matrix, N rows x d columns
    fn features(&self) -> ArrayView2<'_, f64>;

    /// Label vector of length N, aligned with the feature rows
    fn labels(&self) -> ArrayView1<'_, f64>;

    /// Number of examples in the dataset
    fn len(&self) -> usize {
        self.features().nrows()
    }

    /// Number of features (dimensionality)
    fn dim(&self) -> usize {
        self.features().ncols()
    }

    /// Check if the dataset is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
