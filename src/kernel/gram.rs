//! Gram (kernel) matrix construction

use ndarray::{Array2, ArrayView2};

use crate::kernel::Kernel;

/// Build the symmetric N x N Gram matrix for a feature matrix.
///
/// Entry (i, j) is K(x_i, x_j), one scalar kernel evaluation per cell. Only
/// the upper triangle is evaluated; the lower triangle is mirrored, so the
/// result is exactly symmetric. The function is pure: it depends only on its
/// arguments and allocates a fresh matrix on every call.
pub fn gram_matrix<K: Kernel + ?Sized>(features: ArrayView2<'_, f64>, kernel: &K) -> Array2<f64> {
    let n = features.nrows();
    let mut gram = Array2::zeros((n, n));
    for i in 0..n {
        for j in i..n {
            let value = kernel.compute(features.row(i), features.row(j));
            gram[[i, j]] = value;
            gram[[j, i]] = value;
        }
    }
    gram
}
