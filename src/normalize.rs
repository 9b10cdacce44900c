// src/normalize.rs

use ndarray::{Array1, Array2, ArrayD, ArrayView2, Axis, Ix2};

use crate::error::PcaError;

/// Converts a dynamic-rank array into a dataset matrix of shape (n_samples, n_features).
///
/// # Errors
/// Returns `PcaError::Shape` if the array is not two-dimensional.
pub fn ensure_matrix(data: ArrayD<f64>) -> Result<Array2<f64>, PcaError> {
    let shape = data.shape().to_vec();
    data.into_dimensionality::<Ix2>()
        .map_err(|_| PcaError::Shape { context: "dataset (expected rank 2)", shape })
}

/// Centers the dataset so every feature (column) has zero mean.
///
/// * `data_matrix` - Input data, shape (n_samples, n_features). Not modified.
///
/// Returns `(centered, mean)` where `mean` has length n_features and
/// `centered + mean == data_matrix`.
///
/// # Errors
/// Returns `PcaError::Shape` if the matrix has zero samples or zero features,
/// and `PcaError::NonFinite` if any entry is NaN or infinite.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use pca_reconstruct::normalize;
///
/// let x = array![[1.0, 2.0], [3.0, 6.0]];
/// let (centered, mean) = normalize(x.view()).unwrap();
/// assert_eq!(mean, array![2.0, 4.0]);
/// assert_eq!(centered, array![[-1.0, -2.0], [1.0, 2.0]]);
/// ```
pub fn normalize(data_matrix: ArrayView2<f64>) -> Result<(Array2<f64>, Array1<f64>), PcaError> {
    let (n_samples, n_features) = data_matrix.dim();
    if n_samples == 0 || n_features == 0 {
        return Err(PcaError::shape("dataset (zero samples or features)", data_matrix.shape()));
    }
    if let Some(((row, col), &value)) = data_matrix.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(PcaError::NonFinite { row, col, value });
    }

    let mean_vector = data_matrix
        .mean_axis(Axis(0))
        .ok_or_else(|| PcaError::shape("dataset (mean of empty axis)", data_matrix.shape()))?;
    let centered = &data_matrix - &mean_vector;

    Ok((centered, mean_vector))
}
