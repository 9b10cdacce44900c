// src/model.rs

use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::PcaError;

/// Result of one PCA reconstruction run.
///
/// Holds the reconstruction of the input data together with everything
/// needed to apply the same projection to new samples: the sample mean, the
/// retained principal values and components, and the projection matrix.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PcaOutput {
    /// Input data projected onto the principal subspace, then shifted back by the mean.
    /// Shape: (n_samples, n_features)
    pub(crate) reconstruction: Array2<f64>,
    /// Per-feature mean of the input data.
    /// Shape: (n_features)
    pub(crate) mean: Array1<f64>,
    /// Largest eigenvalues of the covariance matrix, in descending order.
    /// Shape: (k_components)
    pub(crate) principal_values: Array1<f64>,
    /// Eigenvectors matching `principal_values`, one per column, unit length.
    /// Shape: (n_features, k_components)
    pub(crate) principal_components: Array2<f64>,
    /// Orthogonal projection onto the span of `principal_components`.
    /// Shape: (n_features, n_features)
    pub(crate) projection: Array2<f64>,
    /// Trace of the covariance matrix.
    pub(crate) total_variance: f64,
}

impl PcaOutput {
    pub fn reconstruction(&self) -> &Array2<f64> {
        &self.reconstruction
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn principal_values(&self) -> &Array1<f64> {
        &self.principal_values
    }

    pub fn principal_components(&self) -> &Array2<f64> {
        &self.principal_components
    }

    pub fn projection(&self) -> &Array2<f64> {
        &self.projection
    }

    pub fn total_variance(&self) -> f64 {
        self.total_variance
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn n_components(&self) -> usize {
        self.principal_values.len()
    }

    /// Splits the output into `(reconstruction, mean, principal_values, principal_components)`.
    pub fn into_parts(self) -> (Array2<f64>, Array1<f64>, Array1<f64>, Array2<f64>) {
        (
            self.reconstruction,
            self.mean,
            self.principal_values,
            self.principal_components,
        )
    }

    /// Fraction of the total variance carried by each retained component.
    ///
    /// All zeros when the data has no variance.
    pub fn explained_variance_ratio(&self) -> Array1<f64> {
        if self.total_variance > 0.0 {
            &self.principal_values / self.total_variance
        } else {
            Array1::zeros(self.principal_values.len())
        }
    }

    /// Frobenius norm of `data_matrix - reconstruction`.
    ///
    /// # Errors
    /// Returns `PcaError::Shape` if `data_matrix` does not have the reconstruction's shape.
    pub fn reconstruction_error(&self, data_matrix: ArrayView2<f64>) -> Result<f64, PcaError> {
        if data_matrix.dim() != self.reconstruction.dim() {
            return Err(PcaError::shape("reconstruction error input", data_matrix.shape()));
        }
        let residual = &data_matrix - &self.reconstruction;
        Ok(residual.iter().map(|v| v * v).sum::<f64>().sqrt())
    }

    fn check_features(&self, x: &ArrayView2<f64>, context: &'static str) -> Result<(), PcaError> {
        if x.ncols() != self.n_features() {
            return Err(PcaError::shape(context, x.shape()));
        }
        Ok(())
    }

    /// Coordinates of new samples along the principal components.
    ///
    /// * `x` - Samples, shape (m_samples, n_features).
    ///
    /// Returns scores of shape (m_samples, k_components).
    ///
    /// # Errors
    /// Returns `PcaError::Shape` if the feature dimension does not match.
    pub fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>, PcaError> {
        self.check_features(&x, "transform input (feature count mismatch)")?;
        let centered = &x - &self.mean;
        Ok(centered.dot(&self.principal_components))
    }

    /// Projects new samples onto the principal subspace and maps them back to feature space.
    ///
    /// Applied to the data the output was computed from, this returns `reconstruction()`.
    ///
    /// # Errors
    /// Returns `PcaError::Shape` if the feature dimension does not match.
    pub fn reconstruct(&self, x: ArrayView2<f64>) -> Result<Array2<f64>, PcaError> {
        self.check_features(&x, "reconstruct input (feature count mismatch)")?;
        let centered = &x - &self.mean;
        let projected = self.projection.dot(&centered.t()).reversed_axes();
        Ok(projected + &self.mean)
    }

    /// Saves the output to a file using bincode.
    ///
    /// # Errors
    /// Returns `PcaError::Persistence` if file I/O or serialization fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PcaError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| persistence_error(path, format!("failed to create file: {}", e)))?;
        let mut writer = BufWriter::new(file);

        bincode::serde::encode_into_std_write(self, &mut writer, bincode::config::standard())
            .map_err(|e| persistence_error(path, format!("failed to serialize output: {}", e)))?;
        Ok(())
    }

    /// Loads an output previously written by `save`.
    ///
    /// # Errors
    /// Returns `PcaError::Persistence` if file I/O or deserialization fails,
    /// or if the loaded arrays have inconsistent dimensions or non-finite values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PcaError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| persistence_error(path, format!("failed to open file: {}", e)))?;
        let mut reader = BufReader::new(file);

        let output: PcaOutput = bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())
            .map_err(|e| persistence_error(path, format!("failed to deserialize output: {}", e)))?;
        output
            .validate()
            .map_err(|message| persistence_error(path, message))?;
        Ok(output)
    }

    fn validate(&self) -> Result<(), String> {
        let d = self.mean.len();
        let k = self.principal_values.len();
        if self.principal_components.dim() != (d, k) {
            return Err(format!(
                "principal components have shape {:?}, expected ({}, {})",
                self.principal_components.dim(),
                d,
                k
            ));
        }
        if self.projection.dim() != (d, d) {
            return Err(format!(
                "projection has shape {:?}, expected ({}, {})",
                self.projection.dim(),
                d,
                d
            ));
        }
        if self.reconstruction.ncols() != d {
            return Err(format!(
                "reconstruction has {} features, expected {}",
                self.reconstruction.ncols(),
                d
            ));
        }
        let all_finite = self.mean.iter()
            .chain(self.principal_values.iter())
            .chain(self.principal_components.iter())
            .chain(self.projection.iter())
            .chain(self.reconstruction.iter())
            .all(|v| v.is_finite());
        if !all_finite || !self.total_variance.is_finite() {
            return Err("output contains non-finite values".to_string());
        }
        Ok(())
    }
}

fn persistence_error(path: &Path, message: String) -> PcaError {
    PcaError::Persistence {
        path: path.to_path_buf(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use tempfile::NamedTempFile;

    // Projection onto the first axis of a 2-feature dataset.
    fn axis_output() -> PcaOutput {
        PcaOutput {
            reconstruction: array![[0.0, 1.0], [2.0, 1.0]],
            mean: array![1.0, 1.0],
            principal_values: array![1.0],
            principal_components: array![[1.0], [0.0]],
            projection: array![[1.0, 0.0], [0.0, 0.0]],
            total_variance: 1.25,
        }
    }

    #[test]
    fn transform_returns_scores_along_components() {
        let output = axis_output();
        let scores = output.transform(array![[3.0, 5.0], [0.0, 0.0]].view()).unwrap();
        assert_abs_diff_eq!(scores, array![[2.0], [-1.0]], epsilon = 1e-12);
    }

    #[test]
    fn reconstruct_drops_the_orthogonal_direction() {
        let output = axis_output();
        let rebuilt = output.reconstruct(array![[3.0, 5.0]].view()).unwrap();
        assert_abs_diff_eq!(rebuilt, array![[3.0, 1.0]], epsilon = 1e-12);
    }

    #[test]
    fn reconstruction_error_is_frobenius_norm() {
        let output = axis_output();
        let x = array![[0.0, 4.0], [2.0, 5.0]];
        let err = output.reconstruction_error(x.view()).unwrap();
        assert!((err - 5.0).abs() < 1e-12);
        assert!(matches!(
            output.reconstruction_error(array![[1.0, 2.0]].view()),
            Err(PcaError::Shape { .. })
        ));
    }

    #[test]
    fn explained_variance_ratio_divides_by_total() {
        let output = axis_output();
        assert_abs_diff_eq!(output.explained_variance_ratio(), array![0.8], epsilon = 1e-12);

        let mut flat = axis_output();
        flat.total_variance = 0.0;
        assert_eq!(flat.explained_variance_ratio(), array![0.0]);
    }

    #[test]
    fn feature_mismatch_is_shape_error() {
        let output = axis_output();
        let wrong = array![[1.0, 2.0, 3.0]];
        assert!(matches!(output.transform(wrong.view()), Err(PcaError::Shape { .. })));
        assert!(matches!(output.reconstruct(wrong.view()), Err(PcaError::Shape { .. })));
    }

    #[test]
    fn save_load_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let original = axis_output();
        let temp_file = NamedTempFile::new()?;
        original.save(temp_file.path())?;
        let loaded = PcaOutput::load(temp_file.path())?;

        assert_eq!(loaded.reconstruction(), original.reconstruction());
        assert_eq!(loaded.mean(), original.mean());
        assert_eq!(loaded.principal_values(), original.principal_values());
        assert_eq!(loaded.principal_components(), original.principal_components());
        assert_eq!(loaded.projection(), original.projection());
        assert_eq!(loaded.total_variance(), original.total_variance());
        Ok(())
    }

    #[test]
    fn load_rejects_inconsistent_dimensions() -> Result<(), Box<dyn std::error::Error>> {
        let mut broken = axis_output();
        broken.projection = Array2::zeros((3, 3));
        let temp_file = NamedTempFile::new()?;
        broken.save(temp_file.path())?;
        assert!(matches!(
            PcaOutput::load(temp_file.path()),
            Err(PcaError::Persistence { .. })
        ));
        Ok(())
    }

    #[test]
    fn load_missing_file_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.bin");
        assert!(matches!(PcaOutput::load(&missing), Err(PcaError::Persistence { .. })));
    }
}
