// src/pipeline.rs

use log::{debug, info, warn};
use ndarray::{Array2, ArrayView2, Axis};

use crate::eigen::{eig, eig_symmetric, EigenDecomposition};
use crate::error::PcaError;
use crate::model::PcaOutput;
use crate::normalize::normalize;
use crate::projection::projection_matrix;

/// Which eigen solver decomposes the covariance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EigenSolverKind {
    /// General solver; eigenpairs come back complex and are converted to a real basis.
    General,
    /// Symmetric solver; reads the upper triangle and returns real, orthonormal eigenpairs.
    #[default]
    Symmetric,
}

/// Configuration for the PCA reconstruction pipeline.
#[derive(Debug, Clone)]
pub struct PcaConfig {
    /// Solver used for the covariance matrix.
    pub eigen_solver: EigenSolverKind,
    /// Imaginary parts of retained eigenvalues above this magnitude
    /// (relative to the largest eigenvalue) are logged before being dropped.
    pub imaginary_tolerance: f64,
}

impl Default for PcaConfig {
    fn default() -> Self {
        PcaConfig {
            eigen_solver: EigenSolverKind::Symmetric,
            imaginary_tolerance: 1e-9,
        }
    }
}

/// Runs centering, covariance, eigendecomposition, projection and reconstruction
/// as one pure computation.
#[derive(Debug, Clone, Default)]
pub struct PcaPipeline {
    config: PcaConfig,
}

/// Biased covariance of already centered data: `XᵀX / n_samples`.
///
/// # Errors
/// Returns `PcaError::Shape` if the matrix has zero samples.
pub fn covariance_matrix(centered: ArrayView2<f64>) -> Result<Array2<f64>, PcaError> {
    let n_samples = centered.nrows();
    if n_samples == 0 {
        return Err(PcaError::shape("covariance input (zero samples)", centered.shape()));
    }
    let mut cov_matrix = centered.t().dot(&centered);
    cov_matrix /= n_samples as f64;
    Ok(cov_matrix)
}

/// Columns with a norm at or below this are left unscaled.
const MIN_COLUMN_NORM: f64 = 1e-12;

/// Rescales each column to unit length. Near-zero columns are left as they are.
fn normalize_columns(mut basis: Array2<f64>) -> Array2<f64> {
    for mut col in basis.axis_iter_mut(Axis(1)) {
        let norm = col.dot(&col).sqrt();
        if norm > MIN_COLUMN_NORM {
            col.mapv_inplace(|x| x / norm);
        }
    }
    basis
}

impl PcaPipeline {
    pub fn new(config: PcaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PcaConfig {
        &self.config
    }

    fn sorted_eigenpairs(&self, cov_matrix: &Array2<f64>, num_components: usize) -> Result<EigenDecomposition<f64>, PcaError> {
        match self.config.eigen_solver {
            EigenSolverKind::Symmetric => Ok(eig_symmetric(cov_matrix.view())?.leading(num_components)),
            EigenSolverKind::General => {
                let decomposition = eig(cov_matrix.view())?;
                let top = decomposition.leading(num_components);
                let largest = top.eigenvalues.iter().fold(0.0_f64, |acc, z| acc.max(z.norm()));
                let imaginary = top.max_imaginary_eigenvalue();
                if imaginary > self.config.imaginary_tolerance * largest.max(1.0) {
                    warn!(
                        "Discarding imaginary eigenvalue parts up to {:e}; the covariance matrix may not be symmetric.",
                        imaginary
                    );
                }
                // Conjugate pairs are split before truncation so both halves stay distinct.
                Ok(decomposition.into_real().leading(num_components))
            }
        }
    }

    /// Reconstructs the data from its top `num_components` principal components.
    ///
    /// 1. Centers the data and records the per-feature mean.
    /// 2. Builds the biased covariance matrix `XcᵀXc / n_samples`.
    /// 3. Decomposes it and keeps the eigenpairs with the largest eigenvalues.
    /// 4. Projects the centered data onto their span and adds the mean back.
    ///
    /// * `data_matrix` - Input data, shape (n_samples, n_features). Not modified.
    /// * `num_components` - Number of components to keep, in `1..=n_features`.
    ///
    /// # Errors
    /// - `PcaError::Shape` / `PcaError::NonFinite` for invalid data.
    /// - `PcaError::ComponentCount` if `num_components` is 0 or exceeds n_features.
    /// - `PcaError::Convergence` if the eigendecomposition fails.
    /// - `PcaError::SingularMatrix` if the selected components are degenerate.
    pub fn run(&self, data_matrix: ArrayView2<f64>, num_components: usize) -> Result<PcaOutput, PcaError> {
        let (n_samples, n_features) = data_matrix.dim();
        let (centered, mean) = normalize(data_matrix)?;
        if num_components == 0 || num_components > n_features {
            return Err(PcaError::ComponentCount {
                requested: num_components,
                max: n_features,
            });
        }
        info!(
            "Starting PCA reconstruction. Samples={}, Features={}, Components={}, Solver={:?}",
            n_samples, n_features, num_components, self.config.eigen_solver
        );

        let cov_matrix = covariance_matrix(centered.view())?;
        let total_variance = cov_matrix.diag().sum();

        let top = self.sorted_eigenpairs(&cov_matrix, num_components)?;
        debug!("Principal values: {:?}", top.eigenvalues);
        let principal_components = normalize_columns(top.eigenvectors);

        let projection = projection_matrix(principal_components.view())?;
        let reconstruction = projection.dot(&centered.t()).reversed_axes() + &mean;

        Ok(PcaOutput {
            reconstruction,
            mean,
            principal_values: top.eigenvalues,
            principal_components,
            projection,
            total_variance,
        })
    }
}

/// Reconstructs `data_matrix` from its top `num_components` principal components
/// using the default configuration.
///
/// See [`PcaPipeline::run`].
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use pca_reconstruct::pca;
///
/// let x = array![[3.0, 6.0, 7.0], [8.0, 9.0, 0.0], [1.0, 5.0, 2.0]];
/// let output = pca(x.view(), 1).unwrap();
/// assert_eq!(output.reconstruction().dim(), (3, 3));
/// assert_eq!(output.principal_values().len(), 1);
/// ```
pub fn pca(data_matrix: ArrayView2<f64>, num_components: usize) -> Result<PcaOutput, PcaError> {
    PcaPipeline::default().run(data_matrix, num_components)
}
