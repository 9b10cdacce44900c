// src/eigen.rs

use log::trace;
use ndarray::{s, Array1, Array2, ArrayView2, Axis};
use ndarray_linalg::c64;
use std::cmp::Ordering;

use crate::error::PcaError;
use crate::linalg_backends::{BackendEig, BackendEigh, EigOutput, LinAlgBackendProvider};

/// Eigenvalues and their eigenvectors, ordered by descending eigenvalue.
///
/// `eigenvectors.column(i)` is the eigenvector of `eigenvalues[i]`.
#[derive(Debug, Clone)]
pub struct EigenDecomposition<A> {
    pub eigenvalues: Array1<A>,
    pub eigenvectors: Array2<A>,
}

impl<A: Clone> EigenDecomposition<A> {
    /// Number of eigenpairs.
    pub fn len(&self) -> usize {
        self.eigenvalues.len()
    }

    /// True when there are no eigenpairs.
    pub fn is_empty(&self) -> bool {
        self.eigenvalues.is_empty()
    }

    /// The first `k` eigenvalues and the first `k` eigenvector columns.
    /// `k` is clamped to the number of eigenpairs.
    pub fn leading(&self, k: usize) -> EigenDecomposition<A> {
        let k = k.min(self.len());
        EigenDecomposition {
            eigenvalues: self.eigenvalues.slice(s![..k]).to_owned(),
            eigenvectors: self.eigenvectors.slice(s![.., ..k]).to_owned(),
        }
    }
}

impl EigenDecomposition<c64> {
    /// Converts to a real decomposition spanning the same subspaces.
    ///
    /// Real eigenpairs keep the real part of their eigenvector. A conjugate pair
    /// `λ ± iμ` with eigenvectors `v` and `v̄` stored in adjacent columns becomes
    /// the columns `Re(v)` and `Im(v)`, both paired with `Re(λ)`. Taking `Re(v)`
    /// twice would leave two identical columns.
    pub fn into_real(self) -> EigenDecomposition<f64> {
        let eigenvalues = self.eigenvalues.mapv(|z| z.re);
        let mut eigenvectors = self.eigenvectors.mapv(|z| z.re);

        let n = self.eigenvalues.len();
        let mut j = 0;
        while j < n {
            let z = self.eigenvalues[j];
            if z.im != 0.0 && j + 1 < n && self.eigenvalues[j + 1] == z.conj() {
                trace!("Splitting conjugate eigenpair {} at columns {} and {}", z, j, j + 1);
                let imaginary = self.eigenvectors.column(j).mapv(|v| v.im);
                eigenvectors.column_mut(j + 1).assign(&imaginary);
                j += 2;
            } else {
                j += 1;
            }
        }

        EigenDecomposition {
            eigenvalues,
            eigenvectors,
        }
    }

    /// Largest absolute imaginary part across the eigenvalues.
    pub fn max_imaginary_eigenvalue(&self) -> f64 {
        self.eigenvalues.iter().fold(0.0_f64, |acc, z| acc.max(z.im.abs()))
    }
}

/// Indices that order `values` from largest to smallest.
///
/// The sort is stable: values comparing equal keep their original relative order.
/// Incomparable values (NaN) are treated as equal.
pub fn argsort_descending<T, C>(values: &[T], mut cmp: C) -> Vec<usize>
where
    C: FnMut(&T, &T) -> Option<Ordering>,
{
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| cmp(&values[b], &values[a]).unwrap_or(Ordering::Equal));
    indices
}

/// Orders complex numbers by real part, then by imaginary part.
fn lexicographic_complex_cmp(a: &c64, b: &c64) -> Option<Ordering> {
    match a.re.partial_cmp(&b.re)? {
        Ordering::Equal => a.im.partial_cmp(&b.im),
        ord => Some(ord),
    }
}

fn sort_descending<A, C>(output: EigOutput<A>, cmp: C) -> EigenDecomposition<A>
where
    A: Clone,
    C: FnMut(&A, &A) -> Option<Ordering>,
{
    let values = output.eigenvalues.to_vec();
    let sort_indices = argsort_descending(&values, cmp);
    trace!("Eigenvalue sort indices: {:?}", sort_indices);

    // Columns, not rows: column j of the backend output is the eigenvector of value j.
    EigenDecomposition {
        eigenvalues: output.eigenvalues.select(Axis(0), &sort_indices),
        eigenvectors: output.eigenvectors.select(Axis(1), &sort_indices),
    }
}

fn check_square(matrix: &ArrayView2<f64>) -> Result<usize, PcaError> {
    let (rows, cols) = matrix.dim();
    if rows != cols || rows == 0 {
        return Err(PcaError::shape("eigendecomposition input (expected non-empty square)", matrix.shape()));
    }
    Ok(rows)
}

/// Computes the eigenpairs of a square matrix with the general solver,
/// sorted by descending eigenvalue.
///
/// Symmetry is not required, so eigenpairs may be complex. They are ordered
/// by real part, then imaginary part. For a covariance matrix they are real up
/// to rounding noise.
///
/// # Errors
/// Returns `PcaError::Shape` if the matrix is empty or not square, and
/// `PcaError::Convergence` if the backend fails to decompose it.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use pca_reconstruct::eig;
///
/// let s = array![[2.0, 0.0], [0.0, 5.0]];
/// let decomposition = eig(s.view()).unwrap();
/// assert!((decomposition.eigenvalues[0].re - 5.0).abs() < 1e-12);
/// assert!((decomposition.eigenvalues[1].re - 2.0).abs() < 1e-12);
/// ```
pub fn eig(matrix: ArrayView2<f64>) -> Result<EigenDecomposition<c64>, PcaError> {
    let dim = check_square(&matrix)?;
    let output = LinAlgBackendProvider::<f64>::new()
        .eig(&matrix.to_owned())
        .map_err(|source| PcaError::Convergence { dim, source })?;
    Ok(sort_descending(output, lexicographic_complex_cmp))
}

/// Computes the eigenpairs of a symmetric matrix, sorted by descending eigenvalue.
///
/// Only the upper triangle is read. The eigenpairs are real and the
/// eigenvectors orthonormal.
///
/// # Errors
/// Returns `PcaError::Shape` if the matrix is empty or not square, and
/// `PcaError::Convergence` if the backend fails to decompose it.
pub fn eig_symmetric(matrix: ArrayView2<f64>) -> Result<EigenDecomposition<f64>, PcaError> {
    let dim = check_square(&matrix)?;
    let output = LinAlgBackendProvider::<f64>::new()
        .eigh_upper(&matrix.to_owned())
        .map_err(|source| PcaError::Convergence { dim, source })?;
    Ok(sort_descending(output, |a: &f64, b: &f64| a.partial_cmp(b)))
}
