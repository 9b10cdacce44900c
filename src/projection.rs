// src/projection.rs

use log::debug;
use ndarray::{Array2, ArrayView2};

use crate::error::PcaError;
use crate::linalg_backends::{BackendInverse, LinAlgBackendProvider};

/// Builds the orthogonal projection matrix onto the column span of `basis`.
///
/// Computes `P = B (BᵀB)⁻¹ Bᵀ` for a basis `B` of shape (d_features, m_vectors).
/// The result has shape (d_features, d_features) and is symmetric and
/// idempotent when the columns of `B` are linearly independent. The columns
/// need not be orthonormal.
///
/// # Errors
/// Returns `PcaError::Shape` if the basis is empty, and
/// `PcaError::SingularMatrix` if `BᵀB` has no inverse: a column is zero,
/// there are more columns than rows, or the columns are linearly dependent.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use pca_reconstruct::projection_matrix;
///
/// // Projection onto the x axis.
/// let b = array![[2.0], [0.0]];
/// let p = projection_matrix(b.view()).unwrap();
/// assert_eq!(p, array![[1.0, 0.0], [0.0, 0.0]]);
/// ```
pub fn projection_matrix(basis: ArrayView2<f64>) -> Result<Array2<f64>, PcaError> {
    let (d_features, m_vectors) = basis.dim();
    if d_features == 0 || m_vectors == 0 {
        return Err(PcaError::shape("projection basis (zero rows or columns)", basis.shape()));
    }
    if m_vectors > d_features {
        return Err(PcaError::SingularMatrix {
            dim: m_vectors,
            reason: format!(
                "{} basis vectors in {} dimensions cannot be linearly independent",
                m_vectors, d_features
            ),
        });
    }
    if let Some(col) = basis
        .columns()
        .into_iter()
        .position(|column| column.iter().all(|&v| v == 0.0))
    {
        return Err(PcaError::SingularMatrix {
            dim: m_vectors,
            reason: format!("basis column {} is the zero vector", col),
        });
    }

    let gram = basis.t().dot(&basis);
    let gram_inverse = LinAlgBackendProvider::<f64>::new()
        .inverse(&gram)
        .map_err(|e| PcaError::SingularMatrix {
            dim: m_vectors,
            reason: e.to_string(),
        })?;
    if gram_inverse.iter().any(|v| !v.is_finite()) {
        return Err(PcaError::SingularMatrix {
            dim: m_vectors,
            reason: "inverse of the Gram matrix is not finite".to_string(),
        });
    }
    debug!(
        "Built projection onto {} basis vectors in {} dimensions",
        m_vectors, d_features
    );

    Ok(basis.dot(&gram_inverse).dot(&basis.t()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn projection_is_idempotent_and_symmetric() {
        let mut rng = ChaCha8Rng::seed_from_u64(1337);
        for m in 1..=4 {
            let b = Array2::<f64>::random_using((6, m), Uniform::new(-2.0, 2.0), &mut rng);
            let p = projection_matrix(b.view()).unwrap();
            assert_eq!(p.dim(), (6, 6));
            assert_abs_diff_eq!(p.dot(&p), p, epsilon = 1e-10);
            assert_abs_diff_eq!(p.t(), p.view(), epsilon = 1e-10);
            // Basis vectors are fixed points.
            assert_abs_diff_eq!(p.dot(&b), b, epsilon = 1e-10);
        }
    }

    #[test]
    fn trace_equals_subspace_dimension() {
        let b = array![[1.0, 1.0], [0.0, 1.0], [1.0, -1.0], [2.0, 0.5]];
        let p = projection_matrix(b.view()).unwrap();
        assert!((p.diag().sum() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn full_basis_projects_to_identity() {
        let b = array![[1.0, 2.0], [3.0, 4.0]];
        let p = projection_matrix(b.view()).unwrap();
        assert_abs_diff_eq!(p, Array2::<f64>::eye(2), epsilon = 1e-10);
    }

    #[test]
    fn zero_column_is_singular() {
        let b = array![[1.0, 0.0], [2.0, 0.0], [3.0, 0.0]];
        match projection_matrix(b.view()) {
            Err(PcaError::SingularMatrix { dim, .. }) => assert_eq!(dim, 2),
            other => panic!("expected SingularMatrix, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_columns_are_singular() {
        let b = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        assert!(matches!(
            projection_matrix(b.view()),
            Err(PcaError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn too_many_columns_are_singular() {
        let b = array![[1.0, 0.0, 1.0], [0.0, 1.0, 1.0]];
        assert!(matches!(
            projection_matrix(b.view()),
            Err(PcaError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn empty_basis_is_shape_error() {
        let b = Array2::<f64>::zeros((3, 0));
        assert!(matches!(projection_matrix(b.view()), Err(PcaError::Shape { .. })));
    }
}
