// src/linalg_backends.rs

use ndarray::{Array1, Array2};
use ndarray_linalg::{c64, Eig as NdLinalgEig, Eigh as NdLinalgEigh, Inverse as NdLinalgInverse, UPLO};
use std::marker::PhantomData;

use crate::error::BackendError;

/// Dispatches the linear algebra primitives to the backend selected at compile time.
#[derive(Debug, Default, Copy, Clone)]
pub struct LinAlgBackendProvider<F: 'static + Copy + Send + Sync> {
    _phantom: PhantomData<F>,
}

impl<F: 'static + Copy + Send + Sync> LinAlgBackendProvider<F> {
    pub fn new() -> Self {
        Self { _phantom: PhantomData }
    }
}

// --- Trait Definitions ---

/// Raw output of an eigendecomposition, in whatever order the backend produced it.
#[derive(Debug)]
pub struct EigOutput<E: 'static> {
    pub eigenvalues: Array1<E>,
    /// eigenvectors.column(i) corresponds to eigenvalues[i].
    pub eigenvectors: Array2<E>,
}

/// General (non-symmetric) eigendecomposition, like LAPACK's DGEEV.
/// Eigenpairs of a real matrix may be complex.
pub trait BackendEig<F: 'static + Copy + Send + Sync> {
    fn eig(&self, matrix: &Array2<F>) -> Result<EigOutput<c64>, BackendError>;
}

/// Symmetric eigendecomposition, like LAPACK's DSYEV. Only the upper triangle is read.
pub trait BackendEigh<F: 'static + Copy + Send + Sync> {
    fn eigh_upper(&self, matrix: &Array2<F>) -> Result<EigOutput<F>, BackendError>;
}

/// Inverse of a square matrix via LU factorization, like LAPACK's DGETRF/DGETRI.
pub trait BackendInverse<F: 'static + Copy + Send + Sync> {
    fn inverse(&self, matrix: &Array2<F>) -> Result<Array2<F>, BackendError>;
}

// --- ndarray-linalg backend ---

#[derive(Debug, Default, Copy, Clone)]
pub struct NdarrayLinAlgBackend;

fn to_dyn_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> BackendError {
    Box::new(e)
}

impl BackendEig<f64> for NdarrayLinAlgBackend {
    fn eig(&self, matrix: &Array2<f64>) -> Result<EigOutput<c64>, BackendError> {
        let (eigenvalues, eigenvectors) = matrix.eig().map_err(to_dyn_error)?;
        Ok(EigOutput { eigenvalues, eigenvectors })
    }
}

impl BackendEigh<f64> for NdarrayLinAlgBackend {
    fn eigh_upper(&self, matrix: &Array2<f64>) -> Result<EigOutput<f64>, BackendError> {
        let (eigenvalues, eigenvectors) = matrix.eigh(UPLO::Upper).map_err(to_dyn_error)?;
        Ok(EigOutput { eigenvalues, eigenvectors })
    }
}

impl BackendInverse<f64> for NdarrayLinAlgBackend {
    fn inverse(&self, matrix: &Array2<f64>) -> Result<Array2<f64>, BackendError> {
        matrix.inv().map_err(to_dyn_error)
    }
}

// --- Provider dispatch ---

impl<F> BackendEig<F> for LinAlgBackendProvider<F>
where
    F: 'static + Copy + Send + Sync,
    NdarrayLinAlgBackend: BackendEig<F>,
{
    fn eig(&self, matrix: &Array2<F>) -> Result<EigOutput<c64>, BackendError> {
        NdarrayLinAlgBackend.eig(matrix)
    }
}

impl<F> BackendEigh<F> for LinAlgBackendProvider<F>
where
    F: 'static + Copy + Send + Sync,
    NdarrayLinAlgBackend: BackendEigh<F>,
{
    fn eigh_upper(&self, matrix: &Array2<F>) -> Result<EigOutput<F>, BackendError> {
        NdarrayLinAlgBackend.eigh_upper(matrix)
    }
}

impl<F> BackendInverse<F> for LinAlgBackendProvider<F>
where
    F: 'static + Copy + Send + Sync,
    NdarrayLinAlgBackend: BackendInverse<F>,
{
    fn inverse(&self, matrix: &Array2<F>) -> Result<Array2<F>, BackendError> {
        NdarrayLinAlgBackend.inverse(matrix)
    }
}
