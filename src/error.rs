// src/error.rs

use std::error::Error as StdError;
use std::path::PathBuf;
use thiserror::Error;

/// A thread-safe boxed error, as reported by the linear algebra backends.
pub type BackendError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors reported by the normalizer, the eigen solver, the projection builder
/// and the PCA pipeline.
///
/// None of these are transient: they describe either invalid input or a
/// numerical failure, and are surfaced to the caller unchanged.
#[derive(Debug, Error)]
pub enum PcaError {
    /// Input has the wrong rank, a zero dimension, or a shape that does not
    /// match what the operation expects.
    #[error("invalid shape for {context}: got {shape:?}")]
    Shape {
        context: &'static str,
        shape: Vec<usize>,
    },

    /// Input contains a NaN or infinite entry.
    #[error("non-finite value {value} at row {row}, column {col}")]
    NonFinite { row: usize, col: usize, value: f64 },

    /// Requested component count is outside `[1, max]`.
    #[error("num_components must be in [1, {max}], got {requested}")]
    ComponentCount { requested: usize, max: usize },

    /// A matrix that had to be inverted is singular.
    #[error("singular {dim}x{dim} matrix: {reason}")]
    SingularMatrix { dim: usize, reason: String },

    /// The eigendecomposition did not converge.
    #[error("eigendecomposition of {dim}x{dim} matrix failed to converge: {source}")]
    Convergence {
        dim: usize,
        #[source]
        source: BackendError,
    },

    /// Saving or loading a fitted model failed.
    #[error("model persistence failed for {path:?}: {message}")]
    Persistence { path: PathBuf, message: String },
}

impl PcaError {
    pub(crate) fn shape(context: &'static str, shape: &[usize]) -> Self {
        PcaError::Shape {
            context,
            shape: shape.to_vec(),
        }
    }
}
