// Principal component reconstruction

#![doc = include_str!("../README.md")]

pub mod eigen;
pub mod error;
pub mod linalg_backends;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod projection;

pub use eigen::{argsort_descending, eig, eig_symmetric, EigenDecomposition};
pub use error::{BackendError, PcaError};
pub use model::PcaOutput;
pub use normalize::{ensure_matrix, normalize};
pub use pipeline::{covariance_matrix, pca, EigenSolverKind, PcaConfig, PcaPipeline};
pub use projection::projection_matrix;

/// Complex scalar used for eigenpairs of the general solver.
pub use ndarray_linalg::c64;
