//! Conflict graph construction and spectral bisection.
//!
//! # Stages
//!
//! - [`ConflictGraphBuilder`]: enrollments → weighted exam conflict graph
//! - [`LaplacianPartitioner`]: conflict graph → two exam groups via the
//!   Fiedler vector of the graph Laplacian
//!
//! The eigen-decomposition is delegated to `nalgebra::SymmetricEigen`.

mod builder;
mod laplacian;

pub use builder::ConflictGraphBuilder;
pub use laplacian::{Laplacian, LaplacianPartitioner, Spectrum};
