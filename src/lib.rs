//! # matr
//!
//! **Strided dense and sparse matrices for 1-D, 2-D, and 3-D numerical work.**
//!
//! matr separates *what a matrix holds* (a flat shared buffer, or a hash map
//! of non-zero cells) from *how it is addressed* (an index map of sizes,
//! strides, and offsets). Every structural operation - transpose, sub-range,
//! subsample, flip, index selection - builds a new map over the same cells,
//! so views are free and writes through any view are visible through all.
//!
//! ## Features
//!
//! - **Dense matrices**: rank 1-3, `f32`/`f64` and interleaved complex cells
//! - **Zero-copy views**: transpose, part, strides, flip, and composable
//!   index selection
//! - **Elementwise engine**: fill, map, predicate-gated and binary assigns,
//!   with identity-skipping `scale` and `add_scaled`
//! - **Aggregates**: seeded folds, filtered and coordinate-list variants
//! - **Blocked multiply**: `C = alpha * op(A) * op(B) + beta * C` with a
//!   cache-blocked, unrolled kernel
//! - **Stencils**: 9-point and 27-point neighborhood sweeps
//! - **Sparse matrices**: hash-backed, with entry-driven multiplies
//! - **Transforms**: FFT, DCT-II/III, DST-II/III along every axis
//!
//! Bulk operations split across a rayon pool when the operand is large
//! enough; the [`par::ParallelConfig`] travels with each matrix, and
//! results are reproducible for a fixed configuration.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use matr::prelude::*;
//!
//! let a = Matrix2::from_slice(2, 2, &[1.0, 2.0, 3.0, 4.0])?;
//! let b = Matrix2::from_slice(2, 2, &[5.0, 6.0, 7.0, 8.0])?;
//!
//! let c = a.mult(&b, None, 1.0, 0.0, false, false)?;
//! let col = c.view_column(0)?;
//! assert_eq!(col.sum(), 19.0 + 43.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod buffer;
pub mod dtype;
pub mod error;
pub mod map;
pub mod matrix;
pub mod ops;
pub mod par;
pub mod sparse;
pub mod transform;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{Complex, Complex128, Complex64, Element, RealElement};
    pub use crate::error::{Error, Result};
    pub use crate::matrix::{Matrix, Matrix1, Matrix2, Matrix3};
    pub use crate::par::ParallelConfig;
    pub use crate::sparse::{SparseMatrix, SparseMatrix1, SparseMatrix2, SparseMatrix3};
    pub use crate::transform::{DctPlans, FftPlans};
}
