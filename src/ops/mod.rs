//! Bulk operations on dense matrices
//!
//! Split by concern: [`apply`] holds the elementwise engine, [`aggregate`]
//! the reduction engine, [`matmul`] the blocked multiply, and [`stencil`]
//! the neighborhood sweeps. All of them are implemented as inherent
//! methods on [`Matrix`](crate::matrix::Matrix) and its rank aliases.

pub mod aggregate;
pub mod apply;
pub mod matmul;
pub mod stencil;
