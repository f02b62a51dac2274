//! Element types for matrix cells
//!
//! Matrices are generic over an [`Element`] type known at compile time.
//! Real matrices use `f32`/`f64`; complex matrices use [`Complex64`] /
//! [`Complex128`], which occupy two consecutive scalar slots in the backing
//! buffer (interleaved re/im, matching numpy and FFTW conventions).

mod complex;
mod element;

pub use complex::{Complex, Complex64, Complex128};
pub use element::{Element, RealElement};
