//! Spectral transforms: FFT, DCT, and DST over matrix lines
//!
//! Transforms are separable: a rank-N transform runs the 1-D kernel along
//! every line of every axis in turn. Lines are gathered into a scratch
//! buffer, processed in place, and scattered back, so strided and selected
//! views transform just like compact matrices.
//!
//! Planning is explicit. A [`FftPlans`] or [`DctPlans`] value owns the
//! planner (and its cache of twiddle tables) behind a mutex; callers create
//! one, share it, and pass it to every transform call. Nothing is stashed
//! in process-wide state, and dropping the plans frees every cached table.

mod dct;
mod fft;

use std::sync::Arc;

use parking_lot::Mutex;
use rustdct::{DctPlanner, TransformType2And3};
use rustfft::{Fft, FftNum, FftPlanner};

/// Shared FFT planner with its algorithm cache
pub struct FftPlans<S: FftNum> {
    planner: Mutex<FftPlanner<S>>,
}

impl<S: FftNum> FftPlans<S> {
    /// Create an empty plan cache
    pub fn new() -> Self {
        Self {
            planner: Mutex::new(FftPlanner::new()),
        }
    }

    /// Forward FFT algorithm for lines of length `len`
    pub(crate) fn forward(&self, len: usize) -> Arc<dyn Fft<S>> {
        log::debug!("planning forward fft of length {len}");
        self.planner.lock().plan_fft_forward(len)
    }

    /// Inverse FFT algorithm for lines of length `len`
    pub(crate) fn inverse(&self, len: usize) -> Arc<dyn Fft<S>> {
        log::debug!("planning inverse fft of length {len}");
        self.planner.lock().plan_fft_inverse(len)
    }
}

impl<S: FftNum> Default for FftPlans<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared DCT/DST planner with its algorithm cache
pub struct DctPlans<S: rustdct::DctNum> {
    planner: Mutex<DctPlanner<S>>,
}

impl<S: rustdct::DctNum> DctPlans<S> {
    /// Create an empty plan cache
    pub fn new() -> Self {
        Self {
            planner: Mutex::new(DctPlanner::new()),
        }
    }

    /// Type-II/III algorithm for lines of length `len`
    ///
    /// One algorithm object serves DCT-II, DCT-III, DST-II, and DST-III.
    pub(crate) fn type23(&self, len: usize) -> Arc<dyn TransformType2And3<S>> {
        log::debug!("planning type-2/3 trig transform of length {len}");
        self.planner.lock().plan_dct2(len)
    }
}

impl<S: rustdct::DctNum> Default for DctPlans<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Visit the starting coordinate of every line along `axis`
///
/// The visited coordinate has zero at `axis`; the other axes run through
/// their full odometer. No lines are visited when any axis is empty.
pub(crate) fn for_each_line_start<const N: usize>(
    shape: [usize; N],
    axis: usize,
    mut f: impl FnMut([usize; N]),
) {
    if shape.iter().any(|&s| s == 0) {
        return;
    }
    let outer: usize = shape
        .iter()
        .enumerate()
        .filter(|&(a, _)| a != axis)
        .map(|(_, &s)| s)
        .product();
    let mut idx = [0usize; N];
    for _ in 0..outer {
        f(idx);
        for a in (0..N).rev() {
            if a == axis {
                continue;
            }
            idx[a] += 1;
            if idx[a] < shape[a] {
                break;
            }
            idx[a] = 0;
        }
    }
}
