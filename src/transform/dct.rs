//! Trigonometric transforms (DCT-II/III, DST-II/III) of real matrices
//!
//! Same line engine as the FFT: separable, in place, axes of length 0 or 1
//! untouched. The type-III transforms are the (unnormalized) inverses of
//! the type-II ones; with `scale` set they divide by `len / 2` per
//! transformed axis, which makes the scaled type-III call the exact
//! inverse of the matching type-II call.

use rustdct::DctNum;

use super::{for_each_line_start, DctPlans};
use crate::dtype::{Element, RealElement};
use crate::matrix::Matrix;

/// Which type-2/3 kernel to run on each line
#[derive(Clone, Copy)]
enum TrigKind {
    Dct2,
    Dct3,
    Dst2,
    Dst3,
}

impl<S, const N: usize> Matrix<S, N>
where
    S: RealElement + DctNum,
{
    /// In-place DCT-II along every axis
    pub fn dct2(&mut self, plans: &DctPlans<S>) {
        trig_axes(self, plans, TrigKind::Dct2, false);
    }

    /// In-place DCT-III along every axis
    ///
    /// With `scale` set this is the exact inverse of [`dct2`](Self::dct2).
    pub fn dct3(&mut self, plans: &DctPlans<S>, scale: bool) {
        trig_axes(self, plans, TrigKind::Dct3, scale);
    }

    /// In-place DST-II along every axis
    pub fn dst2(&mut self, plans: &DctPlans<S>) {
        trig_axes(self, plans, TrigKind::Dst2, false);
    }

    /// In-place DST-III along every axis
    ///
    /// With `scale` set this is the exact inverse of [`dst2`](Self::dst2).
    pub fn dst3(&mut self, plans: &DctPlans<S>, scale: bool) {
        trig_axes(self, plans, TrigKind::Dst3, scale);
    }
}

fn trig_axes<S, const N: usize>(
    m: &mut Matrix<S, N>,
    plans: &DctPlans<S>,
    kind: TrigKind,
    scale: bool,
) where
    S: RealElement + DctNum,
{
    let shape = m.shape();
    let mr: &Matrix<S, N> = m;
    let mut factor = 1.0f64;
    for axis in 0..N {
        let len = shape[axis];
        if len < 2 {
            continue;
        }
        factor *= 2.0 / len as f64;
        let plan = plans.type23(len);
        let mut line = vec![<S as Element>::zero(); len];
        for_each_line_start(shape, axis, |mut idx| {
            for (t, slot) in line.iter_mut().enumerate() {
                idx[axis] = t;
                *slot = unsafe { mr.get_unchecked(idx) };
            }
            match kind {
                TrigKind::Dct2 => plan.process_dct2(&mut line),
                TrigKind::Dct3 => plan.process_dct3(&mut line),
                TrigKind::Dst2 => plan.process_dst2(&mut line),
                TrigKind::Dst3 => plan.process_dst3(&mut line),
            }
            for (t, &v) in line.iter().enumerate() {
                idx[axis] = t;
                unsafe { mr.buf.store(mr.map.flat(idx), v) };
            }
        });
    }
    if scale && factor != 1.0 {
        m.scale(<S as Element>::from_f64(factor));
    }
}
