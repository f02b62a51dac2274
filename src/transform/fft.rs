//! Fourier transforms of complex and real matrices
//!
//! Transforms run in place on interleaved complex matrices. Axes of length
//! 0 or 1 are left untouched; the inverse scale factor covers exactly the
//! axes that were transformed, so `ifft(scale)` after `fft` restores the
//! input for every shape.

use rustfft::num_complex::Complex as FftComplex;
use rustfft::FftNum;

use super::{for_each_line_start, FftPlans};
use crate::dtype::{Complex, Element, RealElement};
use crate::matrix::Matrix;

impl<S, const N: usize> Matrix<Complex<S>, N>
where
    S: RealElement + FftNum,
{
    /// In-place forward FFT along every axis
    pub fn fft(&mut self, plans: &FftPlans<S>) {
        fft_axes(self, plans, false);
    }

    /// In-place inverse FFT along every axis
    ///
    /// With `scale` set the result is divided by the product of the
    /// transformed lengths, making `ifft` the exact inverse of
    /// [`fft`](Self::fft).
    pub fn ifft(&mut self, plans: &FftPlans<S>, scale: bool) {
        let factor = fft_axes(self, plans, true);
        if scale && factor != 1.0 {
            self.scale(Complex::from_f64(factor));
        }
    }
}

impl<S, const N: usize> Matrix<S, N>
where
    S: RealElement + FftNum,
{
    /// Forward FFT of a real matrix, producing a full complex spectrum
    pub fn fft_full(&self, plans: &FftPlans<S>) -> Matrix<Complex<S>, N> {
        let mut out = Matrix::from_fn(self.shape(), |idx| Complex {
            re: unsafe { self.get_unchecked(idx) },
            im: <S as Element>::zero(),
        });
        out.par = self.par;
        out.fft(plans);
        out
    }
}

/// Transform every axis of length >= 2; returns the inverse scale factor
/// for the transformed axes
fn fft_axes<S, const N: usize>(
    m: &mut Matrix<Complex<S>, N>,
    plans: &FftPlans<S>,
    inverse: bool,
) -> f64
where
    S: RealElement + FftNum,
{
    let shape = m.shape();
    let mr: &Matrix<Complex<S>, N> = m;
    let mut factor = 1.0f64;
    for axis in 0..N {
        let len = shape[axis];
        if len < 2 {
            continue;
        }
        factor /= len as f64;
        let plan = if inverse {
            plans.inverse(len)
        } else {
            plans.forward(len)
        };
        let zero = <S as Element>::zero();
        let mut line = vec![FftComplex::new(zero, zero); len];
        for_each_line_start(shape, axis, |mut idx| {
            for (t, slot) in line.iter_mut().enumerate() {
                idx[axis] = t;
                let v = unsafe { mr.get_unchecked(idx) };
                *slot = FftComplex::new(v.re, v.im);
            }
            plan.process(&mut line);
            for (t, &v) in line.iter().enumerate() {
                idx[axis] = t;
                unsafe { mr.buf.store(mr.map.flat(idx), Complex { re: v.re, im: v.im }) };
            }
        });
    }
    factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::Complex128;
    use crate::matrix::{Matrix1, Matrix2};

    fn close(a: Complex128, b: Complex128) -> bool {
        (a.re - b.re).abs() < 1e-9 && (a.im - b.im).abs() < 1e-9
    }

    #[test]
    fn test_fft_of_constant_is_delta() {
        let plans = FftPlans::new();
        let mut m = Matrix1::from_fn([8], |_| Complex { re: 1.0f64, im: 0.0 });
        m.fft(&plans);
        assert!(close(m.get([0]).unwrap(), Complex { re: 8.0, im: 0.0 }));
        for t in 1..8 {
            assert!(close(m.get([t]).unwrap(), Complex { re: 0.0, im: 0.0 }));
        }
    }

    #[test]
    fn test_fft_ifft_round_trip_1d() {
        let plans = FftPlans::new();
        let orig = Matrix1::from_fn([16], |[t]| Complex {
            re: (t as f64 * 0.7).sin(),
            im: (t as f64 * 1.3).cos(),
        });
        let mut m = orig.copy();
        m.fft(&plans);
        m.ifft(&plans, true);
        for t in 0..16 {
            assert!(close(m.get([t]).unwrap(), orig.get([t]).unwrap()));
        }
    }

    #[test]
    fn test_fft_ifft_round_trip_2d_odd_sizes() {
        let plans = FftPlans::new();
        let orig = Matrix2::from_fn([5, 7], |[r, c]| Complex {
            re: (r * 7 + c) as f64,
            im: (r as f64) - (c as f64),
        });
        let mut m = orig.copy();
        m.fft(&plans);
        m.ifft(&plans, true);
        for r in 0..5 {
            for c in 0..7 {
                assert!(close(m.get([r, c]).unwrap(), orig.get([r, c]).unwrap()));
            }
        }
    }

    #[test]
    fn test_fft_full_matches_complex_fft() {
        let plans = FftPlans::new();
        let real = Matrix1::from_fn([8], |[t]| (t as f64 * 0.9).sin());
        let spectrum = real.fft_full(&plans);

        let mut manual = Matrix1::from_fn([8], |[t]| Complex {
            re: (t as f64 * 0.9).sin(),
            im: 0.0,
        });
        manual.fft(&plans);
        for t in 0..8 {
            assert!(close(spectrum.get([t]).unwrap(), manual.get([t]).unwrap()));
        }
    }

    #[test]
    fn test_short_axes_untouched() {
        let plans = FftPlans::new();
        let mut m = Matrix2::from_fn([1, 4], |[_, c]| Complex {
            re: c as f64,
            im: 0.0,
        });
        let orig = m.copy();
        m.fft(&plans);
        m.ifft(&plans, true);
        for c in 0..4 {
            assert!(close(m.get([0, c]).unwrap(), orig.get([0, c]).unwrap()));
        }
    }
}
