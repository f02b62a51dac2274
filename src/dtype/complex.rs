//! Interleaved complex element types
//!
//! # Storage Format
//!
//! Complex numbers are stored in interleaved format (re, im, re, im...),
//! matching numpy and FFTW conventions. Because [`Complex`] is `repr(C)`
//! with two scalar fields, a buffer of complex elements is exactly a flat
//! buffer of scalars twice as long, and every stride expressed in complex
//! elements corresponds to a doubled scalar stride.

use super::element::{Element, RealElement};
use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Complex number with scalar component type `S`
///
/// Arithmetic follows the standard definitions:
/// - `(a+bi) + (c+di) = (a+c) + (b+d)i`
/// - `(a+bi)(c+di) = (ac-bd) + (ad+bc)i`
/// - `(a+bi)/(c+di) = (a+bi)·conj(c+di)/|c+di|²`
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[repr(C)]
pub struct Complex<S> {
    /// Real part
    pub re: S,
    /// Imaginary part
    pub im: S,
}

/// 64-bit complex number with f32 real and imaginary parts
pub type Complex64 = Complex<f32>;

/// 128-bit complex number with f64 real and imaginary parts
pub type Complex128 = Complex<f64>;

impl<S: RealElement> Complex<S> {
    /// Create a complex number from real and imaginary parts
    #[inline]
    pub fn new(re: S, im: S) -> Self {
        Self { re, im }
    }

    /// Create a purely real complex number
    #[inline]
    pub fn from_real(re: S) -> Self {
        Self {
            re,
            im: <S as Element>::zero(),
        }
    }

    /// Magnitude `|z| = sqrt(re² + im²)`
    #[inline]
    pub fn magnitude(self) -> S {
        (self.re * self.re + self.im * self.im).sqrt()
    }

    /// Complex conjugate `re - im·i`
    #[inline]
    pub fn conj(self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }

    /// Scale both components by a real factor
    #[inline]
    pub fn scale(self, factor: S) -> Self {
        Self {
            re: self.re * factor,
            im: self.im * factor,
        }
    }
}

impl<S: RealElement> Add for Complex<S> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl<S: RealElement> Sub for Complex<S> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

impl<S: RealElement> Mul for Complex<S> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

impl<S: RealElement> Div for Complex<S> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        let denom = rhs.re * rhs.re + rhs.im * rhs.im;
        Self {
            re: (self.re * rhs.re + self.im * rhs.im) / denom,
            im: (self.im * rhs.re - self.re * rhs.im) / denom,
        }
    }
}

impl<S: RealElement> Neg for Complex<S> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

/// Ordering by magnitude, so min/max aggregates are well defined
impl<S: RealElement> PartialOrd for Complex<S> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.magnitude().partial_cmp(&other.magnitude())
    }
}

// repr(C) over two Pod scalars with no padding
unsafe impl<S: RealElement> Zeroable for Complex<S> {}
unsafe impl<S: RealElement> Pod for Complex<S> {}

impl<S: RealElement> Element for Complex<S> {
    #[inline]
    fn zero() -> Self {
        Self {
            re: <S as Element>::zero(),
            im: <S as Element>::zero(),
        }
    }

    #[inline]
    fn one() -> Self {
        Self {
            re: <S as Element>::one(),
            im: <S as Element>::zero(),
        }
    }

    #[inline]
    fn nan() -> Self {
        Self {
            re: <S as Element>::nan(),
            im: <S as Element>::nan(),
        }
    }

    /// Returns the magnitude, consistent with `PartialOrd`
    #[inline]
    fn to_f64(self) -> f64 {
        <S as Element>::to_f64(self.magnitude())
    }

    /// Creates a purely real value
    #[inline]
    fn from_f64(v: f64) -> Self {
        Self {
            re: <S as Element>::from_f64(v),
            im: <S as Element>::zero(),
        }
    }
}

impl<S: RealElement + fmt::Display> fmt::Display for Complex<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im < <S as Element>::zero() {
            write!(f, "{}-{}i", self.re, -self.im)
        } else {
            write!(f, "{}+{}i", self.re, self.im)
        }
    }
}
