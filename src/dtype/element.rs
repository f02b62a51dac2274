//! Element trait connecting Rust numeric types to matrix cells

use bytemuck::{Pod, Zeroable};
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Sub};

/// Trait for types that can be elements of a matrix
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - Basic trait requirements
/// - `Pod + Zeroable` - Safe memory transmutation (bytemuck)
/// - `Add + Sub + Mul + Div` - Arithmetic operations (Output = Self)
/// - `PartialOrd` - Comparison for min/max aggregates
///
/// # Complex Number Behavior
///
/// For complex types, `PartialOrd` compares magnitudes and `to_f64` returns
/// the magnitude; see the `complex` module.
pub trait Element:
    Copy
    + Send
    + Sync
    + Pod
    + Zeroable
    + Debug
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + PartialOrd
{
    /// Zero value (the implicit element of sparse matrices)
    fn zero() -> Self;

    /// One value
    fn one() -> Self;

    /// The not-a-number sentinel returned by empty aggregations
    fn nan() -> Self;

    /// Convert to f64 for generic numeric decisions
    fn to_f64(self) -> f64;

    /// Convert from f64 to this type
    fn from_f64(v: f64) -> Self;

    /// Whether this value is the zero element
    #[inline]
    fn is_zero(self) -> bool {
        self == Self::zero()
    }
}

impl Element for f64 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn nan() -> Self {
        f64::NAN
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
}

impl Element for f32 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn nan() -> Self {
        f32::NAN
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

/// Real scalar elements (the component type of complex elements)
///
/// Adds the `num_traits::Float` toolbox needed by magnitude computations
/// and the transform adapters.
pub trait RealElement: Element + num_traits::Float {}

impl RealElement for f32 {}
impl RealElement for f64 {}
