//! Dense matrix: an index map plus a shared backing buffer
//!
//! A [`Matrix`] owns nothing but an addressing scheme ([`IndexMap`]), a
//! reference to a flat [`Buffer`], and its parallelism settings. Views
//! derived from a matrix share its buffer and differ only in the map; a
//! matrix allocated by a constructor is a "no-view" with a compact,
//! exclusively owned buffer, which unlocks bulk slice fast paths.
//!
//! # Checked vs unchecked access
//!
//! `get`/`set` validate every coordinate and return `Result`. The
//! `get_unchecked`/`set_unchecked` family skips all bounds checks and is
//! `unsafe`: hot loops rely on its speed, and out-of-bounds coordinates are
//! undefined behavior. This split is deliberate and load-bearing; do not
//! route the unchecked family through the checked one.

mod view;

use crate::buffer::Buffer;
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::map::{IndexMap, StrideMap};
use crate::par::ParallelConfig;

/// Dense rank-`N` matrix over elements of type `T`
pub struct Matrix<T: Element, const N: usize> {
    pub(crate) map: IndexMap<N>,
    pub(crate) buf: Buffer<T>,
    pub(crate) par: ParallelConfig,
    pub(crate) no_view: bool,
}

/// Dense vector (rank 1)
pub type Matrix1<T> = Matrix<T, 1>;
/// Dense matrix (rank 2)
pub type Matrix2<T> = Matrix<T, 2>;
/// Dense volume (rank 3)
pub type Matrix3<T> = Matrix<T, 3>;

impl<T: Element, const N: usize> Matrix<T, N> {
    /// Allocate a zero-filled matrix of the given shape
    pub fn zeroed(shape: [usize; N]) -> Self {
        let map = StrideMap::contiguous(shape);
        let buf = Buffer::zeroed(map.elem_count());
        Self {
            map: IndexMap::Strided(map),
            buf,
            par: ParallelConfig::default(),
            no_view: true,
        }
    }

    /// Build a matrix from a row-major vector of cells
    pub fn from_vec(shape: [usize; N], data: Vec<T>) -> Result<Self> {
        let map = StrideMap::contiguous(shape);
        if data.len() != map.elem_count() {
            return Err(Error::shape_mismatch(&shape, &[data.len()]));
        }
        Ok(Self {
            map: IndexMap::Strided(map),
            buf: Buffer::from_vec(data),
            par: ParallelConfig::default(),
            no_view: true,
        })
    }

    /// Build a matrix by evaluating `f` at every coordinate
    pub fn from_fn(shape: [usize; N], mut f: impl FnMut([usize; N]) -> T) -> Self {
        let map = StrideMap::contiguous(shape);
        let mut data = Vec::with_capacity(map.elem_count());
        let mut idx = [0usize; N];
        for _ in 0..map.elem_count() {
            data.push(f(idx));
            // odometer increment, innermost axis fastest
            for a in (0..N).rev() {
                idx[a] += 1;
                if idx[a] < shape[a] {
                    break;
                }
                idx[a] = 0;
            }
        }
        Self {
            map: IndexMap::Strided(map),
            buf: Buffer::from_vec(data),
            par: ParallelConfig::default(),
            no_view: true,
        }
    }

    /// Assemble a view from parts (internal; always marked as a view)
    pub(crate) fn view_of(&self, map: IndexMap<N>) -> Self {
        Self {
            map,
            buf: self.buf.clone(),
            par: self.par,
            no_view: false,
        }
    }

    /// Size along each axis
    #[inline]
    pub fn shape(&self) -> [usize; N] {
        self.map.size()
    }

    /// Total number of cells
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.map.elem_count()
    }

    /// Whether this matrix exclusively owns a compact, contiguous buffer
    #[inline]
    pub fn is_no_view(&self) -> bool {
        self.no_view
    }

    /// Whether this matrix and `other` address the same allocation
    ///
    /// Writes through either are visible through both when true.
    #[inline]
    pub fn shares_cells<const M: usize>(&self, other: &Matrix<T, M>) -> bool {
        self.buf.shares_cells(&other.buf)
    }

    /// The parallelism settings bulk operations on this matrix consult
    #[inline]
    pub fn parallelism(&self) -> ParallelConfig {
        self.par
    }

    /// Replace the parallelism settings (builder form)
    pub fn with_parallelism(mut self, par: ParallelConfig) -> Self {
        self.par = par;
        self
    }

    /// Replace the parallelism settings in place
    pub fn set_parallelism(&mut self, par: ParallelConfig) {
        self.par = par;
    }

    /// Bounds-checked read
    pub fn get(&self, index: [usize; N]) -> Result<T> {
        let flat = self.map.index(index)?;
        Ok(unsafe { self.buf.load(flat) })
    }

    /// Bounds-checked write
    pub fn set(&mut self, index: [usize; N], value: T) -> Result<()> {
        let flat = self.map.index(index)?;
        unsafe { self.buf.store(flat, value) };
        Ok(())
    }

    /// Unchecked read, for hot loops
    ///
    /// # Safety
    /// Every coordinate must be in bounds for this matrix's shape.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: [usize; N]) -> T {
        self.buf.load(self.map.flat(index))
    }

    /// Unchecked write, for hot loops
    ///
    /// # Safety
    /// Every coordinate must be in bounds for this matrix's shape.
    #[inline]
    pub unsafe fn set_unchecked(&mut self, index: [usize; N], value: T) {
        self.buf.store(self.map.flat(index), value);
    }

    /// Deep copy into a fresh compact no-view matrix
    pub fn copy(&self) -> Self {
        Self {
            map: IndexMap::Strided(StrideMap::contiguous(self.shape())),
            buf: Buffer::from_vec(self.to_vec()),
            par: self.par,
            no_view: true,
        }
    }

    /// Materialize the cells in row-major logical order
    pub fn to_vec(&self) -> Vec<T> {
        if self.map.is_compact() {
            return self.buf.as_slice()[..self.elem_count()].to_vec();
        }
        let mut out = Vec::with_capacity(self.elem_count());
        for r in 0..self.map.row_count() {
            self.map
                .row(r)
                .for_each(|flat| out.push(unsafe { self.buf.load(flat) }));
        }
        out
    }

    /// Fresh zeroed matrix with the same shape and parallelism settings
    pub fn like(&self) -> Self {
        let mut out = Self::zeroed(self.shape());
        out.par = self.par;
        out
    }

    /// Whether `other` has the same shape
    pub(crate) fn check_shape(&self, other: &Self) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(Error::shape_mismatch(&self.shape(), &other.shape()));
        }
        Ok(())
    }
}

/// Cloning a matrix yields another handle onto the same cells (a view
/// duplicate), not a deep copy; use [`Matrix::copy`] for that.
impl<T: Element, const N: usize> Clone for Matrix<T, N> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            buf: self.buf.clone(),
            par: self.par,
            no_view: self.no_view,
        }
    }
}

impl<T: Element, const N: usize> std::fmt::Debug for Matrix<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matrix")
            .field("shape", &self.shape())
            .field("no_view", &self.no_view)
            .field("map", &self.map)
            .finish()
    }
}

impl<T: Element> Matrix<T, 1> {
    /// Allocate a zero-filled vector of `size` cells
    pub fn new(size: usize) -> Self {
        Self::zeroed([size])
    }

    /// Build a vector from a slice of cells
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            map: IndexMap::Strided(StrideMap::contiguous([data.len()])),
            buf: Buffer::from_slice(data),
            par: ParallelConfig::default(),
            no_view: true,
        }
    }

    /// Number of cells
    #[inline]
    pub fn size(&self) -> usize {
        self.shape()[0]
    }
}

impl<T: Element> Matrix<T, 2> {
    /// Allocate a zero-filled `rows × cols` matrix
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::zeroed([rows, cols])
    }

    /// Build a matrix from a row-major slice of cells
    pub fn from_slice(rows: usize, cols: usize, data: &[T]) -> Result<Self> {
        Self::from_vec([rows, cols], data.to_vec())
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.shape()[0]
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.shape()[1]
    }

    /// The `n × n` identity matrix
    pub fn identity(n: usize) -> Self {
        let mut m = Self::new(n, n);
        for i in 0..n {
            // diagonal of a freshly allocated matrix is always in bounds
            unsafe { m.set_unchecked([i, i], T::one()) };
        }
        m
    }
}

impl<T: Element> Matrix<T, 3> {
    /// Allocate a zero-filled `slices × rows × cols` volume
    pub fn new(slices: usize, rows: usize, cols: usize) -> Self {
        Self::zeroed([slices, rows, cols])
    }

    /// Build a volume from a slice-major slice of cells
    pub fn from_slice(slices: usize, rows: usize, cols: usize, data: &[T]) -> Result<Self> {
        Self::from_vec([slices, rows, cols], data.to_vec())
    }

    /// Number of slices
    #[inline]
    pub fn slices(&self) -> usize {
        self.shape()[0]
    }

    /// Number of rows per slice
    #[inline]
    pub fn rows(&self) -> usize {
        self.shape()[1]
    }

    /// Number of columns per row
    #[inline]
    pub fn cols(&self) -> usize {
        self.shape()[2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_access() {
        let mut m = Matrix2::<f64>::from_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.shape(), [2, 3]);
        assert_eq!(m.get([1, 2]).unwrap(), 6.0);
        assert!(m.get([2, 0]).is_err());

        m.set([0, 1], 9.0).unwrap();
        assert_eq!(m.get([0, 1]).unwrap(), 9.0);
        assert_eq!(unsafe { m.get_unchecked([0, 1]) }, 9.0);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut m = Matrix1::from_slice(&[1.0f32, 2.0, 3.0]);
        let c = m.copy();
        assert!(!m.shares_cells(&c));
        m.set([0], 42.0).unwrap();
        assert_eq!(c.get([0]).unwrap(), 1.0);
        assert_eq!(c.to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_clone_shares_cells() {
        let m = Matrix1::from_slice(&[1.0f64, 2.0]);
        let v = m.clone();
        assert!(m.shares_cells(&v));
    }

    #[test]
    fn test_from_fn_order() {
        let m = Matrix2::<f64>::from_fn([2, 2], |[r, c]| (10 * r + c) as f64);
        assert_eq!(m.to_vec(), vec![0.0, 1.0, 10.0, 11.0]);
    }

    #[test]
    fn test_identity() {
        let i = Matrix2::<f64>::identity(3);
        assert_eq!(i.get([0, 0]).unwrap(), 1.0);
        assert_eq!(i.get([0, 1]).unwrap(), 0.0);
        assert_eq!(i.get([2, 2]).unwrap(), 1.0);
    }
}
