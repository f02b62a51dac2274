//! Strided index map: shape, strides, and offset of a dense matrix
//!
//! The flat buffer index of logical coordinate `[c0, .., cN-1]` is
//! `offset + c0*stride[0] + .. + cN-1*stride[N-1]`, evaluated in `isize`
//! so that negative strides (flipped axes) work. Every view derivation is a
//! pure function returning a fresh map; maps are never mutated in place.

use crate::error::{Error, Result};

/// Index map of a rank-`N` strided matrix
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StrideMap<const N: usize> {
    size: [usize; N],
    stride: [isize; N],
    offset: usize,
}

impl<const N: usize> StrideMap<N> {
    /// Create a compact row-major map for `size` (innermost stride 1)
    pub fn contiguous(size: [usize; N]) -> Self {
        let mut stride = [1isize; N];
        let mut acc = 1isize;
        for a in (0..N).rev() {
            stride[a] = acc;
            acc *= size[a] as isize;
        }
        Self {
            size,
            stride,
            offset: 0,
        }
    }

    /// Create a map with explicit sizes, strides, and offset
    pub fn new(size: [usize; N], stride: [isize; N], offset: usize) -> Self {
        Self {
            size,
            stride,
            offset,
        }
    }

    /// Size along each axis
    #[inline]
    pub fn size(&self) -> [usize; N] {
        self.size
    }

    /// Stride along each axis
    #[inline]
    pub fn stride(&self) -> [isize; N] {
        self.stride
    }

    /// Buffer index of the first visible element
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total number of logical elements
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.size.iter().product()
    }

    /// Whether the map is row-major with offset 0 over a compact run
    pub fn is_contiguous(&self) -> bool {
        self.offset == 0 && self.is_row_major()
    }

    /// Whether strides are row-major for the current sizes
    pub fn is_row_major(&self) -> bool {
        let mut acc = 1isize;
        for a in (0..N).rev() {
            if self.stride[a] != acc {
                return false;
            }
            acc *= self.size[a] as isize;
        }
        true
    }

    /// Flat buffer index of `index`, assuming it is in bounds
    ///
    /// Callers on hot paths pair this with the unchecked buffer accessors;
    /// out-of-bounds coordinates produce a meaningless index.
    #[inline]
    pub fn flat(&self, index: [usize; N]) -> usize {
        let mut linear = self.offset as isize;
        for a in 0..N {
            linear += index[a] as isize * self.stride[a];
        }
        linear as usize
    }

    /// Bounds-checked flat buffer index
    pub fn index(&self, index: [usize; N]) -> Result<usize> {
        for a in 0..N {
            if index[a] >= self.size[a] {
                return Err(Error::out_of_bounds(index[a], a, self.size[a]));
            }
        }
        Ok(self.flat(index))
    }

    /// Map with two axes swapped (the transpose of a 2-D map)
    pub fn swapped(&self, a: usize, b: usize) -> Self {
        let mut out = *self;
        out.size.swap(a, b);
        out.stride.swap(a, b);
        out
    }

    /// Map with axes reordered by `perm` (`perm[i]` is the source axis of
    /// new axis `i`)
    pub fn permuted(&self, perm: [usize; N]) -> Result<Self> {
        let mut seen = [false; N];
        for &p in &perm {
            if p >= N || seen[p] {
                return Err(Error::Internal(format!(
                    "invalid axis permutation {:?}",
                    perm
                )));
            }
            seen[p] = true;
        }
        let mut out = *self;
        for a in 0..N {
            out.size[a] = self.size[perm[a]];
            out.stride[a] = self.stride[perm[a]];
        }
        Ok(out)
    }

    /// Sub-range view along one axis: `len` elements starting at `start`,
    /// visiting every `step`-th source element
    pub fn part(&self, axis: usize, start: usize, len: usize, step: usize) -> Result<Self> {
        let size = self.size[axis];
        let out_of_range = step == 0
            || (len == 0 && start > size)
            || (len > 0 && start + (len - 1) * step >= size);
        if out_of_range {
            return Err(Error::InvalidRange {
                axis,
                start,
                len,
                stride: step,
                size,
            });
        }
        let mut out = *self;
        out.offset = (self.offset as isize + start as isize * self.stride[axis]) as usize;
        out.size[axis] = len;
        out.stride[axis] = self.stride[axis] * step as isize;
        Ok(out)
    }

    /// Subsampling view: keep every `step`-th element along `axis`
    pub fn strided(&self, axis: usize, step: usize) -> Result<Self> {
        if step == 0 {
            return Err(Error::InvalidRange {
                axis,
                start: 0,
                len: 0,
                stride: step,
                size: self.size[axis],
            });
        }
        let len = self.size[axis].div_ceil(step);
        self.part(axis, 0, len, step)
    }

    /// View with one axis reversed
    pub fn flipped(&self, axis: usize) -> Self {
        let mut out = *self;
        if self.size[axis] > 0 {
            out.offset = (self.offset as isize
                + (self.size[axis] as isize - 1) * self.stride[axis])
                as usize;
            out.stride[axis] = -self.stride[axis];
        }
        out
    }

    /// Number of innermost-axis rows, enumerating the outer axes in order
    #[inline]
    pub fn row_count(&self) -> usize {
        self.size[..N.saturating_sub(1)].iter().product()
    }

    /// Length of one innermost-axis row
    #[inline]
    pub fn row_len(&self) -> usize {
        if N == 0 {
            1
        } else {
            self.size[N - 1]
        }
    }

    /// Stride of the innermost axis
    #[inline]
    pub fn row_step(&self) -> isize {
        if N == 0 {
            1
        } else {
            self.stride[N - 1]
        }
    }

    /// Visit the flat index of every element, in row-major logical order
    pub(crate) fn for_each_flat(&self, mut f: impl FnMut(usize)) {
        let rows = self.row_count();
        let (len, step) = (self.row_len(), self.row_step());
        for r in 0..rows {
            let mut p = self.row_base(r);
            for _ in 0..len {
                f(p as usize);
                p += step;
            }
        }
    }

    /// Buffer index of the first element of row `r`
    #[inline]
    pub fn row_base(&self, r: usize) -> isize {
        let mut rem = r;
        let mut base = self.offset as isize;
        for a in (0..N.saturating_sub(1)).rev() {
            let s = self.size[a];
            base += (rem % s) as isize * self.stride[a];
            rem /= s;
        }
        base
    }
}
