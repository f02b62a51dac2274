//! View composer: derive transposed, ranged, flipped, subsampled, and
//! index-selected matrices without copying cells
//!
//! Every method here is pure: it builds a fresh index map and returns a new
//! [`Matrix`] handle sharing the source's buffer. The source is never
//! modified. Writes through a view are visible through the source and every
//! co-derived view.

use super::{Matrix, Matrix1, Matrix2, Matrix3};
use crate::dtype::Element;
use crate::error::Result;
use crate::map::{IndexMap, SelectMap, StrideMap};

impl<T: Element, const N: usize> Matrix<T, N> {
    /// Transpose view: axes reordered so that new axis `i` is source axis
    /// `perm[i]`
    pub fn view_transpose(&self, perm: [usize; N]) -> Result<Self> {
        Ok(self.view_of(self.map.permuted(perm)?))
    }

    /// View with axes `a` and `b` swapped
    ///
    /// # Panics
    /// Panics if `a` or `b` is not a valid axis.
    pub fn view_swap(&self, a: usize, b: usize) -> Self {
        assert!(a < N && b < N, "axis out of range");
        self.view_of(self.map.swapped(a, b))
    }

    /// Sub-range view: along each axis, `len[a]` elements starting at
    /// `start[a]`
    pub fn view_part(&self, start: [usize; N], len: [usize; N]) -> Result<Self> {
        let mut map = self.map.clone();
        for a in 0..N {
            map = map.part(a, start[a], len[a], 1)?;
        }
        Ok(self.view_of(map))
    }

    /// Subsampling view: keep every `step[a]`-th element along each axis
    pub fn view_strides(&self, step: [usize; N]) -> Result<Self> {
        let mut map = self.map.clone();
        for a in 0..N {
            map = map.strided(a, step[a])?;
        }
        Ok(self.view_of(map))
    }

    /// View with one axis reversed
    ///
    /// # Panics
    /// Panics if `axis` is not a valid axis.
    pub fn view_flip(&self, axis: usize) -> Self {
        assert!(axis < N, "axis out of range");
        self.view_of(self.map.flipped(axis))
    }

    /// Index-selection view: along each axis, visit exactly the listed
    /// indices in the listed order (`None` keeps an axis whole)
    ///
    /// Selections compose: the result supports every further view
    /// derivation, including further selection.
    ///
    /// An index list may repeat an index; the repeated positions then alias
    /// the same cells, and bulk mutations through such a view stay on one
    /// thread, visiting every logical position in order.
    pub fn view_selection(&self, indices: [Option<&[usize]>; N]) -> Result<Self> {
        Ok(self.view_of(self.map.select(indices)?))
    }
}

impl<T: Element> Matrix2<T> {
    /// Transpose view ("dice"): rows become columns
    pub fn view_dice(&self) -> Self {
        self.view_swap(0, 1)
    }

    /// Rank-lowering view of row `r`
    pub fn view_row(&self, r: usize) -> Result<Matrix1<T>> {
        self.lowered(0, r)
    }

    /// Rank-lowering view of column `c`
    pub fn view_column(&self, c: usize) -> Result<Matrix1<T>> {
        self.lowered(1, c)
    }

    fn lowered(&self, axis: usize, at: usize) -> Result<Matrix1<T>> {
        let map = lower_map(&self.map, axis, at)?;
        Ok(Matrix1 {
            map,
            buf: self.buf.clone(),
            par: self.par,
            no_view: false,
        })
    }
}

impl<T: Element> Matrix3<T> {
    /// Transpose view of axes `a` and `b`
    pub fn view_dice(&self, a: usize, b: usize) -> Self {
        self.view_swap(a, b)
    }

    /// Rank-lowering view of slice `s` (a `rows × cols` matrix)
    pub fn view_slice(&self, s: usize) -> Result<Matrix2<T>> {
        let map = lower_map(&self.map, 0, s)?;
        Ok(Matrix2 {
            map,
            buf: self.buf.clone(),
            par: self.par,
            no_view: false,
        })
    }

    /// Rank-lowering view of row `r` across all slices (a `slices × cols`
    /// matrix)
    pub fn view_row(&self, r: usize) -> Result<Matrix2<T>> {
        let map = lower_map(&self.map, 1, r)?;
        Ok(Matrix2 {
            map,
            buf: self.buf.clone(),
            par: self.par,
            no_view: false,
        })
    }

    /// Rank-lowering view of column `c` across all slices (a `slices × rows`
    /// matrix)
    pub fn view_column(&self, c: usize) -> Result<Matrix2<T>> {
        let map = lower_map(&self.map, 2, c)?;
        Ok(Matrix2 {
            map,
            buf: self.buf.clone(),
            par: self.par,
            no_view: false,
        })
    }
}

/// Fix one axis of a rank-3 map at a coordinate, yielding a rank-2 map
fn lower_map<const N: usize, const M: usize>(
    map: &IndexMap<N>,
    axis: usize,
    at: usize,
) -> Result<IndexMap<M>> {
    debug_assert_eq!(M + 1, N);
    match map {
        IndexMap::Strided(m) => {
            let size = m.size();
            let stride = m.stride();
            if at >= size[axis] {
                return Err(crate::error::Error::out_of_bounds(at, axis, size[axis]));
            }
            let mut lo_size = [0usize; M];
            let mut lo_stride = [0isize; M];
            let mut out = 0;
            for a in 0..N {
                if a != axis {
                    lo_size[out] = size[a];
                    lo_stride[out] = stride[a];
                    out += 1;
                }
            }
            let offset = (m.offset() as isize + at as isize * stride[axis]) as usize;
            Ok(IndexMap::Strided(StrideMap::new(lo_size, lo_stride, offset)))
        }
        IndexMap::Select(m) => {
            let size = m.size();
            if at >= size[axis] {
                return Err(crate::error::Error::out_of_bounds(at, axis, size[axis]));
            }
            let (offset, rest) = m.split_axis(axis, at);
            let table: [Vec<isize>; M] = rest
                .try_into()
                .map_err(|_| crate::error::Error::Internal("rank mismatch".into()))?;
            Ok(IndexMap::Select(SelectMap::from_parts(offset, table)))
        }
    }
}
