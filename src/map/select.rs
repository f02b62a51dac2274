//! Selection index map: explicit per-axis offset tables
//!
//! A selection view picks an arbitrary list of indices along each axis. The
//! index lists are resolved once against the source map's strides into
//! per-axis buffer-offset tables, so indexing through the view is
//! `offset + table[0][c0] + table[1][c1] (+ table[2][c2])`.
//!
//! Selection maps compose with every further view derivation (transpose,
//! sub-range, flip, and further selection) by transforming the tables,
//! so no view kind is a dead end.

use super::strided::StrideMap;
use crate::error::{Error, Result};

/// Index map of a rank-`N` selection view
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SelectMap<const N: usize> {
    offset: usize,
    table: [Vec<isize>; N],
}

impl<const N: usize> SelectMap<N> {
    /// Resolve per-axis index lists against a strided source map
    ///
    /// `indices[a]` of `None` keeps the full axis in order.
    pub fn from_strided(source: &StrideMap<N>, indices: [Option<&[usize]>; N]) -> Result<Self> {
        let size = source.size();
        let stride = source.stride();
        let mut table: [Vec<isize>; N] = std::array::from_fn(|_| Vec::new());
        for a in 0..N {
            table[a] = match indices[a] {
                Some(list) => {
                    let mut col = Vec::with_capacity(list.len());
                    for &i in list {
                        if i >= size[a] {
                            return Err(Error::out_of_bounds(i, a, size[a]));
                        }
                        col.push(i as isize * stride[a]);
                    }
                    col
                }
                None => (0..size[a]).map(|i| i as isize * stride[a]).collect(),
            };
        }
        Ok(Self {
            offset: source.offset(),
            table,
        })
    }

    /// Size along each axis
    #[inline]
    pub fn size(&self) -> [usize; N] {
        std::array::from_fn(|a| self.table[a].len())
    }

    /// Total number of logical elements
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.table.iter().map(|t| t.len()).product()
    }

    /// Flat buffer index of `index`, assuming it is in bounds
    #[inline]
    pub fn flat(&self, index: [usize; N]) -> usize {
        let mut linear = self.offset as isize;
        for a in 0..N {
            linear += self.table[a][index[a]];
        }
        linear as usize
    }

    /// Bounds-checked flat buffer index
    pub fn index(&self, index: [usize; N]) -> Result<usize> {
        for a in 0..N {
            if index[a] >= self.table[a].len() {
                return Err(Error::out_of_bounds(index[a], a, self.table[a].len()));
            }
        }
        Ok(self.flat(index))
    }

    /// Map with two axes swapped
    pub fn swapped(&self, a: usize, b: usize) -> Self {
        let mut out = self.clone();
        out.table.swap(a, b);
        out
    }

    /// Map with axes reordered by `perm`
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
        let table = std::array::from_fn(|a| self.table[perm[a]].clone());
        Ok(Self {
            offset: self.offset,
            table,
        })
    }

    /// Sub-range view along one axis
    pub fn part(&self, axis: usize, start: usize, len: usize, step: usize) -> Result<Self> {
        let size = self.table[axis].len();
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
        let mut out = self.clone();
        out.table[axis] = (0..len)
            .map(|i| self.table[axis][start + i * step])
            .collect();
        Ok(out)
    }

    /// View with one axis reversed
    pub fn flipped(&self, axis: usize) -> Self {
        let mut out = self.clone();
        out.table[axis].reverse();
        out
    }

    /// Further selection along every axis
    pub fn select(&self, indices: [Option<&[usize]>; N]) -> Result<Self> {
        let mut table: [Vec<isize>; N] = std::array::from_fn(|_| Vec::new());
        for a in 0..N {
            table[a] = match indices[a] {
                Some(list) => {
                    let mut col = Vec::with_capacity(list.len());
                    for &i in list {
                        if i >= self.table[a].len() {
                            return Err(Error::out_of_bounds(i, a, self.table[a].len()));
                        }
                        col.push(self.table[a][i]);
                    }
                    col
                }
                None => self.table[a].clone(),
            };
        }
        Ok(Self {
            offset: self.offset,
            table,
        })
    }

    /// Whether no two logical coordinates address the same buffer cell
    ///
    /// An index list may repeat an index; the duplicate shows up as a
    /// repeated entry in that axis's offset table.
    pub(crate) fn is_injective(&self) -> bool {
        self.table.iter().all(|t| {
            let mut offsets = t.clone();
            offsets.sort_unstable();
            offsets.windows(2).all(|w| w[0] != w[1])
        })
    }

    /// Number of innermost-axis rows
    #[inline]
    pub fn row_count(&self) -> usize {
        self.table[..N.saturating_sub(1)]
            .iter()
            .map(|t| t.len())
            .product()
    }

    /// Offset table of the innermost axis
    #[inline]
    pub fn row_table(&self) -> &[isize] {
        &self.table[N - 1]
    }

    /// Buffer index contribution of the outer axes for row `r`
    #[inline]
    pub fn row_base(&self, r: usize) -> isize {
        let mut rem = r;
        let mut base = self.offset as isize;
        for a in (0..N.saturating_sub(1)).rev() {
            let s = self.table[a].len();
            base += self.table[a][rem % s];
            rem /= s;
        }
        base
    }

    /// Drop one axis at a fixed coordinate, producing the tables of a
    /// rank-lowered view
    pub(crate) fn split_axis(&self, axis: usize, at: usize) -> (usize, Vec<Vec<isize>>) {
        let offset = (self.offset as isize + self.table[axis][at]) as usize;
        let rest = (0..N)
            .filter(|&a| a != axis)
            .map(|a| self.table[a].clone())
            .collect();
        (offset, rest)
    }

    /// Build a selection map directly from an offset and per-axis tables
    pub(crate) fn from_parts(offset: usize, table: [Vec<isize>; N]) -> Self {
        Self { offset, table }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_indexing() {
        let src = StrideMap::contiguous([4, 5]);
        let sel = SelectMap::from_strided(&src, [Some(&[3, 1]), Some(&[0, 2, 4])]).unwrap();
        assert_eq!(sel.size(), [2, 3]);
        assert_eq!(sel.flat([0, 0]), src.flat([3, 0]));
        assert_eq!(sel.flat([1, 2]), src.flat([1, 4]));
    }

    #[test]
    fn test_selection_rejects_bad_index() {
        let src = StrideMap::contiguous([4, 5]);
        assert!(SelectMap::from_strided(&src, [Some(&[4]), None]).is_err());
    }

    #[test]
    fn test_selection_composes() {
        let src = StrideMap::contiguous([4, 5]);
        let sel = SelectMap::from_strided(&src, [Some(&[3, 1, 0]), None]).unwrap();

        let t = sel.swapped(0, 1);
        assert_eq!(t.size(), [5, 3]);
        assert_eq!(t.flat([4, 0]), src.flat([3, 4]));

        let p = sel.part(0, 1, 2, 1).unwrap();
        assert_eq!(p.flat([0, 0]), src.flat([1, 0]));

        let f = sel.flipped(0);
        assert_eq!(f.flat([0, 0]), src.flat([0, 0]));

        let s2 = sel.select([Some(&[2]), Some(&[4])]).unwrap();
        assert_eq!(s2.flat([0, 0]), src.flat([0, 4]));
    }
}
