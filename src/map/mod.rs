//! Index maps: how logical coordinates address the flat backing buffer
//!
//! [`IndexMap`] is a closed sum over the two addressing schemes a dense
//! matrix can have: a [`StrideMap`] (compact allocations and all
//! transpose/range/flip views of them) or a [`SelectMap`] (arbitrary
//! index-selection views). Engines match on the variant once per operation
//! and run a specialized inner loop for each.

mod select;
mod strided;

pub use select::SelectMap;
pub use strided::StrideMap;

use crate::error::Result;

/// Addressing scheme of a dense matrix
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum IndexMap<const N: usize> {
    /// Per-axis (size, stride) pairs plus one offset
    Strided(StrideMap<N>),
    /// Per-axis explicit offset tables
    Select(SelectMap<N>),
}

/// Addressing of a single innermost-axis row, for engine inner loops
pub(crate) enum RowAccess<'a> {
    /// Fixed step between consecutive elements
    Strided {
        /// Buffer index of the row's first element
        base: isize,
        /// Number of elements in the row
        len: usize,
        /// Buffer-index delta per element
        step: isize,
    },
    /// Per-element offsets looked up in a table
    Select {
        /// Buffer-index contribution of the outer axes
        base: isize,
        /// Innermost-axis offset table
        table: &'a [isize],
    },
}

impl<const N: usize> IndexMap<N> {
    /// Size along each axis
    #[inline]
    pub fn size(&self) -> [usize; N] {
        match self {
            Self::Strided(m) => m.size(),
            Self::Select(m) => m.size(),
        }
    }

    /// Total number of logical elements
    #[inline]
    pub fn elem_count(&self) -> usize {
        match self {
            Self::Strided(m) => m.elem_count(),
            Self::Select(m) => m.elem_count(),
        }
    }

    /// Flat buffer index of `index`, assuming it is in bounds
    #[inline]
    pub fn flat(&self, index: [usize; N]) -> usize {
        match self {
            Self::Strided(m) => m.flat(index),
            Self::Select(m) => m.flat(index),
        }
    }

    /// Bounds-checked flat buffer index
    pub fn index(&self, index: [usize; N]) -> Result<usize> {
        match self {
            Self::Strided(m) => m.index(index),
            Self::Select(m) => m.index(index),
        }
    }

    /// Whether the whole matrix is one compact row-major run at offset 0
    pub fn is_compact(&self) -> bool {
        matches!(self, Self::Strided(m) if m.is_contiguous())
    }

    /// Map with two axes swapped
    pub fn swapped(&self, a: usize, b: usize) -> Self {
        match self {
            Self::Strided(m) => Self::Strided(m.swapped(a, b)),
            Self::Select(m) => Self::Select(m.swapped(a, b)),
        }
    }

    /// Map with axes reordered by `perm`
    pub fn permuted(&self, perm: [usize; N]) -> Result<Self> {
        Ok(match self {
            Self::Strided(m) => Self::Strided(m.permuted(perm)?),
            Self::Select(m) => Self::Select(m.permuted(perm)?),
        })
    }

    /// Sub-range view along one axis
    pub fn part(&self, axis: usize, start: usize, len: usize, step: usize) -> Result<Self> {
        Ok(match self {
            Self::Strided(m) => Self::Strided(m.part(axis, start, len, step)?),
            Self::Select(m) => Self::Select(m.part(axis, start, len, step)?),
        })
    }

    /// Subsampling view along one axis
    pub fn strided(&self, axis: usize, step: usize) -> Result<Self> {
        match self {
            Self::Strided(m) => Ok(Self::Strided(m.strided(axis, step)?)),
            Self::Select(m) => {
                let len = m.size()[axis].div_ceil(step.max(1));
                Ok(Self::Select(m.part(axis, 0, len, step)?))
            }
        }
    }

    /// View with one axis reversed
    pub fn flipped(&self, axis: usize) -> Self {
        match self {
            Self::Strided(m) => Self::Strided(m.flipped(axis)),
            Self::Select(m) => Self::Select(m.flipped(axis)),
        }
    }

    /// Index-selection view; `None` keeps an axis whole
    pub fn select(&self, indices: [Option<&[usize]>; N]) -> Result<Self> {
        Ok(Self::Select(match self {
            Self::Strided(m) => SelectMap::from_strided(m, indices)?,
            Self::Select(m) => m.select(indices)?,
        }))
    }

    /// Whether distinct logical coordinates always address distinct buffer
    /// cells
    ///
    /// Strided maps are injective by construction. A selection map loses
    /// injectivity when an index list repeats an index; bulk mutations
    /// through such a map must stay on one thread, since partitioning its
    /// work units would hand the same cell to two writers.
    #[inline]
    pub(crate) fn is_injective(&self) -> bool {
        match self {
            Self::Strided(_) => true,
            Self::Select(m) => m.is_injective(),
        }
    }

    /// Number of innermost-axis rows
    #[inline]
    pub(crate) fn row_count(&self) -> usize {
        match self {
            Self::Strided(m) => m.row_count(),
            Self::Select(m) => m.row_count(),
        }
    }

    /// Addressing of row `r`
    #[inline]
    pub(crate) fn row(&self, r: usize) -> RowAccess<'_> {
        match self {
            Self::Strided(m) => RowAccess::Strided {
                base: m.row_base(r),
                len: m.row_len(),
                step: m.row_step(),
            },
            Self::Select(m) => RowAccess::Select {
                base: m.row_base(r),
                table: m.row_table(),
            },
        }
    }

    /// Number of partitionable work units: elements for rank 1, innermost
    /// rows otherwise
    #[inline]
    pub(crate) fn work_count(&self) -> usize {
        if N == 1 {
            self.elem_count()
        } else {
            self.row_count()
        }
    }

    /// Addressing of a span of work units within the single rank-1 row
    #[inline]
    fn segment(&self, span: crate::par::Span) -> RowAccess<'_> {
        debug_assert_eq!(N, 1);
        match self {
            Self::Strided(m) => RowAccess::Strided {
                base: m.row_base(0) + span.start as isize * m.row_step(),
                len: span.len(),
                step: m.row_step(),
            },
            Self::Select(m) => RowAccess::Select {
                base: m.row_base(0),
                table: &m.row_table()[span.start..span.end],
            },
        }
    }

    /// Visit the buffer index of every element covered by a span of work
    /// units, in logical order
    #[inline]
    pub(crate) fn span_for_each(&self, span: crate::par::Span, mut f: impl FnMut(usize)) {
        if N == 1 {
            self.segment(span).for_each(f);
        } else {
            for r in span.start..span.end {
                self.row(r).for_each(|p| f(p));
            }
        }
    }

    /// Visit corresponding buffer-index pairs of two same-shape maps over a
    /// span of work units
    #[inline]
    pub(crate) fn span_zip_for_each(
        &self,
        other: &Self,
        span: crate::par::Span,
        mut f: impl FnMut(usize, usize),
    ) {
        if N == 1 {
            self.segment(span).zip_for_each(other.segment(span), f);
        } else {
            for r in span.start..span.end {
                self.row(r).zip_for_each(other.row(r), |p, q| f(p, q));
            }
        }
    }
}

impl<'a> RowAccess<'a> {
    /// Visit the buffer index of every element in the row, in logical order
    #[inline]
    pub(crate) fn for_each(self, mut f: impl FnMut(usize)) {
        match self {
            RowAccess::Strided { base, len, step } => {
                let mut p = base;
                for _ in 0..len {
                    f(p as usize);
                    p += step;
                }
            }
            RowAccess::Select { base, table } => {
                for &t in table {
                    f((base + t) as usize);
                }
            }
        }
    }

    /// Visit corresponding buffer-index pairs of two equal-length rows
    #[inline]
    pub(crate) fn zip_for_each(self, other: RowAccess<'_>, mut f: impl FnMut(usize, usize)) {
        match (self, other) {
            (
                RowAccess::Strided { base, len, step },
                RowAccess::Strided {
                    base: ob,
                    step: os,
                    ..
                },
            ) => {
                let (mut p, mut q) = (base, ob);
                for _ in 0..len {
                    f(p as usize, q as usize);
                    p += step;
                    q += os;
                }
            }
            (RowAccess::Strided { base, len, step }, RowAccess::Select { base: ob, table }) => {
                debug_assert_eq!(len, table.len());
                let mut p = base;
                for &t in table {
                    f(p as usize, (ob + t) as usize);
                    p += step;
                }
            }
            (RowAccess::Select { base, table }, RowAccess::Strided { base: ob, step: os, .. }) => {
                let mut q = ob;
                for &t in table {
                    f((base + t) as usize, q as usize);
                    q += os;
                }
            }
            (
                RowAccess::Select { base, table },
                RowAccess::Select {
                    base: ob,
                    table: ot,
                },
            ) => {
                debug_assert_eq!(table.len(), ot.len());
                for (&t, &u) in table.iter().zip(ot.iter()) {
                    f((base + t) as usize, (ob + u) as usize);
                }
            }
        }
    }
}
