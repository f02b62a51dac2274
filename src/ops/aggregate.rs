//! Aggregate engine: fold every cell (or a subset) down to one value
//!
//! `aggregate` applies a per-cell transform and folds the transformed
//! values with a combiner. The fold is seeded with the first transformed
//! cell, so no neutral element is required; an empty matrix aggregates to
//! NaN. Parallel runs fold one partial per span and then combine the
//! partials in span order, which reproduces the sequential result exactly
//! for associative combiners.

use crate::dtype::Element;
use crate::error::Result;
use crate::map::IndexMap;
use crate::matrix::Matrix;
use crate::par::{self, Span};

impl<T: Element, const N: usize> Matrix<T, N> {
    /// Fold all cells: transform each with `map_fn`, combine with `combine`
    ///
    /// Returns NaN when the matrix has no cells.
    pub fn aggregate<C, M>(&self, combine: C, map_fn: M) -> T
    where
        C: Fn(T, T) -> T + Sync,
        M: Fn(T) -> T + Sync,
    {
        if self.elem_count() == 0 {
            return T::nan();
        }
        let work = self.map.work_count();
        let addr = self.buf.addr();
        let map = &self.map;
        if self.par.should_split(N, self.elem_count()) && work > 1 {
            let spans = par::partition(work, self.par.degree);
            let partials = par::run(&spans, |span| fold_span(addr, map, span, &combine, &map_fn));
            // partials combine in span order, matching a sequential sweep
            let mut iter = partials.into_iter().flatten();
            let first = match iter.next() {
                Some(v) => v,
                None => return T::nan(),
            };
            iter.fold(first, &combine)
        } else {
            let span = Span {
                start: 0,
                end: work,
            };
            fold_span(addr, map, span, &combine, &map_fn).unwrap_or_else(T::nan)
        }
    }

    /// Fold only the cells whose value satisfies `pred`
    ///
    /// Returns NaN when no cell qualifies.
    pub fn aggregate_where<C, M, P>(&self, combine: C, map_fn: M, pred: P) -> T
    where
        C: Fn(T, T) -> T + Sync,
        M: Fn(T) -> T + Sync,
        P: Fn(T) -> bool + Sync,
    {
        if self.elem_count() == 0 {
            return T::nan();
        }
        let work = self.map.work_count();
        let addr = self.buf.addr();
        let map = &self.map;
        let fold_filtered = |span: Span| {
            let ptr = addr as *const T;
            let mut acc: Option<T> = None;
            map.span_for_each(span, |p| {
                let x = unsafe { *ptr.add(p) };
                if pred(x) {
                    let v = map_fn(x);
                    acc = Some(match acc {
                        Some(a) => combine(a, v),
                        None => v,
                    });
                }
            });
            acc
        };
        let partials = if self.par.should_split(N, self.elem_count()) && work > 1 {
            let spans = par::partition(work, self.par.degree);
            par::run(&spans, fold_filtered)
        } else {
            vec![fold_filtered(Span {
                start: 0,
                end: work,
            })]
        };
        let mut iter = partials.into_iter().flatten();
        let first = match iter.next() {
            Some(v) => v,
            None => return T::nan(),
        };
        iter.fold(first, &combine)
    }

    /// Fold only the cells at the listed coordinates, in the listed order
    ///
    /// Fails on the first out-of-bounds coordinate. An empty list
    /// aggregates to NaN.
    pub fn aggregate_at<C, M>(&self, combine: C, map_fn: M, coords: &[[usize; N]]) -> Result<T>
    where
        C: Fn(T, T) -> T,
        M: Fn(T) -> T,
    {
        let mut acc: Option<T> = None;
        for &c in coords {
            let flat = self.map.index(c)?;
            let v = map_fn(unsafe { self.buf.load(flat) });
            acc = Some(match acc {
                Some(a) => combine(a, v),
                None => v,
            });
        }
        Ok(acc.unwrap_or_else(T::nan))
    }

    /// Sum of all cells (zero for an empty matrix)
    pub fn sum(&self) -> T {
        if self.elem_count() == 0 {
            return T::zero();
        }
        self.aggregate(|a, b| a + b, |x| x)
    }

    /// Smallest cell value by `PartialOrd` (NaN for an empty matrix)
    pub fn min_value(&self) -> T {
        self.aggregate(|a, b| if b < a { b } else { a }, |x| x)
    }

    /// Largest cell value by `PartialOrd` (NaN for an empty matrix)
    pub fn max_value(&self) -> T {
        self.aggregate(|a, b| if b > a { b } else { a }, |x| x)
    }

    /// Number of cells holding a non-zero value
    pub fn cardinality(&self) -> usize {
        let work = self.map.work_count();
        if self.elem_count() == 0 {
            return 0;
        }
        let addr = self.buf.addr();
        let map = &self.map;
        let count_span = |span: Span| {
            let ptr = addr as *const T;
            let mut n = 0usize;
            map.span_for_each(span, |p| {
                if !unsafe { *ptr.add(p) }.is_zero() {
                    n += 1;
                }
            });
            n
        };
        if self.par.should_split(N, self.elem_count()) && work > 1 {
            let spans = par::partition(work, self.par.degree);
            par::run(&spans, count_span).into_iter().sum()
        } else {
            count_span(Span {
                start: 0,
                end: work,
            })
        }
    }
}

/// Seeded fold over one span of work units; `None` only for an empty span
fn fold_span<T: Element, const N: usize>(
    addr: usize,
    map: &IndexMap<N>,
    span: Span,
    combine: &(impl Fn(T, T) -> T + Sync),
    map_fn: &(impl Fn(T) -> T + Sync),
) -> Option<T> {
    let ptr = addr as *const T;
    let mut acc: Option<T> = None;
    map.span_for_each(span, |p| {
        let v = map_fn(unsafe { *ptr.add(p) });
        acc = Some(match acc {
            Some(a) => combine(a, v),
            None => v,
        });
    });
    acc
}
