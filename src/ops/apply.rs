//! Elementwise engine: unary, predicate-gated, and binary assignment
//!
//! Every method here consults the matrix's [`ParallelConfig`] and, above
//! the rank's size threshold, partitions the outermost work units across
//! the worker pool. Sequential and parallel paths visit elements in the
//! same order within each unit, so results are reproducible for a fixed
//! configuration.
//!
//! The specialized operations (`scale`, `add_scaled`, elementwise
//! multiply/divide) resolve their coefficient into an explicit operation
//! kind up front; the identity cases skip all work but the remaining cases
//! produce bit-identical results to the general path.
//!
//! [`ParallelConfig`]: crate::par::ParallelConfig

use crate::dtype::Element;
use crate::error::Result;
use crate::map::IndexMap;
use crate::matrix::Matrix;
use crate::par::{self, Span};

/// Resolved kind of a `scale` operation
enum ScaleKind<T> {
    /// Multiply by one: nothing to do
    Skip,
    /// Multiply by zero: fill with zero
    Zero,
    /// General constant multiply
    Mul(T),
}

/// Resolved kind of an `add_scaled` operation
enum AxpyKind<T> {
    /// Coefficient zero: nothing to do
    Skip,
    /// Coefficient one: plain add
    Add,
    /// Coefficient minus one: plain subtract
    Sub,
    /// General scaled add
    Scaled(T),
}

impl<T: Element, const N: usize> Matrix<T, N> {
    /// Set every cell to `value`
    pub fn fill(&mut self, value: T) {
        if self.map.is_compact() && self.buf.is_unique() {
            unsafe { self.buf.as_mut_slice() }.fill(value);
            return;
        }
        self.apply_spans(move |_| value);
    }

    /// Replace every cell `x` with `f(x)`
    pub fn assign_fn<F>(&mut self, f: F)
    where
        F: Fn(T) -> T + Sync,
    {
        self.apply_spans(f);
    }

    /// Replace cell `x` with `f(x)` only where `cond(x)` holds
    pub fn assign_where<P, F>(&mut self, cond: P, f: F)
    where
        P: Fn(T) -> bool + Sync,
        F: Fn(T) -> T + Sync,
    {
        self.apply_spans(move |x| if cond(x) { f(x) } else { x });
    }

    /// Copy every cell of `other` into `self`
    ///
    /// Fails with a shape mismatch before any cell is written. When the two
    /// matrices share cells, a private snapshot of `other` is taken first so
    /// every read observes the pre-assignment state.
    pub fn assign(&mut self, other: &Self) -> Result<()> {
        self.check_shape(other)?;
        if self.shares_cells(other) {
            let snapshot = other.copy();
            return self.assign(&snapshot);
        }
        if self.map.is_compact() && other.map.is_compact() && self.buf.is_unique() {
            let n = self.elem_count();
            let dst = unsafe { self.buf.as_mut_slice() };
            dst[..n].copy_from_slice(&other.buf.as_slice()[..n]);
            return Ok(());
        }
        self.zip_spans(other, |_, y| y);
        Ok(())
    }

    /// Replace cell `x` with `f(x, other_x)` for the corresponding cell of
    /// `other`
    pub fn zip_assign<F>(&mut self, other: &Self, f: F) -> Result<()>
    where
        F: Fn(T, T) -> T + Sync,
    {
        self.check_shape(other)?;
        if self.shares_cells(other) {
            let snapshot = other.copy();
            self.zip_spans(&snapshot, f);
            return Ok(());
        }
        self.zip_spans(other, f);
        Ok(())
    }

    /// Multiply every cell by `alpha`
    ///
    /// `alpha == 1` is a no-op and `alpha == 0` is a zero fill; both skip
    /// the floating-point work of the general path without changing its
    /// result.
    pub fn scale(&mut self, alpha: T) {
        let kind = if alpha == T::one() {
            ScaleKind::Skip
        } else if alpha.is_zero() {
            ScaleKind::Zero
        } else {
            ScaleKind::Mul(alpha)
        };
        match kind {
            ScaleKind::Skip => {}
            ScaleKind::Zero => self.fill(T::zero()),
            ScaleKind::Mul(a) => self.apply_spans(move |x| x * a),
        }
    }

    /// Add `alpha * other` into `self`
    pub fn add_scaled(&mut self, other: &Self, alpha: T) -> Result<()> {
        let kind = if alpha.is_zero() {
            AxpyKind::Skip
        } else if alpha == T::one() {
            AxpyKind::Add
        } else if alpha == T::from_f64(-1.0) {
            AxpyKind::Sub
        } else {
            AxpyKind::Scaled(alpha)
        };
        match kind {
            AxpyKind::Skip => {
                self.check_shape(other)?;
                Ok(())
            }
            AxpyKind::Add => self.zip_assign(other, |x, y| x + y),
            AxpyKind::Sub => self.zip_assign(other, |x, y| x - y),
            AxpyKind::Scaled(a) => self.zip_assign(other, move |x, y| x + y * a),
        }
    }

    /// Multiply cellwise by `other`
    pub fn mul_elements(&mut self, other: &Self) -> Result<()> {
        self.zip_assign(other, |x, y| x * y)
    }

    /// Divide cellwise by `other`
    pub fn div_elements(&mut self, other: &Self) -> Result<()> {
        self.zip_assign(other, |x, y| x / y)
    }

    /// Run a unary transform over all cells, partitioned when worthwhile
    fn apply_spans<F>(&mut self, f: F)
    where
        F: Fn(T) -> T + Sync,
    {
        let work = self.map.work_count();
        let addr = self.buf.addr();
        let map = &self.map;
        if self.par.should_split(N, self.elem_count()) && work > 1 && map.is_injective() {
            let spans = par::partition(work, self.par.degree);
            par::run(&spans, |span| unary_span(addr, map, span, &f));
        } else {
            unary_span(
                addr,
                map,
                Span {
                    start: 0,
                    end: work,
                },
                &f,
            );
        }
    }

    /// Run a binary transform against `other`, partitioned when worthwhile
    ///
    /// Caller guarantees equal shapes and non-aliasing.
    fn zip_spans<F>(&mut self, other: &Self, f: F)
    where
        F: Fn(T, T) -> T + Sync,
    {
        let work = self.map.work_count();
        let dst = self.buf.addr();
        let src = other.buf.addr();
        let dst_map = &self.map;
        let src_map = &other.map;
        if self.par.should_split(N, self.elem_count()) && work > 1 && dst_map.is_injective() {
            let spans = par::partition(work, self.par.degree);
            par::run(&spans, |span| {
                binary_span(dst, dst_map, src, src_map, span, &f)
            });
        } else {
            let span = Span {
                start: 0,
                end: work,
            };
            binary_span(dst, dst_map, src, src_map, span, &f);
        }
    }
}

/// Sequential unary kernel over one span of work units
#[inline]
fn unary_span<T: Element, const N: usize>(
    addr: usize,
    map: &IndexMap<N>,
    span: Span,
    f: &(impl Fn(T) -> T + Sync),
) {
    let ptr = addr as *mut T;
    map.span_for_each(span, |p| unsafe {
        *ptr.add(p) = f(*ptr.add(p));
    });
}

/// Sequential binary kernel over one span of work units
#[inline]
fn binary_span<T: Element, const N: usize>(
    dst: usize,
    dst_map: &IndexMap<N>,
    src: usize,
    src_map: &IndexMap<N>,
    span: Span,
    f: &(impl Fn(T, T) -> T + Sync),
) {
    let d = dst as *mut T;
    let s = src as *const T;
    dst_map.span_zip_for_each(src_map, span, |p, q| unsafe {
        *d.add(p) = f(*d.add(p), *s.add(q));
    });
}
