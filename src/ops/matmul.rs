//! Blocked matrix multiply: `C = alpha * op(A) * op(B) + beta * C`
//!
//! Transposed operands are handled by re-dispatching through a transpose
//! view, so one kernel serves all four `op` combinations. The kernel walks
//! A in row blocks sized to keep a block of A plus a column of B resident
//! in cache, with a four-way unrolled inner product.
//!
//! Work is split by columns of B when there are at least as many columns
//! as tasks, otherwise by rows of A; either way each task owns a disjoint
//! region of C. The task count scales with the flop count so small
//! products never pay dispatch overhead.

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::matrix::{Matrix1, Matrix2};
use crate::par;

/// Flop count that justifies one unit of parallel work, and the cache
/// budget (in elements) of one A row block
const WORK_PER_TASK: usize = 30_000;

impl<T: Element> Matrix2<T> {
    /// Dense multiply: returns `alpha * op(self) * op(b) + beta * c`
    ///
    /// `op(x)` is `x` transposed when the matching flag is set. When `c` is
    /// `None` a zeroed result is allocated and `beta` is ignored. A provided
    /// `c` must not share cells with either multiplicand; `self` and `b`
    /// may share cells with each other (both are only read), so products
    /// like `a.mult(&a, ..)` with a transpose flag are fine.
    pub fn mult(
        &self,
        b: &Self,
        c: Option<Self>,
        alpha: T,
        beta: T,
        trans_a: bool,
        trans_b: bool,
    ) -> Result<Self> {
        if trans_a {
            return self.view_dice().mult(b, c, alpha, beta, false, trans_b);
        }
        if trans_b {
            return self.mult(&b.view_dice(), c, alpha, beta, false, false);
        }

        let (m, k) = (self.rows(), self.cols());
        let n = b.cols();
        if b.rows() != k {
            return Err(Error::shape_mismatch(&[k, n], &[b.rows(), b.cols()]));
        }
        let c = match c {
            Some(c) => {
                if c.rows() != m || c.cols() != n {
                    return Err(Error::shape_mismatch(&[m, n], &[c.rows(), c.cols()]));
                }
                if c.shares_cells(self) || c.shares_cells(b) {
                    return Err(Error::AliasedOperands { op: "mult" });
                }
                c
            }
            None => Self::new(m, n).with_parallelism(self.par),
        };

        let flops = 2 * m * k * n;
        let limit = if c.map.is_injective() {
            self.par.degree.max(1)
        } else {
            1
        };
        let tasks = (flops / WORK_PER_TASK).clamp(1, limit);
        if tasks <= 1 {
            gemm_block(self, b, &c, alpha, beta);
            return Ok(c);
        }

        log::trace!("mult {m}x{k} * {k}x{n}: {tasks} tasks");
        if n >= tasks {
            // split the columns of B (and of C)
            par::try_run("mult", &par::partition(n, tasks), |span| {
                let bs = b.view_part([0, span.start], [k, span.len()])?;
                let cs = c.view_part([0, span.start], [m, span.len()])?;
                gemm_block(self, &bs, &cs, alpha, beta);
                Ok(())
            })?;
        } else {
            // few columns: split the rows of A (and of C)
            par::try_run("mult", &par::partition(m, tasks), |span| {
                let als = self.view_part([span.start, 0], [span.len(), k])?;
                let cs = c.view_part([span.start, 0], [span.len(), n])?;
                gemm_block(&als, b, &cs, alpha, beta);
                Ok(())
            })?;
        }
        Ok(c)
    }

    /// Matrix-vector multiply: returns `alpha * op(self) * x + beta * y`
    ///
    /// When `y` is `None` a zeroed result is allocated and `beta` is
    /// ignored. A provided `y` must not share cells with `self` or `x`.
    pub fn mult_vec(
        &self,
        x: &Matrix1<T>,
        y: Option<Matrix1<T>>,
        alpha: T,
        beta: T,
        trans_a: bool,
    ) -> Result<Matrix1<T>> {
        if trans_a {
            return self.view_dice().mult_vec(x, y, alpha, beta, false);
        }

        let (m, k) = (self.rows(), self.cols());
        if x.size() != k {
            return Err(Error::shape_mismatch(&[k], &[x.size()]));
        }
        let y = match y {
            Some(y) => {
                if y.size() != m {
                    return Err(Error::shape_mismatch(&[m], &[y.size()]));
                }
                if y.shares_cells(self) || y.shares_cells(x) {
                    return Err(Error::AliasedOperands { op: "mult_vec" });
                }
                y
            }
            None => Matrix1::new(m).with_parallelism(self.par),
        };

        let limit = if y.map.is_injective() {
            self.par.degree.max(1).min(m.max(1))
        } else {
            1
        };
        let tasks = (2 * m * k / WORK_PER_TASK).clamp(1, limit);
        let row_range = |span: par::Span| {
            for i in span.start..span.end {
                let mut s = T::zero();
                for l in 0..k {
                    s = s + unsafe { self.get_unchecked([i, l]) * x.get_unchecked([l]) };
                }
                let prior = if beta.is_zero() {
                    T::zero()
                } else {
                    beta * unsafe { y.buf.load(y.map.flat([i])) }
                };
                unsafe { y.buf.store(y.map.flat([i]), alpha * s + prior) };
            }
        };
        if tasks <= 1 {
            row_range(par::Span { start: 0, end: m });
        } else {
            par::run(&par::partition(m, tasks), row_range);
        }
        Ok(y)
    }
}

/// Sequential kernel over one region: `C = alpha * A * B + beta * C`
///
/// Shapes are validated by the caller; `c` covers a region no other thread
/// touches during the call.
fn gemm_block<T: Element>(a: &Matrix2<T>, b: &Matrix2<T>, c: &Matrix2<T>, alpha: T, beta: T) {
    let (m, k) = (a.rows(), a.cols());
    let n = b.cols();
    let block = (WORK_PER_TASK / (k + 1)).max(1);
    let head = k % 4;

    let mut row0 = 0;
    while row0 < m {
        let row1 = (row0 + block).min(m);
        for j in 0..n {
            for i in row0..row1 {
                // four-way unrolled inner product, head elements first
                let mut s = T::zero();
                let mut l = 0;
                while l < head {
                    s = s + unsafe { a.get_unchecked([i, l]) * b.get_unchecked([l, j]) };
                    l += 1;
                }
                while l < k {
                    unsafe {
                        s = s
                            + a.get_unchecked([i, l]) * b.get_unchecked([l, j])
                            + a.get_unchecked([i, l + 1]) * b.get_unchecked([l + 1, j])
                            + a.get_unchecked([i, l + 2]) * b.get_unchecked([l + 2, j])
                            + a.get_unchecked([i, l + 3]) * b.get_unchecked([l + 3, j]);
                    }
                    l += 4;
                }
                let flat = c.map.flat([i, j]);
                let prior = if beta.is_zero() {
                    T::zero()
                } else {
                    beta * unsafe { c.buf.load(flat) }
                };
                unsafe { c.buf.store(flat, alpha * s + prior) };
            }
        }
        row0 = row1;
    }
}
