//! Multiplies involving a sparse operand
//!
//! Both kernels walk the stored entries of the sparse operand and scatter
//! rank-one updates into a dense result, so the cost scales with the
//! cardinality rather than the logical size. They run on the calling
//! thread: the entry walk holds the store's read lock, and partitioning a
//! lock-bound sweep buys nothing.

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::matrix::Matrix2;
use crate::sparse::SparseMatrix2;

impl<T: Element> SparseMatrix2<T> {
    /// Sparse-dense multiply: returns `alpha * op(self) * b + beta * c`
    ///
    /// When `c` is `None` a zeroed result is allocated and `beta` is
    /// ignored. A provided `c` must not share cells with `b`.
    pub fn mult(
        &self,
        b: &Matrix2<T>,
        c: Option<Matrix2<T>>,
        alpha: T,
        beta: T,
        trans_a: bool,
    ) -> Result<Matrix2<T>> {
        if trans_a {
            return self.view_dice().mult(b, c, alpha, beta, false);
        }

        let (m, k) = (self.rows(), self.cols());
        let n = b.cols();
        if b.rows() != k {
            return Err(Error::shape_mismatch(&[k, n], &[b.rows(), b.cols()]));
        }
        let c = prepare_result(c, b, m, n, beta, "mult")?;

        self.for_each_entry(|[r, l], v| {
            let av = alpha * v;
            for j in 0..n {
                unsafe {
                    let flat = c.map.flat([r, j]);
                    c.buf.store(flat, c.buf.load(flat) + av * b.get_unchecked([l, j]));
                }
            }
        });
        Ok(c)
    }
}

impl<T: Element> Matrix2<T> {
    /// Dense-sparse multiply: returns `alpha * self * op(b) + beta * c`
    ///
    /// When `c` is `None` a zeroed result is allocated and `beta` is
    /// ignored. A provided `c` must not share cells with `self`.
    pub fn mult_sparse(
        &self,
        b: &SparseMatrix2<T>,
        c: Option<Matrix2<T>>,
        alpha: T,
        beta: T,
        trans_b: bool,
    ) -> Result<Matrix2<T>> {
        if trans_b {
            return self.mult_sparse(&b.view_dice(), c, alpha, beta, false);
        }

        let (m, k) = (self.rows(), self.cols());
        let n = b.cols();
        if b.rows() != k {
            return Err(Error::shape_mismatch(&[k, n], &[b.rows(), b.cols()]));
        }
        let c = prepare_result(c, self, m, n, beta, "mult_sparse")?;

        b.for_each_entry(|[l, j], v| {
            let av = alpha * v;
            for i in 0..m {
                unsafe {
                    let flat = c.map.flat([i, j]);
                    c.buf
                        .store(flat, c.buf.load(flat) + av * self.get_unchecked([i, l]));
                }
            }
        });
        Ok(c)
    }
}

/// Validate or allocate the dense accumulator and apply `beta` to it
fn prepare_result<T: Element>(
    c: Option<Matrix2<T>>,
    dense_operand: &Matrix2<T>,
    m: usize,
    n: usize,
    beta: T,
    op: &'static str,
) -> Result<Matrix2<T>> {
    match c {
        Some(mut c) => {
            if c.rows() != m || c.cols() != n {
                return Err(Error::shape_mismatch(&[m, n], &[c.rows(), c.cols()]));
            }
            if c.shares_cells(dense_operand) {
                return Err(Error::AliasedOperands { op });
            }
            c.scale(beta);
            Ok(c)
        }
        None => Ok(Matrix2::new(m, n)),
    }
}
