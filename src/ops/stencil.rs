//! Stencil engine: 9-point (2-D) and 27-point (3-D) neighborhood sweeps
//!
//! Each interior cell of the destination receives the value of a
//! user-supplied function of the source cell and its full neighborhood.
//! Border cells are left untouched, and a matrix too small to have an
//! interior is returned unchanged. The inner loop keeps the neighborhood
//! in registers and shifts it one column per step, so each source cell is
//! loaded once per sweep.
//!
//! Parallel sweeps split the interior rows (2-D) or slices (3-D); every
//! task reads a halo shared with its neighbors but writes a disjoint
//! destination region.

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::matrix::{Matrix2, Matrix3};
use crate::par::{self, Span};

impl<T: Element> Matrix2<T> {
    /// 9-point stencil sweep: for every interior cell, set
    /// `out[r][c] = f(window)` where `window[dr][dc] = self[r-1+dr][c-1+dc]`
    ///
    /// `out` must have the same shape and must not share cells with `self`.
    /// Matrices with fewer than 3 rows or columns are returned unchanged.
    pub fn stencil9<F>(&self, out: &mut Self, f: F) -> Result<()>
    where
        F: Fn([[T; 3]; 3]) -> T + Sync,
    {
        self.check_shape(out)?;
        if self.shares_cells(out) {
            return Err(Error::AliasedOperands { op: "stencil9" });
        }
        let (rows, cols) = (self.rows(), self.cols());
        if rows < 3 || cols < 3 {
            return Ok(());
        }

        let out_ref: &Self = out;
        let interior = rows - 2;
        let sweep_rows = |span: Span| {
            for i in span.start + 1..span.end + 1 {
                // first two columns of the three-row band
                let mut w = [[T::zero(); 3]; 3];
                for dr in 0..3 {
                    for dc in 0..2 {
                        w[dr][dc + 1] = unsafe { self.get_unchecked([i - 1 + dr, dc]) };
                    }
                }
                for j in 1..cols - 1 {
                    for dr in 0..3 {
                        w[dr][0] = w[dr][1];
                        w[dr][1] = w[dr][2];
                        w[dr][2] = unsafe { self.get_unchecked([i - 1 + dr, j + 1]) };
                    }
                    unsafe { out_ref.buf.store(out_ref.map.flat([i, j]), f(w)) };
                }
            }
        };

        if self.par.should_split(2, self.elem_count()) && interior > 1 && out_ref.map.is_injective()
        {
            par::run(&par::partition(interior, self.par.degree), sweep_rows);
        } else {
            sweep_rows(Span {
                start: 0,
                end: interior,
            });
        }
        Ok(())
    }
}

impl<T: Element> Matrix3<T> {
    /// 27-point stencil sweep: the rank-3 analogue of
    /// [`stencil9`](Matrix2::stencil9), with
    /// `window[ds][dr][dc] = self[s-1+ds][r-1+dr][c-1+dc]`
    pub fn stencil27<F>(&self, out: &mut Self, f: F) -> Result<()>
    where
        F: Fn([[[T; 3]; 3]; 3]) -> T + Sync,
    {
        self.check_shape(out)?;
        if self.shares_cells(out) {
            return Err(Error::AliasedOperands { op: "stencil27" });
        }
        let (slices, rows, cols) = (self.slices(), self.rows(), self.cols());
        if slices < 3 || rows < 3 || cols < 3 {
            return Ok(());
        }

        let out_ref: &Self = out;
        let interior = slices - 2;
        let sweep_slices = |span: Span| {
            for s in span.start + 1..span.end + 1 {
                for r in 1..rows - 1 {
                    let mut w = [[[T::zero(); 3]; 3]; 3];
                    for ds in 0..3 {
                        for dr in 0..3 {
                            for dc in 0..2 {
                                w[ds][dr][dc + 1] =
                                    unsafe { self.get_unchecked([s - 1 + ds, r - 1 + dr, dc]) };
                            }
                        }
                    }
                    for c in 1..cols - 1 {
                        for ds in 0..3 {
                            for dr in 0..3 {
                                w[ds][dr][0] = w[ds][dr][1];
                                w[ds][dr][1] = w[ds][dr][2];
                                w[ds][dr][2] = unsafe {
                                    self.get_unchecked([s - 1 + ds, r - 1 + dr, c + 1])
                                };
                            }
                        }
                        unsafe { out_ref.buf.store(out_ref.map.flat([s, r, c]), f(w)) };
                    }
                }
            }
        };

        if self.par.should_split(3, self.elem_count()) && interior > 1 && out_ref.map.is_injective()
        {
            par::run(&par::partition(interior, self.par.degree), sweep_slices);
        } else {
            sweep_slices(Span {
                start: 0,
                end: interior,
            });
        }
        Ok(())
    }
}
