//! Sparse matrices: hash-backed storage for mostly-zero data
//!
//! A [`SparseMatrix`] stores only its non-zero cells, keyed by flat index
//! in a shared hash map behind a read-write lock. Reads of absent keys
//! yield zero; writing zero removes the key, so the map's population is
//! exactly the matrix's cardinality. Views (transpose, sub-range, flip)
//! share the map and re-address it through a strided index map, the same
//! way dense views share a buffer.
//!
//! Bulk operations take the lock once and run on the calling thread; the
//! lock serializes writers, so partitioning would only add contention.

mod mult;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::dtype::Element;
use crate::error::Result;
use crate::map::StrideMap;
use crate::matrix::Matrix;

/// Sparse rank-`N` matrix over elements of type `T`
pub struct SparseMatrix<T: Element, const N: usize> {
    pub(crate) map: StrideMap<N>,
    pub(crate) cells: Arc<RwLock<HashMap<usize, T>>>,
    /// Logical cell count of the original allocation; keys range over it
    base_elems: usize,
}

/// Sparse vector (rank 1)
pub type SparseMatrix1<T> = SparseMatrix<T, 1>;
/// Sparse matrix (rank 2)
pub type SparseMatrix2<T> = SparseMatrix<T, 2>;
/// Sparse volume (rank 3)
pub type SparseMatrix3<T> = SparseMatrix<T, 3>;

impl<T: Element, const N: usize> SparseMatrix<T, N> {
    /// Allocate an all-zero sparse matrix of the given shape
    pub fn zeroed(shape: [usize; N]) -> Self {
        let map = StrideMap::contiguous(shape);
        let base_elems = map.elem_count();
        Self {
            map,
            cells: Arc::new(RwLock::new(HashMap::new())),
            base_elems,
        }
    }

    /// Build a sparse matrix from a dense one, storing its non-zero cells
    pub fn from_dense(dense: &Matrix<T, N>) -> Self {
        let out = Self::zeroed(dense.shape());
        {
            let mut cells = out.cells.write();
            let mut flat = 0usize;
            for &v in &dense.to_vec() {
                if !v.is_zero() {
                    cells.insert(flat, v);
                }
                flat += 1;
            }
        }
        out
    }

    /// Size along each axis
    #[inline]
    pub fn shape(&self) -> [usize; N] {
        self.map.size()
    }

    /// Total number of logical cells
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.map.elem_count()
    }

    /// Whether this matrix and `other` address the same cell store
    pub fn shares_cells(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }

    /// Bounds-checked read; absent cells read as zero
    pub fn get(&self, index: [usize; N]) -> Result<T> {
        let flat = self.map.index(index)?;
        Ok(self
            .cells
            .read()
            .get(&flat)
            .copied()
            .unwrap_or_else(T::zero))
    }

    /// Bounds-checked write; writing zero removes the cell
    pub fn set(&mut self, index: [usize; N], value: T) -> Result<()> {
        let flat = self.map.index(index)?;
        let mut cells = self.cells.write();
        if value.is_zero() {
            cells.remove(&flat);
        } else {
            cells.insert(flat, value);
        }
        Ok(())
    }

    /// Number of cells holding a non-zero value
    pub fn cardinality(&self) -> usize {
        if self.covers_store() {
            return self.cells.read().len();
        }
        let mut n = 0;
        self.for_each_entry(|_, _| n += 1);
        n
    }

    /// Set every cell to `value`
    ///
    /// Filling with zero empties the store; any other value densifies it.
    pub fn fill(&mut self, value: T) {
        if value.is_zero() && self.covers_store() {
            self.cells.write().clear();
            return;
        }
        let mut cells = self.cells.write();
        self.map.for_each_flat(|flat| {
            if value.is_zero() {
                cells.remove(&flat);
            } else {
                cells.insert(flat, value);
            }
        });
    }

    /// Replace every cell `x` with `f(x)`
    ///
    /// Visits zero cells too, since `f(0)` may be non-zero.
    pub fn assign_fn<F>(&mut self, f: F)
    where
        F: Fn(T) -> T,
    {
        let mut cells = self.cells.write();
        self.map.for_each_flat(|flat| {
            let x = cells.get(&flat).copied().unwrap_or_else(T::zero);
            let y = f(x);
            if y.is_zero() {
                cells.remove(&flat);
            } else {
                cells.insert(flat, y);
            }
        });
    }

    /// Fold all cells, zeros included, exactly like the dense aggregate
    ///
    /// Returns NaN when the matrix has no cells.
    pub fn aggregate<C, M>(&self, combine: C, map_fn: M) -> T
    where
        C: Fn(T, T) -> T,
        M: Fn(T) -> T,
    {
        if self.elem_count() == 0 {
            return T::nan();
        }
        let cells = self.cells.read();
        let mut acc: Option<T> = None;
        self.map.for_each_flat(|flat| {
            let v = map_fn(cells.get(&flat).copied().unwrap_or_else(T::zero));
            acc = Some(match acc {
                Some(a) => combine(a, v),
                None => v,
            });
        });
        acc.unwrap_or_else(T::nan)
    }

    /// Sum of all cells; only stored entries contribute
    pub fn sum(&self) -> T {
        let mut s = T::zero();
        self.for_each_entry(|_, v| s = s + v);
        s
    }

    /// Visit every non-zero cell as `(coords, value)`
    ///
    /// A matrix that covers its whole store walks the hash map directly;
    /// views fall back to a coordinate sweep.
    pub fn for_each_entry<F>(&self, mut f: F)
    where
        F: FnMut([usize; N], T),
    {
        let cells = self.cells.read();
        if self.covers_store() {
            for (&flat, &v) in cells.iter() {
                f(decompose(flat, self.shape()), v);
            }
            return;
        }
        let shape = self.shape();
        let mut idx = [0usize; N];
        for _ in 0..self.elem_count() {
            if let Some(&v) = cells.get(&self.map.flat(idx)) {
                if !v.is_zero() {
                    f(idx, v);
                }
            }
            for a in (0..N).rev() {
                idx[a] += 1;
                if idx[a] < shape[a] {
                    break;
                }
                idx[a] = 0;
            }
        }
    }

    /// Materialize into a dense matrix
    pub fn to_dense(&self) -> Matrix<T, N> {
        let mut out = Matrix::zeroed(self.shape());
        self.for_each_entry(|idx, v| {
            // coords come from our own shape, always in bounds
            unsafe { out.set_unchecked(idx, v) };
        });
        out
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

    /// View with one axis reversed
    ///
    /// # Panics
    /// Panics if `axis` is not a valid axis.
    pub fn view_flip(&self, axis: usize) -> Self {
        assert!(axis < N, "axis out of range");
        self.view_of(self.map.flipped(axis))
    }

    fn view_of(&self, map: StrideMap<N>) -> Self {
        Self {
            map,
            cells: Arc::clone(&self.cells),
            base_elems: self.base_elems,
        }
    }

    /// Whether every stored key is a cell of this matrix (true for the
    /// originally allocated handle, false for proper views)
    fn covers_store(&self) -> bool {
        self.map.is_contiguous() && self.map.elem_count() == self.base_elems
    }
}

impl<T: Element> SparseMatrix<T, 2> {
    /// Allocate an all-zero `rows × cols` sparse matrix
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::zeroed([rows, cols])
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

    /// Transpose view: rows become columns
    pub fn view_dice(&self) -> Self {
        self.view_swap(0, 1)
    }
}

/// Cloning yields another handle onto the same cells, not a deep copy.
impl<T: Element, const N: usize> Clone for SparseMatrix<T, N> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            cells: Arc::clone(&self.cells),
            base_elems: self.base_elems,
        }
    }
}

impl<T: Element, const N: usize> std::fmt::Debug for SparseMatrix<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparseMatrix")
            .field("shape", &self.shape())
            .field("cardinality", &self.cells.read().len())
            .finish()
    }
}

/// Row-major coordinates of a flat index
fn decompose<const N: usize>(mut flat: usize, shape: [usize; N]) -> [usize; N] {
    let mut idx = [0usize; N];
    for a in (0..N).rev() {
        idx[a] = flat % shape[a];
        flat /= shape[a];
    }
    idx
}
