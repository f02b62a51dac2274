//! Backing buffer: flat shared memory behind every dense matrix
//!
//! A [`Buffer`] wraps a flat allocation with reference counting, enabling
//! zero-copy views (transpose, sub-range, flip, selection) that share the
//! underlying cells. Memory is deallocated when the last reference drops.
//!
//! Two matrices "share cells" iff their buffer references are identical
//! (`Arc` pointer equality); that check gates defensive snapshots before
//! in-place binary assignment.
//!
//! Bulk operations mutate the buffer through raw pointers so that the work
//! partitioner can hand disjoint index ranges to worker threads. The single
//! writer per region per operation discipline is the caller's contract; the
//! buffer itself performs no locking.

use crate::dtype::Element;
use std::sync::Arc;

/// Reference-counted flat buffer of matrix cells
pub struct Buffer<T> {
    inner: Arc<BufferInner<T>>,
}

struct BufferInner<T> {
    ptr: *mut T,
    len: usize,
    cap: usize,
}

// The raw pointer is owned by the inner; sharing across threads is safe
// under the disjoint-range write discipline enforced by the partitioner.
unsafe impl<T: Send + Sync> Send for BufferInner<T> {}
unsafe impl<T: Send + Sync> Sync for BufferInner<T> {}

impl<T: Element> Buffer<T> {
    /// Allocate a zero-filled buffer of `len` elements
    pub fn zeroed(len: usize) -> Self {
        Self::from_vec(vec![T::zero(); len])
    }

    /// Take ownership of an existing allocation
    pub fn from_vec(vec: Vec<T>) -> Self {
        let mut vec = std::mem::ManuallyDrop::new(vec);
        let inner = BufferInner {
            ptr: vec.as_mut_ptr(),
            len: vec.len(),
            cap: vec.capacity(),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Copy a slice into a fresh buffer
    pub fn from_slice(data: &[T]) -> Self {
        Self::from_vec(data.to_vec())
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len
    }

    /// Whether the buffer holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.len == 0
    }

    /// Whether this is the only reference to the allocation
    #[inline]
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.inner) == 1
    }

    /// Whether two buffers are the same allocation
    ///
    /// This is the "shared cells" relation: true iff writes through one
    /// handle are visible through the other.
    #[inline]
    pub fn shares_cells(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Base pointer as an address, for moving into rayon closures
    #[inline]
    pub(crate) fn addr(&self) -> usize {
        self.inner.ptr as usize
    }

    /// Load the element at flat index `i`
    ///
    /// # Safety
    /// `i` must be in bounds and no other thread may be writing index `i`.
    #[inline]
    pub(crate) unsafe fn load(&self, i: usize) -> T {
        debug_assert!(i < self.inner.len);
        *self.inner.ptr.add(i)
    }

    /// Store `value` at flat index `i`
    ///
    /// # Safety
    /// `i` must be in bounds and no other thread may be accessing index `i`.
    #[inline]
    pub(crate) unsafe fn store(&self, i: usize, value: T) {
        debug_assert!(i < self.inner.len);
        *self.inner.ptr.add(i) = value;
    }

    /// View the whole allocation as a slice
    ///
    /// Only sound while no concurrent writer exists; used by compact
    /// fast paths that run on the calling thread.
    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.inner.ptr, self.inner.len) }
    }

    /// View the whole allocation as a mutable slice
    ///
    /// # Safety
    /// The caller must be the only accessor for the duration of the borrow.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn as_mut_slice(&self) -> &mut [T] {
        std::slice::from_raw_parts_mut(self.inner.ptr, self.inner.len)
    }
}

impl<T> Clone for Buffer<T> {
    /// Clone increments the reference count (zero-copy)
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Drop for BufferInner<T> {
    fn drop(&mut self) {
        if self.cap != 0 {
            unsafe {
                drop(Vec::from_raw_parts(self.ptr, self.len, self.cap));
            }
        }
    }
}

impl<T: Element> std::fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("ptr", &format!("{:p}", self.inner.ptr))
            .field("len", &self.inner.len)
            .field("refs", &Arc::strong_count(&self.inner))
            .finish()
    }
}
