//! Error types for matr

use thiserror::Error;

/// Result type alias using matr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in matr operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Operand shapes disagree
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Coordinate out of bounds on a checked accessor
    #[error("Index {index} out of bounds for axis {axis} of size {size}")]
    IndexOutOfBounds {
        /// The invalid index
        index: usize,
        /// The axis it was applied to
        axis: usize,
        /// Size of the axis
        size: usize,
    },

    /// A view request reaches outside the source matrix
    #[error(
        "Invalid range on axis {axis}: start {start}, len {len}, stride {stride} \
         exceeds size {size}"
    )]
    InvalidRange {
        /// The axis the range was applied to
        axis: usize,
        /// Requested start coordinate
        start: usize,
        /// Requested length
        len: usize,
        /// Requested sub-stride
        stride: usize,
        /// Size of the source axis
        size: usize,
    },

    /// Operands of a multiply overlap in memory
    #[error("Aliased operands: '{op}' requires pairwise distinct buffers")]
    AliasedOperands {
        /// The operation name
        op: &'static str,
    },

    /// A parallel sub-task failed; surfaced after all siblings were awaited
    #[error("Parallel sub-task failed in '{op}': {source}")]
    TaskFailure {
        /// The bulk operation that was partitioned
        op: &'static str,
        /// The first failing sub-task's error
        #[source]
        source: Box<Error>,
    },

    /// Internal invariant violation; unreachable in correct use
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an out-of-bounds error
    pub fn out_of_bounds(index: usize, axis: usize, size: usize) -> Self {
        Self::IndexOutOfBounds { index, axis, size }
    }

    /// Wrap the first failing sub-task error of a partitioned operation
    pub fn task_failure(op: &'static str, source: Error) -> Self {
        Self::TaskFailure {
            op,
            source: Box::new(source),
        }
    }
}
