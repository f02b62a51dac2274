//! Work partitioner: splitting bulk operations across worker threads
//!
//! Bulk operations split their outermost axis into contiguous spans of
//! near-equal size and dispatch one unit of work per span to the rayon
//! worker pool. The caller blocks until every unit completes. Partial
//! reduction results are always combined in span order (ascending
//! coordinate order), so results are reproducible for a fixed
//! configuration.
//!
//! Failures are never swallowed: the fallible dispatcher collects every
//! span's outcome and surfaces the first error to the caller after all
//! siblings have finished.

use crate::error::{Error, Result};
use rayon::prelude::*;
use smallvec::SmallVec;

/// Default sequential-cutoff for rank-1 bulk operations
pub const DEFAULT_THRESHOLD_1D: usize = 32_768;
/// Default sequential-cutoff for rank-2 bulk operations
pub const DEFAULT_THRESHOLD_2D: usize = 8_192;
/// Default sequential-cutoff for rank-3 bulk operations
pub const DEFAULT_THRESHOLD_3D: usize = 2_048;

/// Parallelism settings consulted at the start of every bulk operation
///
/// The configuration travels with each matrix (derived views inherit it)
/// instead of living in process-wide mutable state, so tests and concurrent
/// callers stay deterministic. Thresholds shrink with rank: per-task
/// overhead amortizes faster when each outer index covers a whole plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Maximum number of concurrent sub-tasks per bulk operation
    pub degree: usize,
    /// Element-count cutoff below which rank-1 operations run sequentially
    pub threshold_1d: usize,
    /// Element-count cutoff below which rank-2 operations run sequentially
    pub threshold_2d: usize,
    /// Element-count cutoff below which rank-3 operations run sequentially
    pub threshold_3d: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            degree: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            threshold_1d: DEFAULT_THRESHOLD_1D,
            threshold_2d: DEFAULT_THRESHOLD_2D,
            threshold_3d: DEFAULT_THRESHOLD_3D,
        }
    }
}

impl ParallelConfig {
    /// Configuration that always runs on the calling thread
    pub fn sequential() -> Self {
        Self {
            degree: 1,
            ..Self::default()
        }
    }

    /// Replace the degree of parallelism
    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree.max(1);
        self
    }

    /// Replace the sequential cutoff for one rank
    pub fn with_threshold(mut self, rank: usize, threshold: usize) -> Self {
        match rank {
            1 => self.threshold_1d = threshold,
            2 => self.threshold_2d = threshold,
            _ => self.threshold_3d = threshold,
        }
        self
    }

    /// The sequential cutoff for matrices of the given rank
    pub fn threshold(&self, rank: usize) -> usize {
        match rank {
            0 | 1 => self.threshold_1d,
            2 => self.threshold_2d,
            _ => self.threshold_3d,
        }
    }

    /// Whether a bulk operation over `elems` elements of a rank-`rank`
    /// matrix should be partitioned
    pub fn should_split(&self, rank: usize, elems: usize) -> bool {
        self.degree > 1 && elems >= self.threshold(rank)
    }
}

/// Half-open index span `[start, end)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    /// First index of the span
    pub start: usize,
    /// One past the last index
    pub end: usize,
}

impl Span {
    /// Number of indices covered
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers nothing
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `[0, total)` into at most `degree` contiguous spans
///
/// Every span has `total / tasks` indices except the last, which absorbs
/// the remainder. Returns no spans when `total` is 0.
pub fn partition(total: usize, degree: usize) -> SmallVec<[Span; 8]> {
    let mut spans = SmallVec::new();
    if total == 0 {
        return spans;
    }
    let tasks = degree.clamp(1, total);
    let chunk = total / tasks;
    for t in 0..tasks {
        let start = t * chunk;
        let end = if t == tasks - 1 { total } else { start + chunk };
        spans.push(Span { start, end });
    }
    spans
}

/// Run one infallible unit of work per span, returning results in span order
pub(crate) fn run<R, F>(spans: &[Span], work: F) -> Vec<R>
where
    R: Send,
    F: Fn(Span) -> R + Sync,
{
    if spans.len() <= 1 {
        return spans.iter().map(|&s| work(s)).collect();
    }
    log::trace!("dispatching {} parallel sub-tasks", spans.len());
    spans.par_iter().map(|&s| work(s)).collect()
}

/// Run one fallible unit of work per span
///
/// All units are awaited; if any failed, the first failure (in span order)
/// is surfaced as [`Error::TaskFailure`] and the successful siblings'
/// results are discarded.
pub(crate) fn try_run<R, F>(op: &'static str, spans: &[Span], work: F) -> Result<Vec<R>>
where
    R: Send,
    F: Fn(Span) -> Result<R> + Sync,
{
    let outcomes: Vec<Result<R>> = if spans.len() <= 1 {
        spans.iter().map(|&s| work(s)).collect()
    } else {
        log::trace!("dispatching {} parallel sub-tasks for '{op}'", spans.len());
        spans.par_iter().map(|&s| work(s)).collect()
    };

    let mut results = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            Ok(r) => results.push(r),
            Err(e) => return Err(Error::task_failure(op, e)),
        }
    }
    Ok(results)
}
