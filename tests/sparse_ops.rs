//! Integration tests for hash-backed sparse matrices
//!
//! Tests verify:
//! - Zero-default reads, zero-removal writes, cardinality tracking
//! - Dense round trips
//! - Views share the cell store and count only visible cells
//! - Sparse-dense and dense-sparse multiplies against dense references
//! - Aggregates see implicit zeros

use matr::prelude::*;

fn checkerboard(rows: usize, cols: usize) -> SparseMatrix2<f64> {
    let mut m = SparseMatrix2::new(rows, cols);
    for r in 0..rows {
        for c in 0..cols {
            if (r + c) % 2 == 0 {
                m.set([r, c], (r * cols + c + 1) as f64).unwrap();
            }
        }
    }
    m
}

// ============================================================================
// Storage semantics
// ============================================================================

#[test]
fn test_zero_cells_are_not_stored() {
    let mut m = SparseMatrix2::<f64>::new(100, 100);
    assert_eq!(m.cardinality(), 0);
    m.set([50, 50], 1.5).unwrap();
    m.set([99, 0], -2.5).unwrap();
    assert_eq!(m.cardinality(), 2);
    assert_eq!(m.get([0, 0]).unwrap(), 0.0);

    m.set([50, 50], 0.0).unwrap();
    assert_eq!(m.cardinality(), 1);
}

#[test]
fn test_fill_cycle() {
    let mut m = SparseMatrix2::<f64>::new(3, 3);
    m.fill(2.0);
    assert_eq!(m.cardinality(), 9);
    assert_eq!(m.sum(), 18.0);
    m.fill(0.0);
    assert_eq!(m.cardinality(), 0);
}

#[test]
fn test_dense_round_trip() {
    let s = checkerboard(4, 5);
    let d = s.to_dense();
    assert_eq!(d.get([1, 1]).unwrap(), s.get([1, 1]).unwrap());
    assert_eq!(d.get([0, 1]).unwrap(), 0.0);

    let back = SparseMatrix::from_dense(&d);
    assert_eq!(back.cardinality(), s.cardinality());
    assert_eq!(back.to_dense().to_vec(), d.to_vec());
}

// ============================================================================
// Views
// ============================================================================

#[test]
fn test_sparse_views() {
    let m = checkerboard(4, 4);
    let t = m.view_dice();
    for r in 0..4 {
        for c in 0..4 {
            assert_eq!(t.get([c, r]).unwrap(), m.get([r, c]).unwrap());
        }
    }

    let p = m.view_part([1, 1], [2, 2]).unwrap();
    let dense_p = m.to_dense().view_part([1, 1], [2, 2]).unwrap();
    assert_eq!(p.to_dense().to_vec(), dense_p.to_vec());
    assert_eq!(p.cardinality() as f64, dense_p.cardinality() as f64);

    let f = m.view_flip(1);
    assert_eq!(f.get([2, 0]).unwrap(), m.get([2, 3]).unwrap());
}

#[test]
fn test_sparse_view_writes_alias() {
    let mut base = SparseMatrix2::<f64>::new(3, 3);
    let mut t = base.view_dice();
    t.set([0, 2], 9.0).unwrap();
    assert_eq!(base.get([2, 0]).unwrap(), 9.0);
    base.set([2, 0], 0.0).unwrap();
    assert_eq!(t.cardinality(), 0);
}

// ============================================================================
// Multiplies
// ============================================================================

#[test]
fn test_sparse_dense_mult_matches_dense() {
    let a = checkerboard(4, 6);
    let b = Matrix2::from_fn([6, 3], |[r, c]| ((r + 2 * c) % 5) as f64 - 2.0);
    let got = a.mult(&b, None, 1.0, 0.0, false).unwrap();
    let want = a.to_dense().mult(&b, None, 1.0, 0.0, false, false).unwrap();
    assert_eq!(got.to_vec(), want.to_vec());
}

#[test]
fn test_sparse_dense_mult_transposed() {
    let a = checkerboard(5, 3);
    let b = Matrix2::from_fn([5, 4], |[r, c]| (r * 4 + c) as f64);
    let got = a.mult(&b, None, 2.0, 0.0, true).unwrap();
    let want = a
        .to_dense()
        .mult(&b, None, 2.0, 0.0, true, false)
        .unwrap();
    assert_eq!(got.to_vec(), want.to_vec());
}

#[test]
fn test_dense_sparse_mult_matches_dense() {
    let a = Matrix2::from_fn([3, 5], |[r, c]| (r * 5 + c) as f64 * 0.5);
    let b = checkerboard(5, 4);
    let got = a.mult_sparse(&b, None, 1.0, 0.0, false).unwrap();
    let want = a
        .mult(&b.to_dense(), None, 1.0, 0.0, false, false)
        .unwrap();
    assert_eq!(got.to_vec(), want.to_vec());
}

#[test]
fn test_sparse_mult_beta_accumulates() {
    let a = checkerboard(3, 3);
    let b = Matrix2::<f64>::identity(3);
    let mut c0 = Matrix2::<f64>::new(3, 3);
    c0.fill(1.0);
    let c = a.mult(&b, Some(c0), 1.0, 2.0, false).unwrap();
    let want: Vec<f64> = a.to_dense().to_vec().iter().map(|x| x + 2.0).collect();
    assert_eq!(c.to_vec(), want);
}

// ============================================================================
// Aggregates
// ============================================================================

#[test]
fn test_aggregates_see_implicit_zeros() {
    let mut m = SparseMatrix1::<f64>::zeroed([6]);
    m.set([0], 5.0).unwrap();
    m.set([3], -2.0).unwrap();
    assert_eq!(m.sum(), 3.0);
    assert_eq!(m.aggregate(|a, b| if b < a { b } else { a }, |x| x), -2.0);
    assert_eq!(m.aggregate(|a, b| if b > a { b } else { a }, |x| x), 5.0);
    // all-stored-positive still yields min 0 from the unstored cells
    m.set([3], 2.0).unwrap();
    assert_eq!(m.aggregate(|a, b| if b < a { b } else { a }, |x| x), 0.0);
}

#[test]
fn test_assign_fn_densifies_and_sparsifies() {
    let mut m = SparseMatrix2::<f64>::new(2, 3);
    m.assign_fn(|x| x + 1.0);
    assert_eq!(m.cardinality(), 6);
    m.assign_fn(|x| x * 0.0);
    assert_eq!(m.cardinality(), 0);
}
