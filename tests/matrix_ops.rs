//! Integration tests for elementwise and aggregate operations
//!
//! Tests verify:
//! - fill / assign / assign_fn / zip_assign semantics, including views
//! - Aliased binary assigns read a consistent snapshot
//! - scale and add_scaled match their general-path definitions
//! - Seeded aggregation, NaN on empty, filtered and coordinate variants
//! - cardinality counts non-zero cells

use matr::prelude::*;

// ============================================================================
// Elementwise
// ============================================================================

#[test]
fn test_assign_between_matrices() {
    let mut a = Matrix2::<f64>::new(2, 3);
    let b = Matrix2::from_fn([2, 3], |[r, c]| (r * 3 + c) as f64);
    a.assign(&b).unwrap();
    assert_eq!(a.to_vec(), b.to_vec());
    assert!(!a.shares_cells(&b));

    let c = Matrix2::<f64>::new(3, 2);
    assert!(matches!(a.assign(&c), Err(Error::ShapeMismatch { .. })));
}

#[test]
fn test_assign_into_view_scatters() {
    let mut m = Matrix2::<f64>::new(4, 4);
    let mut diag_rows = m.view_strides([2, 1]).unwrap(); // rows 0 and 2
    let src = Matrix2::from_fn([2, 4], |[r, c]| (10 * (r + 1) + c) as f64);
    diag_rows.assign(&src).unwrap();
    assert_eq!(m.get([0, 3]).unwrap(), 13.0);
    assert_eq!(m.get([2, 0]).unwrap(), 20.0);
    assert_eq!(m.get([1, 0]).unwrap(), 0.0);
}

#[test]
fn test_zip_assign_with_overlapping_views() {
    // shift a vector left by one via overlapping views of the same buffer
    let v = Matrix1::from_slice(&[1.0f64, 2.0, 3.0, 4.0, 5.0]);
    let mut head = v.view_part([0], [4]).unwrap();
    let tail = v.view_part([1], [4]).unwrap();
    head.zip_assign(&tail, |_, y| y).unwrap();
    assert_eq!(v.to_vec(), vec![2.0, 3.0, 4.0, 5.0, 5.0]);
}

#[test]
fn test_scale_and_add_scaled() {
    let mut a = Matrix1::from_slice(&[1.0f64, 2.0, 3.0]);
    let b = Matrix1::from_slice(&[4.0f64, 5.0, 6.0]);

    a.scale(3.0);
    assert_eq!(a.to_vec(), vec![3.0, 6.0, 9.0]);

    a.add_scaled(&b, -1.0).unwrap();
    assert_eq!(a.to_vec(), vec![-1.0, 1.0, 3.0]);

    a.add_scaled(&b, 0.25).unwrap();
    assert_eq!(a.to_vec(), vec![0.0, 2.25, 4.5]);
}

#[test]
fn test_assign_where_on_selection() {
    let mut m = Matrix2::from_fn([3, 3], |[r, c]| (r * 3 + c) as f64);
    let mut sel = m.view_selection([None, Some(&[0, 2])]).unwrap();
    sel.assign_where(|x| x > 4.0, |x| -x);
    assert_eq!(m.get([2, 0]).unwrap(), -6.0);
    assert_eq!(m.get([2, 2]).unwrap(), -8.0);
    assert_eq!(m.get([2, 1]).unwrap(), 7.0); // not selected
    assert_eq!(m.get([0, 0]).unwrap(), 0.0); // fails predicate
}

// ============================================================================
// Aggregates
// ============================================================================

#[test]
fn test_seeded_aggregate() {
    let m = Matrix1::from_slice(&[4.0f64, 2.0, 8.0]);
    // non-commutative combiner exposes the seeding and order
    let folded = m.aggregate(|a, b| a / b, |x| x);
    assert_eq!(folded, 4.0 / 2.0 / 8.0);
}

#[test]
fn test_empty_matrix_aggregates_to_nan() {
    let m = Matrix2::<f64>::new(0, 5);
    assert!(m.aggregate(|a, b| a + b, |x| x).is_nan());
    assert!(m.max_value().is_nan());
    assert_eq!(m.sum(), 0.0);
}

#[test]
fn test_aggregate_at_coordinates() {
    let m = Matrix2::from_fn([4, 4], |[r, c]| (r * 4 + c) as f64);
    let trace = m
        .aggregate_at(|a, b| a + b, |x| x, &[[0, 0], [1, 1], [2, 2], [3, 3]])
        .unwrap();
    assert_eq!(trace, 30.0);
    assert!(m.aggregate_at(|a, b| a + b, |x| x, &[[4, 0]]).is_err());
}

#[test]
fn test_cardinality_lifecycle() {
    let mut m = Matrix2::<f64>::new(3, 3);
    m.fill(1.0);
    assert_eq!(m.cardinality(), 9);
    m.assign_fn(|_| 0.0);
    assert_eq!(m.cardinality(), 0);
}

#[test]
fn test_aggregate_over_flipped_view_matches_source() {
    let m = Matrix2::from_fn([3, 5], |[r, c]| ((r * 5 + c) % 4) as f64);
    let f = m.view_flip(0).view_flip(1);
    assert_eq!(f.sum(), m.sum());
    assert_eq!(f.min_value(), m.min_value());
    assert_eq!(f.cardinality(), m.cardinality());
}

// ============================================================================
// Complex cells
// ============================================================================

#[test]
fn test_complex_matrix_ops() {
    let mut m = Matrix1::from_fn([4], |[t]| Complex128::new(t as f64, 1.0));
    m.scale(Complex128::new(0.0, 1.0)); // multiply by i
    assert_eq!(m.get([1]).unwrap(), Complex128::new(-1.0, 1.0));

    let total = m.sum();
    assert_eq!(total, Complex128::new(-4.0, 6.0));

    // max by magnitude
    let biggest = m.max_value();
    assert_eq!(biggest, Complex128::new(-1.0, 3.0));
}
