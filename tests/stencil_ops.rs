//! Integration tests for the 9-point and 27-point stencil sweeps
//!
//! Tests verify:
//! - Interior cells receive the window function, borders stay untouched
//! - Window orientation (dr/dc indexing)
//! - Sweeps over view sources and destinations
//! - Matrices without an interior are no-ops
//! - Shape and aliasing rejections

use matr::prelude::*;

fn laplacian(w: [[f64; 3]; 3]) -> f64 {
    w[0][1] + w[2][1] + w[1][0] + w[1][2] - 4.0 * w[1][1]
}

// ============================================================================
// 9-point
// ============================================================================

#[test]
fn test_laplacian_of_quadratic() {
    // f(r,c) = r^2 has constant discrete laplacian 2 in the interior
    let a = Matrix2::<f64>::from_fn([6, 5], |[r, _]| (r * r) as f64);
    let mut out = Matrix2::new(6, 5);
    a.stencil9(&mut out, laplacian).unwrap();
    for r in 1..5 {
        for c in 1..4 {
            assert_eq!(out.get([r, c]).unwrap(), 2.0);
        }
    }
    for c in 0..5 {
        assert_eq!(out.get([0, c]).unwrap(), 0.0);
        assert_eq!(out.get([5, c]).unwrap(), 0.0);
    }
}

#[test]
fn test_window_indexing() {
    let a = Matrix2::<f64>::from_fn([3, 4], |[r, c]| (r * 10 + c) as f64);
    let mut out = Matrix2::new(3, 4);
    a.stencil9(&mut out, |w| w[2][0]).unwrap();
    // w[2][0] at center (1,c) is a[2][c-1]
    assert_eq!(out.get([1, 1]).unwrap(), a.get([2, 0]).unwrap());
    assert_eq!(out.get([1, 2]).unwrap(), a.get([2, 1]).unwrap());
}

#[test]
fn test_stencil_on_views() {
    let base = Matrix2::<f64>::from_fn([8, 8], |[r, c]| ((r + 2 * c) % 5) as f64);
    let a = base.view_part([2, 2], [5, 5]).unwrap();
    let dense = a.copy();

    let mut out_view = Matrix2::new(5, 5);
    let mut out_dense = Matrix2::new(5, 5);
    a.stencil9(&mut out_view, laplacian).unwrap();
    dense.stencil9(&mut out_dense, laplacian).unwrap();
    assert_eq!(out_view.to_vec(), out_dense.to_vec());
}

#[test]
fn test_no_interior_is_noop() {
    let a = Matrix2::<f64>::from_fn([2, 8], |_| 3.0);
    let mut out = Matrix2::new(2, 8);
    out.fill(7.0);
    a.stencil9(&mut out, laplacian).unwrap();
    assert_eq!(out.to_vec(), vec![7.0; 16]);
}

#[test]
fn test_rejections() {
    let a = Matrix2::<f64>::new(4, 4);
    let mut bad = Matrix2::new(4, 3);
    assert!(a.stencil9(&mut bad, laplacian).is_err());

    let mut aliased = a.view_dice();
    assert!(matches!(
        a.stencil9(&mut aliased, laplacian),
        Err(Error::AliasedOperands { op: "stencil9" })
    ));
}

// ============================================================================
// 27-point
// ============================================================================

#[test]
fn test_stencil27_center_and_corner() {
    let a = Matrix3::<f64>::from_fn([4, 4, 4], |[s, r, c]| (s * 16 + r * 4 + c) as f64);
    let mut out = Matrix3::new(4, 4, 4);
    out.fill(-1.0);

    a.stencil27(&mut out, |w| w[1][1][1]).unwrap();
    for s in 1..3 {
        for r in 1..3 {
            for c in 1..3 {
                assert_eq!(out.get([s, r, c]).unwrap(), a.get([s, r, c]).unwrap());
            }
        }
    }
    assert_eq!(out.get([0, 1, 1]).unwrap(), -1.0);

    a.stencil27(&mut out, |w| w[0][2][1]).unwrap();
    assert_eq!(out.get([1, 1, 2]).unwrap(), a.get([0, 2, 2]).unwrap());
}

#[test]
fn test_stencil27_sum_of_neighbors() {
    let a = Matrix3::<f64>::from_fn([3, 3, 3], |_| 1.0);
    let mut out = Matrix3::new(3, 3, 3);
    a.stencil27(&mut out, |w| w.iter().flatten().flatten().sum())
        .unwrap();
    assert_eq!(out.get([1, 1, 1]).unwrap(), 27.0);
}
