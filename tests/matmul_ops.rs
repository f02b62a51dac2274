//! Integration tests for dense matrix multiplication
//!
//! Tests verify:
//! - Known small products and identity behavior
//! - alpha/beta accumulation into a provided result
//! - All four transposition combinations against a naive reference
//! - Operands that are strided or flipped views
//! - Random matrices match the naive triple loop exactly
//! - Aliased and mis-shaped operands are rejected

use matr::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn naive(a: &Matrix2<f64>, b: &Matrix2<f64>) -> Matrix2<f64> {
    let (m, k, n) = (a.rows(), a.cols(), b.cols());
    Matrix2::from_fn([m, n], |[i, j]| {
        (0..k)
            .map(|l| a.get([i, l]).unwrap() * b.get([l, j]).unwrap())
            .sum()
    })
}

fn random(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix2<f64> {
    // small integers keep every product exactly representable
    Matrix2::from_fn([rows, cols], |_| rng.gen_range(-4..=4) as f64)
}

// ============================================================================
// Basic products
// ============================================================================

#[test]
fn test_known_2x2_product() {
    let a = Matrix2::from_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
    let b = Matrix2::from_slice(2, 2, &[5.0, 6.0, 7.0, 8.0]).unwrap();
    let c = a.mult(&b, None, 1.0, 0.0, false, false).unwrap();
    assert_eq!(c.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
}

#[test]
fn test_identity_is_neutral() {
    let mut rng = StdRng::seed_from_u64(7);
    let a = random(&mut rng, 5, 5);
    let i = Matrix2::identity(5);
    assert_eq!(
        a.mult(&i, None, 1.0, 0.0, false, false).unwrap().to_vec(),
        a.to_vec()
    );
    assert_eq!(
        i.mult(&a, None, 1.0, 0.0, false, false).unwrap().to_vec(),
        a.to_vec()
    );
}

#[test]
fn test_alpha_beta_accumulation() {
    let a = Matrix2::from_slice(1, 2, &[1.0, 2.0]).unwrap();
    let b = Matrix2::from_slice(2, 1, &[3.0, 4.0]).unwrap();
    let mut c0 = Matrix2::<f64>::new(1, 1);
    c0.fill(100.0);
    let c = a.mult(&b, Some(c0), 2.0, 0.5, false, false).unwrap();
    // 2*(1*3 + 2*4) + 0.5*100
    assert_eq!(c.get([0, 0]).unwrap(), 72.0);
}

// ============================================================================
// Transpositions and views
// ============================================================================

#[test]
fn test_all_transposition_combinations() {
    let mut rng = StdRng::seed_from_u64(11);
    let a = random(&mut rng, 4, 6);
    let b = random(&mut rng, 4, 6);
    let at = a.view_dice().copy();
    let bt = b.view_dice().copy();

    let nn = a.mult(&bt, None, 1.0, 0.0, false, false).unwrap();
    assert_eq!(nn.to_vec(), naive(&a, &bt).to_vec());

    let tn = a.mult(&b, None, 1.0, 0.0, true, false).unwrap();
    assert_eq!(tn.to_vec(), naive(&at, &b).to_vec());

    let nt = a.mult(&b, None, 1.0, 0.0, false, true).unwrap();
    assert_eq!(nt.to_vec(), naive(&a, &bt).to_vec());

    let tt = at.mult(&bt, None, 1.0, 0.0, true, true).unwrap();
    assert_eq!(tt.to_vec(), naive(&a, &bt).to_vec());
}

#[test]
fn test_view_operands() {
    let mut rng = StdRng::seed_from_u64(13);
    let big = random(&mut rng, 8, 8);
    let a = big.view_part([1, 1], [3, 4]).unwrap();
    let b = big.view_flip(1).view_part([2, 0], [4, 3]).unwrap();
    let c = a.mult(&b, None, 1.0, 0.0, false, false).unwrap();
    assert_eq!(c.to_vec(), naive(&a.copy(), &b.copy()).to_vec());
}

// ============================================================================
// Randomized against naive reference
// ============================================================================

#[test]
fn test_random_products_match_naive() {
    let mut rng = StdRng::seed_from_u64(17);
    for (m, k, n) in [(1, 1, 1), (3, 5, 2), (7, 4, 9), (16, 16, 16)] {
        let a = random(&mut rng, m, k);
        let b = random(&mut rng, k, n);
        let c = a.mult(&b, None, 1.0, 0.0, false, false).unwrap();
        assert_eq!(c.to_vec(), naive(&a, &b).to_vec(), "{m}x{k} * {k}x{n}");
    }
}

#[test]
fn test_large_product_parallel_vs_sequential() {
    let mut rng = StdRng::seed_from_u64(19);
    let a = random(&mut rng, 80, 64);
    let b = random(&mut rng, 64, 72);

    let seq = a
        .clone()
        .with_parallelism(ParallelConfig::sequential())
        .mult(&b, None, 1.0, 0.0, false, false)
        .unwrap();
    let par = a
        .clone()
        .with_parallelism(ParallelConfig::default().with_degree(8))
        .mult(&b, None, 1.0, 0.0, false, false)
        .unwrap();
    assert_eq!(seq.to_vec(), par.to_vec());
    assert_eq!(seq.to_vec(), naive(&a, &b).to_vec());
}

// ============================================================================
// Matrix-vector
// ============================================================================

#[test]
fn test_mult_vec_matches_matrix_form() {
    let mut rng = StdRng::seed_from_u64(23);
    let a = random(&mut rng, 6, 4);
    let x = Matrix1::from_fn([4], |[t]| (t as f64) - 1.5);

    let y = a.mult_vec(&x, None, 1.0, 0.0, false).unwrap();
    let x_col = Matrix2::from_fn([4, 1], |[r, _]| x.get([r]).unwrap());
    let y_ref = a.mult(&x_col, None, 1.0, 0.0, false, false).unwrap();
    assert_eq!(y.to_vec(), y_ref.to_vec());
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_inner_dimension_mismatch() {
    let a = Matrix2::<f64>::new(2, 3);
    let b = Matrix2::<f64>::new(4, 2);
    assert!(matches!(
        a.mult(&b, None, 1.0, 0.0, false, false),
        Err(Error::ShapeMismatch { .. })
    ));
}

#[test]
fn test_aliased_result_rejected() {
    let a = Matrix2::<f64>::new(3, 3);
    let b = Matrix2::<f64>::new(3, 3);
    let c = b.view_dice();
    assert!(matches!(
        a.mult(&b, Some(c), 1.0, 0.0, false, false),
        Err(Error::AliasedOperands { op: "mult" })
    ));
}
