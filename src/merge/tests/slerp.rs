//! Tests for pairwise SLERP embedding merging

use super::common::{approx_equal, contribution, overlapping_pair, permutations};
use crate::config::EmbedMergeConfig;
use crate::merge::{merge_embeddings, slerp_rows, slerp_vectors};
use crate::model::ModelRef;
use crate::permutation::PermutationMap;
use crate::error::MergeError;
use approx::assert_abs_diff_eq;
use ndarray::{array, Array2};

#[test]
fn test_slerp_perpendicular_midpoint_on_unit_circle() {
    let a = array![[1.0f32, 0.0]];
    let b = array![[0.0f32, 1.0]];
    let perms = permutations(vec![
        ("a", PermutationMap::identity(1)),
        ("b", PermutationMap::identity(1)),
    ]);
    let base = ModelRef::new("a");

    let merged = merge_embeddings(
        &[contribution("a", &a), contribution("b", &b)],
        &perms,
        &EmbedMergeConfig::slerp(0.5),
        Some(&base),
    )
    .unwrap()
    .unwrap();

    // Not the linear midpoint [0.5, 0.5]
    let expected = std::f32::consts::FRAC_1_SQRT_2;
    assert_abs_diff_eq!(merged[[0, 0]], expected, epsilon = 1e-5);
    assert_abs_diff_eq!(merged[[0, 1]], expected, epsilon = 1e-5);
}

#[test]
fn test_slerp_t0_returns_base() {
    let v0 = array![[1.0f32, 2.0, 3.0], [-0.5, 0.25, 4.0]];
    let v1 = array![[4.0f32, -5.0, 6.0], [3.0, 3.0, -1.0]];

    let result = slerp_rows(0.0, v0.view(), v1.view()).unwrap();
    assert!(approx_equal(result.view(), v0.view(), 1e-5));
}

#[test]
fn test_slerp_t1_returns_other() {
    let v0 = array![[1.0f32, 2.0, 3.0], [-0.5, 0.25, 4.0]];
    let v1 = array![[4.0f32, -5.0, 6.0], [3.0, 3.0, -1.0]];

    let result = slerp_rows(1.0, v0.view(), v1.view()).unwrap();
    assert!(approx_equal(result.view(), v1.view(), 1e-5));
}

#[test]
fn test_slerp_parallel_falls_back_to_lerp() {
    let v0 = array![1.0f32, 2.0, 3.0];
    let v1 = array![2.0f32, 4.0, 6.0];

    let result = slerp_vectors(0.5, v0.view(), v1.view()).unwrap();
    for (r, e) in result.iter().zip([1.5f32, 3.0, 4.5]) {
        assert_abs_diff_eq!(*r, e, epsilon = 1e-5);
    }
}

#[test]
fn test_slerp_antiparallel_falls_back_to_lerp() {
    let v0 = array![1.0f32, -2.0];
    let v1 = array![-1.0f32, 2.0];

    let result = slerp_vectors(0.25, v0.view(), v1.view()).unwrap();

    // LERP direction [0.5, -1.0], rescaled to 0.75·|v0| + 0.25·|v1| = √5
    let norm = result.dot(&result).sqrt();
    assert_abs_diff_eq!(norm, 5.0f32.sqrt(), epsilon = 1e-5);
    assert_abs_diff_eq!(result[0], 1.0, epsilon = 1e-5);
    assert_abs_diff_eq!(result[1], -2.0, epsilon = 1e-5);
}

#[test]
fn test_slerp_fallback_interpolates_magnitude() {
    let v0 = array![1.0f32, 0.0];
    let v1 = array![-3.0f32, 0.0];

    let result = slerp_vectors(0.5, v0.view(), v1.view()).unwrap();

    // Plain LERP would give [-1, 0]; the interpolated length is 2
    assert_abs_diff_eq!(result[0], -2.0, epsilon = 1e-5);
    assert_abs_diff_eq!(result[1], 0.0, epsilon = 1e-6);
}

#[test]
fn test_slerp_exact_antipodes_midpoint_is_zero() {
    let v0 = array![2.0f32, 1.0];
    let v1 = array![-2.0f32, -1.0];

    let result = slerp_vectors(0.5, v0.view(), v1.view()).unwrap();
    assert_abs_diff_eq!(result[0], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(result[1], 0.0, epsilon = 1e-6);
}

#[test]
fn test_slerp_vectors_length_mismatch() {
    let v0 = array![1.0f32, 0.0];
    let v1 = array![0.0f32, 1.0, 0.0];

    let result = slerp_vectors(0.5, v0.view(), v1.view());
    assert!(matches!(
        result,
        Err(MergeError::ShapeMismatch { expected: 2, actual: 3, .. })
    ));
}

#[test]
fn test_slerp_rows_shape_mismatch() {
    let v0 = Array2::<f32>::ones((2, 2));
    let v1 = Array2::<f32>::ones((3, 2));

    let result = slerp_rows(0.5, v0.view(), v1.view());
    assert!(matches!(
        result,
        Err(MergeError::ShapeMismatch { expected: 2, actual: 3, .. })
    ));

    let v1 = Array2::<f32>::ones((2, 4));
    assert!(matches!(
        slerp_rows(0.5, v0.view(), v1.view()),
        Err(MergeError::ShapeMismatch { expected: 2, actual: 4, .. })
    ));
}

#[test]
fn test_slerp_zero_vector_is_finite() {
    let v0 = array![0.0f32, 0.0];
    let v1 = array![2.0f32, 0.0];

    let result = slerp_vectors(0.5, v0.view(), v1.view()).unwrap();
    assert_abs_diff_eq!(result[0], 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(result[1], 0.0, epsilon = 1e-6);
}

#[test]
fn test_slerp_single_coverage_rows_use_linear_average() {
    let (a, b, perms) = overlapping_pair();
    let contributions = [contribution("a", &a), contribution("b", &b)];

    let slerped = merge_embeddings(&contributions, &perms, &EmbedMergeConfig::slerp(0.3), None)
        .unwrap()
        .unwrap();
    let linear = merge_embeddings(&contributions, &perms, &EmbedMergeConfig::linear(), None)
        .unwrap()
        .unwrap();

    assert_eq!(slerped.row(0), linear.row(0));
    assert_eq!(slerped.row(2), linear.row(2));
    // Both models cover row 1: a=[0,1], b=[2,0] are perpendicular, so SLERP differs
    assert!((slerped[[1, 0]] - linear[[1, 0]]).abs() > 1e-3);
}

#[test]
fn test_slerp_shared_row_matches_vector_slerp() {
    let (a, b, perms) = overlapping_pair();
    let contributions = [contribution("a", &a), contribution("b", &b)];

    let merged = merge_embeddings(&contributions, &perms, &EmbedMergeConfig::slerp(0.3), None)
        .unwrap()
        .unwrap();
    let expected = slerp_vectors(0.3, a.row(1), b.row(1)).unwrap();

    assert_abs_diff_eq!(merged[[1, 0]], expected[0], epsilon = 1e-6);
    assert_abs_diff_eq!(merged[[1, 1]], expected[1], epsilon = 1e-6);
}

#[test]
fn test_linear_config_ignores_t() {
    let (a, b, perms) = overlapping_pair();
    let contributions = [contribution("a", &a), contribution("b", &b)];
    let config = EmbedMergeConfig {
        embed_slerp: false,
        t: Some(0.9),
    };

    let merged = merge_embeddings(&contributions, &perms, &config, None)
        .unwrap()
        .unwrap();

    assert_eq!(merged, array![[1.0f32, 0.0], [1.0, 0.5], [0.0, 2.0]]);
}
