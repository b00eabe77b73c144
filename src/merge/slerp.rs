//! ENT-041: Row-wise spherical linear interpolation

use crate::error::{MergeError, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};

/// Above this |cos θ| the directions are treated as parallel or antiparallel
/// and SLERP degrades to LERP.
pub const DOT_THRESHOLD: f32 = 0.9995;

/// Rows with a smaller L2 norm have no direction to interpolate.
pub const NORM_EPSILON: f32 = 1e-8;

/// LERP rescaled to the linearly interpolated magnitude `(1-t)·|v0| + t·|v1|`.
///
/// A LERP result with no direction left (exact antipodes at the midpoint) is
/// returned as-is.
fn lerp(
    t: f32,
    v0: ArrayView1<'_, f32>,
    v1: ArrayView1<'_, f32>,
    n0: f32,
    n1: f32,
) -> Array1<f32> {
    let mut out = &v0 * (1.0 - t) + &v1 * t;
    let norm = out.dot(&out).sqrt();
    if norm >= NORM_EPSILON {
        out *= ((1.0 - t) * n0 + t * n1) / norm;
    }
    out
}

/// SLERP between two vectors at fraction `t`.
///
/// `t = 0` returns `v0` and `t = 1` returns `v1`.
pub fn slerp_vectors(
    t: f32,
    v0: ArrayView1<'_, f32>,
    v1: ArrayView1<'_, f32>,
) -> Result<Array1<f32>> {
    if v0.len() != v1.len() {
        return Err(MergeError::shape("slerp vector length", v0.len(), v1.len()));
    }
    Ok(slerp_same_len(t, v0, v1))
}

fn slerp_same_len(t: f32, v0: ArrayView1<'_, f32>, v1: ArrayView1<'_, f32>) -> Array1<f32> {
    let n0 = v0.dot(&v0).sqrt();
    let n1 = v1.dot(&v1).sqrt();
    if n0 < NORM_EPSILON || n1 < NORM_EPSILON {
        return lerp(t, v0, v1, n0, n1);
    }

    let dot = v0.dot(&v1) / (n0 * n1);
    if dot.abs() > DOT_THRESHOLD {
        return lerp(t, v0, v1, n0, n1);
    }

    let theta = dot.clamp(-1.0, 1.0).acos();
    let sin_theta = theta.sin();
    let s0 = ((1.0 - t) * theta).sin() / sin_theta;
    let s1 = (t * theta).sin() / sin_theta;

    &v0 * s0 + &v1 * s1
}

/// Apply [`slerp_vectors`] independently to each row pair.
pub fn slerp_rows(
    t: f32,
    v0: ArrayView2<'_, f32>,
    v1: ArrayView2<'_, f32>,
) -> Result<Array2<f32>> {
    if v0.nrows() != v1.nrows() {
        return Err(MergeError::shape("slerp row count", v0.nrows(), v1.nrows()));
    }
    if v0.ncols() != v1.ncols() {
        return Err(MergeError::shape("slerp embedding dimension", v0.ncols(), v1.ncols()));
    }

    let mut out = Array2::<f32>::zeros(v0.raw_dim());
    Zip::from(out.rows_mut())
        .and(v0.rows())
        .and(v1.rows())
        .for_each(|mut dst, a, b| dst.assign(&slerp_same_len(t, a, b)));
    Ok(out)
}
