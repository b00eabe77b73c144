//! ENT-041: Masked linear averaging

use crate::error::{MergeError, Result};
use ndarray::Array2;

/// Average expanded contributions row by row over the models present there.
///
/// `expanded[i]` and `masks[i]` belong to the same model. Rows no model covers
/// have their divisor floored at 1 and come out as zero vectors.
///
/// Returns the average and the per-row contributor count.
///
/// # Errors
///
/// `ShapeMismatch` if the contributions, or their masks, disagree in shape.
pub fn masked_linear_average(
    expanded: &[Array2<f32>],
    masks: &[Vec<bool>],
) -> Result<(Array2<f32>, Vec<usize>)> {
    let Some(first) = expanded.first() else {
        return Ok((Array2::zeros((0, 0)), Vec::new()));
    };

    if masks.len() != expanded.len() {
        return Err(MergeError::shape(
            "presence masks per contribution",
            expanded.len(),
            masks.len(),
        ));
    }
    for (x, mask) in expanded.iter().zip(masks) {
        if x.dim() != first.dim() {
            let (expected, actual) = if x.nrows() != first.nrows() {
                (first.nrows(), x.nrows())
            } else {
                (first.ncols(), x.ncols())
            };
            return Err(MergeError::shape("expanded contribution shape", expected, actual));
        }
        if mask.len() != first.nrows() {
            return Err(MergeError::shape("presence mask rows", first.nrows(), mask.len()));
        }
    }

    let mut sum = Array2::<f32>::zeros(first.raw_dim());
    let mut counts = vec![0usize; first.nrows()];

    for (x, mask) in expanded.iter().zip(masks) {
        for (r, &present) in mask.iter().enumerate() {
            if present {
                let mut dst = sum.row_mut(r);
                dst += &x.row(r);
                counts[r] += 1;
            }
        }
    }

    for (mut row, &n) in sum.rows_mut().into_iter().zip(&counts) {
        row /= n.max(1) as f32;
    }

    Ok((sum, counts))
}
