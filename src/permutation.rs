//! Sparse vocabulary permutations
//!
//! A permutation maps each row of the merged vocabulary onto zero or more rows
//! of one source model's vocabulary. Stored as compressed sparse rows so that
//! expansion is a gather rather than a `[merged × source]` matrix multiply.

use crate::error::{MergeError, Result};
use ndarray::{Array2, ArrayView2};

/// Merged-vocabulary → source-vocabulary mapping for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct PermutationMap {
    source_vocab_size: usize,
    /// `row_offsets[r]..row_offsets[r + 1]` indexes the entries of merged row `r`
    row_offsets: Vec<usize>,
    source_indices: Vec<usize>,
    weights: Vec<f32>,
}

impl PermutationMap {
    /// Build from one optional source index per merged row (0/1 selection).
    pub fn from_index_map(source_vocab_size: usize, map: &[Option<usize>]) -> Result<Self> {
        Self::from_rows(
            source_vocab_size,
            map.iter().map(|src| src.map(|s| (s, 1.0))),
        )
    }

    /// Build from explicit `(source_index, weight)` entries per merged row.
    ///
    /// Zero weights are dropped so that presence follows the row sum.
    pub fn from_rows<I, R>(source_vocab_size: usize, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (usize, f32)>,
    {
        let mut row_offsets = vec![0];
        let mut source_indices = Vec::new();
        let mut weights = Vec::new();

        for (row, entries) in rows.into_iter().enumerate() {
            for (src, w) in entries {
                if src >= source_vocab_size {
                    return Err(MergeError::InvalidPermutation(format!(
                        "row {row} maps to source index {src}, source vocabulary has {source_vocab_size} rows"
                    )));
                }
                if !w.is_finite() || w < 0.0 {
                    return Err(MergeError::InvalidPermutation(format!(
                        "row {row} has weight {w} for source index {src} (must be finite and >= 0)"
                    )));
                }
                if w > 0.0 {
                    source_indices.push(src);
                    weights.push(w);
                }
            }
            row_offsets.push(source_indices.len());
        }

        Ok(Self {
            source_vocab_size,
            row_offsets,
            source_indices,
            weights,
        })
    }

    /// Build from a dense `[merged_vocab_size, source_vocab_size]` matrix.
    pub fn from_dense(dense: ArrayView2<'_, f32>) -> Result<Self> {
        let source_vocab_size = dense.ncols();
        Self::from_rows(
            source_vocab_size,
            dense.rows().into_iter().map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &w)| w != 0.0)
                    .map(|(src, &w)| (src, w))
                    .collect::<Vec<_>>()
            }),
        )
    }

    /// One-to-one mapping of an `n`-token vocabulary onto itself.
    pub fn identity(n: usize) -> Self {
        Self {
            source_vocab_size: n,
            row_offsets: (0..=n).collect(),
            source_indices: (0..n).collect(),
            weights: vec![1.0; n],
        }
    }

    pub fn merged_vocab_size(&self) -> usize {
        self.row_offsets.len() - 1
    }

    pub fn source_vocab_size(&self) -> usize {
        self.source_vocab_size
    }

    /// Entries of merged row `row` as `(source_index, weight)`; `row` must be in range.
    fn row(&self, row: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        let span = self.row_offsets[row]..self.row_offsets[row + 1];
        self.source_indices[span.clone()]
            .iter()
            .copied()
            .zip(self.weights[span].iter().copied())
    }

    fn row_sum(&self, row: usize) -> f32 {
        self.row(row).map(|(_, w)| w).sum()
    }

    /// Whether this model has real data at each merged row.
    pub fn presence_mask(&self) -> Vec<bool> {
        (0..self.merged_vocab_size())
            .map(|r| self.row_sum(r) > 0.0)
            .collect()
    }

    /// Gather `embedding` into the merged index space.
    ///
    /// Unmapped rows are zero. Fails if `embedding` does not have one row per
    /// source token.
    pub fn expand(&self, embedding: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        if embedding.nrows() != self.source_vocab_size {
            return Err(MergeError::shape(
                "embedding rows vs permutation source vocabulary",
                self.source_vocab_size,
                embedding.nrows(),
            ));
        }

        let mut out = Array2::<f32>::zeros((self.merged_vocab_size(), embedding.ncols()));
        for (r, mut dst) in out.rows_mut().into_iter().enumerate() {
            for (src, w) in self.row(r) {
                dst.scaled_add(w, &embedding.row(src));
            }
        }
        Ok(out)
    }
}

/// Number of models with real data at each merged row.
///
/// Rows with a count of zero come out of the linear merge as zero vectors and
/// carry no data.
pub fn coverage_counts<'a, I>(permutations: I) -> Result<Vec<usize>>
where
    I: IntoIterator<Item = &'a PermutationMap>,
{
    let mut counts: Option<Vec<usize>> = None;
    for p in permutations {
        let mask = p.presence_mask();
        match counts.as_mut() {
            None => counts = Some(mask.iter().map(|&m| usize::from(m)).collect()),
            Some(c) => {
                if c.len() != mask.len() {
                    return Err(MergeError::shape(
                        "merged vocabulary size across permutations",
                        c.len(),
                        mask.len(),
                    ));
                }
                for (n, m) in c.iter_mut().zip(mask) {
                    *n += usize::from(m);
                }
            }
        }
    }
    Ok(counts.unwrap_or_default())
}
