//! ENT-041: Embedding merge operator

use super::linear::masked_linear_average;
use super::slerp::slerp_rows;
use crate::config::EmbedMergeConfig;
use crate::error::{MergeError, Result};
use crate::model::{BaseSlot, ModelRef, TensorRef};
use crate::permutation::PermutationMap;
use ndarray::{Array2, ArrayView2};
use std::collections::HashMap;
use tracing::{debug, trace};

/// One model's embedding slice, `[source_vocab_size, embedding_dim]`.
#[derive(Debug, Clone)]
pub struct Contribution<'a> {
    pub tensor: TensorRef,
    pub embedding: ArrayView2<'a, f32>,
}

impl<'a> Contribution<'a> {
    pub fn new(tensor: TensorRef, embedding: ArrayView2<'a, f32>) -> Self {
        Self { tensor, embedding }
    }
}

/// Merges permuted embeddings for one merge job.
///
/// Configuration is validated once here; [`merge`](Self::merge) is then
/// called for every embedding tensor of the job.
#[derive(Debug, Clone)]
pub struct EmbedMergeOperator {
    config: EmbedMergeConfig,
    base: Option<ModelRef>,
}

impl EmbedMergeOperator {
    /// # Errors
    ///
    /// `MissingParameter` if SLERP is enabled without `t`, `InvalidConfig` if
    /// `t` is not finite.
    pub fn new(config: EmbedMergeConfig, base: Option<ModelRef>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, base })
    }

    pub fn config(&self) -> &EmbedMergeConfig {
        &self.config
    }

    pub fn base_model(&self) -> Option<&ModelRef> {
        self.base.as_ref()
    }

    fn slerp_t(&self) -> Option<f32> {
        if self.config.embed_slerp {
            self.config.t
        } else {
            None
        }
    }

    /// Merge contributions into the merged vocabulary.
    ///
    /// Returns `Ok(None)` when there is nothing to merge. A single
    /// contribution is returned as-is.
    pub fn merge(
        &self,
        contributions: &[Contribution<'_>],
        permutations: &HashMap<ModelRef, PermutationMap>,
    ) -> Result<Option<Array2<f32>>> {
        match contributions {
            [] => return Ok(None),
            [only] => return Ok(Some(only.embedding.to_owned())),
            _ => {}
        }

        let mut expanded = Vec::with_capacity(contributions.len());
        let mut masks = Vec::with_capacity(contributions.len());
        let mut merged_shape: Option<(usize, usize)> = None;

        for c in contributions {
            let perm = permutations
                .get(&c.tensor.model)
                .ok_or_else(|| MergeError::MissingPermutation(c.tensor.model.to_string()))?;

            if c.embedding.nrows() != perm.source_vocab_size() {
                return Err(MergeError::shape(
                    format!("{} vocabulary rows", c.tensor),
                    perm.source_vocab_size(),
                    c.embedding.nrows(),
                ));
            }

            let shape = (perm.merged_vocab_size(), c.embedding.ncols());
            match merged_shape {
                None => merged_shape = Some(shape),
                Some((rows, _)) if rows != shape.0 => {
                    return Err(MergeError::shape(
                        format!("{} merged vocabulary size", c.tensor),
                        rows,
                        shape.0,
                    ));
                }
                Some((_, dim)) if dim != shape.1 => {
                    return Err(MergeError::shape(
                        format!("{} embedding dimension", c.tensor),
                        dim,
                        shape.1,
                    ));
                }
                Some(_) => {}
            }

            trace!(tensor = %c.tensor, rows = shape.0, dim = shape.1, "expanding contribution");
            expanded.push(perm.expand(c.embedding)?);
            masks.push(perm.presence_mask());
        }

        let slerp_t = self.slerp_t();
        if slerp_t.is_some() && expanded.len() != 2 {
            return Err(MergeError::UnsupportedConfiguration(format!(
                "embed_slerp takes exactly two models, got {}",
                expanded.len()
            )));
        }

        debug!(
            models = expanded.len(),
            merged_vocab = merged_shape.map_or(0, |s| s.0),
            dim = merged_shape.map_or(0, |s| s.1),
            slerp = slerp_t.is_some(),
            "merging embeddings"
        );

        let (linear, counts) = masked_linear_average(&expanded, &masks)?;
        let uncovered = counts.iter().filter(|&&n| n == 0).count();

        let Some(t) = slerp_t else {
            debug!(uncovered, "linear embedding merge complete");
            return Ok(Some(linear));
        };

        let slot = BaseSlot::resolve(
            [&contributions[0].tensor.model, &contributions[1].tensor.model],
            self.base.as_ref(),
        );
        let (v0, v1) = slot.orient(&expanded[0], &expanded[1]);

        let mut merged = slerp_rows(t, v0.view(), v1.view())?;
        let mut fallback = 0usize;
        for (r, &n) in counts.iter().enumerate() {
            if n != 2 {
                merged.row_mut(r).assign(&linear.row(r));
                fallback += 1;
            }
        }

        debug!(t, ?slot, uncovered, fallback, "slerp embedding merge complete");
        Ok(Some(merged))
    }
}

/// One-shot merge: validate `config`, then merge.
///
/// Empty and single-contribution inputs return before the configuration is
/// checked, since nothing is merged.
///
/// Prefer [`EmbedMergeOperator`] when merging several tensors of one job.
pub fn merge_embeddings(
    contributions: &[Contribution<'_>],
    permutations: &HashMap<ModelRef, PermutationMap>,
    config: &EmbedMergeConfig,
    base: Option<&ModelRef>,
) -> Result<Option<Array2<f32>>> {
    match contributions {
        [] => Ok(None),
        [only] => Ok(Some(only.embedding.to_owned())),
        _ => EmbedMergeOperator::new(*config, base.cloned())?.merge(contributions, permutations),
    }
}
