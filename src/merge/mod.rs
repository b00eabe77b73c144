//! ENT-041: Tokenizer-permuted embedding merge
//!
//! Combines embedding matrices from models with different vocabularies once
//! each has been permuted into a shared merged vocabulary:
//! - Masked linear average over any number of models
//! - Pairwise SLERP for exactly two models, with linear fallback on rows
//!   only one model covers

mod linear;
mod operator;
mod slerp;

#[cfg(test)]
mod tests;

pub use linear::masked_linear_average;
pub use operator::{merge_embeddings, Contribution, EmbedMergeOperator};
pub use slerp::{slerp_rows, slerp_vectors, DOT_THRESHOLD, NORM_EPSILON};
