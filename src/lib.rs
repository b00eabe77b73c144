//! Entrenar embedding merge
//!
//! Merges embedding matrices of models whose tokenizers were aligned into a
//! single merged vocabulary. Each model supplies its embedding slice and a
//! [`PermutationMap`] into the merged index space; the merge produces one
//! `[merged_vocab_size, embedding_dim]` matrix.
//!
//! # Example
//!
//! ```
//! use entrenar_embed::{
//!     merge_embeddings, Contribution, EmbedMergeConfig, ModelRef, PermutationMap, TensorRef,
//! };
//! use ndarray::array;
//! use std::collections::HashMap;
//!
//! let a = array![[1.0f32, 0.0], [0.0, 1.0]];
//! let b = array![[0.0f32, 0.0], [2.0, 0.0], [0.0, 2.0]];
//!
//! let mut perms = HashMap::new();
//! let pa = PermutationMap::from_index_map(2, &[Some(0), Some(1), None]).unwrap();
//! let pb = PermutationMap::from_index_map(3, &[None, Some(1), Some(2)]).unwrap();
//! perms.insert(ModelRef::new("a"), pa);
//! perms.insert(ModelRef::new("b"), pb);
//!
//! let contributions = [
//!     Contribution::new(TensorRef::new("a", "embed_tokens"), a.view()),
//!     Contribution::new(TensorRef::new("b", "embed_tokens"), b.view()),
//! ];
//!
//! let merged = merge_embeddings(&contributions, &perms, &EmbedMergeConfig::linear(), None)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(merged, array![[1.0f32, 0.0], [1.0, 0.5], [0.0, 2.0]]);
//! ```

pub mod config;
pub mod error;
pub mod merge;
pub mod model;
pub mod permutation;

pub use config::EmbedMergeConfig;
pub use error::{MergeError, Result};
pub use merge::{merge_embeddings, Contribution, EmbedMergeOperator};
pub use model::{BaseSlot, ModelRef, TensorRef};
pub use permutation::{coverage_counts, PermutationMap};
