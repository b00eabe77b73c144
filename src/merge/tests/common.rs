//! Common fixtures for embedding merge tests

use crate::merge::Contribution;
use crate::model::{ModelRef, TensorRef};
use crate::permutation::PermutationMap;
use ndarray::{Array2, ArrayView2};
use std::collections::HashMap;

pub const EMBED: &str = "model.embed_tokens.weight";

pub fn contribution<'a>(model: &str, embedding: &'a Array2<f32>) -> Contribution<'a> {
    Contribution::new(TensorRef::new(model, EMBED), embedding.view())
}

pub fn permutations(entries: Vec<(&str, PermutationMap)>) -> HashMap<ModelRef, PermutationMap> {
    entries
        .into_iter()
        .map(|(name, p)| (ModelRef::new(name), p))
        .collect()
}

pub fn index_map(source_vocab_size: usize, map: &[Option<usize>]) -> PermutationMap {
    PermutationMap::from_index_map(source_vocab_size, map).expect("index map should be valid")
}

/// Two models over a 3-token merged vocabulary: `a` covers rows 0-1, `b` rows 1-2.
pub fn overlapping_pair() -> (Array2<f32>, Array2<f32>, HashMap<ModelRef, PermutationMap>) {
    let a = ndarray::array![[1.0, 0.0], [0.0, 1.0]];
    let b = ndarray::array![[0.0, 0.0], [2.0, 0.0], [0.0, 2.0]];
    let perms = permutations(vec![
        ("a", index_map(2, &[Some(0), Some(1), None])),
        ("b", index_map(3, &[None, Some(1), Some(2)])),
    ]);
    (a, b, perms)
}

pub fn approx_equal(x: ArrayView2<'_, f32>, y: ArrayView2<'_, f32>, tol: f32) -> bool {
    x.shape() == y.shape() && x.iter().zip(y.iter()).all(|(a, b)| (a - b).abs() <= tol)
}
