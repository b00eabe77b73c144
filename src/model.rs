//! Model and tensor identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one source model in a merge job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelRef(String);

impl ModelRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ModelRef {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A tensor slot within a specific model, e.g. `("base", "model.embed_tokens.weight")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TensorRef {
    pub model: ModelRef,
    pub name: String,
}

impl TensorRef {
    pub fn new(model: impl Into<ModelRef>, name: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TensorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.model, self.name)
    }
}

/// Which of the two interpolated slots holds the base model.
///
/// SLERP is asymmetric in `t`, so the base model is always oriented as `v0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseSlot {
    #[default]
    First,
    Second,
}

impl BaseSlot {
    /// Resolve the base slot for a pair of models.
    ///
    /// If neither model is the base, input order is kept.
    pub fn resolve(pair: [&ModelRef; 2], base: Option<&ModelRef>) -> Self {
        match base {
            Some(b) if pair[0] != b && pair[1] == b => Self::Second,
            _ => Self::First,
        }
    }

    /// Order `(a, b)` so that the base comes first.
    pub fn orient<T>(self, a: T, b: T) -> (T, T) {
        match self {
            Self::First => (a, b),
            Self::Second => (b, a),
        }
    }
}
