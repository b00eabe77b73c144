//! Error types for embedding merges
//!
//! Every failure here is a data or configuration defect upstream of the
//! merge. Nothing is transient, so nothing is retried.

use thiserror::Error;

/// Result type alias for embedding merge operations.
pub type Result<T> = std::result::Result<T, MergeError>;

/// Errors raised while merging tokenizer-permuted embeddings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MergeError {
    /// Permutation and embedding disagree on a dimension.
    #[error("Shape mismatch for {context}: expected {expected}, got {actual}\n  → Check that the permutation was built for this model's vocabulary")]
    ShapeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Configuration combination the merge cannot honour.
    #[error("Unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// A parameter required by the enabled options is absent.
    #[error("Missing required parameter '{0}'")]
    MissingParameter(&'static str),

    /// A parameter is present but its value is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A contributing model has no permutation entry.
    #[error("No embedding permutation for model '{0}'\n  → Run tokenizer alignment for every contributing model")]
    MissingPermutation(String),

    /// Permutation entries are out of range or not usable as weights.
    #[error("Invalid permutation: {0}")]
    InvalidPermutation(String),
}

impl MergeError {
    /// Create a shape mismatch error.
    pub fn shape(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Whether this error stems from merge configuration rather than tensor data.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedConfiguration(_) | Self::MissingParameter(_) | Self::InvalidConfig(_)
        )
    }
}
