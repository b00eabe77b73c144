//! Embedding merge configuration
//!
//! Typed replacement for free-form merge parameters. Validated once when the
//! merge operator is built, not on every tensor.

use crate::error::{MergeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters controlling how aligned embeddings are combined.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedMergeConfig {
    /// Blend two models with SLERP instead of the masked linear average
    pub embed_slerp: bool,

    /// Interpolation fraction toward the non-base model (required with `embed_slerp`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<f32>,
}

impl EmbedMergeConfig {
    /// Masked linear average over all contributing models.
    pub fn linear() -> Self {
        Self::default()
    }

    /// Pairwise SLERP at fraction `t`.
    pub fn slerp(t: f32) -> Self {
        Self {
            embed_slerp: true,
            t: Some(t),
        }
    }

    /// Parse from a YAML fragment such as `embed_slerp: true\nt: 0.5`.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| MergeError::InvalidConfig(e.to_string()))
    }

    /// Extract from a flattened merge parameter map, ignoring unrelated keys.
    pub fn from_params(params: &HashMap<String, serde_json::Value>) -> Result<Self> {
        let relevant: serde_json::Map<String, serde_json::Value> = params
            .iter()
            .filter(|(k, _)| matches!(k.as_str(), "embed_slerp" | "t"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        serde_json::from_value(serde_json::Value::Object(relevant))
            .map_err(|e| MergeError::InvalidConfig(e.to_string()))
    }

    /// Check that the enabled options have what they need.
    pub fn validate(&self) -> Result<()> {
        if let Some(t) = self.t {
            if !t.is_finite() {
                return Err(MergeError::InvalidConfig(format!(
                    "t must be finite, got {t}"
                )));
            }
        }

        if self.embed_slerp && self.t.is_none() {
            return Err(MergeError::MissingParameter("t"));
        }

        Ok(())
    }
}
