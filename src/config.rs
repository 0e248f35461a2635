//! Enrichment configuration
//!
//! Loaded from an optional YAML file. Every field has a default, so an
//! empty file (or no file) gives the standard behaviour:
//!
//! ```yaml
//! reference_expansion: inline   # or: resolve
//! hit_policy: UNIQUE
//! orientation: Rule-as-Row
//! annotation_column: true
//! ```

use crate::dtable::{DecisionTableOrientation, HitPolicy};
use crate::error::{Error, Result};
use crate::flatten::ReferenceExpansion;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnrichConfig {
    /// How fields typed by a named item definition are expanded
    #[serde(default)]
    pub reference_expansion: ReferenceExpansion,

    /// Hit policy set on enriched tables
    #[serde(default)]
    pub hit_policy: HitPolicy,

    /// Orientation set on enriched tables
    #[serde(default)]
    pub orientation: DecisionTableOrientation,

    /// Add a rule annotation column
    #[serde(default = "default_true")]
    pub annotation_column: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            reference_expansion: ReferenceExpansion::default(),
            hit_policy: HitPolicy::default(),
            orientation: DecisionTableOrientation::default(),
            annotation_column: true,
        }
    }
}

impl EnrichConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_norway::from_str(yaml).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}
