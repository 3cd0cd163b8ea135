//! Configuration I/O (YAML loading)
//!
//! Defines YAML schema types. Implementation methods are in
//! generator_config.rs to avoid field visibility issues.

use super::stage_configs::*;
use serde::{Deserialize, Serialize};

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Base preset
    pub preset: String,

    /// Seed of every random choice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Fine-grained overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ConfigOverrides>,
}

/// Configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<BranchStructureConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<BranchTraceConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition: Option<CompositionConfig>,
}
