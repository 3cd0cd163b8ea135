//! Stage-specific configuration types
//!
//! One struct per enumeration stage: structure skeletons, trace search and
//! program composition. Each validates its own ranges; consistency between
//! stages is checked by `GeneratorConfig::build`.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::Validatable;
use serde::{Deserialize, Serialize};

// ============================================================================
// Branch Structure Configuration
// ============================================================================

/// Bounds of the branch structure enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchStructureConfig {
    /// Emit a delay slot after every branch
    pub delay_slot: bool,

    /// Minimum structure length, delay slots excluded (1..=64)
    pub min_length: usize,

    /// Maximum structure length, delay slots excluded (1..=64)
    pub max_length: usize,

    /// Minimum number of branches (0..=16)
    pub min_branch_number: usize,

    /// Maximum number of branches (0..=16)
    pub max_branch_number: usize,

    /// Reject skeletons with unreachable-by-label consecutive basic blocks.
    /// Caps the effective maximum length at `3 * max_branch_number + 1`.
    pub skip_consecutive_basic_blocks: bool,
}

impl Default for BranchStructureConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl BranchStructureConfig {
    pub const MAX_LENGTH: usize = 64;
    pub const MAX_BRANCH_NUMBER: usize = 16;

    /// Create from preset
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                delay_slot: false,
                min_length: 1,
                max_length: 4,
                min_branch_number: 1,
                max_branch_number: 1,
                skip_consecutive_basic_blocks: true,
            },
            Preset::Balanced => Self {
                delay_slot: false,
                min_length: 1,
                max_length: 7,
                min_branch_number: 1,
                max_branch_number: 2,
                skip_consecutive_basic_blocks: true,
            },
            Preset::Thorough => Self {
                delay_slot: false,
                min_length: 1,
                max_length: 10,
                min_branch_number: 1,
                max_branch_number: 3,
                skip_consecutive_basic_blocks: true,
            },
            Preset::Custom => Self {
                delay_slot: false,
                min_length: 1,
                max_length: 1,
                min_branch_number: 0,
                max_branch_number: 1,
                skip_consecutive_basic_blocks: true,
            },
        }
    }

    /// Builder: Set delay_slot
    pub fn delay_slot(mut self, v: bool) -> Self {
        self.delay_slot = v;
        self
    }

    /// Builder: Set min_length
    pub fn min_length(mut self, v: usize) -> Self {
        self.min_length = v;
        self
    }

    /// Builder: Set max_length
    pub fn max_length(mut self, v: usize) -> Self {
        self.max_length = v;
        self
    }

    /// Builder: Set min_branch_number
    pub fn min_branch_number(mut self, v: usize) -> Self {
        self.min_branch_number = v;
        self
    }

    /// Builder: Set max_branch_number
    pub fn max_branch_number(mut self, v: usize) -> Self {
        self.max_branch_number = v;
        self
    }

    /// Builder: Set skip_consecutive_basic_blocks
    pub fn skip_consecutive_basic_blocks(mut self, v: bool) -> Self {
        self.skip_consecutive_basic_blocks = v;
        self
    }

    /// Longest structure the heuristic can produce
    pub fn heuristic_length_bound(&self) -> usize {
        3 * self.max_branch_number + 1
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_length == 0 || self.max_length > Self::MAX_LENGTH {
            return Err(ConfigError::range_with_hint(
                "max_length",
                self.max_length,
                1,
                Self::MAX_LENGTH,
                "A structure needs at least one entry",
            ));
        }

        if self.min_length == 0 || self.min_length > self.max_length {
            return Err(ConfigError::range_with_hint(
                "min_length",
                self.min_length,
                1,
                self.max_length,
                "Minimum length must not exceed max_length",
            ));
        }

        if self.max_branch_number > Self::MAX_BRANCH_NUMBER {
            return Err(ConfigError::range_with_hint(
                "max_branch_number",
                self.max_branch_number,
                0,
                Self::MAX_BRANCH_NUMBER,
                "Larger branch budgets make the search space intractable",
            ));
        }

        if self.min_branch_number > self.max_branch_number {
            return Err(ConfigError::range_with_hint(
                "min_branch_number",
                self.min_branch_number,
                0,
                self.max_branch_number,
                "Minimum branch number must not exceed max_branch_number",
            ));
        }

        if self.skip_consecutive_basic_blocks && self.min_length > self.heuristic_length_bound()
        {
            return Err(ConfigError::Validation(format!(
                "min_length {} exceeds {} (the longest structure {} branch(es) can cover without consecutive basic blocks)",
                self.min_length,
                self.heuristic_length_bound(),
                self.max_branch_number
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Branch Trace Configuration
// ============================================================================

/// Bounds of the branch trace search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchTraceConfig {
    /// Maximum executions recorded per branch (1..=64)
    pub max_branch_execution: usize,

    /// Soft cap on traces returned per structure (unbounded when absent)
    pub max_execution_traces: Option<usize>,

    /// Allow delay slots to cover branches whose segments contain no block
    pub use_delay_slots: bool,
}

impl Default for BranchTraceConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl BranchTraceConfig {
    pub const MAX_BRANCH_EXECUTION: usize = 64;

    /// Create from preset
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                max_branch_execution: 1,
                max_execution_traces: Some(1),
                use_delay_slots: true,
            },
            Preset::Balanced => Self {
                max_branch_execution: 2,
                max_execution_traces: None,
                use_delay_slots: true,
            },
            Preset::Thorough => Self {
                max_branch_execution: 3,
                max_execution_traces: None,
                use_delay_slots: true,
            },
            Preset::Custom => Self {
                max_branch_execution: 1,
                max_execution_traces: None,
                use_delay_slots: true,
            },
        }
    }

    /// Builder: Set max_branch_execution
    pub fn max_branch_execution(mut self, v: usize) -> Self {
        self.max_branch_execution = v;
        self
    }

    /// Builder: Set max_execution_traces
    pub fn max_execution_traces(mut self, v: Option<usize>) -> Self {
        self.max_execution_traces = v;
        self
    }

    /// Builder: Set use_delay_slots
    pub fn use_delay_slots(mut self, v: bool) -> Self {
        self.use_delay_slots = v;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_branch_execution == 0
            || self.max_branch_execution > Self::MAX_BRANCH_EXECUTION
        {
            return Err(ConfigError::range_with_hint(
                "max_branch_execution",
                self.max_branch_execution,
                1,
                Self::MAX_BRANCH_EXECUTION,
                "Every branch executes at least once",
            ));
        }

        if self.max_execution_traces == Some(0) {
            return Err(ConfigError::range_with_hint(
                "max_execution_traces",
                0,
                1,
                usize::MAX,
                "Leave unset for an unbounded search",
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Composition Configuration
// ============================================================================

/// Delay slot policies applied when materializing traces into programs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    /// Only place instructions that cannot throw into delay slots
    pub no_unsafe_delay_slots: bool,

    /// Same, but only for slots where an exception could cause looping
    pub no_unsafe_delay_slots_if_looping: bool,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl CompositionConfig {
    /// Create from preset
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Thorough => Self {
                no_unsafe_delay_slots: false,
                no_unsafe_delay_slots_if_looping: false,
            },
            _ => Self {
                no_unsafe_delay_slots: false,
                no_unsafe_delay_slots_if_looping: true,
            },
        }
    }

    /// Builder: Set no_unsafe_delay_slots
    pub fn no_unsafe_delay_slots(mut self, v: bool) -> Self {
        self.no_unsafe_delay_slots = v;
        self
    }

    /// Builder: Set no_unsafe_delay_slots_if_looping
    pub fn no_unsafe_delay_slots_if_looping(mut self, v: bool) -> Self {
        self.no_unsafe_delay_slots_if_looping = v;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }
}

// ============================================================================
// Validatable Trait Implementations
// ============================================================================

impl Validatable for BranchStructureConfig {
    fn validate(&self) -> ConfigResult<()> {
        BranchStructureConfig::validate(self)
    }

    fn config_name(&self) -> &'static str {
        "BranchStructureConfig"
    }
}

impl Validatable for BranchTraceConfig {
    fn validate(&self) -> ConfigResult<()> {
        BranchTraceConfig::validate(self)
    }

    fn config_name(&self) -> &'static str {
        "BranchTraceConfig"
    }
}

impl Validatable for CompositionConfig {
    fn validate(&self) -> ConfigResult<()> {
        CompositionConfig::validate(self)
    }

    fn config_name(&self) -> &'static str {
        "CompositionConfig"
    }
}
