//! Generator configuration
//!
//! Three tiers, from simplest to most complete:
//! - Level 1: Preset - one-liner defaults
//! - Level 2: Stage override - closure-based partial adjustment
//! - Level 3: YAML - complete control, versioned schema
//!
//! # Examples
//!
//! ```rust,ignore
//! use testgen_core::config::{GeneratorConfig, Preset};
//!
//! // Level 1: Simple preset
//! let config = GeneratorConfig::preset(Preset::Fast).build()?;
//!
//! // Level 2: Override specific stage
//! let config = GeneratorConfig::preset(Preset::Balanced)
//!     .structure(|c| c.delay_slot(true).max_length(5))
//!     .seed(42)
//!     .build()?;
//!
//! // Level 3: Complete control via YAML
//! let config = GeneratorConfig::from_yaml("mips-branches.yaml")?;
//! ```

pub mod error;
pub mod generator_config;
pub mod io;
pub mod preset;
pub mod stage_configs;
pub mod validation;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use generator_config::{GeneratorConfig, ValidatedConfig};
pub use io::{ConfigExportV1, ConfigOverrides};
pub use preset::Preset;
pub use stage_configs::{BranchStructureConfig, BranchTraceConfig, CompositionConfig};
pub use validation::{Validatable, ValidatableCollection};
