//! Generator configuration aggregate
//!
//! Preset plus optional per-stage overrides. `build()` validates every
//! stage, then the constraints between stages, and hands out an immutable
//! `ValidatedConfig`.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::stage_configs::{BranchStructureConfig, BranchTraceConfig, CompositionConfig};
use super::validation::ValidatableCollection;

/// Generator configuration builder
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    /// Base preset
    pub(crate) preset: Preset,

    /// Seed of every random choice (outcomes, coverage tie-breaks,
    /// instruction picks)
    pub(crate) seed: u64,

    /// Stage-specific overrides
    pub(crate) structure: Option<BranchStructureConfig>,
    pub(crate) trace: Option<BranchTraceConfig>,
    pub(crate) composition: Option<CompositionConfig>,
}

impl GeneratorConfig {
    /// Level 1: Create from preset
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            seed: 0,
            structure: None,
            trace: None,
            composition: None,
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Level 2: Override the structure stage
    pub fn structure(
        mut self,
        f: impl FnOnce(BranchStructureConfig) -> BranchStructureConfig,
    ) -> Self {
        let base = self.effective_structure();
        self.structure = Some(f(base));
        self
    }

    /// Level 2: Override the trace stage
    pub fn trace(mut self, f: impl FnOnce(BranchTraceConfig) -> BranchTraceConfig) -> Self {
        let base = self.effective_trace();
        self.trace = Some(f(base));
        self
    }

    /// Level 2: Override the composition stage
    pub fn composition(
        mut self,
        f: impl FnOnce(CompositionConfig) -> CompositionConfig,
    ) -> Self {
        let base = self.effective_composition();
        self.composition = Some(f(base));
        self
    }

    /// Build and validate
    pub fn build(self) -> ConfigResult<ValidatedConfig> {
        // Step 1: Validate individual stage configs
        self.structure.validate_all()?;
        self.trace.validate_all()?;
        self.composition.validate_all()?;

        // Step 2: Cross-stage validation
        self.cross_validate()?;

        Ok(ValidatedConfig(self))
    }

    /// Cross-stage validation
    fn cross_validate(&self) -> ConfigResult<()> {
        let structure = self.effective_structure();
        let composition = self.effective_composition();

        // 1. Safe delay slot policy needs delay slots to apply to
        if composition.no_unsafe_delay_slots && !structure.delay_slot {
            return Err(ConfigError::CrossStageConflict {
                issue: "Safe delay slot policy is set but structures have no delay slots"
                    .to_string(),
                fix: "Enable delay slots with .structure(|c| c.delay_slot(true)) or set composition.no_unsafe_delay_slots=false".to_string(),
            });
        }

        // 2. Slot coverage is meaningless without slots; the trace stage
        //    falls back to block-only coverage
        if self.trace.as_ref().is_some_and(|t| t.use_delay_slots) && !structure.delay_slot {
            tracing::debug!(
                "trace.use_delay_slots has no effect: structures have no delay slots"
            );
        }

        Ok(())
    }

    fn effective_structure(&self) -> BranchStructureConfig {
        self.structure
            .clone()
            .unwrap_or_else(|| BranchStructureConfig::from_preset(self.preset))
    }

    fn effective_trace(&self) -> BranchTraceConfig {
        self.trace
            .clone()
            .unwrap_or_else(|| BranchTraceConfig::from_preset(self.preset))
    }

    fn effective_composition(&self) -> CompositionConfig {
        self.composition
            .clone()
            .unwrap_or_else(|| CompositionConfig::from_preset(self.preset))
    }

    /// Get base preset
    pub fn get_preset(&self) -> Preset {
        self.preset
    }

    /// Load from YAML file (v1 schema)
    pub fn from_yaml(path: &str) -> ConfigResult<ValidatedConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load from a YAML document (v1 schema)
    pub fn from_yaml_str(content: &str) -> ConfigResult<ValidatedConfig> {
        use crate::config::io::ConfigExportV1;

        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        // Version check
        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if version != 1 {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: vec![1],
            });
        }

        // Parse preset
        let preset = Preset::from_str(&export.preset)
            .map_err(|_| ConfigError::UnknownPreset(export.preset.clone()))?;

        let mut config = Self::preset(preset);
        if let Some(seed) = export.seed {
            config.seed = seed;
        }

        if let Some(overrides) = export.overrides {
            config.structure = overrides.structure;
            config.trace = overrides.trace;
            config.composition = overrides.composition;
        }

        config.build()
    }

    /// Export to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        use crate::config::io::{ConfigExportV1, ConfigOverrides};

        let export = ConfigExportV1 {
            version: Some(1),
            preset: self.get_preset().to_string(),
            seed: Some(self.seed),
            overrides: Some(ConfigOverrides {
                structure: self.structure.clone(),
                trace: self.trace.clone(),
                composition: self.composition.clone(),
            }),
        };

        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }

    /// Get a human-readable description of the configuration
    pub fn describe(&self) -> String {
        let structure = self.effective_structure();
        let trace = self.effective_trace();
        format!(
            "{} [length {}..={}, branches {}..={}, executions <= {}{}]",
            self.preset,
            structure.min_length,
            structure.max_length,
            structure.min_branch_number,
            structure.max_branch_number,
            trace.max_branch_execution,
            if structure.delay_slot { ", delay slots" } else { "" }
        )
    }
}

/// Validated configuration (immutable, safe to use)
#[derive(Debug, Clone)]
pub struct ValidatedConfig(GeneratorConfig);

impl Default for ValidatedConfig {
    fn default() -> Self {
        Self(GeneratorConfig::default())
    }
}

impl ValidatedConfig {
    /// Unwrap the validated config to get the inner GeneratorConfig
    pub fn into_inner(self) -> GeneratorConfig {
        self.0
    }

    /// Get a reference to the inner GeneratorConfig
    pub fn as_inner(&self) -> &GeneratorConfig {
        &self.0
    }

    pub fn seed(&self) -> u64 {
        self.0.seed
    }

    /// Effective structure config (override or preset)
    pub fn structure(&self) -> BranchStructureConfig {
        self.0.effective_structure()
    }

    /// Effective trace config (override or preset)
    pub fn trace(&self) -> BranchTraceConfig {
        self.0.effective_trace()
    }

    /// Effective composition config (override or preset)
    pub fn composition(&self) -> CompositionConfig {
        self.0.effective_composition()
    }

    /// Get a human-readable description of the configuration
    pub fn describe(&self) -> String {
        self.0.describe()
    }

    /// Export to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        self.0.to_yaml()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_config_simple() {
        let config = GeneratorConfig::preset(Preset::Fast).build().unwrap();
        assert_eq!(config.structure().max_branch_number, 1);
        assert_eq!(config.trace().max_execution_traces, Some(1));
        assert_eq!(config.seed(), 0);
    }

    #[test]
    fn test_generator_config_override() {
        let config = GeneratorConfig::preset(Preset::Balanced)
            .structure(|c| c.delay_slot(true).max_length(6))
            .trace(|c| c.max_branch_execution(4))
            .build()
            .unwrap();

        assert!(config.structure().delay_slot);
        assert_eq!(config.structure().max_length, 6);
        assert_eq!(config.trace().max_branch_execution, 4);
    }

    #[test]
    fn test_overrides_compose() {
        let config = GeneratorConfig::preset(Preset::Balanced)
            .structure(|c| c.max_length(6))
            .structure(|c| c.delay_slot(true))
            .build()
            .unwrap();

        assert_eq!(config.structure().max_length, 6);
        assert!(config.structure().delay_slot);
    }

    #[test]
    fn test_stage_validation_runs_on_build() {
        let result = GeneratorConfig::preset(Preset::Balanced)
            .trace(|c| c.max_branch_execution(0))
            .build();
        assert!(matches!(result, Err(ConfigError::Range { .. })));
    }

    #[test]
    fn test_cross_stage_safe_slots_require_delay_slots() {
        let result = GeneratorConfig::preset(Preset::Balanced)
            .composition(|c| c.no_unsafe_delay_slots(true))
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::CrossStageConflict { .. }
        ));

        let config = GeneratorConfig::preset(Preset::Balanced)
            .structure(|c| c.delay_slot(true))
            .composition(|c| c.no_unsafe_delay_slots(true))
            .build();
        assert!(config.is_ok());
    }

    #[test]
    fn test_describe() {
        let config = GeneratorConfig::preset(Preset::Fast);
        assert_eq!(
            config.describe(),
            "fast [length 1..=4, branches 1..=1, executions <= 1]"
        );
    }
}
