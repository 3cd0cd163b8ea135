//! Stage validation
//!
//! Every stage config validates itself; `GeneratorConfig::build()` runs the
//! optional stage overrides through `validate_all` before the cross-stage
//! checks.

use super::error::ConfigResult;

/// Stage configuration that can check its own ranges
pub trait Validatable {
    fn validate(&self) -> ConfigResult<()>;

    /// Stage name used in logs
    fn config_name(&self) -> &'static str {
        "stage"
    }
}

/// Validation of an optional or repeated stage override
pub trait ValidatableCollection {
    fn validate_all(&self) -> ConfigResult<()>;
}

impl<T: Validatable> ValidatableCollection for Option<T> {
    fn validate_all(&self) -> ConfigResult<()> {
        self.iter().try_for_each(validate_stage)
    }
}

impl<T: Validatable> ValidatableCollection for [T] {
    fn validate_all(&self) -> ConfigResult<()> {
        self.iter().try_for_each(validate_stage)
    }
}

fn validate_stage<T: Validatable>(config: &T) -> ConfigResult<()> {
    config.validate().inspect_err(|err| {
        tracing::debug!(stage = config.config_name(), error = %err, "stage override rejected");
    })
}
