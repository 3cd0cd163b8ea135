//! Error types for testgen-core
//!
//! Infeasible combinations are never errors: they are skipped by the
//! enumerators and only show up as exhaustion. The variants below cover
//! misuse at registration time, which must not be retried.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for testgen-core operations
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Malformed cross-section index ranges
    #[error("Invalid dependency ranges [{start1}, {end1}] x [{start2}, {end2}]: {reason}")]
    InvalidRange {
        start1: usize,
        end1: usize,
        start2: usize,
        end2: usize,
        reason: &'static str,
    },

    /// Cross dependency registered for a pair that is not strictly ordered
    #[error("Cross dependency requires section indices i < j, got ({first}, {second})")]
    UnorderedSections { first: usize, second: usize },

    /// Section index out of bounds
    #[error("Unknown section {index}: template has {count} section(s)")]
    UnknownSection { index: usize, count: usize },

    /// Branch instruction without a registered branch trace situation
    #[error("No branch trace situation registered for instruction '{0}'")]
    MissingSituation(String),

    /// Structural enumerator cannot be built from the registered instructions
    #[error("Template error: {0}")]
    Template(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl GeneratorError {
    /// Create a range error
    pub fn invalid_range(
        start1: usize,
        end1: usize,
        start2: usize,
        end2: usize,
        reason: &'static str,
    ) -> Self {
        GeneratorError::InvalidRange {
            start1,
            end1,
            start2,
            end2,
            reason,
        }
    }

    /// Create a template error
    pub fn template(msg: impl Into<String>) -> Self {
        GeneratorError::Template(msg.into())
    }
}

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_error_message() {
        let err = GeneratorError::invalid_range(0, 2, 1, 3, "ranges overlap");
        assert_eq!(
            err.to_string(),
            "Invalid dependency ranges [0, 2] x [1, 3]: ranges overlap"
        );
    }

    #[test]
    fn test_config_error_conversion() {
        let err: GeneratorError = ConfigError::Validation("bad".to_string()).into();
        assert!(matches!(err, GeneratorError::Config(_)));
    }
}
