//! Preset configurations
//!
//! Presets provide complete default configurations for common use cases.

use serde::{Deserialize, Serialize};

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Smoke runs: one branch, short structures
    ///
    /// - Structure: length 1..=4, one branch
    /// - Trace: one execution per branch, first trace only
    Fast,

    /// Default enumeration
    ///
    /// - Structure: length 1..=7, up to two branches
    /// - Trace: up to two executions per branch
    Balanced,

    /// Exhaustive enumeration of larger skeletons
    ///
    /// - Structure: length 1..=10, up to three branches
    /// - Trace: up to three executions per branch
    Thorough,

    /// Custom: User-defined (YAML only)
    ///
    /// This preset provides minimal defaults.
    /// Users must override via YAML or builder API.
    Custom,
}

impl Preset {
    /// Parse preset from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            "custom" => Ok(Self::Custom),
            _ => Err(format!(
                "Unknown preset '{}'. Valid presets: fast, balanced, thorough, custom",
                s
            )),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
            Self::Custom => "custom",
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::Balanced
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parsing() {
        assert_eq!(Preset::from_str("fast").unwrap(), Preset::Fast);
        assert_eq!(Preset::from_str("Thorough").unwrap(), Preset::Thorough);
        assert_eq!(Preset::from_str("custom").unwrap(), Preset::Custom);
        assert!(Preset::from_str("exhaustive").is_err());
    }

    #[test]
    fn test_preset_display_roundtrip() {
        for preset in [Preset::Fast, Preset::Balanced, Preset::Thorough, Preset::Custom] {
            assert_eq!(Preset::from_str(&preset.to_string()).unwrap(), preset);
        }
        assert_eq!(Preset::default(), Preset::Balanced);
    }
}
