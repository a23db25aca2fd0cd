//! Configuration for recognition.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SophiaError};

/// Configuration for a Sophia strategy registry and the aggregates built on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SophiaConfig {
    /// Strategy used when a purpose has no dedicated strategy
    pub default_strategy: String,
    /// Locale passed to scorers for number parsing
    pub locale: String,
    /// Aggregation settings
    pub aggregation: AggregationConfig,
}

impl Default for SophiaConfig {
    fn default() -> Self {
        Self {
            default_strategy: "noop".to_string(),
            locale: "en".to_string(),
            aggregation: AggregationConfig::default(),
        }
    }
}

impl SophiaConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values no registry or aggregate could use.
    pub fn validate(&self) -> Result<()> {
        if self.default_strategy.trim().is_empty() {
            return Err(SophiaError::InvalidConfig(
                "default_strategy must not be empty".to_string(),
            ));
        }
        if self.locale.trim().is_empty() {
            return Err(SophiaError::InvalidConfig(
                "locale must not be empty".to_string(),
            ));
        }
        let threshold = self.aggregation.clear_primary_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SophiaError::InvalidConfig(format!(
                "clear_primary_threshold must be between 0 and 1, got {threshold}"
            )));
        }
        Ok(())
    }
}

/// Aggregation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Relative lead the top subscale needs over the second (0.0 - 1.0)
    pub clear_primary_threshold: f64,
    /// Consecutive demonstrations that count as mastery
    pub target_streak: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            clear_primary_threshold: 0.2,
            target_streak: 3,
        }
    }
}
