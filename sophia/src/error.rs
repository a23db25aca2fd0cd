//! Error types for recognition.

use perseus_score::ScoreError;

/// Error types for Sophia operations.
#[derive(Debug, thiserror::Error)]
pub enum SophiaError {
    /// No strategy is registered under the requested ID
    #[error("Strategy not found: \"{id}\". Available: {}", .available.join(", "))]
    StrategyNotFound {
        id: String,
        /// IDs that are registered, in registration order
        available: Vec<String>,
    },

    /// Scoring failed on malformed content
    #[error("Scoring failed: {0}")]
    Scoring(#[from] ScoreError),

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Configuration parsed but holds unusable values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for Sophia operations.
pub type Result<T> = std::result::Result<T, SophiaError>;
