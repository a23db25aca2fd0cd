//! Error types for scoring.
//!
//! Learner mistakes and missing input are never errors; they are
//! [`Score::Invalid`](crate::Score::Invalid) values. Errors here mean the
//! content itself is malformed.

use crate::types::WidgetOptions;

/// Error types for Perseus scoring operations.
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    /// A rubric lacks the correct answer a scorer needs
    #[error("Rubric for {widget} is missing correct data: {detail}")]
    MissingCorrectData {
        /// Widget or graph type whose rubric is incomplete
        widget: String,
        /// Which part of the rubric is missing
        detail: String,
    },

    /// A widget's options were decoded for a different widget type
    #[error("Widget logic for {expected} received {found} options")]
    UnexpectedOptions {
        expected: String,
        found: String,
    },

    /// Raw JSON could not be decoded into widget options or input
    #[error("Failed to decode widget data: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ScoreError {
    /// Rubric error for a graph type without correct coordinates.
    pub fn missing_correct(widget: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MissingCorrectData {
            widget: widget.into(),
            detail: detail.into(),
        }
    }

    /// Options whose variant does not belong to the widget logic handling them.
    pub fn unexpected_options(expected: impl Into<String>, found: &WidgetOptions) -> Self {
        Self::UnexpectedOptions {
            expected: expected.into(),
            found: found.widget_type().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoreError>;
