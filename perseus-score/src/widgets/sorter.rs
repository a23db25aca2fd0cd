//! Sorter widget: drag cards into the right order.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Result, ScoreError};
use crate::registry::{InputValidator, ScoreContext, Scorer, WidgetLogic};
use crate::types::{Score, UserInput, WidgetOptions};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SorterLayout {
    #[default]
    Horizontal,
    Vertical,
}

fn default_padding() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SorterWidgetOptions {
    /// Cards in their correct order
    #[serde(default)]
    pub correct: Vec<String>,
    #[serde(default = "default_padding")]
    pub padding: bool,
    #[serde(default)]
    pub layout: SorterLayout,
}

impl Default for SorterWidgetOptions {
    fn default() -> Self {
        Self {
            correct: vec!["$x$".to_string(), "$y$".to_string(), "$z$".to_string()],
            padding: true,
            layout: SorterLayout::Horizontal,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SorterUserInput {
    /// Cards in the learner's order
    #[serde(default)]
    pub options: Vec<String>,
    /// Whether the learner has moved any card
    #[serde(default)]
    pub changed: bool,
}

pub fn validate_sorter(input: Option<&SorterUserInput>) -> Option<Score> {
    match input {
        Some(input) if !input.options.is_empty() => None,
        _ => Some(Score::invalid()),
    }
}

/// Exact sequence match, no tolerance.
pub fn score_sorter(input: Option<&SorterUserInput>, options: &SorterWidgetOptions) -> Score {
    match input {
        None => Score::invalid(),
        Some(input) => Score::from_correct(input.options == options.correct),
    }
}

/// First card in place, the rest sorted, so the order gives nothing away.
pub fn public_cards(correct: &[String]) -> Vec<String> {
    let Some((first, rest)) = correct.split_first() else {
        return Vec::new();
    };
    let mut rest = rest.to_vec();
    rest.sort();
    std::iter::once(first.clone()).chain(rest).collect()
}

fn sorter_input(input: Option<&UserInput>) -> Option<&SorterUserInput> {
    match input {
        Some(UserInput::Sorter(sorter)) => Some(sorter),
        _ => None,
    }
}

/// Widget logic for `sorter`.
pub struct SorterWidget;

impl Scorer for SorterWidget {
    fn score(
        &self,
        input: Option<&UserInput>,
        options: &WidgetOptions,
        _ctx: &ScoreContext<'_>,
    ) -> Result<Score> {
        match options {
            WidgetOptions::Sorter(sorter) => Ok(score_sorter(sorter_input(input), sorter)),
            other => Err(ScoreError::unexpected_options(self.name(), other)),
        }
    }
}

impl InputValidator for SorterWidget {
    fn validate(
        &self,
        input: Option<&UserInput>,
        _options: &WidgetOptions,
        _ctx: &ScoreContext<'_>,
    ) -> Option<Score> {
        validate_sorter(sorter_input(input))
    }
}

impl WidgetLogic for SorterWidget {
    fn name(&self) -> &str {
        "sorter"
    }

    fn scorer(&self) -> Option<&dyn Scorer> {
        Some(self)
    }

    fn validator(&self) -> Option<&dyn InputValidator> {
        Some(self)
    }

    fn public_options(&self, options: &WidgetOptions) -> Result<Value> {
        let WidgetOptions::Sorter(sorter) = options else {
            return Err(ScoreError::unexpected_options(self.name(), options));
        };
        Ok(json!({
            "cards": public_cards(&sorter.correct),
            "padding": sorter.padding,
            "layout": sorter.layout,
        }))
    }

    fn default_options(&self) -> Value {
        serde_json::to_value(SorterWidgetOptions::default()).unwrap_or_default()
    }
}
