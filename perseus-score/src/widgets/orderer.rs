//! Orderer widget: build a sequence from a bank of cards.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Result, ScoreError};
use crate::registry::{InputValidator, ScoreContext, Scorer, WidgetLogic};
use crate::types::{PerseusRenderer, Score, UserInput, WidgetOptions};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrdererHeight {
    #[default]
    Normal,
    /// Older content calls this `large`
    #[serde(alias = "large")]
    Auto,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrdererLayout {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdererWidgetOptions {
    /// Every card offered to the learner
    #[serde(default)]
    pub options: Vec<PerseusRenderer>,
    /// Cards of the correct sequence, in order
    #[serde(default)]
    pub correct_options: Vec<PerseusRenderer>,
    /// Distractor cards
    #[serde(default)]
    pub other_options: Vec<PerseusRenderer>,
    #[serde(default)]
    pub height: OrdererHeight,
    #[serde(default)]
    pub layout: OrdererLayout,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrdererUserInput {
    /// Card contents in the learner's sequence
    #[serde(default)]
    pub current: Vec<String>,
}

pub fn validate_orderer(input: Option<&OrdererUserInput>) -> Option<Score> {
    match input {
        Some(input) if !input.current.is_empty() => None,
        _ => Some(Score::invalid()),
    }
}

/// Correct iff the sequence equals the correct cards' contents in order.
pub fn score_orderer(input: Option<&OrdererUserInput>, options: &OrdererWidgetOptions) -> Score {
    if let Some(invalid) = validate_orderer(input) {
        return invalid;
    }
    let Some(input) = input else {
        return Score::invalid();
    };
    let correct = input.current.len() == options.correct_options.len()
        && input
            .current
            .iter()
            .zip(&options.correct_options)
            .all(|(guess, card)| *guess == card.content);
    Score::from_correct(correct)
}

fn orderer_input(input: Option<&UserInput>) -> Option<&OrdererUserInput> {
    match input {
        Some(UserInput::Orderer(orderer)) => Some(orderer),
        _ => None,
    }
}

/// Widget logic for `orderer`.
pub struct OrdererWidget;

impl Scorer for OrdererWidget {
    fn score(
        &self,
        input: Option<&UserInput>,
        options: &WidgetOptions,
        _ctx: &ScoreContext<'_>,
    ) -> Result<Score> {
        match options {
            WidgetOptions::Orderer(orderer) => Ok(score_orderer(orderer_input(input), orderer)),
            other => Err(ScoreError::unexpected_options(self.name(), other)),
        }
    }
}

impl InputValidator for OrdererWidget {
    fn validate(
        &self,
        input: Option<&UserInput>,
        _options: &WidgetOptions,
        _ctx: &ScoreContext<'_>,
    ) -> Option<Score> {
        validate_orderer(orderer_input(input))
    }
}

impl WidgetLogic for OrdererWidget {
    fn name(&self) -> &str {
        "orderer"
    }

    fn scorer(&self) -> Option<&dyn Scorer> {
        Some(self)
    }

    fn validator(&self) -> Option<&dyn InputValidator> {
        Some(self)
    }

    /// The card bank without the correct sequence.
    fn public_options(&self, options: &WidgetOptions) -> Result<Value> {
        let WidgetOptions::Orderer(orderer) = options else {
            return Err(ScoreError::unexpected_options(self.name(), options));
        };
        Ok(json!({
            "options": orderer.options,
            "height": orderer.height,
            "layout": orderer.layout,
        }))
    }

    fn default_options(&self) -> Value {
        json!({
            "correctOptions": [{"content": "$x$"}],
            "otherOptions": [{"content": "$y$"}],
            "height": "normal",
            "layout": "horizontal",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rubric() -> OrdererWidgetOptions {
        OrdererWidgetOptions {
            correct_options: vec![PerseusRenderer::new("1"), PerseusRenderer::new("2")],
            other_options: vec![PerseusRenderer::new("3")],
            ..Default::default()
        }
    }

    fn current(cards: &[&str]) -> OrdererUserInput {
        OrdererUserInput {
            current: cards.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_arrangement_is_invalid() {
        assert!(score_orderer(Some(&current(&[])), &rubric()).is_empty());
        assert!(score_orderer(None, &rubric()).is_empty());
    }

    #[test]
    fn test_sequence_must_match() {
        assert_eq!(score_orderer(Some(&current(&["1", "2"])), &rubric()), Score::correct());
        assert_eq!(score_orderer(Some(&current(&["2", "1"])), &rubric()), Score::incorrect());
        assert_eq!(score_orderer(Some(&current(&["1", "2", "3"])), &rubric()), Score::incorrect());
    }

    #[test]
    fn test_legacy_height() {
        let options: OrdererWidgetOptions =
            serde_json::from_value(json!({"height": "large"})).unwrap();
        assert_eq!(options.height, OrdererHeight::Auto);
    }
}
