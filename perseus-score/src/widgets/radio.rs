//! Radio widget: single or multiple choice.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Result, ScoreError};
use crate::registry::{InputValidator, ScoreContext, Scorer, WidgetLogic};
use crate::types::{Score, UserInput, WidgetOptions};

pub const CHOOSE_CORRECT_NUMBER_ERROR: &str = "Please choose the correct number of answers.";

/// One answer choice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioChoice {
    #[serde(default)]
    pub content: String,
    /// Stable identifier; choices without one are addressed as `choice-<index>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub correct: bool,
    /// Explanation shown after answering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_none_of_the_above: bool,
}

impl RadioChoice {
    /// Identifier used in `selectedChoiceIds`.
    pub fn choice_id(&self, index: usize) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| synthesized_choice_id(index))
    }
}

/// Identifier for a choice addressed by position.
pub fn synthesized_choice_id(index: usize) -> String {
    format!("choice-{index}")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioWidgetOptions {
    #[serde(default)]
    pub choices: Vec<RadioChoice>,
    #[serde(default)]
    pub randomize: bool,
    #[serde(default)]
    pub multiple_select: bool,
    /// Tell the learner how many choices are correct
    #[serde(default)]
    pub count_choices: bool,
    #[serde(default)]
    pub has_none_of_the_above: bool,
    #[serde(default)]
    pub deselect_enabled: bool,
}

impl RadioWidgetOptions {
    pub fn correct_choice_ids(&self) -> BTreeSet<String> {
        self.choices
            .iter()
            .enumerate()
            .filter(|(_, choice)| choice.correct)
            .map(|(index, choice)| choice.choice_id(index))
            .collect()
    }

    pub fn num_correct(&self) -> usize {
        self.choices.iter().filter(|choice| choice.correct).count()
    }
}

/// Selected choices, either by ID or as one flag per choice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioUserInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_choice_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices_selected: Option<Vec<bool>>,
}

impl RadioUserInput {
    /// Positions of the choices flagged in `choicesSelected`.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.choices_selected
            .iter()
            .flatten()
            .enumerate()
            .filter(|(_, selected)| **selected)
            .map(|(index, _)| index)
            .collect()
    }

    /// Selected choice IDs. Explicit IDs win over flags.
    pub fn selected_ids(&self, options: &RadioWidgetOptions) -> Vec<String> {
        match &self.selected_choice_ids {
            Some(ids) if !ids.is_empty() => ids.clone(),
            _ => self
                .selected_indices()
                .into_iter()
                .map(|index| match options.choices.get(index) {
                    Some(choice) => choice.choice_id(index),
                    None => synthesized_choice_id(index),
                })
                .collect(),
        }
    }

    pub fn has_selection(&self) -> bool {
        self.selected_choice_ids
            .as_ref()
            .is_some_and(|ids| !ids.is_empty())
            || !self.selected_indices().is_empty()
    }
}

/// Check that a selection was made, and the right number of them when the
/// learner was told how many to pick.
pub fn validate_radio(input: Option<&RadioUserInput>, options: &RadioWidgetOptions) -> Option<Score> {
    let Some(input) = input else {
        return Some(Score::invalid());
    };
    let selected = input.selected_ids(options);
    if selected.is_empty() {
        return Some(Score::invalid());
    }

    let num_correct = options.num_correct();
    if options.multiple_select
        && options.count_choices
        && num_correct > 0
        && selected.len() != num_correct
    {
        return Some(Score::Invalid {
            message: Some(CHOOSE_CORRECT_NUMBER_ERROR.to_string()),
        });
    }
    None
}

/// Correct iff exactly the correct choices are selected.
pub fn score_radio(input: Option<&RadioUserInput>, options: &RadioWidgetOptions) -> Score {
    if let Some(invalid) = validate_radio(input, options) {
        return invalid;
    }
    let Some(input) = input else {
        return Score::invalid();
    };

    let selected: BTreeSet<String> = input.selected_ids(options).into_iter().collect();
    Score::from_correct(selected == options.correct_choice_ids())
}

fn radio_input(input: Option<&UserInput>) -> Option<&RadioUserInput> {
    match input {
        Some(UserInput::Radio(radio)) => Some(radio),
        _ => None,
    }
}

/// Widget logic for `radio`.
pub struct RadioWidget;

impl RadioWidget {
    fn options<'a>(&self, options: &'a WidgetOptions) -> Result<&'a RadioWidgetOptions> {
        match options {
            WidgetOptions::Radio(radio) => Ok(radio),
            other => Err(ScoreError::unexpected_options(self.name(), other)),
        }
    }
}

impl Scorer for RadioWidget {
    fn score(
        &self,
        input: Option<&UserInput>,
        options: &WidgetOptions,
        _ctx: &ScoreContext<'_>,
    ) -> Result<Score> {
        Ok(score_radio(radio_input(input), self.options(options)?))
    }
}

impl InputValidator for RadioWidget {
    fn validate(
        &self,
        input: Option<&UserInput>,
        options: &WidgetOptions,
        _ctx: &ScoreContext<'_>,
    ) -> Option<Score> {
        match options {
            WidgetOptions::Radio(radio) => validate_radio(radio_input(input), radio),
            _ => Some(Score::invalid()),
        }
    }
}

impl WidgetLogic for RadioWidget {
    fn name(&self) -> &str {
        "radio"
    }

    fn scorer(&self) -> Option<&dyn Scorer> {
        Some(self)
    }

    fn validator(&self) -> Option<&dyn InputValidator> {
        Some(self)
    }

    /// Choices without their correctness flags.
    fn public_options(&self, options: &WidgetOptions) -> Result<Value> {
        let radio = self.options(options)?;
        let mut public = serde_json::to_value(radio)?;
        if let Some(choices) = public.get_mut("choices").and_then(Value::as_array_mut) {
            for choice in choices.iter_mut().filter_map(Value::as_object_mut) {
                choice.remove("correct");
            }
        }
        if radio.count_choices {
            public["numCorrect"] = json!(radio.num_correct());
        }
        Ok(public)
    }

    fn default_options(&self) -> Value {
        json!({
            "choices": [{}, {}, {}, {}],
            "randomize": false,
            "hasNoneOfTheAbove": false,
            "multipleSelect": false,
            "countChoices": false,
            "deselectEnabled": false,
        })
    }

    fn accessible(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(correct: &[bool], multiple_select: bool) -> RadioWidgetOptions {
        RadioWidgetOptions {
            choices: correct
                .iter()
                .enumerate()
                .map(|(i, correct)| RadioChoice {
                    content: format!("Choice {i}"),
                    correct: *correct,
                    ..Default::default()
                })
                .collect(),
            multiple_select,
            ..Default::default()
        }
    }

    fn flags(selected: &[bool]) -> RadioUserInput {
        RadioUserInput {
            choices_selected: Some(selected.to_vec()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_input_is_invalid() {
        assert_eq!(score_radio(None, &options(&[true, false], false)), Score::invalid());
    }

    #[test]
    fn test_no_selection_is_invalid() {
        let input = flags(&[false, false]);
        assert!(score_radio(Some(&input), &options(&[true, false], false)).is_empty());
    }

    #[test]
    fn test_single_choice() {
        let rubric = options(&[false, true, false], false);
        assert_eq!(score_radio(Some(&flags(&[false, true, false])), &rubric), Score::correct());
        assert_eq!(score_radio(Some(&flags(&[true, false, false])), &rubric), Score::incorrect());
    }

    #[test]
    fn test_selection_by_id() {
        let mut rubric = options(&[false, true], false);
        rubric.choices[1].id = Some("b".to_string());

        let by_id = RadioUserInput {
            selected_choice_ids: Some(vec!["b".to_string()]),
            ..Default::default()
        };
        assert_eq!(score_radio(Some(&by_id), &rubric), Score::correct());

        let synthesized = RadioUserInput {
            selected_choice_ids: Some(vec!["choice-0".to_string()]),
            ..Default::default()
        };
        assert_eq!(score_radio(Some(&synthesized), &rubric), Score::incorrect());
    }

    #[test]
    fn test_multiple_select_requires_exact_set() {
        let rubric = options(&[true, false, true], true);
        assert_eq!(score_radio(Some(&flags(&[true, false, true])), &rubric), Score::correct());
        assert_eq!(score_radio(Some(&flags(&[true, false, false])), &rubric), Score::incorrect());
        assert_eq!(score_radio(Some(&flags(&[true, true, true])), &rubric), Score::incorrect());
    }

    #[test]
    fn test_count_choices_rejects_wrong_count() {
        let mut rubric = options(&[true, false, true], true);
        rubric.count_choices = true;

        let score = score_radio(Some(&flags(&[true, false, false])), &rubric);
        assert_eq!(score.message(), Some(CHOOSE_CORRECT_NUMBER_ERROR));
        assert!(!score.is_empty());
    }

    #[test]
    fn test_public_options_hide_answers() {
        let rubric = WidgetOptions::Radio(options(&[true, false], false));
        let public = RadioWidget.public_options(&rubric).unwrap();
        for choice in public["choices"].as_array().unwrap() {
            assert!(choice.get("correct").is_none());
        }
    }
}
