//! Dropdown widget.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Result, ScoreError};
use crate::registry::{InputValidator, ScoreContext, Scorer, WidgetLogic};
use crate::types::{Alignment, Score, UserInput, WidgetOptions};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropdownChoice {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub correct: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropdownWidgetOptions {
    /// Text shown before anything is picked
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub choices: Vec<DropdownChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
}

/// The picked entry: `0` is the placeholder, choices start at `1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownUserInput {
    #[serde(default, deserialize_with = "choice_value")]
    pub value: usize,
}

/// The rendering layer sends the picked entry as a number or as its text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawChoiceValue {
    Number(usize),
    Text(String),
}

/// Text that is not a whole number reads as the placeholder.
fn choice_value<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<RawChoiceValue>::deserialize(deserializer)? {
        Some(RawChoiceValue::Number(value)) => value,
        Some(RawChoiceValue::Text(text)) => text.trim().parse().unwrap_or(0),
        None => 0,
    })
}

impl DropdownUserInput {
    /// Zero-based position of the picked choice, if any.
    pub fn choice_index(&self) -> Option<usize> {
        self.value.checked_sub(1)
    }
}

pub fn validate_dropdown(input: Option<&DropdownUserInput>) -> Option<Score> {
    match input {
        Some(input) if input.value != 0 => None,
        _ => Some(Score::invalid()),
    }
}

/// Correct iff the picked choice is marked correct.
pub fn score_dropdown(input: Option<&DropdownUserInput>, options: &DropdownWidgetOptions) -> Score {
    if let Some(invalid) = validate_dropdown(input) {
        return invalid;
    }
    let choice = input
        .and_then(DropdownUserInput::choice_index)
        .and_then(|index| options.choices.get(index));
    match choice {
        Some(choice) => Score::from_correct(choice.correct),
        // Points past the last choice
        None => Score::invalid(),
    }
}

fn dropdown_input(input: Option<&UserInput>) -> Option<&DropdownUserInput> {
    match input {
        Some(UserInput::Dropdown(dropdown)) => Some(dropdown),
        _ => None,
    }
}

/// Widget logic for `dropdown`.
pub struct DropdownWidget;

impl Scorer for DropdownWidget {
    fn score(
        &self,
        input: Option<&UserInput>,
        options: &WidgetOptions,
        _ctx: &ScoreContext<'_>,
    ) -> Result<Score> {
        match options {
            WidgetOptions::Dropdown(dropdown) => Ok(score_dropdown(dropdown_input(input), dropdown)),
            other => Err(ScoreError::unexpected_options(self.name(), other)),
        }
    }
}

impl InputValidator for DropdownWidget {
    fn validate(
        &self,
        input: Option<&UserInput>,
        _options: &WidgetOptions,
        _ctx: &ScoreContext<'_>,
    ) -> Option<Score> {
        validate_dropdown(dropdown_input(input))
    }
}

impl WidgetLogic for DropdownWidget {
    fn name(&self) -> &str {
        "dropdown"
    }

    fn scorer(&self) -> Option<&dyn Scorer> {
        Some(self)
    }

    fn validator(&self) -> Option<&dyn InputValidator> {
        Some(self)
    }

    /// Choice labels only.
    fn public_options(&self, options: &WidgetOptions) -> Result<Value> {
        let WidgetOptions::Dropdown(dropdown) = options else {
            return Err(ScoreError::unexpected_options(self.name(), options));
        };
        let choices: Vec<&str> = dropdown.choices.iter().map(|c| c.content.as_str()).collect();
        let mut public = json!({
            "placeholder": dropdown.placeholder,
            "choices": choices,
        });
        if let Some(label) = &dropdown.visible_label {
            public["visibleLabel"] = json!(label);
        }
        if let Some(label) = &dropdown.aria_label {
            public["ariaLabel"] = json!(label);
        }
        Ok(public)
    }

    fn default_options(&self) -> Value {
        json!({
            "placeholder": "",
            "choices": [{"content": "", "correct": false}],
        })
    }

    fn default_alignment(&self) -> Option<Alignment> {
        Some(Alignment::InlineBlock)
    }

    fn accessible(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rubric() -> DropdownWidgetOptions {
        DropdownWidgetOptions {
            placeholder: "Pick one".to_string(),
            choices: vec![
                DropdownChoice {
                    content: "red".to_string(),
                    correct: false,
                },
                DropdownChoice {
                    content: "blue".to_string(),
                    correct: true,
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_placeholder_is_invalid() {
        assert!(score_dropdown(Some(&DropdownUserInput { value: 0 }), &rubric()).is_empty());
        assert!(score_dropdown(None, &rubric()).is_empty());
    }

    #[test]
    fn test_value_decodes_from_number_or_text() {
        let decode = |raw: Value| serde_json::from_value::<DropdownUserInput>(raw).unwrap().value;
        assert_eq!(decode(json!({"value": 2})), 2);
        assert_eq!(decode(json!({"value": "2"})), 2);
        assert_eq!(decode(json!({"value": "blue"})), 0);
        assert_eq!(decode(json!({"value": null})), 0);
        assert_eq!(decode(json!({})), 0);

        let input = serde_json::from_value::<DropdownUserInput>(json!({"value": "2"})).unwrap();
        assert_eq!(score_dropdown(Some(&input), &rubric()), Score::correct());
    }

    #[test]
    fn test_values_are_one_based() {
        assert_eq!(score_dropdown(Some(&DropdownUserInput { value: 2 }), &rubric()), Score::correct());
        assert_eq!(score_dropdown(Some(&DropdownUserInput { value: 1 }), &rubric()), Score::incorrect());
    }

    #[test]
    fn test_out_of_range_is_invalid() {
        assert!(score_dropdown(Some(&DropdownUserInput { value: 9 }), &rubric()).is_invalid());
    }

    #[test]
    fn test_public_options() {
        let public = DropdownWidget
            .public_options(&WidgetOptions::Dropdown(rubric()))
            .unwrap();
        assert_eq!(public, json!({"placeholder": "Pick one", "choices": ["red", "blue"]}));
    }
}
