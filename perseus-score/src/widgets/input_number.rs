//! Input-number widget: a single numeric answer of a configured type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ScoreError};
use crate::numeric::{decimal_separator, parse_tex, InputNumberAnswerType, NumberMatcher, Simplify};
use crate::registry::{InputValidator, ScoreContext, Scorer, WidgetLogic};
use crate::types::{Alignment, NumericUserInput, Score, UserInput, WidgetOptions};
use crate::widgets::numeric_input::{validate_numeric_input, InputSize};

fn default_max_error() -> f64 {
    0.1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputNumberWidgetOptions {
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub simplify: Simplify,
    #[serde(default)]
    pub size: InputSize,
    /// Accept answers within `max_error`
    #[serde(default)]
    pub inexact: bool,
    #[serde(default = "default_max_error")]
    pub max_error: f64,
    #[serde(default)]
    pub answer_type: InputNumberAnswerType,
    #[serde(default)]
    pub right_align: bool,
}

impl Default for InputNumberWidgetOptions {
    fn default() -> Self {
        Self {
            value: 0.0,
            simplify: Simplify::Required,
            size: InputSize::Normal,
            inexact: false,
            max_error: default_max_error(),
            answer_type: InputNumberAnswerType::Number,
            right_align: false,
        }
    }
}

pub fn score_input_number(
    input: Option<&NumericUserInput>,
    options: &InputNumberWidgetOptions,
    locale: &str,
) -> Score {
    let Some(input) = input else {
        return Score::invalid();
    };

    let mut matcher = NumberMatcher::new(options.value)
        .with_forms(options.answer_type.forms())
        .with_simplify(options.simplify)
        .with_decimal_separator(decimal_separator(locale));
    if options.inexact {
        matcher = matcher.inexact(Some(options.max_error));
    }

    matcher.check(&parse_tex(&input.current_value)).into_score()
}

fn number_input(input: Option<&UserInput>) -> Option<&NumericUserInput> {
    match input {
        Some(UserInput::InputNumber(number)) => Some(number),
        _ => None,
    }
}

/// Widget logic for `input-number`.
pub struct InputNumberWidget;

impl Scorer for InputNumberWidget {
    fn score(
        &self,
        input: Option<&UserInput>,
        options: &WidgetOptions,
        ctx: &ScoreContext<'_>,
    ) -> Result<Score> {
        match options {
            WidgetOptions::InputNumber(number) => {
                Ok(score_input_number(number_input(input), number, ctx.locale))
            }
            other => Err(ScoreError::unexpected_options(self.name(), other)),
        }
    }
}

impl InputValidator for InputNumberWidget {
    fn validate(
        &self,
        input: Option<&UserInput>,
        _options: &WidgetOptions,
        _ctx: &ScoreContext<'_>,
    ) -> Option<Score> {
        validate_numeric_input(number_input(input))
    }
}

impl WidgetLogic for InputNumberWidget {
    fn name(&self) -> &str {
        "input-number"
    }

    fn scorer(&self) -> Option<&dyn Scorer> {
        Some(self)
    }

    fn validator(&self) -> Option<&dyn InputValidator> {
        Some(self)
    }

    /// Everything except the correct value.
    fn public_options(&self, options: &WidgetOptions) -> Result<Value> {
        let WidgetOptions::InputNumber(number) = options else {
            return Err(ScoreError::unexpected_options(self.name(), options));
        };
        let mut public = serde_json::to_value(number)?;
        if let Some(fields) = public.as_object_mut() {
            fields.remove("value");
        }
        Ok(public)
    }

    fn default_options(&self) -> Value {
        serde_json::to_value(InputNumberWidgetOptions::default()).unwrap_or_default()
    }

    fn default_alignment(&self) -> Option<Alignment> {
        Some(Alignment::InlineBlock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn guess(text: &str) -> NumericUserInput {
        NumericUserInput {
            current_value: text.to_string(),
        }
    }

    fn rubric(value: f64, answer_type: InputNumberAnswerType) -> InputNumberWidgetOptions {
        InputNumberWidgetOptions {
            value,
            answer_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_number_answer_type() {
        let options = rubric(1.5, InputNumberAnswerType::Number);
        assert_eq!(score_input_number(Some(&guess("1.5")), &options, ""), Score::correct());
        assert_eq!(score_input_number(Some(&guess("3/2")), &options, ""), Score::correct());
        assert_eq!(score_input_number(Some(&guess("1 1/2")), &options, ""), Score::correct());
        assert_eq!(score_input_number(Some(&guess("2")), &options, ""), Score::incorrect());
    }

    #[test]
    fn test_integer_answer_type_rejects_decimals() {
        let options = rubric(2.0, InputNumberAnswerType::Integer);
        assert_eq!(score_input_number(Some(&guess("2")), &options, ""), Score::correct());
        assert!(score_input_number(Some(&guess("2.0")), &options, "").is_invalid());
    }

    #[test]
    fn test_pi_answer_type() {
        let options = rubric(PI / 2.0, InputNumberAnswerType::Pi);
        assert_eq!(score_input_number(Some(&guess(r"\frac{1}{2}\pi")), &options, ""), Score::correct());
        assert_eq!(score_input_number(Some(&guess("pi/2")), &options, ""), Score::correct());
        assert!(score_input_number(Some(&guess("1.57")), &options, "").is_invalid());
    }

    #[test]
    fn test_inexact() {
        let mut options = rubric(10.0, InputNumberAnswerType::Decimal);
        assert_eq!(score_input_number(Some(&guess("10.05")), &options, ""), Score::incorrect());

        options.inexact = true;
        assert_eq!(score_input_number(Some(&guess("10.05")), &options, ""), Score::correct());
    }

    #[test]
    fn test_missing_and_blank_input() {
        let options = InputNumberWidgetOptions::default();
        assert_eq!(score_input_number(None, &options, ""), Score::invalid());
        assert_eq!(score_input_number(Some(&guess("")), &options, ""), Score::invalid());
    }

    #[test]
    fn test_public_options_drop_value() {
        let options = WidgetOptions::InputNumber(rubric(7.0, InputNumberAnswerType::Number));
        let public = InputNumberWidget.public_options(&options).unwrap();
        assert!(public.get("value").is_none());
        assert_eq!(public["answerType"], "number");
    }
}
