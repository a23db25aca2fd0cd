//! Numeric-input widget: a text box checked against a list of answers.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Result, ScoreError};
use crate::numeric::{decimal_separator, parse_tex, AnswerForm, NumberMatcher, Simplify};
use crate::registry::{InputValidator, ScoreContext, Scorer, WidgetLogic};
use crate::types::{Alignment, NumericUserInput, Score, UserInput, WidgetOptions};

/// Width of a numeric text box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSize {
    #[default]
    Normal,
    Small,
}

/// What matching an answer means for the learner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStatus {
    #[default]
    Correct,
    /// A known wrong answer with targeted feedback
    Wrong,
    /// Matched but not graded
    Ungraded,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericInputAnswer {
    pub value: Option<f64>,
    #[serde(default)]
    pub status: AnswerStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub simplify: Option<Simplify>,
    /// Only `answer_forms` are accepted, not the default forms too
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub max_error: Option<f64>,
    #[serde(default)]
    pub answer_forms: Vec<AnswerForm>,
}

impl NumericInputAnswer {
    /// Answer with the given value and status and otherwise default settings.
    pub fn new(value: f64, status: AnswerStatus) -> Self {
        Self {
            value: Some(value),
            status,
            ..Default::default()
        }
    }

    fn message(&self) -> Option<String> {
        (!self.message.is_empty()).then(|| self.message.clone())
    }

    fn forms(&self) -> Vec<AnswerForm> {
        let mut forms = self.answer_forms.clone();
        if !self.strict {
            for form in AnswerForm::DEFAULTS {
                if !forms.contains(&form) {
                    forms.push(form);
                }
            }
        }
        forms
    }

    fn matcher(&self, separator: char) -> NumberMatcher {
        // An answer without a value can never match a guess.
        NumberMatcher::new(self.value.unwrap_or(f64::NAN))
            .with_forms(&self.forms())
            .with_simplify(self.simplify.unwrap_or_default())
            .inexact(self.max_error)
            .with_decimal_separator(separator)
            .with_message(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericInputWidgetOptions {
    #[serde(default)]
    pub answers: Vec<NumericInputAnswer>,
    #[serde(default)]
    pub size: InputSize,
    /// The box is a coefficient: blank means 1 and `-` means -1
    #[serde(default)]
    pub coefficient: bool,
    #[serde(default)]
    pub label_text: String,
    #[serde(default)]
    pub right_align: bool,
}

impl Default for NumericInputWidgetOptions {
    fn default() -> Self {
        Self {
            answers: vec![NumericInputAnswer {
                value: None,
                simplify: Some(Simplify::Required),
                ..Default::default()
            }],
            size: InputSize::Normal,
            coefficient: false,
            label_text: String::new(),
            right_align: false,
        }
    }
}

pub fn validate_numeric_input(input: Option<&NumericUserInput>) -> Option<Score> {
    match input {
        Some(input) if !input.current_value.trim().is_empty() => None,
        _ => Some(Score::invalid()),
    }
}

/// Rewrite `50%` as `0.5` when every correct answer is a fraction of one.
fn normalize_percent(guess: &str, normalized_answers: bool, separator: char) -> String {
    let Some(number) = guess.strip_suffix('%') else {
        return guess.to_string();
    };
    if !normalized_answers {
        return guess.to_string();
    }
    let literal = number.trim().replace(separator, ".");
    match literal.parse::<f64>() {
        Ok(value) => {
            let scaled = (value / 100.0).to_string();
            if separator == '.' {
                scaled
            } else {
                scaled.replace('.', &separator.to_string())
            }
        }
        Err(_) => guess.to_string(),
    }
}

/// Score against each answer in turn; the first one that matches decides.
///
/// A guess matches an answer when the answer's matcher accepts it, or when a
/// correct answer reports it as ungradeable (unsimplified, missing `%`,
/// unreadable) so the learner sees why.
pub fn score_numeric_input(
    input: Option<&NumericUserInput>,
    options: &NumericInputWidgetOptions,
    locale: &str,
) -> Score {
    let Some(input) = input else {
        return Score::invalid();
    };

    let separator = decimal_separator(locale);
    let mut guess = parse_tex(&input.current_value).trim().to_string();
    if options.coefficient {
        if guess.is_empty() {
            guess = "1".to_string();
        } else if guess == "-" {
            guess = "-1".to_string();
        }
    }

    let normalized_answers = options
        .answers
        .iter()
        .filter(|answer| answer.status == AnswerStatus::Correct)
        .all(|answer| answer.value.is_some_and(|value| value.abs() <= 1.0));
    let guess = normalize_percent(&guess, normalized_answers, separator);

    for answer in &options.answers {
        let check = answer.matcher(separator).check(&guess);
        let matched = check.correct || (answer.status == AnswerStatus::Correct && check.empty);
        if !matched {
            continue;
        }
        return match answer.status {
            AnswerStatus::Correct => check.into_score(),
            AnswerStatus::Wrong => Score::incorrect().with_message(answer.message()),
            AnswerStatus::Ungraded => Score::Invalid {
                message: answer.message(),
            },
        };
    }

    if guess.is_empty() {
        Score::invalid()
    } else {
        Score::incorrect()
    }
}

fn numeric_input(input: Option<&UserInput>) -> Option<&NumericUserInput> {
    match input {
        Some(UserInput::NumericInput(numeric)) => Some(numeric),
        _ => None,
    }
}

/// Widget logic for `numeric-input`.
pub struct NumericInputWidget;

impl Scorer for NumericInputWidget {
    fn score(
        &self,
        input: Option<&UserInput>,
        options: &WidgetOptions,
        ctx: &ScoreContext<'_>,
    ) -> Result<Score> {
        match options {
            WidgetOptions::NumericInput(numeric) => {
                Ok(score_numeric_input(numeric_input(input), numeric, ctx.locale))
            }
            other => Err(ScoreError::unexpected_options(self.name(), other)),
        }
    }
}

impl InputValidator for NumericInputWidget {
    fn validate(
        &self,
        input: Option<&UserInput>,
        _options: &WidgetOptions,
        _ctx: &ScoreContext<'_>,
    ) -> Option<Score> {
        validate_numeric_input(numeric_input(input))
    }
}

impl WidgetLogic for NumericInputWidget {
    fn name(&self) -> &str {
        "numeric-input"
    }

    fn scorer(&self) -> Option<&dyn Scorer> {
        Some(self)
    }

    fn validator(&self) -> Option<&dyn InputValidator> {
        Some(self)
    }

    /// Layout fields and the accepted answer forms; no answer values.
    fn public_options(&self, options: &WidgetOptions) -> Result<Value> {
        let WidgetOptions::NumericInput(numeric) = options else {
            return Err(ScoreError::unexpected_options(self.name(), options));
        };
        let mut answer_forms: Vec<AnswerForm> = Vec::new();
        for form in numeric
            .answers
            .iter()
            .filter(|answer| answer.status == AnswerStatus::Correct)
            .flat_map(|answer| answer.answer_forms.iter().copied())
        {
            if !answer_forms.contains(&form) {
                answer_forms.push(form);
            }
        }
        Ok(json!({
            "labelText": numeric.label_text,
            "size": numeric.size,
            "coefficient": numeric.coefficient,
            "rightAlign": numeric.right_align,
            "answerForms": answer_forms,
        }))
    }

    fn default_options(&self) -> Value {
        serde_json::to_value(NumericInputWidgetOptions::default()).unwrap_or_default()
    }

    fn default_alignment(&self) -> Option<Alignment> {
        Some(Alignment::InlineBlock)
    }

    fn supported_alignments(&self) -> Vec<Alignment> {
        vec![Alignment::InlineBlock, Alignment::Block]
    }

    fn accessible(&self) -> bool {
        true
    }
}
