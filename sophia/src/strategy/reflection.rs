//! Reflection: capture what the learner shares without judging it.

use serde_json::Value;

use perseus_score::{PerseusRenderer, ScoreContext, UserInput, UserInputMap};

use super::ScoringStrategy;
use crate::error::Result;
use crate::subscale::sum_subscale_contributions;
use crate::types::{now_millis, AssessmentPurpose, Moment, Recognition, ReflectionResult};

/// Keeps the learner's input verbatim, with any free text pulled out.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflectionStrategy;

impl ReflectionStrategy {
    pub const ID: &'static str = "reflection";
}

/// Trimmed free text of one widget's input, if there is any.
fn text_of(input: &UserInput) -> Vec<&str> {
    let texts: Vec<&str> = match input {
        UserInput::FreeResponse(response) => vec![response.content.as_str()],
        UserInput::NumericInput(numeric) | UserInput::InputNumber(numeric) => {
            vec![numeric.current_value.as_str()]
        }
        UserInput::Other(raw) => ["content", "currentValue"]
            .iter()
            .filter_map(|key| raw.get(*key).and_then(Value::as_str))
            .collect(),
        _ => Vec::new(),
    };
    texts
        .into_iter()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect()
}

/// Blank free text, whether typed or raw.
fn is_blank_text(input: &UserInput) -> bool {
    match input {
        UserInput::Other(Value::Null) => true,
        UserInput::FreeResponse(response) => response.content.trim().is_empty(),
        UserInput::Other(raw) => match raw.get("content") {
            Some(content) => content.as_str().map_or(true, |text| text.trim().is_empty()),
            None => false,
        },
        _ => false,
    }
}

/// Free text across all inputs, one widget per line.
///
/// Widgets appear in content order, then any inputs the content does not
/// mention in the order they were given.
pub fn extract_text_content(content: &PerseusRenderer, inputs: &UserInputMap) -> Option<String> {
    let in_content = content.widgets.keys().filter_map(|id| inputs.get(id));
    let extra = inputs
        .iter()
        .filter(|(id, _)| !content.widgets.contains_key(id.as_str()))
        .map(|(_, input)| input);

    let parts: Vec<&str> = in_content.chain(extra).flat_map(text_of).collect();
    (!parts.is_empty()).then(|| parts.join("\n"))
}

impl ScoringStrategy for ReflectionStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Reflection"
    }

    fn empty_widget_ids(
        &self,
        content: &PerseusRenderer,
        inputs: &UserInputMap,
        _ctx: &ScoreContext<'_>,
    ) -> Vec<String> {
        content
            .widgets
            .iter()
            .filter(|(_, widget)| !widget.is_static)
            .filter(|(id, _)| inputs.get(id.as_str()).map_or(true, is_blank_text))
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn recognize(
        &self,
        moment: &Moment,
        inputs: &UserInputMap,
        _ctx: &ScoreContext<'_>,
    ) -> Result<Recognition> {
        let subscale_contributions = moment
            .subscale_contributions
            .as_ref()
            .map(|mappings| sum_subscale_contributions(mappings, inputs).subscale_contributions);

        let reflection = ReflectionResult {
            user_input: inputs.clone(),
            timestamp: now_millis(),
            subscale_contributions,
            text_content: extract_text_content(&moment.content, inputs),
        };

        Ok(
            Recognition::new(moment.id.clone(), AssessmentPurpose::Reflection, inputs.clone())
                .with_reflection(reflection),
        )
    }
}
