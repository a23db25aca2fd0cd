//! Group widget: a nested content tree scored as one widget.

use serde_json::{json, Value};

use crate::error::{Result, ScoreError};
use crate::registry::{InputValidator, ScoreContext, Scorer, WidgetLogic};
use crate::score::{flatten_scores, score_widgets};
use crate::types::{PerseusRenderer, Score, UserInput, UserInputMap, WidgetOptions};
use crate::validate::empty_widget_ids;

/// Nested inputs for a group, or `None` if the input is missing or misshapen.
pub(crate) fn group_inputs(input: Option<&UserInput>) -> Option<&UserInputMap> {
    match input {
        Some(UserInput::Group(inputs)) => Some(inputs),
        _ => None,
    }
}

/// Score every scoreable widget of `content` and fold the results into one.
pub fn score_nested_content(
    inputs: Option<&UserInputMap>,
    content: &PerseusRenderer,
    ctx: &ScoreContext<'_>,
) -> Result<Score> {
    let empty = UserInputMap::new();
    let ids = content.scoreable_widget_ids();
    let scores = score_widgets(&content.widgets, &ids, inputs.unwrap_or(&empty), ctx)?;
    Ok(flatten_scores(&scores))
}

/// Empty when the input is missing or any nested widget is unanswered.
pub fn validate_nested_content(
    inputs: Option<&UserInputMap>,
    content: &PerseusRenderer,
    ctx: &ScoreContext<'_>,
) -> Option<Score> {
    let Some(inputs) = inputs else {
        return Some(Score::invalid());
    };
    let ids = content.scoreable_widget_ids();
    if empty_widget_ids(&content.widgets, &ids, inputs, ctx).is_empty() {
        None
    } else {
        Some(Score::invalid())
    }
}

/// Widget logic for `group`.
pub struct GroupWidget;

impl Scorer for GroupWidget {
    fn score(
        &self,
        input: Option<&UserInput>,
        options: &WidgetOptions,
        ctx: &ScoreContext<'_>,
    ) -> Result<Score> {
        match options {
            WidgetOptions::Group(content) => score_nested_content(group_inputs(input), content, ctx),
            other => Err(ScoreError::unexpected_options(self.name(), other)),
        }
    }
}

impl InputValidator for GroupWidget {
    fn validate(
        &self,
        input: Option<&UserInput>,
        options: &WidgetOptions,
        ctx: &ScoreContext<'_>,
    ) -> Option<Score> {
        match options {
            WidgetOptions::Group(content) => {
                validate_nested_content(group_inputs(input), content, ctx)
            }
            _ => Some(Score::invalid()),
        }
    }
}

impl WidgetLogic for GroupWidget {
    fn name(&self) -> &str {
        "group"
    }

    fn scorer(&self) -> Option<&dyn Scorer> {
        Some(self)
    }

    fn validator(&self) -> Option<&dyn InputValidator> {
        Some(self)
    }

    fn default_options(&self) -> Value {
        json!({"content": "", "widgets": {}, "images": {}})
    }

    fn accessible(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::WidgetRegistry;
    use crate::types::WidgetInfo;
    use crate::widgets::sorter::{SorterUserInput, SorterWidgetOptions};

    fn sorter(correct: &[&str]) -> WidgetInfo {
        WidgetInfo::new(WidgetOptions::Sorter(SorterWidgetOptions {
            correct: correct.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }))
    }

    fn sorted(cards: &[&str]) -> UserInput {
        UserInput::Sorter(SorterUserInput {
            options: cards.iter().map(|s| s.to_string()).collect(),
            changed: true,
        })
    }

    fn content() -> PerseusRenderer {
        PerseusRenderer::new("[[☃ sorter 1]] [[☃ sorter 2]]")
            .with_widget("sorter 1", sorter(&["a", "b"]))
            .with_widget("sorter 2", sorter(&["c", "d"]))
    }

    #[test]
    fn test_group_flattens_nested_scores() {
        let registry = WidgetRegistry::with_builtin_widgets();
        let ctx = ScoreContext::new(&registry, "en");
        let mut inputs = UserInputMap::new();
        inputs.insert("sorter 1".to_string(), sorted(&["a", "b"]));
        inputs.insert("sorter 2".to_string(), sorted(&["d", "c"]));

        let score = GroupWidget
            .score(
                Some(&UserInput::Group(inputs)),
                &WidgetOptions::Group(content()),
                &ctx,
            )
            .unwrap();
        assert_eq!(
            score,
            Score::Points {
                earned: 1.0,
                total: 2.0,
                message: None
            }
        );
    }

    #[test]
    fn test_group_without_input_is_invalid() {
        let registry = WidgetRegistry::with_builtin_widgets();
        let ctx = ScoreContext::new(&registry, "en");
        let options = WidgetOptions::Group(content());

        assert!(GroupWidget.score(None, &options, &ctx).unwrap().is_invalid());
        assert!(GroupWidget.validate(None, &options, &ctx).is_some());
    }

    #[test]
    fn test_group_validation_reports_unanswered_nested_widget() {
        let registry = WidgetRegistry::with_builtin_widgets();
        let ctx = ScoreContext::new(&registry, "en");
        let options = WidgetOptions::Group(content());

        let mut inputs = UserInputMap::new();
        inputs.insert("sorter 1".to_string(), sorted(&["a", "b"]));
        let partial = UserInput::Group(inputs.clone());
        assert!(GroupWidget.validate(Some(&partial), &options, &ctx).is_some());

        inputs.insert("sorter 2".to_string(), sorted(&["c", "d"]));
        let complete = UserInput::Group(inputs);
        assert!(GroupWidget.validate(Some(&complete), &options, &ctx).is_none());
    }
}
