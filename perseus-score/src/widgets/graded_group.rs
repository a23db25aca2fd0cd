//! Graded-group widget: a titled group the learner can check on its own.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Result, ScoreError};
use crate::registry::{InputValidator, ScoreContext, Scorer, WidgetLogic};
use crate::types::{PerseusRenderer, Score, UserInput, WidgetOptions};
use crate::widgets::group::{group_inputs, score_nested_content, validate_nested_content};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedGroupWidgetOptions {
    #[serde(default)]
    pub title: String,
    /// Shown when the learner asks for help inside the group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<PerseusRenderer>,
    #[serde(default)]
    pub immediate_feedback: bool,
    /// The nested content tree
    #[serde(flatten)]
    pub renderer: PerseusRenderer,
}

/// Widget logic for `graded-group`.
pub struct GradedGroupWidget;

impl Scorer for GradedGroupWidget {
    fn score(
        &self,
        input: Option<&UserInput>,
        options: &WidgetOptions,
        ctx: &ScoreContext<'_>,
    ) -> Result<Score> {
        match options {
            WidgetOptions::GradedGroup(group) => {
                score_nested_content(group_inputs(input), &group.renderer, ctx)
            }
            other => Err(ScoreError::unexpected_options(self.name(), other)),
        }
    }
}

impl InputValidator for GradedGroupWidget {
    fn validate(
        &self,
        input: Option<&UserInput>,
        options: &WidgetOptions,
        ctx: &ScoreContext<'_>,
    ) -> Option<Score> {
        match options {
            WidgetOptions::GradedGroup(group) => {
                validate_nested_content(group_inputs(input), &group.renderer, ctx)
            }
            _ => Some(Score::invalid()),
        }
    }
}

impl WidgetLogic for GradedGroupWidget {
    fn name(&self) -> &str {
        "graded-group"
    }

    fn scorer(&self) -> Option<&dyn Scorer> {
        Some(self)
    }

    fn validator(&self) -> Option<&dyn InputValidator> {
        Some(self)
    }

    fn default_options(&self) -> Value {
        json!({"title": "", "content": "", "widgets": {}, "images": {}})
    }

    fn accessible(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::WidgetRegistry;
    use crate::types::{UserInputMap, WidgetInfo};
    use crate::widgets::dropdown::DropdownUserInput;

    fn options() -> GradedGroupWidgetOptions {
        serde_json::from_value(json!({
            "title": "Check your work",
            "content": "Pick one [[☃ dropdown 1]]",
            "widgets": {
                "dropdown 1": {
                    "type": "dropdown",
                    "options": {
                        "placeholder": "",
                        "choices": [
                            {"content": "yes", "correct": true},
                            {"content": "no", "correct": false}
                        ]
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_decodes_flattened_content() {
        let group = options();
        assert_eq!(group.title, "Check your work");
        assert!(group.hint.is_none());
        assert_eq!(group.renderer.scoreable_widget_ids(), vec!["dropdown 1"]);
        assert_eq!(group.renderer.widgets["dropdown 1"].widget_type, "dropdown");
    }

    #[test]
    fn test_scores_nested_widgets() {
        let registry = WidgetRegistry::with_builtin_widgets();
        let ctx = ScoreContext::new(&registry, "en");
        let widget = WidgetInfo::new(WidgetOptions::GradedGroup(options()));

        let mut inputs = UserInputMap::new();
        inputs.insert(
            "dropdown 1".to_string(),
            UserInput::Dropdown(DropdownUserInput { value: 1 }),
        );
        let input = UserInput::Group(inputs);

        assert!(GradedGroupWidget.validate(Some(&input), &widget.options, &ctx).is_none());
        assert_eq!(
            GradedGroupWidget.score(Some(&input), &widget.options, &ctx).unwrap(),
            Score::correct()
        );
    }
}
