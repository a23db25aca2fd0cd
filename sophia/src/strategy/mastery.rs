//! Mastery: graded assessment with right and wrong answers.

use tracing::trace;

use perseus_score::{
    content_empty_widget_ids, score_perseus_item, PerseusRenderer, ScoreContext, UserInput,
    UserInputMap, WidgetInfo,
};

use super::{ScoringStrategy, WidgetScorer, WidgetScoringResult};
use crate::error::Result;
use crate::types::{AssessmentPurpose, MasteryResult, Moment, Recognition};

/// Scores every widget of a moment and reports whether the learner earned
/// every point.
#[derive(Debug, Clone, Copy, Default)]
pub struct MasteryStrategy;

impl MasteryStrategy {
    pub const ID: &'static str = "mastery";
}

impl ScoringStrategy for MasteryStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Mastery Assessment"
    }

    fn empty_widget_ids(
        &self,
        content: &PerseusRenderer,
        inputs: &UserInputMap,
        ctx: &ScoreContext<'_>,
    ) -> Vec<String> {
        content_empty_widget_ids(content, inputs, ctx)
    }

    fn recognize(
        &self,
        moment: &Moment,
        inputs: &UserInputMap,
        ctx: &ScoreContext<'_>,
    ) -> Result<Recognition> {
        let score = score_perseus_item(&moment.content, inputs, ctx)?;
        let mastery = MasteryResult::from_score(&score);

        Ok(Recognition::new(moment.id.clone(), AssessmentPurpose::Mastery, inputs.clone())
            .with_mastery(mastery))
    }

    fn widget_scorer(&self) -> Option<&dyn WidgetScorer> {
        Some(self)
    }
}

impl WidgetScorer for MasteryStrategy {
    fn score_widget(
        &self,
        widget_id: &str,
        widget: &WidgetInfo,
        input: Option<&UserInput>,
        ctx: &ScoreContext<'_>,
    ) -> Result<Option<WidgetScoringResult>> {
        let Some(scorer) = ctx.registry.scorer(&widget.widget_type) else {
            return Ok(None);
        };

        let validation = ctx
            .registry
            .validator(&widget.widget_type)
            .and_then(|validator| validator.validate(input, &widget.options, ctx));

        let score = match validation {
            Some(invalid) => invalid,
            None => scorer.score(input, &widget.options, ctx)?,
        };
        trace!(widget_id, widget_type = %widget.widget_type, ?score, "Live widget score");

        Ok(Some(WidgetScoringResult {
            widget_id: widget_id.to_string(),
            score,
            is_scoreable: true,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perseus_score::{Score, WidgetRegistry};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn content() -> PerseusRenderer {
        serde_json::from_value(json!({
            "content": "[[☃ radio 1]] [[☃ sorter 1]]",
            "widgets": {
                "radio 1": {
                    "type": "radio",
                    "options": {"choices": [{"content": "A", "correct": true}, {"content": "B"}]}
                },
                "sorter 1": {
                    "type": "sorter",
                    "options": {"correct": ["x", "y", "z"], "padding": true, "layout": "horizontal"}
                }
            },
            "images": {}
        }))
        .unwrap()
    }

    fn inputs(sorted: &[&str]) -> UserInputMap {
        let widgets = content().widgets;
        perseus_score::decode_user_input_map(
            &widgets,
            json!({
                "radio 1": {"selectedChoiceIds": ["choice-0"]},
                "sorter 1": {"options": sorted, "changed": true}
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_all_correct_is_demonstrated() {
        let widgets = WidgetRegistry::with_builtin_widgets();
        let ctx = ScoreContext::new(&widgets, "en");
        let moment = Moment::mastery("m1", content());

        let recognition = MasteryStrategy
            .recognize(&moment, &inputs(&["x", "y", "z"]), &ctx)
            .unwrap();
        assert_eq!(recognition.purpose, AssessmentPurpose::Mastery);
        assert!(recognition.has_demonstrated());
        assert_eq!(recognition.mastery_percentage(), 100);
    }

    #[test]
    fn test_partial_credit_is_not_demonstrated() {
        let widgets = WidgetRegistry::with_builtin_widgets();
        let ctx = ScoreContext::new(&widgets, "en");
        let moment = Moment::mastery("m1", content());

        let recognition = MasteryStrategy
            .recognize(&moment, &inputs(&["z", "y", "x"]), &ctx)
            .unwrap();
        let mastery = recognition.mastery.unwrap();
        assert!(!mastery.demonstrated);
        assert_eq!((mastery.score, mastery.total), (1.0, 2.0));
    }

    #[test]
    fn test_blank_input_is_zero_of_one() {
        let widgets = WidgetRegistry::with_builtin_widgets();
        let ctx = ScoreContext::new(&widgets, "en");
        let moment = Moment::mastery("m1", content());

        let recognition = MasteryStrategy
            .recognize(&moment, &UserInputMap::new(), &ctx)
            .unwrap();
        let mastery = recognition.mastery.unwrap();
        assert_eq!((mastery.demonstrated, mastery.score, mastery.total), (false, 0.0, 1.0));

        assert_eq!(
            MasteryStrategy.empty_widget_ids(&moment.content, &UserInputMap::new(), &ctx),
            vec!["radio 1", "sorter 1"]
        );
    }

    #[test]
    fn test_live_widget_score_validates_first() {
        let widgets = WidgetRegistry::with_builtin_widgets();
        let ctx = ScoreContext::new(&widgets, "en");
        let content = content();
        let radio = &content.widgets["radio 1"];
        let scorer = MasteryStrategy.widget_scorer().unwrap();

        let blank = scorer.score_widget("radio 1", radio, None, &ctx).unwrap().unwrap();
        assert!(blank.score.is_invalid());
        assert!(blank.is_scoreable);

        let answer = UserInput::radio_choices(["choice-0"]);
        let graded = scorer
            .score_widget("radio 1", radio, Some(&answer), &ctx)
            .unwrap()
            .unwrap();
        assert_eq!(graded.widget_id, "radio 1");
        assert_eq!(graded.score, Score::correct());
    }

    #[test]
    fn test_live_score_for_unscored_widget_is_none() {
        let widgets = WidgetRegistry::new();
        let ctx = ScoreContext::new(&widgets, "en");
        let content = content();

        let result = MasteryStrategy
            .score_widget("radio 1", &content.widgets["radio 1"], None, &ctx)
            .unwrap();
        assert_eq!(result, None);
    }
}
