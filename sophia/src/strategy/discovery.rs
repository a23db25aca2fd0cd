//! Discovery: what resonates with the learner. No answer is wrong.

use serde_json::Value;

use perseus_score::{PerseusRenderer, ScoreContext, UserInput, UserInputMap};

use super::ScoringStrategy;
use crate::error::Result;
use crate::subscale::sum_subscale_contributions;
use crate::types::{AssessmentPurpose, Moment, Recognition};

/// Maps selected choices to subscale contributions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscoveryStrategy;

impl DiscoveryStrategy {
    pub const ID: &'static str = "discovery";
}

/// Whether a widget has been left untouched.
///
/// Input that carries no recognizable interaction shape counts as answered.
pub fn is_unanswered(widget_type: &str, input: Option<&UserInput>) -> bool {
    match input {
        None | Some(UserInput::Other(Value::Null)) => true,
        Some(UserInput::Radio(radio)) => !radio.has_selection(),
        Some(UserInput::Dropdown(dropdown)) => dropdown.value == 0,
        Some(UserInput::NumericInput(numeric)) | Some(UserInput::InputNumber(numeric)) => {
            numeric.current_value.trim().is_empty()
        }
        Some(UserInput::Orderer(orderer)) => orderer.current.is_empty(),
        Some(UserInput::Sorter(sorter)) => sorter.options.is_empty(),
        Some(UserInput::Other(raw)) if widget_type == "expression" => raw
            .get("value")
            .and_then(Value::as_str)
            .map_or(true, |value| value.trim().is_empty()),
        Some(_) => false,
    }
}

impl ScoringStrategy for DiscoveryStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Discovery Assessment"
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
            .filter(|(id, widget)| is_unanswered(&widget.widget_type, inputs.get(id.as_str())))
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn recognize(
        &self,
        moment: &Moment,
        inputs: &UserInputMap,
        _ctx: &ScoreContext<'_>,
    ) -> Result<Recognition> {
        let resonance = moment
            .subscale_contributions
            .as_ref()
            .map(|mappings| sum_subscale_contributions(mappings, inputs))
            .unwrap_or_default();

        Ok(
            Recognition::new(moment.id.clone(), AssessmentPurpose::Discovery, inputs.clone())
                .with_resonance(resonance),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use perseus_score::widgets::dropdown::DropdownUserInput;
    use perseus_score::widgets::radio::RadioUserInput;
    use perseus_score::WidgetRegistry;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn content() -> PerseusRenderer {
        serde_json::from_value(json!({
            "content": "[[☃ radio 1]] [[☃ dropdown 1]] [[☃ image 1]]",
            "widgets": {
                "radio 1": {
                    "type": "radio",
                    "options": {"choices": [{"content": "Explore"}, {"content": "Plan"}]}
                },
                "dropdown 1": {
                    "type": "dropdown",
                    "options": {"placeholder": "", "choices": [{"content": "Often"}, {"content": "Rarely"}]}
                },
                "image 1": {"type": "image", "static": true, "options": {}}
            },
            "images": {}
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_widgets_skip_static() {
        let widgets = WidgetRegistry::with_builtin_widgets();
        let ctx = ScoreContext::new(&widgets, "en");
        let content = content();

        assert_eq!(
            DiscoveryStrategy.empty_widget_ids(&content, &UserInputMap::new(), &ctx),
            vec!["radio 1", "dropdown 1"]
        );

        let inputs: UserInputMap = [
            ("radio 1".to_string(), UserInput::radio_choices(["choice-1"])),
            ("dropdown 1".to_string(), UserInput::Dropdown(DropdownUserInput { value: 0 })),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            DiscoveryStrategy.empty_widget_ids(&content, &inputs, &ctx),
            vec!["dropdown 1"]
        );
    }

    #[test]
    fn test_no_widgets_requires_nothing() {
        let widgets = WidgetRegistry::with_builtin_widgets();
        let ctx = ScoreContext::new(&widgets, "en");
        let content = PerseusRenderer::new("Just text");
        assert!(DiscoveryStrategy
            .empty_widget_ids(&content, &UserInputMap::new(), &ctx)
            .is_empty());
    }

    #[test]
    fn test_unanswered_rules() {
        let unflagged = UserInput::Radio(RadioUserInput {
            selected_choice_ids: None,
            choices_selected: Some(vec![false, false]),
        });
        assert!(is_unanswered("radio", Some(&unflagged)));
        assert!(is_unanswered("numeric-input", Some(&UserInput::numeric("  "))));
        assert!(!is_unanswered("input-number", Some(&UserInput::input_number("4"))));
        assert!(is_unanswered("expression", Some(&UserInput::Other(json!({"value": ""})))));
        assert!(!is_unanswered("plotter", Some(&UserInput::Other(json!({"values": []})))));
        assert!(!is_unanswered("free-response", Some(&UserInput::free_text(""))));
    }

    #[test]
    fn test_resonance_from_selected_choice() {
        let widgets = WidgetRegistry::with_builtin_widgets();
        let ctx = ScoreContext::new(&widgets, "en");
        let mappings = serde_json::from_value(json!({
            "radio 1": {
                "choice-0": {"openness": 1},
                "choice-1": {"conscientiousness": 1}
            }
        }))
        .unwrap();
        let moment = Moment::discovery("d1", content(), mappings);
        let inputs: UserInputMap = [("radio 1".to_string(), UserInput::radio_choices(["choice-0"]))]
            .into_iter()
            .collect();

        let recognition = DiscoveryStrategy.recognize(&moment, &inputs, &ctx).unwrap();
        let resonance = recognition.resonance.as_ref().unwrap();

        let expected: IndexMap<String, f64> = [("openness".to_string(), 1.0)].into_iter().collect();
        assert_eq!(resonance.subscale_contributions, expected);
        assert_eq!(resonance.selected_choice_ids, Some(vec!["choice-0".to_string()]));
        assert_eq!(recognition.purpose, AssessmentPurpose::Discovery);
        assert!(recognition.mastery.is_none());
        assert!(DiscoveryStrategy.widget_scorer().is_none());
    }

    #[test]
    fn test_moment_without_mappings_resonates_with_nothing() {
        let widgets = WidgetRegistry::with_builtin_widgets();
        let ctx = ScoreContext::new(&widgets, "en");
        let moment = Moment::new("d2", AssessmentPurpose::Discovery, content());
        let inputs: UserInputMap = [("radio 1".to_string(), UserInput::radio_choices(["choice-0"]))]
            .into_iter()
            .collect();

        let recognition = DiscoveryStrategy.recognize(&moment, &inputs, &ctx).unwrap();
        assert!(!recognition.has_resonance());
        assert!(recognition.resonance.is_some());
    }
}
