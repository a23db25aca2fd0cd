//! Which widgets are still unanswered.
//!
//! A widget is empty when its validator returns an invalid score without a
//! message. Static widgets and widgets without a validator are never empty.

use crate::registry::ScoreContext;
use crate::types::{PerseusRenderer, Score, UserInputMap, WidgetsMap};

/// IDs of the listed widgets the learner has not answered, in the order given.
pub fn empty_widget_ids(
    widgets: &WidgetsMap,
    widget_ids: &[String],
    inputs: &UserInputMap,
    ctx: &ScoreContext<'_>,
) -> Vec<String> {
    widget_ids
        .iter()
        .filter(|id| {
            let Some(widget) = widgets.get(id.as_str()) else {
                return false;
            };
            if widget.is_static {
                return false;
            }
            ctx.registry
                .validator(&widget.widget_type)
                .and_then(|validator| validator.validate(inputs.get(id.as_str()), &widget.options, ctx))
                .is_some_and(|score| score.is_empty())
        })
        .cloned()
        .collect()
}

/// Unanswered widgets of a whole content tree, in widget-map order.
pub fn content_empty_widget_ids(
    content: &PerseusRenderer,
    inputs: &UserInputMap,
    ctx: &ScoreContext<'_>,
) -> Vec<String> {
    empty_widget_ids(&content.widgets, &content.scoreable_widget_ids(), inputs, ctx)
}

/// `None` when every widget is answered, otherwise an empty score.
pub fn validate_user_input(
    content: &PerseusRenderer,
    inputs: &UserInputMap,
    ctx: &ScoreContext<'_>,
) -> Option<Score> {
    if content_empty_widget_ids(content, inputs, ctx).is_empty() {
        None
    } else {
        Some(Score::invalid())
    }
}
