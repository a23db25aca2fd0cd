//! Score aggregation over a content tree.
//!
//! Each widget is scored by the scorer its type resolves to in the registry.
//! Widgets that are static, missing from the map, or have no scorer are left
//! out. Per-widget scores then fold into one: points add up, and a single
//! invalid widget makes the whole item invalid.

use indexmap::IndexMap;
use tracing::trace;

use crate::error::Result;
use crate::registry::ScoreContext;
use crate::types::{PerseusRenderer, Score, UserInputMap, WidgetsMap};

/// Score the listed widgets, keyed by widget ID in the order given.
pub fn score_widgets(
    widgets: &WidgetsMap,
    widget_ids: &[String],
    inputs: &UserInputMap,
    ctx: &ScoreContext<'_>,
) -> Result<IndexMap<String, Score>> {
    let mut scores = IndexMap::new();

    for id in widget_ids {
        let Some(widget) = widgets.get(id) else {
            continue;
        };
        if widget.is_static {
            continue;
        }
        let Some(scorer) = ctx.registry.scorer(&widget.widget_type) else {
            continue;
        };

        let score = scorer.score(inputs.get(id), &widget.options, ctx)?;
        trace!(widget_id = %id, widget_type = %widget.widget_type, ?score, "Scored widget");
        scores.insert(id.clone(), score);
    }

    Ok(scores)
}

/// Combine two scores.
///
/// Points add up and keep the first message. Invalid wins over points; two
/// invalid scores keep both messages.
pub fn combine_scores(a: Score, b: Score) -> Score {
    match (a, b) {
        (
            Score::Points {
                earned: earned_a,
                total: total_a,
                message: message_a,
            },
            Score::Points {
                earned: earned_b,
                total: total_b,
                message: message_b,
            },
        ) => Score::Points {
            earned: earned_a + earned_b,
            total: total_a + total_b,
            message: message_a.or(message_b),
        },
        (Score::Invalid { message: message_a }, Score::Invalid { message: message_b }) => {
            let message = match (message_a, message_b) {
                (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => Some(format!("{a} {b}")),
                (Some(a), _) if !a.is_empty() => Some(a),
                (_, b) => b,
            };
            Score::Invalid { message }
        }
        (invalid @ Score::Invalid { .. }, Score::Points { .. })
        | (Score::Points { .. }, invalid @ Score::Invalid { .. }) => invalid,
    }
}

/// Fold per-widget scores into one. No widgets at all is worth 0 of 0.
pub fn flatten_scores(scores: &IndexMap<String, Score>) -> Score {
    scores.values().cloned().fold(
        Score::Points {
            earned: 0.0,
            total: 0.0,
            message: None,
        },
        combine_scores,
    )
}

/// Score every scoreable widget of an item and fold the result.
pub fn score_perseus_item(
    item: &PerseusRenderer,
    inputs: &UserInputMap,
    ctx: &ScoreContext<'_>,
) -> Result<Score> {
    let ids = item.scoreable_widget_ids();
    let scores = score_widgets(&item.widgets, &ids, inputs, ctx)?;
    Ok(flatten_scores(&scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::WidgetRegistry;
    use crate::types::{UserInput, WidgetInfo, WidgetOptions};
    use crate::widgets::dropdown::{DropdownChoice, DropdownUserInput, DropdownWidgetOptions};
    use serde_json::json;

    fn points(earned: f64, total: f64) -> Score {
        Score::Points {
            earned,
            total,
            message: None,
        }
    }

    fn dropdown(correct_index: usize) -> WidgetInfo {
        let choices = (0..3)
            .map(|i| DropdownChoice {
                content: format!("choice {i}"),
                correct: i == correct_index,
            })
            .collect();
        WidgetInfo::new(WidgetOptions::Dropdown(DropdownWidgetOptions {
            choices,
            ..Default::default()
        }))
    }

    fn pick(value: usize) -> UserInput {
        UserInput::Dropdown(DropdownUserInput { value })
    }

    #[test]
    fn test_combine_points() {
        assert_eq!(combine_scores(points(1.0, 1.0), points(0.0, 2.0)), points(1.0, 3.0));
    }

    #[test]
    fn test_invalid_wins() {
        let invalid = Score::Invalid {
            message: Some("nope".to_string()),
        };
        assert_eq!(combine_scores(points(1.0, 1.0), invalid.clone()), invalid);
        assert_eq!(combine_scores(invalid.clone(), points(1.0, 1.0)), invalid);
    }

    #[test]
    fn test_invalid_messages_are_joined() {
        let a = Score::Invalid {
            message: Some("first".to_string()),
        };
        let b = Score::Invalid {
            message: Some("second".to_string()),
        };
        assert_eq!(combine_scores(a, b).message(), Some("first second"));
        assert_eq!(combine_scores(Score::invalid(), Score::invalid()), Score::invalid());
    }

    #[test]
    fn test_flatten_empty_is_zero_of_zero() {
        assert_eq!(flatten_scores(&IndexMap::new()), points(0.0, 0.0));
    }

    #[test]
    fn test_score_item_sums_widgets() {
        let registry = WidgetRegistry::with_builtin_widgets();
        let ctx = ScoreContext::new(&registry, "en");
        let item = PerseusRenderer::new("[[☃ dropdown 1]] [[☃ dropdown 2]]")
            .with_widget("dropdown 1", dropdown(0))
            .with_widget("dropdown 2", dropdown(2));

        let mut inputs = UserInputMap::new();
        inputs.insert("dropdown 1".to_string(), pick(1));
        inputs.insert("dropdown 2".to_string(), pick(1));
        assert_eq!(score_perseus_item(&item, &inputs, &ctx).unwrap(), points(1.0, 2.0));

        inputs.shift_remove("dropdown 2");
        assert!(score_perseus_item(&item, &inputs, &ctx).unwrap().is_invalid());
    }

    #[test]
    fn test_static_and_unregistered_widgets_are_skipped() {
        let registry = WidgetRegistry::with_builtin_widgets();
        let ctx = ScoreContext::new(&registry, "en");
        let item = PerseusRenderer::new("")
            .with_widget("dropdown 1", dropdown(0))
            .with_widget("dropdown 2", dropdown(0).as_static())
            .with_widget(
                "image 1",
                WidgetInfo {
                    widget_type: "image".to_string(),
                    options: WidgetOptions::Other(json!({"url": "a.png"})),
                    is_static: false,
                    alignment: None,
                },
            );

        let mut inputs = UserInputMap::new();
        inputs.insert("dropdown 1".to_string(), pick(1));

        let ids: Vec<String> = item.widgets.keys().cloned().collect();
        let scores = score_widgets(&item.widgets, &ids, &inputs, &ctx).unwrap();
        assert_eq!(scores.keys().collect::<Vec<_>>(), vec!["dropdown 1"]);
        assert_eq!(score_perseus_item(&item, &inputs, &ctx).unwrap(), Score::correct());
    }
}
