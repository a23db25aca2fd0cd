//! Item scoring integration tests: JSON content in, one score out

use perseus_score::{
    content_empty_widget_ids, decode_user_input_map, score_perseus_item, score_widgets,
    PerseusRenderer, Score, ScoreContext, UserInput, WidgetOptions, WidgetRegistry,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn item() -> PerseusRenderer {
    serde_json::from_value(json!({
        "content": "[[☃ radio 1]]\n\n[[☃ numeric-input 1]]\n\n[[☃ sorter 1]]\n\n[[☃ group 1]]\n\n[[☃ image 1]]",
        "images": {},
        "widgets": {
            "radio 1": {
                "type": "radio",
                "options": {
                    "choices": [
                        {"content": "Three", "correct": true},
                        {"content": "Four"},
                        {"content": "Five"}
                    ]
                }
            },
            "numeric-input 1": {
                "type": "numeric-input",
                "options": {
                    "answers": [
                        {"value": 0.5, "status": "correct", "simplify": "required", "strict": false, "maxError": null}
                    ],
                    "coefficient": false
                }
            },
            "sorter 1": {
                "type": "sorter",
                "options": {"correct": ["x", "y", "z"], "padding": true, "layout": "horizontal"}
            },
            "group 1": {
                "type": "group",
                "options": {
                    "content": "[[☃ dropdown 1]]",
                    "widgets": {
                        "dropdown 1": {
                            "type": "dropdown",
                            "options": {
                                "placeholder": "pick",
                                "choices": [
                                    {"content": "less", "correct": false},
                                    {"content": "more", "correct": true}
                                ]
                            }
                        }
                    },
                    "images": {}
                }
            },
            "image 1": {
                "type": "image",
                "static": true,
                "options": {"backgroundImage": {"url": "https://example.org/a.png"}}
            }
        }
    }))
    .expect("valid item")
}

fn inputs(item: &PerseusRenderer, raw: Value) -> perseus_score::UserInputMap {
    decode_user_input_map(&item.widgets, raw).expect("valid input")
}

fn all_correct() -> Value {
    json!({
        "radio 1": {"selectedChoiceIds": ["choice-0"]},
        "numeric-input 1": {"currentValue": "1/2"},
        "sorter 1": {"options": ["x", "y", "z"], "changed": true},
        "group 1": {"dropdown 1": {"value": 2}}
    })
}

#[test]
fn test_all_correct_item() {
    let registry = WidgetRegistry::with_builtin_widgets();
    let ctx = ScoreContext::new(&registry, "en");
    let item = item();

    let score = score_perseus_item(&item, &inputs(&item, all_correct()), &ctx).unwrap();
    assert_eq!(
        score,
        Score::Points {
            earned: 4.0,
            total: 4.0,
            message: None
        }
    );
}

#[test]
fn test_partial_credit() {
    let registry = WidgetRegistry::with_builtin_widgets();
    let ctx = ScoreContext::new(&registry, "en");
    let item = item();

    let mut raw = all_correct();
    raw["sorter 1"] = json!({"options": ["z", "y", "x"], "changed": true});
    raw["group 1"] = json!({"dropdown 1": {"value": 1}});

    let inputs = inputs(&item, raw);
    let scores = score_widgets(&item.widgets, &item.scoreable_widget_ids(), &inputs, &ctx).unwrap();
    assert_eq!(scores["sorter 1"], Score::incorrect());
    assert_eq!(scores["group 1"], Score::incorrect());
    assert!(!scores.contains_key("image 1"));

    let score = score_perseus_item(&item, &inputs, &ctx).unwrap();
    assert_eq!(
        score,
        Score::Points {
            earned: 2.0,
            total: 4.0,
            message: None
        }
    );
}

#[test]
fn test_unanswered_widget_makes_item_invalid() {
    let registry = WidgetRegistry::with_builtin_widgets();
    let ctx = ScoreContext::new(&registry, "en");
    let item = item();

    let mut raw = all_correct();
    raw["numeric-input 1"] = json!({"currentValue": ""});
    let inputs = inputs(&item, raw);

    assert!(score_perseus_item(&item, &inputs, &ctx).unwrap().is_invalid());
    assert_eq!(content_empty_widget_ids(&item, &inputs, &ctx), vec!["numeric-input 1"]);
}

#[test]
fn test_empty_widgets_in_document_order() {
    let registry = WidgetRegistry::with_builtin_widgets();
    let ctx = ScoreContext::new(&registry, "en");
    let item = item();

    let empty = content_empty_widget_ids(&item, &inputs(&item, json!({})), &ctx);
    assert_eq!(
        empty,
        vec!["radio 1", "numeric-input 1", "sorter 1", "group 1"]
    );
}

#[test]
fn test_input_for_unknown_widget_is_kept_raw() {
    let item = item();
    let decoded = inputs(&item, json!({"mystery 1": {"anything": true}}));
    assert_eq!(
        decoded["mystery 1"],
        UserInput::Other(json!({"anything": true}))
    );
}

#[test]
fn test_unsimplified_fraction_carries_message() {
    let registry = WidgetRegistry::with_builtin_widgets();
    let ctx = ScoreContext::new(&registry, "en");
    let item = item();

    let mut raw = all_correct();
    raw["numeric-input 1"] = json!({"currentValue": "2/4"});
    let inputs = inputs(&item, raw);
    let scores = score_widgets(&item.widgets, &item.scoreable_widget_ids(), &inputs, &ctx).unwrap();

    let numeric = &scores["numeric-input 1"];
    assert!(numeric.is_invalid());
    assert!(numeric.message().is_some_and(|m| m.contains("simplified")));
}

#[test]
fn test_public_options_hide_answers() {
    let registry = WidgetRegistry::with_builtin_widgets();
    let item = item();

    let radio = registry.public_widget_options(&item.widgets["radio 1"]).unwrap();
    for choice in radio["choices"].as_array().unwrap() {
        assert!(choice.get("correct").is_none());
    }

    let sorter = registry.public_widget_options(&item.widgets["sorter 1"]).unwrap();
    assert!(sorter.get("correct").is_none());
    assert_eq!(sorter["cards"], json!(["x", "y", "z"]));

    let numeric = registry.public_widget_options(&item.widgets["numeric-input 1"]).unwrap();
    assert!(numeric.get("answers").is_none());

    let image = registry.public_widget_options(&item.widgets["image 1"]).unwrap();
    assert_eq!(image, json!({"backgroundImage": {"url": "https://example.org/a.png"}}));
}

#[test]
fn test_nested_widgets_keep_document_order() {
    let registry = WidgetRegistry::with_builtin_widgets();
    let ctx = ScoreContext::new(&registry, "en");
    let radio = json!({"type": "radio", "options": {"choices": [{"content": "A", "correct": true}]}});
    let item: PerseusRenderer = serde_json::from_value(json!({
        "content": "[[☃ group 1]]",
        "images": {},
        "widgets": {
            "group 1": {
                "type": "group",
                "options": {
                    "content": "[[☃ radio 2]] [[☃ radio 10]]",
                    "images": {},
                    "widgets": {"radio 2": radio.clone(), "radio 10": radio}
                }
            }
        }
    }))
    .expect("valid item");

    let WidgetOptions::Group(nested) = &item.widgets["group 1"].options else {
        panic!("group options decode as nested content");
    };
    let ids: Vec<&str> = nested.widgets.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["radio 2", "radio 10"]);
    assert_eq!(
        content_empty_widget_ids(nested, &Default::default(), &ctx),
        vec!["radio 2", "radio 10"]
    );

    let decoded = inputs(
        &item,
        json!({"group 1": {"radio 2": {"selectedChoiceIds": []}, "radio 10": {"selectedChoiceIds": []}}}),
    );
    let UserInput::Group(group_inputs) = &decoded["group 1"] else {
        panic!("group input decodes as a nested map");
    };
    let input_ids: Vec<&str> = group_inputs.keys().map(String::as_str).collect();
    assert_eq!(input_ids, vec!["radio 2", "radio 10"]);
}
