//! Subscale summation for discovery and reflection.
//!
//! Choices are addressed by key: a radio choice by its ID (or `choice-{index}`
//! when only selection flags were recorded), a dropdown entry by
//! `choice-{value}` where `value` is the 1-based entry the learner picked.

use indexmap::IndexMap;
use serde_json::Value;

use perseus_score::widgets::radio::synthesized_choice_id;
use perseus_score::{UserInput, UserInputMap};

use crate::types::{ResonanceResult, SubscaleMappings};

/// Keys of the choices a learner selected in one widget.
///
/// Input without a notion of choices yields nothing.
pub fn selected_choice_keys(input: &UserInput) -> Vec<String> {
    match input {
        UserInput::Radio(radio) => match &radio.selected_choice_ids {
            Some(ids) if !ids.is_empty() => ids.clone(),
            _ => radio
                .selected_indices()
                .into_iter()
                .map(synthesized_choice_id)
                .collect(),
        },
        UserInput::Dropdown(dropdown) if dropdown.value != 0 => {
            vec![format!("choice-{}", dropdown.value)]
        }
        UserInput::Other(raw) => raw_choice_keys(raw),
        _ => Vec::new(),
    }
}

/// Same extraction for input whose widget was not in the content.
fn raw_choice_keys(raw: &Value) -> Vec<String> {
    if let Some(ids) = raw.get("selectedChoiceIds").and_then(Value::as_array) {
        let ids: Vec<String> = ids
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        if !ids.is_empty() {
            return ids;
        }
    }
    if let Some(flags) = raw.get("choicesSelected").and_then(Value::as_array) {
        return flags
            .iter()
            .enumerate()
            .filter(|(_, flag)| flag.as_bool() == Some(true))
            .map(|(index, _)| synthesized_choice_id(index))
            .collect();
    }
    match raw.get("value") {
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => vec![format!("choice-{n}")],
        Some(Value::String(s)) if !s.is_empty() && s != "0" => vec![format!("choice-{s}")],
        _ => Vec::new(),
    }
}

/// Sum the contributions of every selected choice, walking inputs in order.
///
/// Widgets without a mapping are ignored, as are selected choices the
/// mapping does not mention. Contributions to the same subscale from
/// different widgets or choices add up.
pub fn sum_subscale_contributions(
    mappings: &SubscaleMappings,
    inputs: &UserInputMap,
) -> ResonanceResult {
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    let mut selected = Vec::new();

    for (widget_id, input) in inputs {
        let Some(choice_map) = mappings.get(widget_id) else {
            continue;
        };

        for key in selected_choice_keys(input) {
            if let Some(contribution) = choice_map.get(&key) {
                for (subscale, amount) in contribution {
                    *totals.entry(subscale.clone()).or_insert(0.0) += amount;
                }
            }
            selected.push(key);
        }
    }

    ResonanceResult {
        subscale_contributions: totals,
        selected_choice_ids: (!selected.is_empty()).then_some(selected),
        confidence: None,
    }
}
