//! Free-response widget: open text, reviewed by a person rather than scored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::{InputValidator, ScoreContext, WidgetLogic};
use crate::types::{Score, UserInput, WidgetOptions};

fn default_character_limit() -> usize {
    500
}

/// One point a reviewer looks for in the response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringCriterion {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeResponseWidgetOptions {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub allow_unlimited_characters: bool,
    #[serde(default = "default_character_limit")]
    pub character_limit: usize,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub scoring_criteria: Vec<ScoringCriterion>,
}

impl Default for FreeResponseWidgetOptions {
    fn default() -> Self {
        Self {
            question: String::new(),
            allow_unlimited_characters: false,
            character_limit: default_character_limit(),
            placeholder: String::new(),
            scoring_criteria: vec![ScoringCriterion::default()],
        }
    }
}

impl FreeResponseWidgetOptions {
    /// Whether `text` fits the configured limit, counted in characters.
    pub fn within_limit(&self, text: &str) -> bool {
        self.allow_unlimited_characters || text.chars().count() <= self.character_limit
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreeResponseUserInput {
    #[serde(default)]
    pub content: String,
}

pub fn validate_free_response(
    input: Option<&FreeResponseUserInput>,
    options: &FreeResponseWidgetOptions,
) -> Option<Score> {
    match input {
        Some(input) if !input.content.trim().is_empty() && options.within_limit(&input.content) => {
            None
        }
        _ => Some(Score::invalid()),
    }
}

/// Widget logic for `free-response`. Validated, never scored.
pub struct FreeResponseWidget;

impl InputValidator for FreeResponseWidget {
    fn validate(
        &self,
        input: Option<&UserInput>,
        options: &WidgetOptions,
        _ctx: &ScoreContext<'_>,
    ) -> Option<Score> {
        let input = match input {
            Some(UserInput::FreeResponse(text)) => Some(text),
            _ => None,
        };
        match options {
            WidgetOptions::FreeResponse(free_response) => {
                validate_free_response(input, free_response)
            }
            _ => Some(Score::invalid()),
        }
    }
}

impl WidgetLogic for FreeResponseWidget {
    fn name(&self) -> &str {
        "free-response"
    }

    fn validator(&self) -> Option<&dyn InputValidator> {
        Some(self)
    }

    fn default_options(&self) -> Value {
        serde_json::to_value(FreeResponseWidgetOptions::default()).unwrap_or_default()
    }

    fn accessible(&self) -> bool {
        true
    }
}
