//! Core types for Perseus content, learner input and scores.
//!
//! Widget options and learner input are closed enums with one variant per
//! interactive widget. Content documents arrive as JSON, so both enums are
//! decoded against the widget's `type` string rather than by guessing shapes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ScoreError};
use crate::widgets::dropdown::{DropdownUserInput, DropdownWidgetOptions};
use crate::widgets::free_response::{FreeResponseUserInput, FreeResponseWidgetOptions};
use crate::widgets::graded_group::GradedGroupWidgetOptions;
use crate::widgets::input_number::InputNumberWidgetOptions;
use crate::widgets::interactive_graph::{GraphState, InteractiveGraphWidgetOptions};
use crate::widgets::numeric_input::NumericInputWidgetOptions;
use crate::widgets::orderer::{OrdererUserInput, OrdererWidgetOptions};
use crate::widgets::radio::{RadioUserInput, RadioWidgetOptions};
use crate::widgets::sorter::{SorterUserInput, SorterWidgetOptions};

/// A 2D coordinate `[x, y]`.
pub type Coord = [f64; 2];

/// Widget ID to widget configuration, in document order.
pub type WidgetsMap = IndexMap<String, WidgetInfo>;

/// Widget ID to the learner's input for that widget.
pub type UserInputMap = IndexMap<String, UserInput>;

// ============================================================================
// Scores
// ============================================================================

/// Outcome of scoring one widget or a whole item.
///
/// `Invalid` means the widget could not be graded (no input, or input that
/// could not be understood). It is distinct from a wrong answer, which is
/// `Points` with `earned == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Score {
    /// Graded: `earned` out of `total`, with `earned <= total`
    Points {
        earned: f64,
        total: f64,
        message: Option<String>,
    },
    /// Not gradeable
    Invalid { message: Option<String> },
}

impl Score {
    /// Full credit for a single-point widget.
    pub fn correct() -> Self {
        Self::Points {
            earned: 1.0,
            total: 1.0,
            message: None,
        }
    }

    /// No credit for a single-point widget.
    pub fn incorrect() -> Self {
        Self::Points {
            earned: 0.0,
            total: 1.0,
            message: None,
        }
    }

    /// Ungradeable without a message.
    pub fn invalid() -> Self {
        Self::Invalid { message: None }
    }

    /// Single-point score from a correctness flag.
    pub fn from_correct(correct: bool) -> Self {
        if correct {
            Self::correct()
        } else {
            Self::incorrect()
        }
    }

    /// Replace the message.
    pub fn with_message(self, message: Option<String>) -> Self {
        match self {
            Self::Points { earned, total, .. } => Self::Points {
                earned,
                total,
                message,
            },
            Self::Invalid { .. } => Self::Invalid { message },
        }
    }

    /// Whether this score is `Invalid`.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }

    /// Invalid with no explanation, meaning the learner has not answered.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Invalid { message } => message.as_deref().map_or(true, str::is_empty),
            Self::Points { .. } => false,
        }
    }

    /// Whether every available point was earned.
    pub fn is_full_credit(&self) -> bool {
        matches!(self, Self::Points { earned, total, .. } if earned == total)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Points { message, .. } | Self::Invalid { message } => message.as_deref(),
        }
    }
}

// ============================================================================
// Content
// ============================================================================

/// How a widget is laid out relative to surrounding text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    Default,
    Block,
    InlineBlock,
    Inline,
    FullWidth,
    WrapLeft,
    WrapRight,
}

/// A renderable content tree: markdown plus the widgets it embeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerseusRenderer {
    /// Markdown with `[[☃ widget-id]]` placeholders
    #[serde(default)]
    pub content: String,
    /// Widgets referenced by the content
    #[serde(default)]
    pub widgets: WidgetsMap,
    /// Image metadata keyed by URL
    #[serde(default)]
    pub images: IndexMap<String, Value>,
}

impl PerseusRenderer {
    /// Content with the given markdown and no widgets.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Builder: add a widget.
    pub fn with_widget(mut self, id: impl Into<String>, widget: WidgetInfo) -> Self {
        self.widgets.insert(id.into(), widget);
        self
    }

    /// IDs of widgets that take part in scoring, in widget-map order.
    pub fn scoreable_widget_ids(&self) -> Vec<String> {
        self.widgets
            .iter()
            .filter(|(_, widget)| !widget.is_static)
            .map(|(id, _)| id.clone())
            .collect()
    }
}

/// A hint shown after a learner asks for help.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    #[serde(flatten)]
    pub renderer: PerseusRenderer,
    /// Whether this hint replaces the previous one
    #[serde(default)]
    pub replace: bool,
}

/// One widget in a content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWidget")]
pub struct WidgetInfo {
    /// Widget type name, e.g. `radio` or `interactive-graph`
    #[serde(rename = "type")]
    pub widget_type: String,
    /// Type-specific options; for scored widgets this is the rubric
    pub options: WidgetOptions,
    /// Static widgets are display-only and never scored or required
    #[serde(rename = "static", default)]
    pub is_static: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

impl WidgetInfo {
    /// Widget with options whose type name is derived from the variant.
    pub fn new(options: WidgetOptions) -> Self {
        Self {
            widget_type: options.widget_type().to_string(),
            options,
            is_static: false,
            alignment: None,
        }
    }

    /// Builder: mark the widget static.
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// Wire form of a widget before its options are decoded.
#[derive(Deserialize)]
struct RawWidget {
    #[serde(rename = "type")]
    widget_type: String,
    #[serde(default)]
    options: Value,
    #[serde(rename = "static", default)]
    is_static: bool,
    #[serde(default)]
    alignment: Option<Alignment>,
}

impl TryFrom<RawWidget> for WidgetInfo {
    type Error = serde_json::Error;

    fn try_from(raw: RawWidget) -> std::result::Result<Self, Self::Error> {
        let options = WidgetOptions::decode(&raw.widget_type, raw.options)?;
        Ok(Self {
            widget_type: raw.widget_type,
            options,
            is_static: raw.is_static,
            alignment: raw.alignment,
        })
    }
}

/// Options for each widget type that takes part in scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WidgetOptions {
    Radio(RadioWidgetOptions),
    Dropdown(DropdownWidgetOptions),
    NumericInput(NumericInputWidgetOptions),
    InputNumber(InputNumberWidgetOptions),
    Sorter(SorterWidgetOptions),
    Orderer(OrdererWidgetOptions),
    InteractiveGraph(InteractiveGraphWidgetOptions),
    Group(PerseusRenderer),
    GradedGroup(GradedGroupWidgetOptions),
    FreeResponse(FreeResponseWidgetOptions),
    /// Display widgets and types this crate does not know
    Other(Value),
}

impl WidgetOptions {
    /// Decode raw options for the given widget type.
    pub fn decode(widget_type: &str, options: Value) -> std::result::Result<Self, serde_json::Error> {
        // Absent options decode as the type's serde defaults.
        let options = if options.is_null() {
            Value::Object(Default::default())
        } else {
            options
        };

        Ok(match widget_type {
            "radio" => Self::Radio(serde_json::from_value(options)?),
            "dropdown" => Self::Dropdown(serde_json::from_value(options)?),
            "numeric-input" => Self::NumericInput(serde_json::from_value(options)?),
            "input-number" => Self::InputNumber(serde_json::from_value(options)?),
            "sorter" => Self::Sorter(serde_json::from_value(options)?),
            "orderer" => Self::Orderer(serde_json::from_value(options)?),
            "interactive-graph" => Self::InteractiveGraph(serde_json::from_value(options)?),
            "group" => Self::Group(serde_json::from_value(options)?),
            "graded-group" => Self::GradedGroup(serde_json::from_value(options)?),
            "free-response" => Self::FreeResponse(serde_json::from_value(options)?),
            _ => Self::Other(options),
        })
    }

    /// Canonical type name for the variant; `Other` reports `"unknown"`.
    pub fn widget_type(&self) -> &'static str {
        match self {
            Self::Radio(_) => "radio",
            Self::Dropdown(_) => "dropdown",
            Self::NumericInput(_) => "numeric-input",
            Self::InputNumber(_) => "input-number",
            Self::Sorter(_) => "sorter",
            Self::Orderer(_) => "orderer",
            Self::InteractiveGraph(_) => "interactive-graph",
            Self::Group(_) => "group",
            Self::GradedGroup(_) => "graded-group",
            Self::FreeResponse(_) => "free-response",
            Self::Other(_) => "unknown",
        }
    }

    /// The nested content tree of a group or graded group.
    pub fn nested_content(&self) -> Option<&PerseusRenderer> {
        match self {
            Self::Group(renderer) => Some(renderer),
            Self::GradedGroup(options) => Some(&options.renderer),
            _ => None,
        }
    }
}

// ============================================================================
// Learner input
// ============================================================================

/// Text typed into a numeric widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericUserInput {
    #[serde(default)]
    pub current_value: String,
}

/// The learner's input for one widget.
///
/// Serializes to the same untagged shape the rendering layer produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UserInput {
    Radio(RadioUserInput),
    Dropdown(DropdownUserInput),
    NumericInput(NumericUserInput),
    InputNumber(NumericUserInput),
    Sorter(SorterUserInput),
    Orderer(OrdererUserInput),
    InteractiveGraph(GraphState),
    Group(UserInputMap),
    FreeResponse(FreeResponseUserInput),
    Other(Value),
}

impl UserInput {
    /// Decode raw input for a widget, using the widget's options to pick the shape.
    pub fn decode(widget: &WidgetInfo, raw: Value) -> Result<Self> {
        Ok(match &widget.options {
            WidgetOptions::Radio(_) => Self::Radio(serde_json::from_value(raw)?),
            WidgetOptions::Dropdown(_) => Self::Dropdown(serde_json::from_value(raw)?),
            WidgetOptions::NumericInput(_) => Self::NumericInput(serde_json::from_value(raw)?),
            WidgetOptions::InputNumber(_) => Self::InputNumber(serde_json::from_value(raw)?),
            WidgetOptions::Sorter(_) => Self::Sorter(serde_json::from_value(raw)?),
            WidgetOptions::Orderer(_) => Self::Orderer(serde_json::from_value(raw)?),
            WidgetOptions::InteractiveGraph(_) => {
                Self::InteractiveGraph(serde_json::from_value(raw)?)
            }
            WidgetOptions::Group(renderer) => {
                Self::Group(decode_user_input_map(&renderer.widgets, raw)?)
            }
            WidgetOptions::GradedGroup(options) => {
                Self::Group(decode_user_input_map(&options.renderer.widgets, raw)?)
            }
            WidgetOptions::FreeResponse(_) => Self::FreeResponse(serde_json::from_value(raw)?),
            WidgetOptions::Other(_) => Self::Other(raw),
        })
    }

    /// Radio input selecting the given choice IDs.
    pub fn radio_choices<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Radio(RadioUserInput {
            selected_choice_ids: Some(ids.into_iter().map(Into::into).collect()),
            choices_selected: None,
        })
    }

    /// Numeric-input text.
    pub fn numeric(text: impl Into<String>) -> Self {
        Self::NumericInput(NumericUserInput {
            current_value: text.into(),
        })
    }

    /// Input-number text.
    pub fn input_number(text: impl Into<String>) -> Self {
        Self::InputNumber(NumericUserInput {
            current_value: text.into(),
        })
    }

    /// Free-response text.
    pub fn free_text(text: impl Into<String>) -> Self {
        Self::FreeResponse(FreeResponseUserInput {
            content: text.into(),
        })
    }
}

/// Decode a raw `{widgetId: input}` object against a widget map.
///
/// Inputs for IDs the map does not contain are kept as [`UserInput::Other`].
/// `null` entries are dropped, matching a widget that was never touched.
pub fn decode_user_input_map(widgets: &WidgetsMap, raw: Value) -> Result<UserInputMap> {
    let entries = match raw {
        Value::Object(entries) => entries,
        Value::Null => return Ok(UserInputMap::new()),
        other => {
            let error = <serde_json::Error as serde::de::Error>::custom(format!(
                "expected an object of widget inputs, got {other}"
            ));
            return Err(ScoreError::Decode(error));
        }
    };

    let mut inputs = UserInputMap::with_capacity(entries.len());
    for (widget_id, value) in entries {
        if value.is_null() {
            continue;
        }
        let input = match widgets.get(&widget_id) {
            Some(widget) => UserInput::decode(widget, value)?,
            None => UserInput::Other(value),
        };
        inputs.insert(widget_id, input);
    }
    Ok(inputs)
}
