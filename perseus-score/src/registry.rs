//! Widget registry: what each widget type knows how to do.
//!
//! Each widget type is described by a [`WidgetLogic`] implementation that
//! optionally exposes a [`Scorer`] and an [`InputValidator`]. The registry is
//! an ordinary value built once at startup (usually with
//! [`WidgetRegistry::with_builtin_widgets`]) and passed to every scoring
//! entry point through a [`ScoreContext`].
//!
//! Lookups for unknown widget types never fail. They fall back to "not
//! scoreable", identity public options, empty default options, and the
//! `default` alignment.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

use crate::error::Result;
use crate::types::{Alignment, Score, UserInput, WidgetInfo, WidgetOptions};
use crate::widgets;

/// Everything a scorer or validator may need beyond its own inputs.
#[derive(Clone, Copy)]
pub struct ScoreContext<'a> {
    /// Registry used to resolve nested widgets in groups
    pub registry: &'a WidgetRegistry,
    /// Locale of the learner, for number formatting
    pub locale: &'a str,
}

impl<'a> ScoreContext<'a> {
    pub fn new(registry: &'a WidgetRegistry, locale: &'a str) -> Self {
        Self { registry, locale }
    }
}

/// Grades learner input against a widget's rubric.
///
/// Missing input (`None`) or input of the wrong shape must produce
/// [`Score::Invalid`], never an error. Errors are reserved for rubrics that
/// lack the data needed to grade at all. Implementations must not mutate
/// their arguments.
pub trait Scorer: Send + Sync {
    fn score(
        &self,
        input: Option<&UserInput>,
        options: &WidgetOptions,
        ctx: &ScoreContext<'_>,
    ) -> Result<Score>;
}

/// Decides whether input is complete enough to be scored.
///
/// Returns `None` when the input may be scored, or an invalid [`Score`]
/// explaining why not. An invalid score without a message means "empty".
pub trait InputValidator: Send + Sync {
    fn validate(
        &self,
        input: Option<&UserInput>,
        options: &WidgetOptions,
        ctx: &ScoreContext<'_>,
    ) -> Option<Score>;
}

/// Behavior of one widget type.
pub trait WidgetLogic: Send + Sync {
    /// Widget type name, e.g. `"radio"`
    fn name(&self) -> &str;

    /// Scorer, if the widget is graded
    fn scorer(&self) -> Option<&dyn Scorer> {
        None
    }

    /// Validator, if the widget can be left unanswered
    fn validator(&self) -> Option<&dyn InputValidator> {
        None
    }

    /// Options safe to send to a learner's device: answers removed.
    fn public_options(&self, options: &WidgetOptions) -> Result<Value> {
        Ok(serde_json::to_value(options)?)
    }

    /// Options a newly authored widget starts with.
    fn default_options(&self) -> Value {
        Value::Object(Default::default())
    }

    fn default_alignment(&self) -> Option<Alignment> {
        None
    }

    fn supported_alignments(&self) -> Vec<Alignment> {
        vec![Alignment::Default]
    }

    /// Whether the widget is usable with assistive technology.
    fn accessible(&self) -> bool {
        false
    }
}

/// Registry of widget behaviors keyed by widget type.
#[derive(Clone, Default)]
pub struct WidgetRegistry {
    widgets: IndexMap<String, Arc<dyn WidgetLogic>>,
}

impl WidgetRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated with every built-in widget.
    pub fn with_builtin_widgets() -> Self {
        let mut registry = Self::new();
        for logic in widgets::builtin_widgets() {
            registry.register(logic);
        }
        registry
    }

    /// Register a widget type. Registering a type again replaces it.
    pub fn register(&mut self, logic: Arc<dyn WidgetLogic>) {
        let name = logic.name().to_string();
        if self.widgets.contains_key(&name) {
            warn!(widget_type = %name, "Widget type already registered, overwriting");
        }
        self.widgets.insert(name, logic);
    }

    /// Get the logic for a widget type
    pub fn get(&self, widget_type: &str) -> Option<&dyn WidgetLogic> {
        self.widgets.get(widget_type).map(|logic| logic.as_ref())
    }

    /// Check if a widget type is registered
    pub fn is_registered(&self, widget_type: &str) -> bool {
        self.widgets.contains_key(widget_type)
    }

    /// Registered widget types, in registration order
    pub fn widget_types(&self) -> Vec<&str> {
        self.widgets.keys().map(String::as_str).collect()
    }

    pub fn scorer(&self, widget_type: &str) -> Option<&dyn Scorer> {
        self.get(widget_type).and_then(|logic| logic.scorer())
    }

    pub fn validator(&self, widget_type: &str) -> Option<&dyn InputValidator> {
        self.get(widget_type).and_then(|logic| logic.validator())
    }

    /// Public options for a widget; unregistered types are passed through.
    pub fn public_widget_options(&self, widget: &WidgetInfo) -> Result<Value> {
        match self.get(&widget.widget_type) {
            Some(logic) => logic.public_options(&widget.options),
            None => Ok(serde_json::to_value(&widget.options)?),
        }
    }

    pub fn default_widget_options(&self, widget_type: &str) -> Value {
        self.get(widget_type)
            .map(|logic| logic.default_options())
            .unwrap_or_else(|| Value::Object(Default::default()))
    }

    pub fn default_alignment(&self, widget_type: &str) -> Option<Alignment> {
        self.get(widget_type).and_then(|logic| logic.default_alignment())
    }

    pub fn supported_alignments(&self, widget_type: &str) -> Vec<Alignment> {
        self.get(widget_type)
            .map(|logic| logic.supported_alignments())
            .unwrap_or_else(|| vec![Alignment::Default])
    }

    pub fn is_accessible(&self, widget_type: &str) -> bool {
        self.get(widget_type).is_some_and(|logic| logic.accessible())
    }
}

impl std::fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("widgets", &self.widget_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct AlwaysCorrect;

    impl Scorer for AlwaysCorrect {
        fn score(
            &self,
            _input: Option<&UserInput>,
            _options: &WidgetOptions,
            _ctx: &ScoreContext<'_>,
        ) -> Result<Score> {
            Ok(Score::correct())
        }
    }

    struct Custom;

    impl WidgetLogic for Custom {
        fn name(&self) -> &str {
            "custom"
        }

        fn scorer(&self) -> Option<&dyn Scorer> {
            Some(&AlwaysCorrect)
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = WidgetRegistry::new();
        assert!(!registry.is_registered("custom"));

        registry.register(Arc::new(Custom));
        assert!(registry.is_registered("custom"));
        assert!(registry.scorer("custom").is_some());
        assert!(registry.validator("custom").is_none());
        assert_eq!(registry.widget_types(), vec!["custom"]);
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut registry = WidgetRegistry::new();
        registry.register(Arc::new(Custom));
        registry.register(Arc::new(Custom));
        assert_eq!(registry.widget_types().len(), 1);
    }

    #[test]
    fn test_fallbacks_for_unknown_types() {
        let registry = WidgetRegistry::new();
        let widget = WidgetInfo::new(WidgetOptions::Other(json!({"url": "a.png"})));

        assert!(registry.scorer("image").is_none());
        assert_eq!(registry.public_widget_options(&widget).unwrap(), json!({"url": "a.png"}));
        assert_eq!(registry.default_widget_options("image"), json!({}));
        assert_eq!(registry.supported_alignments("image"), vec![Alignment::Default]);
        assert!(!registry.is_accessible("image"));
    }

    #[test]
    fn test_builtin_widgets_are_scoreable() {
        let registry = WidgetRegistry::with_builtin_widgets();
        for widget_type in [
            "radio",
            "dropdown",
            "numeric-input",
            "input-number",
            "sorter",
            "orderer",
            "interactive-graph",
            "group",
            "graded-group",
        ] {
            assert!(registry.scorer(widget_type).is_some(), "{widget_type}");
        }
        assert!(registry.scorer("free-response").is_none());
        assert!(registry.validator("free-response").is_some());
    }
}
