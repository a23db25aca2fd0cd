//! Scoring strategies.
//!
//! A strategy decides which widgets must be answered before a moment can be
//! submitted, and what to recognize in the answers once it is. Strategies are
//! registered by ID in a [`StrategyRegistry`] and picked by a moment's
//! purpose.

pub mod discovery;
pub mod mastery;
pub mod reflection;
pub mod registry;

use serde::{Deserialize, Serialize};

use perseus_score::{PerseusRenderer, Score, ScoreContext, UserInput, UserInputMap, WidgetInfo};

use crate::error::Result;
use crate::types::{AssessmentPurpose, Moment, Recognition};

pub use discovery::DiscoveryStrategy;
pub use mastery::MasteryStrategy;
pub use reflection::ReflectionStrategy;
pub use registry::StrategyRegistry;

/// How one assessment purpose treats learner input.
pub trait ScoringStrategy: Send + Sync {
    /// Registry key, e.g. `"mastery"`
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Widgets that still need an answer before the moment can be submitted.
    fn empty_widget_ids(
        &self,
        content: &PerseusRenderer,
        inputs: &UserInputMap,
        ctx: &ScoreContext<'_>,
    ) -> Vec<String>;

    /// Recognize the learner's response to a moment.
    ///
    /// Fails only when the moment's content cannot be scored at all.
    fn recognize(
        &self,
        moment: &Moment,
        inputs: &UserInputMap,
        ctx: &ScoreContext<'_>,
    ) -> Result<Recognition>;

    /// Live per-widget feedback, for strategies that grade.
    fn widget_scorer(&self) -> Option<&dyn WidgetScorer> {
        None
    }
}

/// Grades a single widget while the learner is still working.
pub trait WidgetScorer: Send + Sync {
    /// `None` when the widget's type has no scorer.
    fn score_widget(
        &self,
        widget_id: &str,
        widget: &WidgetInfo,
        input: Option<&UserInput>,
        ctx: &ScoreContext<'_>,
    ) -> Result<Option<WidgetScoringResult>>;
}

/// Feedback for one widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetScoringResult {
    pub widget_id: String,
    #[serde(rename = "perseusScore")]
    pub score: Score,
    /// Whether the score reflects correctness
    pub is_scoreable: bool,
}

/// Strategy that requires nothing and judges nothing.
///
/// Registered by default so that a registry always has something to fall
/// back on.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStrategy;

impl NoOpStrategy {
    pub const ID: &'static str = "noop";
}

impl ScoringStrategy for NoOpStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Reflection (No Scoring)"
    }

    fn empty_widget_ids(
        &self,
        _content: &PerseusRenderer,
        _inputs: &UserInputMap,
        _ctx: &ScoreContext<'_>,
    ) -> Vec<String> {
        Vec::new()
    }

    fn recognize(
        &self,
        moment: &Moment,
        inputs: &UserInputMap,
        _ctx: &ScoreContext<'_>,
    ) -> Result<Recognition> {
        Ok(Recognition::new(
            moment.id.clone(),
            AssessmentPurpose::Reflection,
            inputs.clone(),
        ))
    }
}
