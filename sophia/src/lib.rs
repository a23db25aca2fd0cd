//! Sophia - person-centered recognition for Perseus moments
//!
//! A moment is assessed through one of four lenses, and a strategy turns the
//! learner's input into a recognition through that lens:
//!
//! - **Mastery**: graded; did the learner earn every point?
//! - **Discovery**: psychometric; which subscales do the chosen answers feed?
//! - **Reflection**: ungraded; what did the learner share?
//! - **Invitation**: whatever the registry's default strategy makes of it
//!
//! # Key Components
//!
//! - [`StrategyRegistry`]: strategies by ID, dispatched by purpose
//! - [`ScoringStrategy`]: the contract a strategy fulfils
//! - [`aggregate`]: resonance and mastery summed across many recognitions
//! - [`SophiaConfig`]: default strategy, locale and aggregation settings
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Moment (purpose, content, subscale mappings) + UserInputMap  │
//! │          │                                                    │
//! │   ┌──────▼──────────┐                                         │
//! │   │StrategyRegistry │── for_purpose ──┐                       │
//! │   └─────────────────┘                 │                       │
//! │        ┌──────────────┬───────────────┼──────────────┐        │
//! │   ┌────▼────┐   ┌─────▼─────┐   ┌─────▼──────┐  ┌────▼───┐    │
//! │   │ Mastery │   │ Discovery │   │ Reflection │  │ No-op  │    │
//! │   └────┬────┘   └─────┬─────┘   └─────┬──────┘  └────┬───┘    │
//! │  perseus-score   subscale sums    text + sums        │        │
//! │        └──────────────┴───────┬───────┴──────────────┘        │
//! │                          Recognition                          │
//! │                               │                               │
//! │                  aggregate_resonance / aggregate_mastery      │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use perseus_score::{decode_user_input_map, PerseusRenderer, ScoreContext, WidgetRegistry};
//! use sophia::{aggregate_resonance, Moment, StrategyRegistry};
//!
//! let content: PerseusRenderer = serde_json::from_value(serde_json::json!({
//!     "content": "[[☃ radio 1]]",
//!     "widgets": {
//!         "radio 1": {"type": "radio", "options": {"choices": [
//!             {"content": "Explore"}, {"content": "Plan"}
//!         ]}}
//!     },
//!     "images": {}
//! })).unwrap();
//! let mappings = serde_json::from_value(serde_json::json!({
//!     "radio 1": {"choice-0": {"openness": 1}, "choice-1": {"conscientiousness": 1}}
//! })).unwrap();
//! let moment = Moment::discovery("d1", content, mappings);
//!
//! let widgets = WidgetRegistry::with_builtin_widgets();
//! let ctx = ScoreContext::new(&widgets, "en");
//! let strategies = StrategyRegistry::with_builtin_strategies();
//!
//! let inputs = decode_user_input_map(
//!     &moment.content.widgets,
//!     serde_json::json!({"radio 1": {"selectedChoiceIds": ["choice-0"]}}),
//! ).unwrap();
//! let recognition = strategies.recognize(&moment, &inputs, &ctx).unwrap();
//! assert_eq!(recognition.primary_subscale(), Some("openness"));
//!
//! let aggregated = aggregate_resonance(&[recognition]);
//! assert_eq!(aggregated.primary_subscale, "openness");
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod strategy;
pub mod subscale;
pub mod types;

// Re-export main types
pub use aggregate::{
    aggregate_mastery, aggregate_resonance, create_insight_message, has_clear_primary,
    merge_aggregated_resonance, normalize_scores, subscale_rankings, SubscaleRanking,
    DEFAULT_CLEAR_PRIMARY_THRESHOLD,
};
pub use config::{AggregationConfig, SophiaConfig};
pub use error::{Result, SophiaError};
pub use strategy::{
    DiscoveryStrategy, MasteryStrategy, NoOpStrategy, ReflectionStrategy, ScoringStrategy,
    StrategyRegistry, WidgetScorer, WidgetScoringResult,
};
pub use subscale::{selected_choice_keys, sum_subscale_contributions};
pub use types::*;
