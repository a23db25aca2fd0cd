//! Perseus Score - widget scoring for Perseus content
//!
//! Grades a learner's input against the rubric held in a content tree:
//!
//! - **Typed content**: widget options and learner input decoded per widget type
//! - **Widget registry**: scorer, validator and public options for each type
//! - **Empty-input pass**: which widgets are still unanswered
//! - **Aggregation**: per-widget scores folded into one item score
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  PerseusRenderer + UserInputMap                              │
//! │          │                                                   │
//! │   ┌──────▼───────┐   ┌──────────────────┐                    │
//! │   │ score_widgets│──▶│  WidgetRegistry  │                    │
//! │   └──────┬───────┘   │  radio, sorter,  │                    │
//! │          │           │  numeric, graph, │◀── groups recurse  │
//! │   ┌──────▼───────┐   │  group, ...      │                    │
//! │   │flatten_scores│   └──────────────────┘                    │
//! │   └──────┬───────┘                                           │
//! │          ▼                                                   │
//! │        Score (points earned / total, or invalid)             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use perseus_score::{score_perseus_item, PerseusRenderer, ScoreContext, UserInput,
//!     UserInputMap, WidgetInfo, WidgetOptions, WidgetRegistry};
//! use perseus_score::widgets::sorter::SorterWidgetOptions;
//!
//! let item = PerseusRenderer::new("[[☃ sorter 1]]").with_widget(
//!     "sorter 1",
//!     WidgetInfo::new(WidgetOptions::Sorter(SorterWidgetOptions::default())),
//! );
//! let registry = WidgetRegistry::with_builtin_widgets();
//! let ctx = ScoreContext::new(&registry, "en");
//!
//! let inputs: UserInputMap = [(
//!     "sorter 1".to_string(),
//!     UserInput::decode(&item.widgets["sorter 1"], serde_json::json!({
//!         "options": ["$x$", "$y$", "$z$"],
//!         "changed": true
//!     })).unwrap(),
//! )]
//! .into_iter()
//! .collect();
//!
//! let score = score_perseus_item(&item, &inputs, &ctx).unwrap();
//! assert!(score.is_full_credit());
//! ```

pub mod error;
pub mod math;
pub mod numeric;
pub mod registry;
pub mod score;
pub mod types;
pub mod validate;
pub mod widgets;

// Re-export main types
pub use error::{Result, ScoreError};
pub use registry::{InputValidator, ScoreContext, Scorer, WidgetLogic, WidgetRegistry};
pub use score::{combine_scores, flatten_scores, score_perseus_item, score_widgets};
pub use types::*;
pub use validate::{content_empty_widget_ids, empty_widget_ids, validate_user_input};
