//! Parsing and matching of typed numeric answers.
//!
//! Shared by the `numeric-input` and `input-number` widgets.

pub mod answer_types;
pub mod locale;
pub mod matcher;
pub mod tex;

pub use answer_types::InputNumberAnswerType;
pub use locale::decimal_separator;
pub use matcher::{AnswerForm, NumberCheck, NumberMatcher, Simplify};
pub use tex::parse_tex;
