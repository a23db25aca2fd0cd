//! Core types for recognition.
//!
//! A [`Moment`] is one assessment interaction; a [`Recognition`] is what a
//! strategy makes of the learner's input to it. Which result a recognition
//! carries depends on the moment's [`AssessmentPurpose`].
//!
//! With the `typescript` feature enabled, result types can be exported to
//! TypeScript using ts-rs.

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use perseus_score::{Hint, PerseusRenderer, Score, UserInputMap};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Subscale name to contribution amount, conventionally 0 to 1.
pub type SubscaleContribution = IndexMap<String, f64>;

/// Choice key (e.g. `choice-0`) to the subscales that choice feeds.
pub type ChoiceSubscaleMap = IndexMap<String, SubscaleContribution>;

/// Widget ID to the subscale map for its choices.
pub type SubscaleMappings = IndexMap<String, ChoiceSubscaleMap>;

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

// ============================================================================
// Moments
// ============================================================================

/// The lens through which an interaction is viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum AssessmentPurpose {
    /// Did the learner demonstrate understanding?
    Mastery,
    /// What resonates with the learner?
    Discovery,
    /// What does the learner think about their learning?
    Reflection,
    /// What calls to the learner?
    Invitation,
}

impl AssessmentPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mastery => "mastery",
            Self::Discovery => "discovery",
            Self::Reflection => "reflection",
            Self::Invitation => "invitation",
        }
    }
}

impl std::fmt::Display for AssessmentPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracking metadata for a moment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Content this moment assesses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assesses_content_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time_seconds: Option<u32>,
    /// Anything else the authoring system attached
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// One assessment interaction: content plus the purpose it serves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Moment {
    pub id: String,
    pub purpose: AssessmentPurpose,
    pub content: PerseusRenderer,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
    /// Subscale contributions per widget and choice, for discovery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscale_contributions: Option<SubscaleMappings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MomentMetadata>,
}

impl Moment {
    /// Create a moment with the given purpose.
    pub fn new(id: impl Into<String>, purpose: AssessmentPurpose, content: PerseusRenderer) -> Self {
        Self {
            id: id.into(),
            purpose,
            content,
            hints: Vec::new(),
            subscale_contributions: None,
            metadata: None,
        }
    }

    /// A graded moment.
    pub fn mastery(id: impl Into<String>, content: PerseusRenderer) -> Self {
        Self::new(id, AssessmentPurpose::Mastery, content)
    }

    /// A psychometric moment whose choices feed subscales.
    pub fn discovery(
        id: impl Into<String>,
        content: PerseusRenderer,
        subscale_contributions: SubscaleMappings,
    ) -> Self {
        Self::new(id, AssessmentPurpose::Discovery, content)
            .with_subscale_contributions(subscale_contributions)
    }

    /// An ungraded moment that captures what the learner shares.
    pub fn reflection(id: impl Into<String>, content: PerseusRenderer) -> Self {
        Self::new(id, AssessmentPurpose::Reflection, content)
    }

    pub fn with_hints(mut self, hints: Vec<Hint>) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_subscale_contributions(mut self, mappings: SubscaleMappings) -> Self {
        self.subscale_contributions = Some(mappings);
        self
    }

    pub fn with_metadata(mut self, metadata: MomentMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn is_mastery(&self) -> bool {
        self.purpose == AssessmentPurpose::Mastery
    }

    pub fn is_discovery(&self) -> bool {
        self.purpose == AssessmentPurpose::Discovery
    }
}

// ============================================================================
// Results
// ============================================================================

/// Outcome of a graded moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct MasteryResult {
    /// True exactly when every point was earned
    pub demonstrated: bool,
    pub score: f64,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MasteryResult {
    /// Convert a score. An invalid score is 0 of 1, not demonstrated.
    pub fn from_score(score: &Score) -> Self {
        match score {
            Score::Points {
                earned,
                total,
                message,
            } => Self {
                demonstrated: earned == total,
                score: *earned,
                total: *total,
                message: message.clone(),
            },
            Score::Invalid { message } => Self {
                demonstrated: false,
                score: 0.0,
                total: 1.0,
                message: message.clone(),
            },
        }
    }

    /// Rounded percentage of points earned; 0 when there were none to earn.
    pub fn percentage(&self) -> u32 {
        if self.total <= 0.0 {
            return 0;
        }
        (self.score / self.total * 100.0).round().max(0.0) as u32
    }
}

/// Outcome of a discovery moment. Nothing here is right or wrong.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ResonanceResult {
    /// Summed contribution per subscale
    pub subscale_contributions: IndexMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_choice_ids: Option<Vec<String>>,
    /// Self-assessed confidence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl ResonanceResult {
    /// Subscale with the strictly greatest contribution; the first one wins ties.
    pub fn primary_subscale(&self) -> Option<&str> {
        let mut entries = self.subscale_contributions.iter();
        let (mut best, mut best_value) = entries.next()?;
        for (name, value) in entries {
            if value > best_value {
                best = name;
                best_value = value;
            }
        }
        Some(best.as_str())
    }

    pub fn has_contributions(&self) -> bool {
        !self.subscale_contributions.is_empty()
    }
}

/// Outcome of a reflection moment: what the learner shared.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ReflectionResult {
    #[cfg_attr(feature = "typescript", ts(type = "Record<string, unknown>"))]
    pub user_input: UserInputMap,
    /// Epoch milliseconds
    #[cfg_attr(feature = "typescript", ts(type = "number"))]
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscale_contributions: Option<IndexMap<String, f64>>,
    /// Free text the learner entered, one widget per line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
}

/// What a strategy recognized in the learner's response to a moment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Recognition {
    pub moment_id: String,
    pub purpose: AssessmentPurpose,
    #[cfg_attr(feature = "typescript", ts(type = "Record<string, unknown>"))]
    pub user_input: UserInputMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mastery: Option<MasteryResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resonance: Option<ResonanceResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflection: Option<ReflectionResult>,
    /// Epoch milliseconds
    #[cfg_attr(feature = "typescript", ts(type = "number"))]
    pub timestamp: i64,
}

impl Recognition {
    /// Recognition with no result yet, stamped now.
    pub fn new(
        moment_id: impl Into<String>,
        purpose: AssessmentPurpose,
        user_input: UserInputMap,
    ) -> Self {
        Self {
            moment_id: moment_id.into(),
            purpose,
            user_input,
            mastery: None,
            resonance: None,
            reflection: None,
            timestamp: now_millis(),
        }
    }

    pub fn with_mastery(mut self, mastery: MasteryResult) -> Self {
        self.mastery = Some(mastery);
        self
    }

    pub fn with_resonance(mut self, resonance: ResonanceResult) -> Self {
        self.resonance = Some(resonance);
        self
    }

    pub fn with_reflection(mut self, reflection: ReflectionResult) -> Self {
        self.reflection = Some(reflection);
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn has_demonstrated(&self) -> bool {
        self.mastery.as_ref().is_some_and(|m| m.demonstrated)
    }

    /// Rounded mastery percentage, 0 without a mastery result.
    pub fn mastery_percentage(&self) -> u32 {
        self.mastery.as_ref().map_or(0, MasteryResult::percentage)
    }

    /// Whether any subscale received a contribution.
    pub fn has_resonance(&self) -> bool {
        self.resonance
            .as_ref()
            .is_some_and(ResonanceResult::has_contributions)
    }

    pub fn primary_subscale(&self) -> Option<&str> {
        self.resonance.as_ref()?.primary_subscale()
    }
}

// ============================================================================
// Aggregates
// ============================================================================

/// Resonance summed across many moments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResonance {
    pub subscale_totals: IndexMap<String, f64>,
    /// Subscale with the highest total; empty when there are none
    pub primary_subscale: String,
    /// Recognitions that carried a resonance result
    pub moment_count: usize,
    /// Each total divided by the largest, in `[0, 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_scores: Option<IndexMap<String, f64>>,
}

/// Mastery tracked across many moments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct AggregatedMastery {
    /// Recognitions that carried a mastery result
    pub total_moments: usize,
    pub demonstrated_count: usize,
    /// 0 to 100
    pub mastery_percentage: u32,
    /// Consecutive demonstrations ending at the latest moment
    pub current_streak: usize,
    pub target_streak: usize,
    pub streak_achieved: bool,
}
