//! Aggregation across moments.
//!
//! Resonance is summed subscale by subscale, never averaged, so aggregates
//! of disjoint sets of recognitions can be merged by adding their totals.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{AggregatedMastery, AggregatedResonance, Recognition};

/// Relative lead the top subscale needs to count as clearly primary.
pub const DEFAULT_CLEAR_PRIMARY_THRESHOLD: f64 = 0.2;

/// One subscale's place in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscaleRanking {
    pub subscale: String,
    pub total: f64,
    /// Total relative to the largest, 0 when unknown
    pub normalized: f64,
}

/// Sum resonance across recognitions. Recognitions without resonance are skipped.
pub fn aggregate_resonance<'a, I>(recognitions: I) -> AggregatedResonance
where
    I: IntoIterator<Item = &'a Recognition>,
{
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    let mut moment_count = 0;

    for resonance in recognitions.into_iter().filter_map(|r| r.resonance.as_ref()) {
        moment_count += 1;
        add_into(&mut totals, &resonance.subscale_contributions);
    }

    summarize(totals, moment_count)
}

/// Combine aggregates by adding their totals and moment counts.
pub fn merge_aggregated_resonance<'a, I>(results: I) -> AggregatedResonance
where
    I: IntoIterator<Item = &'a AggregatedResonance>,
{
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    let mut moment_count = 0;

    for result in results {
        moment_count += result.moment_count;
        add_into(&mut totals, &result.subscale_totals);
    }

    summarize(totals, moment_count)
}

fn add_into(totals: &mut IndexMap<String, f64>, contributions: &IndexMap<String, f64>) {
    for (subscale, amount) in contributions {
        *totals.entry(subscale.clone()).or_insert(0.0) += amount;
    }
}

fn summarize(totals: IndexMap<String, f64>, moment_count: usize) -> AggregatedResonance {
    // Only a positive total can be primary; the first one seen wins ties.
    let mut primary = "";
    let mut max = 0.0;
    for (subscale, total) in &totals {
        if *total > max {
            max = *total;
            primary = subscale.as_str();
        }
    }

    AggregatedResonance {
        primary_subscale: primary.to_string(),
        normalized_scores: Some(normalize_scores(&totals)),
        subscale_totals: totals,
        moment_count,
    }
}

/// Each total divided by the largest.
///
/// Empty when there is no positive total. Negative totals become 0.
pub fn normalize_scores(totals: &IndexMap<String, f64>) -> IndexMap<String, f64> {
    let max = totals.values().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= 0.0 {
        return IndexMap::new();
    }
    totals
        .iter()
        .map(|(subscale, total)| (subscale.clone(), (total / max).max(0.0)))
        .collect()
}

/// Subscales from highest to lowest total. Equal totals keep their order.
pub fn subscale_rankings(aggregated: &AggregatedResonance) -> Vec<SubscaleRanking> {
    let mut rankings: Vec<SubscaleRanking> = aggregated
        .subscale_totals
        .iter()
        .map(|(subscale, total)| SubscaleRanking {
            subscale: subscale.clone(),
            total: *total,
            normalized: aggregated
                .normalized_scores
                .as_ref()
                .and_then(|scores| scores.get(subscale))
                .copied()
                .unwrap_or(0.0),
        })
        .collect();
    rankings.sort_by(|a, b| b.total.total_cmp(&a.total));
    rankings
}

/// Whether one subscale stands out from the rest.
///
/// A lone subscale always does. Otherwise the top total must lead the second
/// by at least `threshold` of itself.
pub fn has_clear_primary(aggregated: &AggregatedResonance, threshold: f64) -> bool {
    let rankings = subscale_rankings(aggregated);
    match rankings.as_slice() {
        [] => false,
        [_] => true,
        [first, second, ..] => {
            if first.total == 0.0 {
                return false;
            }
            (first.total - second.total) / first.total >= threshold
        }
    }
}

/// A one-sentence summary of what resonates, using display labels where given.
pub fn create_insight_message(
    aggregated: &AggregatedResonance,
    labels: Option<&IndexMap<String, String>>,
    threshold: f64,
) -> String {
    let rankings = subscale_rankings(aggregated);
    let label = |subscale: &str| -> String {
        labels
            .and_then(|labels| labels.get(subscale))
            .cloned()
            .unwrap_or_else(|| subscale.to_string())
    };

    match rankings.as_slice() {
        [] => "Complete more discovery moments to reveal your affinities.".to_string(),
        [only] => format!(
            "Your responses resonate most strongly with {}.",
            label(&only.subscale)
        ),
        [first, second, ..] => {
            let (primary, secondary) = (label(&first.subscale), label(&second.subscale));
            if has_clear_primary(aggregated, threshold) {
                format!(
                    "Your responses resonate most strongly with {primary}, with secondary interest in {secondary}."
                )
            } else {
                format!("Your responses show strong resonance with both {primary} and {secondary}.")
            }
        }
    }
}

/// Track mastery across recognitions, in the order they happened.
///
/// Recognitions without a mastery result neither count nor break a streak.
pub fn aggregate_mastery<'a, I>(recognitions: I, target_streak: usize) -> AggregatedMastery
where
    I: IntoIterator<Item = &'a Recognition>,
{
    let mut total_moments = 0;
    let mut demonstrated_count = 0;
    let mut current_streak = 0;

    for mastery in recognitions.into_iter().filter_map(|r| r.mastery.as_ref()) {
        total_moments += 1;
        if mastery.demonstrated {
            demonstrated_count += 1;
            current_streak += 1;
        } else {
            current_streak = 0;
        }
    }

    let mastery_percentage = if total_moments == 0 {
        0
    } else {
        (demonstrated_count as f64 / total_moments as f64 * 100.0).round() as u32
    };

    AggregatedMastery {
        total_moments,
        demonstrated_count,
        mastery_percentage,
        current_streak,
        target_streak,
        streak_achieved: current_streak >= target_streak,
    }
}
