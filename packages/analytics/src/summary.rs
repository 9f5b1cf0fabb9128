//! Run summary for downstream recommendation text generation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use dengue_watch_analytics_models::{
    AnalysisOutcome, DeathPriorityAlert, NeighborhoodStatus, Pattern, PatternAlert, StatusSummary,
};
use dengue_watch_neighborhood::normalize::neighborhood_key;

/// Combines resolved pattern alerts with death priority results.
///
/// `pattern_counts` has an entry for every pattern, zero included.
/// Neighborhoods are ordered by pattern priority, highest first, keeping
/// the order of `patterns` among equals.
#[must_use]
pub fn summarize_status(
    as_of: NaiveDate,
    patterns: &[PatternAlert],
    deaths: &[AnalysisOutcome<DeathPriorityAlert>],
) -> StatusSummary {
    let deaths_by_key: BTreeMap<String, u64> = deaths
        .iter()
        .filter_map(AnalysisOutcome::as_per_neighborhood)
        .map(|alert| (neighborhood_key(&alert.neighborhood), alert.deaths))
        .collect();

    let mut pattern_counts: BTreeMap<Pattern, usize> =
        Pattern::all().iter().map(|pattern| (*pattern, 0)).collect();

    let mut neighborhoods: Vec<NeighborhoodStatus> = patterns
        .iter()
        .map(|alert| {
            *pattern_counts.entry(alert.pattern).or_default() += 1;
            NeighborhoodStatus {
                neighborhood: alert.neighborhood.clone(),
                pattern: alert.pattern,
                alert_text: alert.alert_text.clone(),
                recent_deaths: deaths_by_key
                    .get(&neighborhood_key(&alert.neighborhood))
                    .copied()
                    .unwrap_or(0),
            }
        })
        .collect();
    neighborhoods.sort_by_key(|status| std::cmp::Reverse(status.pattern.priority()));

    StatusSummary {
        as_of,
        pattern_counts,
        neighborhoods,
    }
}
