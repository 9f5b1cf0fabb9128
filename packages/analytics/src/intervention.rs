//! Intervention effectivity.
//!
//! Compares a neighborhood's weekly case totals in the weeks before an
//! intervention with the weeks from the intervention's week onward. The
//! intervention's own week counts as "after".

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use dengue_watch_analytics_models::{
    AnalysisOutcome, InterventionConfig, InterventionEffectivityResult, WeekWindow,
};
use dengue_watch_case_models::CaseRecord;

use crate::aggregate::{NeighborhoodIndex, aggregate_weekly_totals};
use crate::calendar::{compute_week_windows, monday_of, weeks_forward};
use crate::dataset::{CaseSource, load_for_analysis};

/// Percentage change from `before` to `after`, rounded to two decimals.
///
/// No cases before and none after is 0%; no cases before and some after
/// is clamped to 100%.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage_change(before: u64, after: u64) -> f64 {
    let change = match (before, after) {
        (0, 0) => 0.0,
        (0, _) => 100.0,
        _ => (after as f64 - before as f64) / before as f64 * 100.0,
    };
    (change * 100.0).round() / 100.0
}

/// Evaluates an intervention in `neighborhood` on `intervention_date`.
///
/// Uses `config.weeks` windows on each side. A neighborhood without any
/// records yields all-zero totals. An empty or unreadable dataset yields
/// [`AnalysisOutcome::DataUnavailable`].
#[must_use]
pub fn evaluate(
    neighborhood: &str,
    intervention_date: NaiveDate,
    source: &CaseSource<'_>,
    config: &InterventionConfig,
) -> AnalysisOutcome<InterventionEffectivityResult> {
    let records = match load_for_analysis(source) {
        Ok(records) => records,
        Err(reason) => return AnalysisOutcome::unavailable(reason),
    };

    let index = NeighborhoodIndex::build(&records);
    let cases = index.get(neighborhood);
    if cases.is_none() {
        log::warn!("No case records for '{neighborhood}'; intervention totals will be zero");
    }
    let matching = cases.map(|c| c.records.as_slice()).unwrap_or_default();

    let monday = monday_of(intervention_date);
    let before_windows = monday
        .checked_sub_days(Days::new(7))
        .map(|previous| compute_week_windows(previous, config.weeks))
        .unwrap_or_default();
    let after_windows = weeks_forward(monday, config.weeks);

    let before = labelled_totals(matching, &before_windows);
    let after = labelled_totals(matching, &after_windows);
    let totals_before: u64 = before.values().sum();
    let totals_after: u64 = after.values().sum();
    let change = percentage_change(totals_before, totals_after);

    log::info!(
        "Intervention in {neighborhood} on {intervention_date}: \
         {totals_before} case(s) before, {totals_after} after ({change:+.2}%)"
    );

    AnalysisOutcome::PerNeighborhood(InterventionEffectivityResult {
        neighborhood: cases.map_or_else(|| neighborhood.trim().to_string(), |c| c.name.clone()),
        intervention_date,
        before,
        after,
        percentage_change: change,
        totals_before,
        totals_after,
    })
}

fn labelled_totals(records: &[&CaseRecord], windows: &[WeekWindow]) -> BTreeMap<String, u64> {
    aggregate_weekly_totals(records.iter().copied(), windows)
        .into_iter()
        .map(|total| (total.window.label(), total.total))
        .collect()
}
