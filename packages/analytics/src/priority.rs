//! Pattern priority resolution.
//!
//! Merges the output of all detectors into exactly one alert per
//! neighborhood. Every known neighborhood starts with a "no alerts"
//! entry, and a detector alert replaces the stored entry only when its
//! pattern's priority is strictly higher, so among equal priorities the
//! first alert processed wins.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use dengue_watch_analytics_models::{AnalysisConfig, AnalysisOutcome, PatternAlert};
use dengue_watch_neighborhood::normalize::neighborhood_key;

use crate::aggregate::NeighborhoodIndex;
use crate::dataset::{CaseSource, load_for_analysis};
use crate::patterns::{DetectorOutput, detect_all};

/// Resolves detector outputs to one alert per neighborhood.
///
/// The result lists `known` neighborhoods first, in the given order and
/// spelling, followed by any neighborhood that only appears in detector
/// output. Data-unavailable outputs are ignored.
#[must_use]
pub fn resolve_patterns(outputs: &[DetectorOutput], known: &[String]) -> Vec<PatternAlert> {
    let mut resolved: Vec<PatternAlert> = Vec::with_capacity(known.len());
    let mut positions: BTreeMap<String, usize> = BTreeMap::new();

    for name in known {
        let key = neighborhood_key(name);
        if key.is_empty() || positions.contains_key(&key) {
            continue;
        }
        positions.insert(key, resolved.len());
        resolved.push(PatternAlert::no_alerts(name.trim()));
    }

    for output in outputs {
        let AnalysisOutcome::PerNeighborhood(alert) = output else {
            continue;
        };

        let key = neighborhood_key(&alert.neighborhood);
        let position = *positions.entry(key).or_insert_with(|| {
            log::warn!(
                "Neighborhood '{}' has case data but is not a known neighborhood",
                alert.neighborhood
            );
            resolved.push(PatternAlert::no_alerts(&alert.neighborhood));
            resolved.len() - 1
        });

        let current = &mut resolved[position];
        if alert.pattern.priority() > current.pattern.priority() {
            current.pattern = alert.pattern;
            current.alert_text.clone_from(&alert.alert_text);
            current.recommendation.clone_from(&alert.recommendation);
        }
    }

    resolved
}

/// Runs every detector over `source` and resolves the results.
///
/// Returns one alert per known neighborhood, or a single
/// [`AnalysisOutcome::DataUnavailable`] when the dataset is empty or
/// cannot be read.
#[must_use]
pub fn analyze_patterns(
    source: &CaseSource<'_>,
    known: &[String],
    config: &AnalysisConfig,
    today: NaiveDate,
) -> Vec<AnalysisOutcome<PatternAlert>> {
    let records = match load_for_analysis(source) {
        Ok(records) => records,
        Err(reason) => {
            log::warn!("Pattern analysis skipped: {reason}");
            return vec![AnalysisOutcome::unavailable(reason)];
        }
    };

    let index = NeighborhoodIndex::build(&records);
    let outputs = detect_all(&index, config, today);

    let resolved = resolve_patterns(&outputs, known);
    log::info!(
        "Resolved patterns for {} neighborhood(s) as of {today}",
        resolved.len()
    );
    resolved
        .into_iter()
        .map(AnalysisOutcome::PerNeighborhood)
        .collect()
}
