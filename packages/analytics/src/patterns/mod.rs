//! Epidemiological pattern detectors.
//!
//! Each detector looks at the most recent weekly totals of one
//! neighborhood and either recognizes its pattern or not. Detectors are
//! independent and side-effect free; [`crate::priority`] merges their
//! output once all of them have run.
//!
//! Every neighborhood present in the data gets exactly one output per
//! detector: the pattern alert, or an [`Pattern::Unclassified`] no-op
//! alert. An empty or unreadable dataset yields a single
//! [`AnalysisOutcome::DataUnavailable`].

pub mod cluster;
pub mod decline;
pub mod gradual_rise;
pub mod low_level;
pub mod regression;
pub mod spike;
pub mod stability;

use chrono::NaiveDate;
use dengue_watch_analytics_models::{
    AnalysisConfig, AnalysisOutcome, Pattern, PatternAlert, WeeklyTotal,
};

use crate::AnalyticsError;
use crate::aggregate::{NeighborhoodIndex, aggregate_weekly_totals};
use crate::calendar::compute_week_windows;
use crate::dataset::{CaseSource, load_for_analysis};

pub use decline::DeclineDetector;
pub use gradual_rise::GradualRiseDetector;
pub use low_level::LowLevelActivityDetector;
pub use spike::SpikeDetector;
pub use stability::StabilityDetector;

/// Output of a detector for one neighborhood, or the dataset failure.
pub type DetectorOutput = AnalysisOutcome<PatternAlert>;

/// A classifier for one epidemiological pattern.
pub trait PatternDetector {
    /// The pattern this detector recognizes.
    fn pattern(&self) -> Pattern;

    /// Number of most recent weeks the detector inspects.
    fn weeks(&self) -> usize;

    /// Classifies one neighborhood.
    ///
    /// `totals` has exactly [`PatternDetector::weeks`] entries, most
    /// recent week first. Returns `Ok(None)` if the pattern is absent.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError`] if the series cannot be analyzed; the
    /// neighborhood is then skipped.
    fn classify(
        &self,
        neighborhood: &str,
        totals: &[WeeklyTotal],
    ) -> Result<Option<PatternAlert>, AnalyticsError>;
}

/// Returns the five detectors in resolution order, spike first.
#[must_use]
pub fn detectors(config: &AnalysisConfig) -> Vec<Box<dyn PatternDetector>> {
    vec![
        Box::new(SpikeDetector::from_config(&config.spike)),
        Box::new(LowLevelActivityDetector),
        Box::new(GradualRiseDetector),
        Box::new(DeclineDetector),
        Box::new(StabilityDetector::from_config(&config.stability)),
    ]
}

/// Runs one detector over a case source anchored at `today`.
#[must_use]
pub fn detect(
    detector: &dyn PatternDetector,
    source: &CaseSource<'_>,
    today: NaiveDate,
) -> Vec<DetectorOutput> {
    match load_for_analysis(source) {
        Ok(records) => run_detector(detector, &NeighborhoodIndex::build(&records), today),
        Err(reason) => vec![AnalysisOutcome::unavailable(reason)],
    }
}

/// Runs one detector over an already indexed dataset.
#[must_use]
pub fn run_detector(
    detector: &dyn PatternDetector,
    index: &NeighborhoodIndex<'_>,
    today: NaiveDate,
) -> Vec<DetectorOutput> {
    if index.is_empty() {
        return vec![AnalysisOutcome::unavailable(
            AnalysisOutcome::<PatternAlert>::NO_DATA,
        )];
    }

    let pattern = detector.pattern();
    let windows = compute_week_windows(today, detector.weeks());
    let mut outputs = Vec::with_capacity(index.len());

    for cases in index.iter() {
        let totals = aggregate_weekly_totals(cases.records.iter().copied(), &windows);
        match detector.classify(&cases.name, &totals) {
            Ok(Some(alert)) => {
                log::debug!("{}: {pattern} detected", cases.name);
                outputs.push(AnalysisOutcome::PerNeighborhood(alert));
            }
            Ok(None) => {
                outputs.push(AnalysisOutcome::PerNeighborhood(PatternAlert::new(
                    &cases.name,
                    Pattern::Unclassified,
                    format!("No {} detected.", pattern.description()),
                )));
            }
            Err(e) => {
                log::warn!("Skipping {} in {pattern} detection: {e}", cases.name);
            }
        }
    }

    outputs
}

/// Runs every detector over one shared index, concatenating their
/// outputs in resolution order.
#[must_use]
pub fn detect_all(
    index: &NeighborhoodIndex<'_>,
    config: &AnalysisConfig,
    today: NaiveDate,
) -> Vec<DetectorOutput> {
    detectors(config)
        .iter()
        .flat_map(|detector| run_detector(detector.as_ref(), index, today))
        .collect()
}

/// Returns the weekly totals as plain counts, most recent first.
pub(crate) fn counts(totals: &[WeeklyTotal]) -> Vec<u64> {
    totals.iter().map(|t| t.total).collect()
}

/// Percentage change of `current` relative to `previous`, or 0 when
/// there is no base to compare against.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn relative_change(previous: u64, current: u64) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    (current as f64 - previous as f64) / previous as f64 * 100.0
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use dengue_watch_case_models::CaseRecord;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
    }

    /// Records for `name` with `counts[i]` cases in the week `i` weeks
    /// before `today()`.
    fn weekly_records(name: &str, counts: &[u32]) -> Vec<CaseRecord> {
        counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(i, count)| {
                let day = today() - Days::new(7 * i as u64);
                CaseRecord::cases(day, name, *count)
            })
            .collect()
    }

    #[test]
    fn every_neighborhood_gets_one_output_per_detector() {
        let mut records = weekly_records("A", &[9, 1, 1, 1]);
        records.extend(weekly_records("B", &[0, 0, 0, 0]));
        records.push(CaseRecord::cases(today() - Days::new(200), "B", 1));
        let index = NeighborhoodIndex::build(&records);

        for detector in detectors(&AnalysisConfig::default()) {
            let outputs = run_detector(detector.as_ref(), &index, today());
            let names: Vec<&str> = outputs
                .iter()
                .filter_map(|o| o.as_per_neighborhood())
                .map(|a| a.neighborhood.as_str())
                .collect();
            assert_eq!(names, ["A", "B"], "{} coverage", detector.pattern());
        }
    }

    #[test]
    fn non_matching_neighborhoods_get_noop_alerts() {
        let records = weekly_records("A", &[3, 3, 3, 3]);
        let outputs = detect(&SpikeDetector::default(), &CaseSource::Records(&records), today());
        assert_eq!(outputs.len(), 1);
        let alert = outputs[0].as_per_neighborhood().unwrap();
        assert_eq!(alert.pattern, Pattern::Unclassified);
        assert_eq!(alert.alert_text, "No spike detected.");
    }

    #[test]
    fn empty_dataset_yields_single_sentinel() {
        let records: Vec<CaseRecord> = Vec::new();
        let outputs = detect(&DeclineDetector, &CaseSource::Records(&records), today());
        assert_eq!(outputs.len(), 1);
        assert!(outputs[0].is_unavailable());
    }

    #[test]
    fn detect_all_runs_spike_first() {
        let records = weekly_records("A", &[8, 0, 0, 0]);
        let index = NeighborhoodIndex::build(&records);
        let outputs = detect_all(&index, &AnalysisConfig::default(), today());
        assert_eq!(outputs.len(), 5);
        let first = outputs[0].as_per_neighborhood().unwrap();
        assert_eq!(first.pattern, Pattern::Spike);
    }

    #[test]
    fn relative_change_handles_zero_base() {
        assert!((relative_change(0, 7)).abs() < f64::EPSILON);
        assert!((relative_change(10, 15) - 50.0).abs() < f64::EPSILON);
        assert!((relative_change(10, 5) + 50.0).abs() < f64::EPSILON);
    }
}
