//! Stability detection.
//!
//! Fits a least-squares line through the last four weekly totals
//! (x = week index, y = total) and flags a flat fit. With the default
//! threshold of zero the slope must be exactly zero, so only genuinely
//! level series qualify.

use dengue_watch_analytics_models::{Pattern, PatternAlert, StabilityConfig, WeeklyTotal};

use super::regression::least_squares;
use super::{PatternDetector, counts};
use crate::AnalyticsError;

/// Flags flat weekly counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StabilityDetector {
    slope_threshold: f64,
}

impl StabilityDetector {
    /// Creates a detector with the configured slope threshold.
    #[must_use]
    pub const fn from_config(config: &StabilityConfig) -> Self {
        Self {
            slope_threshold: config.slope_threshold,
        }
    }
}

impl PatternDetector for StabilityDetector {
    fn pattern(&self) -> Pattern {
        Pattern::Stability
    }

    fn weeks(&self) -> usize {
        4
    }

    #[allow(clippy::cast_precision_loss)]
    fn classify(
        &self,
        neighborhood: &str,
        totals: &[WeeklyTotal],
    ) -> Result<Option<PatternAlert>, AnalyticsError> {
        let counts = counts(totals);
        if counts.len() < self.weeks() {
            return Ok(None);
        }

        let points: Vec<(f64, f64)> = counts
            .iter()
            .enumerate()
            .map(|(i, &count)| (i as f64, count as f64))
            .collect();

        let fit = least_squares(&points).ok_or_else(|| AnalyticsError::Regression {
            neighborhood: neighborhood.to_string(),
            message: format!("no least-squares fit for weekly totals {counts:?}"),
        })?;

        if fit.slope.abs() > self.slope_threshold {
            return Ok(None);
        }

        let weeks = counts.len();
        let first = counts[0];
        let alert_text = if counts.iter().all(|&c| c == 0) {
            format!("Stable: no cases reported in the last {weeks} weeks.")
        } else if counts.iter().all(|&c| c == first) {
            format!(
                "Stable: consistent reporting of {first} cases/week over the last {weeks} weeks."
            )
        } else {
            let average = counts.iter().sum::<u64>() as f64 / weeks as f64;
            format!(
                "Stable: flat trend averaging {average:.2} cases/week over the last {weeks} weeks."
            )
        };

        Ok(Some(PatternAlert::new(
            neighborhood,
            Pattern::Stability,
            alert_text,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_support::totals;

    fn classify(counts: &[u64]) -> Option<PatternAlert> {
        StabilityDetector::default()
            .classify("PALANOG", &totals(counts))
            .unwrap()
    }

    #[test]
    fn silent_weeks_are_stable_with_no_cases_wording() {
        let alert = classify(&[0, 0, 0, 0]).unwrap();
        assert_eq!(alert.pattern, Pattern::Stability);
        assert!(alert.alert_text.contains("no cases"), "{}", alert.alert_text);
    }

    #[test]
    fn constant_weeks_report_the_weekly_count() {
        let alert = classify(&[3, 3, 3, 3]).unwrap();
        assert!(
            alert.alert_text.contains("consistent reporting of 3 cases/week"),
            "{}",
            alert.alert_text
        );
    }

    #[test]
    fn any_slope_is_not_stable() {
        assert!(classify(&[0, 0, 0, 1]).is_none());
        assert!(classify(&[4, 3, 3, 3]).is_none());
    }

    #[test]
    fn symmetric_series_has_flat_fit() {
        let alert = classify(&[1, 0, 0, 1]).unwrap();
        assert!(alert.alert_text.contains("averaging 0.50"), "{}", alert.alert_text);
    }

    #[test]
    fn threshold_widens_the_flat_band() {
        let detector = StabilityDetector::from_config(&StabilityConfig {
            slope_threshold: 0.5,
        });
        let alert = detector.classify("PALANOG", &totals(&[0, 0, 0, 1])).unwrap();
        assert!(alert.is_some());
    }
}
