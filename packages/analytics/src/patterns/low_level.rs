//! Low-level activity detection.
//!
//! Four weeks with at most one case each and at least one week with
//! exactly one. Four silent weeks are stability, not low-level activity.

use dengue_watch_analytics_models::{Pattern, PatternAlert, WeeklyTotal};

use super::{PatternDetector, counts};
use crate::AnalyticsError;

/// Flags sporadic single cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LowLevelActivityDetector;

impl PatternDetector for LowLevelActivityDetector {
    fn pattern(&self) -> Pattern {
        Pattern::LowLevelActivity
    }

    fn weeks(&self) -> usize {
        4
    }

    fn classify(
        &self,
        neighborhood: &str,
        totals: &[WeeklyTotal],
    ) -> Result<Option<PatternAlert>, AnalyticsError> {
        let counts = counts(totals);
        if counts.len() < self.weeks() || counts.iter().any(|&c| c > 1) {
            return Ok(None);
        }

        let active_weeks = counts.iter().filter(|&&c| c == 1).count();
        if active_weeks == 0 {
            return Ok(None);
        }

        let alert_text = format!(
            "Low-level activity: single cases in {active_weeks} of the last {} weeks.",
            counts.len()
        );

        Ok(Some(PatternAlert::new(
            neighborhood,
            Pattern::LowLevelActivity,
            alert_text,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_support::totals;

    fn classify(counts: &[u64]) -> Option<PatternAlert> {
        LowLevelActivityDetector
            .classify("CABALAWAN", &totals(counts))
            .unwrap()
    }

    #[test]
    fn single_isolated_case_is_low_level() {
        let alert = classify(&[0, 1, 0, 0]).unwrap();
        assert_eq!(alert.pattern, Pattern::LowLevelActivity);
        assert!(alert.alert_text.contains("1 of the last 4 weeks"), "{}", alert.alert_text);
    }

    #[test]
    fn one_case_every_week_is_low_level() {
        assert!(classify(&[1, 1, 1, 1]).is_some());
    }

    #[test]
    fn silence_is_not_low_level() {
        assert!(classify(&[0, 0, 0, 0]).is_none());
    }

    #[test]
    fn any_week_above_one_disqualifies() {
        assert!(classify(&[0, 2, 0, 1]).is_none());
    }
}
