//! Decline detection, the mirror of gradual rise.

use dengue_watch_analytics_models::{Pattern, PatternAlert, WeeklyTotal};

use super::{PatternDetector, counts, relative_change};
use crate::AnalyticsError;

/// Flags a two-week total below the previous two-week total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclineDetector;

impl PatternDetector for DeclineDetector {
    fn pattern(&self) -> Pattern {
        Pattern::Decline
    }

    fn weeks(&self) -> usize {
        4
    }

    fn classify(
        &self,
        neighborhood: &str,
        totals: &[WeeklyTotal],
    ) -> Result<Option<PatternAlert>, AnalyticsError> {
        let [w0, w1, w2, w3] = match counts(totals).as_slice() {
            [w0, w1, w2, w3, ..] => [*w0, *w1, *w2, *w3],
            _ => return Ok(None),
        };
        let current = w0 + w1;
        let previous = w2 + w3;

        if current >= previous {
            return Ok(None);
        }

        // previous > current >= 0, so the base is never zero here.
        let decrease = -relative_change(previous, current);
        let alert_text = format!(
            "Decline: {current} cases in the last 2 weeks, down {decrease:.2}% from {previous} in the 2 weeks before."
        );

        Ok(Some(PatternAlert::new(
            neighborhood,
            Pattern::Decline,
            alert_text,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_support::totals;

    fn classify(counts: &[u64]) -> Option<PatternAlert> {
        DeclineDetector.classify("TAGPURO", &totals(counts)).unwrap()
    }

    #[test]
    fn any_decrease_is_a_decline() {
        let alert = classify(&[1, 1, 2, 2]).unwrap();
        assert_eq!(alert.pattern, Pattern::Decline);
        assert!(alert.alert_text.contains("down 50.00% from 4"), "{}", alert.alert_text);
    }

    #[test]
    fn drop_to_zero_is_a_full_decline() {
        let alert = classify(&[0, 0, 3, 0]).unwrap();
        assert!(alert.alert_text.contains("down 100.00%"), "{}", alert.alert_text);
    }

    #[test]
    fn equal_or_higher_is_not_a_decline() {
        assert!(classify(&[2, 2, 2, 2]).is_none());
        assert!(classify(&[5, 0, 1, 1]).is_none());
    }
}
