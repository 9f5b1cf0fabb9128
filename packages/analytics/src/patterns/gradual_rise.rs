//! Gradual rise detection.
//!
//! Compares the last two weeks against the two weeks before them. Any
//! increase counts; there is no minimum magnitude.

use dengue_watch_analytics_models::{Pattern, PatternAlert, WeeklyTotal};

use super::{PatternDetector, counts, relative_change};
use crate::AnalyticsError;

/// Flags a two-week total above the previous two-week total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradualRiseDetector;

impl PatternDetector for GradualRiseDetector {
    fn pattern(&self) -> Pattern {
        Pattern::GradualRise
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

        if current <= previous {
            return Ok(None);
        }

        let alert_text = if previous == 0 {
            format!(
                "Gradual rise: {current} cases in the last 2 weeks, up from none in the 2 weeks before."
            )
        } else {
            format!(
                "Gradual rise: {current} cases in the last 2 weeks, up {:.2}% from {previous} in the 2 weeks before.",
                relative_change(previous, current)
            )
        };

        Ok(Some(PatternAlert::new(
            neighborhood,
            Pattern::GradualRise,
            alert_text,
        )))
    }
}
