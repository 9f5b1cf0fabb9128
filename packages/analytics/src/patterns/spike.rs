//! Spike detection.
//!
//! Clusters the current and previous week's totals with
//! [`dbscan`](super::cluster::dbscan). The current week is a spike when
//! it is an outlier and exceeds the previous week.

use dengue_watch_analytics_models::{Pattern, PatternAlert, SpikeConfig, WeeklyTotal};

use super::cluster::is_outlier;
use super::{PatternDetector, relative_change};
use crate::AnalyticsError;

/// Flags a sudden jump in this week's cases.
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeDetector {
    eps: f64,
    min_samples: usize,
}

impl SpikeDetector {
    /// Creates a detector with the given clustering parameters.
    #[must_use]
    pub fn from_config(config: &SpikeConfig) -> Self {
        Self {
            eps: config.eps,
            min_samples: config.min_samples,
        }
    }
}

impl Default for SpikeDetector {
    fn default() -> Self {
        Self::from_config(&SpikeConfig::default())
    }
}

impl PatternDetector for SpikeDetector {
    fn pattern(&self) -> Pattern {
        Pattern::Spike
    }

    fn weeks(&self) -> usize {
        2
    }

    #[allow(clippy::cast_precision_loss)]
    fn classify(
        &self,
        neighborhood: &str,
        totals: &[WeeklyTotal],
    ) -> Result<Option<PatternAlert>, AnalyticsError> {
        let [current, previous] = match totals {
            [current, previous, ..] => [current.total, previous.total],
            _ => return Ok(None),
        };

        let points = [current as f64, previous as f64];
        if !is_outlier(&points, 0, self.eps, self.min_samples) || current <= previous {
            return Ok(None);
        }

        let alert_text = if previous == 0 {
            format!(
                "Sudden jump from zero: {current} cases this week after none the week before."
            )
        } else {
            format!(
                "Spike: {current} cases this week, up {:.2}% from {previous} the week before.",
                relative_change(previous, current)
            )
        };

        Ok(Some(PatternAlert::new(neighborhood, Pattern::Spike, alert_text)))
    }
}
