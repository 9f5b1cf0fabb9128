#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Surveillance analytics result types and tunables.
//!
//! Defines the week windows, per-neighborhood alerts, and analyzer
//! results produced by `dengue_watch_analytics`, plus the
//! [`AnalysisConfig`] that parameterizes the detectors. Every result type
//! is plain serializable data so the surrounding system can persist or
//! render it without depending on the analytics engine.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A Monday-through-Sunday week.
///
/// `start` is Monday 00:00:00.000 and `end` is Sunday 23:59:59.999,
/// except for live-reporting windows whose end is clamped to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekWindow {
    /// First instant of the window.
    pub start: NaiveDateTime,
    /// Last instant of the window (inclusive).
    pub end: NaiveDateTime,
}

impl WeekWindow {
    /// Returns `true` if `date` falls on a calendar day covered by the
    /// window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.date() <= date && date <= self.end.date()
    }

    /// Human-readable label, e.g. `"2024-03-04 to 2024-03-10"`.
    ///
    /// Labels sort chronologically.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} to {}", self.start.date(), self.end.date())
    }
}

/// Total case count of one neighborhood within one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTotal {
    /// The window the total covers.
    pub window: WeekWindow,
    /// Sum of case counts admitted within the window.
    pub total: u64,
}

/// Epidemiological pattern assigned to a neighborhood.
///
/// Variants are listed from highest to lowest alert priority.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Pattern {
    /// Current week jumped well above the previous week.
    Spike,
    /// Sporadic single cases, never more than one per week.
    LowLevelActivity,
    /// Last two weeks exceed the two weeks before.
    GradualRise,
    /// Last two weeks fall below the two weeks before.
    Decline,
    /// Flat weekly counts over four weeks.
    Stability,
    /// No pattern detected.
    #[serde(rename = "")]
    #[strum(serialize = "")]
    Unclassified,
}

impl Pattern {
    /// Resolution priority. Higher wins.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Spike => 5,
            Self::LowLevelActivity => 4,
            Self::GradualRise => 3,
            Self::Decline => 2,
            Self::Stability => 1,
            Self::Unclassified => 0,
        }
    }

    /// Human-readable name used in alert wording.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Spike => "spike",
            Self::LowLevelActivity => "low-level activity",
            Self::GradualRise => "gradual rise",
            Self::Decline => "decline",
            Self::Stability => "stability",
            Self::Unclassified => "no pattern",
        }
    }

    /// Standing recommended intervention for the pattern.
    #[must_use]
    pub const fn recommendation(self) -> &'static str {
        match self {
            Self::Spike => {
                "Activate rapid response: fogging and larval source reduction in the \
                 affected area, active case finding, and advisories to nearby health facilities."
            }
            Self::LowLevelActivity => {
                "Maintain routine surveillance and household container clean-up; \
                 investigate sporadic cases for local transmission."
            }
            Self::GradualRise => {
                "Intensify search-and-destroy of breeding sites and community education \
                 before the rise accelerates; review weekly."
            }
            Self::Decline => {
                "Sustain current control measures and keep monitoring to confirm the \
                 decline holds."
            }
            Self::Stability => "Continue routine surveillance and preventive clean-up drives.",
            Self::Unclassified => "",
        }
    }

    /// Returns all variants, highest priority first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Spike,
            Self::LowLevelActivity,
            Self::GradualRise,
            Self::Decline,
            Self::Stability,
            Self::Unclassified,
        ]
    }
}

/// A neighborhood's pattern classification for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternAlert {
    /// Neighborhood the alert belongs to.
    pub neighborhood: String,
    /// Detected pattern, or [`Pattern::Unclassified`].
    pub pattern: Pattern,
    /// Alert wording shown to health officers.
    pub alert_text: String,
    /// Recommended intervention.
    pub recommendation: String,
}

impl PatternAlert {
    /// Alert text of the default entry every neighborhood starts with.
    pub const NO_ALERTS: &'static str = "No alerts triggered.";

    /// Creates an alert carrying the pattern's standing recommendation.
    #[must_use]
    pub fn new(neighborhood: &str, pattern: Pattern, alert_text: String) -> Self {
        Self {
            neighborhood: neighborhood.to_string(),
            pattern,
            alert_text,
            recommendation: pattern.recommendation().to_string(),
        }
    }

    /// The default "no alerts" entry for a neighborhood.
    #[must_use]
    pub fn no_alerts(neighborhood: &str) -> Self {
        Self::new(neighborhood, Pattern::Unclassified, Self::NO_ALERTS.to_string())
    }
}

/// Result of an analyzer for one neighborhood, or the reason the data
/// could not be analyzed at all.
///
/// A failure is never disguised as a neighborhood entry, so callers
/// cannot mistake it for real per-neighborhood status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome<T> {
    /// The dataset was empty or could not be read.
    DataUnavailable {
        /// Description of the failure.
        reason: String,
    },
    /// Result for one neighborhood.
    PerNeighborhood(T),
}

impl<T> AnalysisOutcome<T> {
    /// Reason used when a dataset has no records.
    pub const NO_DATA: &'static str = "No data available for analysis.";

    /// Creates a [`AnalysisOutcome::DataUnavailable`].
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            reason: reason.into(),
        }
    }

    /// Returns the per-neighborhood value, if any.
    #[must_use]
    pub const fn as_per_neighborhood(&self) -> Option<&T> {
        match self {
            Self::PerNeighborhood(value) => Some(value),
            Self::DataUnavailable { .. } => None,
        }
    }

    /// Consumes the outcome, returning the per-neighborhood value, if any.
    #[must_use]
    pub fn into_per_neighborhood(self) -> Option<T> {
        match self {
            Self::PerNeighborhood(value) => Some(value),
            Self::DataUnavailable { .. } => None,
        }
    }

    /// Returns `true` for [`AnalysisOutcome::DataUnavailable`].
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::DataUnavailable { .. })
    }

    /// Collects the per-neighborhood values of an analyzer's output.
    ///
    /// # Errors
    ///
    /// Returns the reason of the first [`AnalysisOutcome::DataUnavailable`]
    /// entry, if any.
    pub fn collect_available(outcomes: impl IntoIterator<Item = Self>) -> Result<Vec<T>, String> {
        outcomes
            .into_iter()
            .map(|outcome| match outcome {
                Self::PerNeighborhood(value) => Ok(value),
                Self::DataUnavailable { reason } => Err(reason),
            })
            .collect()
    }
}

/// Death-count ranking entry for one neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeathPriorityAlert {
    /// Neighborhood the alert belongs to.
    pub neighborhood: String,
    /// Deaths admitted within the trailing window.
    pub deaths: u64,
    /// Alert wording.
    pub alert_text: String,
    /// Recommended action.
    pub recommendation: String,
}

/// Before/after case totals around an intervention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionEffectivityResult {
    /// Neighborhood the intervention targeted.
    pub neighborhood: String,
    /// Date the intervention took place.
    pub intervention_date: NaiveDate,
    /// Weekly totals for the weeks strictly before the intervention's week.
    pub before: BTreeMap<String, u64>,
    /// Weekly totals from the intervention's week onward.
    pub after: BTreeMap<String, u64>,
    /// Percentage change from `totals_before` to `totals_after`, rounded
    /// to two decimals.
    pub percentage_change: f64,
    /// Sum of `before`.
    pub totals_before: u64,
    /// Sum of `after`.
    pub totals_after: u64,
}

/// One week of a trend report.
///
/// `start` and `end` are `None` when the neighborhood has no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekTrend {
    /// First instant of the week.
    pub start: Option<NaiveDateTime>,
    /// Last instant of the week; "now" for the live week.
    pub end: Option<NaiveDateTime>,
    /// Cases admitted within the week.
    pub total: u64,
}

/// Current-week and historical weekly totals for one neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTrendReport {
    /// Neighborhood the report covers.
    pub neighborhood: String,
    /// The live week, clamped to "now".
    pub current_week: WeekTrend,
    /// Previous weeks, most recent first.
    pub weeks: Vec<WeekTrend>,
}

/// Why a neighborhood appears in a hotspot list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HotspotKind {
    /// The neighborhood itself resolved to a rising pattern.
    Hotspot {
        /// The resolved pattern.
        pattern: Pattern,
    },
    /// The neighborhood borders one or more hotspots.
    AtRisk {
        /// Hotspots this neighborhood borders.
        adjacent_to: Vec<String>,
    },
}

/// A hotspot or an at-risk neighbor of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    /// Neighborhood name.
    pub neighborhood: String,
    /// Hotspot or at-risk neighbor.
    #[serde(flatten)]
    pub kind: HotspotKind,
}

/// Structured per-neighborhood status handed to the recommendation text
/// generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodStatus {
    /// Neighborhood name.
    pub neighborhood: String,
    /// Resolved pattern.
    pub pattern: Pattern,
    /// Resolved alert wording.
    pub alert_text: String,
    /// Deaths within the trailing death-priority window.
    pub recent_deaths: u64,
}

/// Summary of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    /// Date the analysis was anchored to.
    pub as_of: NaiveDate,
    /// Number of neighborhoods resolved to each pattern.
    pub pattern_counts: BTreeMap<Pattern, usize>,
    /// Every neighborhood's status, highest-priority pattern first.
    pub neighborhoods: Vec<NeighborhoodStatus>,
}

/// Detector and analyzer tunables.
///
/// Every field has a default, so a partial TOML file only needs to name
/// the values it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Spike detector settings.
    pub spike: SpikeConfig,
    /// Stability detector settings.
    pub stability: StabilityConfig,
    /// Death priority settings.
    pub deaths: DeathsConfig,
    /// Intervention effectivity settings.
    pub intervention: InterventionConfig,
    /// Trend reporter settings.
    pub trends: TrendsConfig,
}

/// Density clustering parameters for spike detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpikeConfig {
    /// Maximum absolute difference between weekly totals for two weeks to
    /// be neighbors.
    pub eps: f64,
    /// Minimum neighborhood size (including the point itself) for a week
    /// to be a core point.
    pub min_samples: usize,
}

impl Default for SpikeConfig {
    fn default() -> Self {
        Self {
            eps: 2.0,
            min_samples: 2,
        }
    }
}

/// Regression parameters for stability detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Largest absolute fitted slope still considered flat. The default
    /// of zero requires an exactly flat fit.
    pub slope_threshold: f64,
}

/// Trailing window for death priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeathsConfig {
    /// Days before today included in the window.
    pub window_days: u32,
}

impl Default for DeathsConfig {
    fn default() -> Self {
        Self { window_days: 14 }
    }
}

/// Comparison span for intervention effectivity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterventionConfig {
    /// Weeks compared on each side of the intervention.
    pub weeks: usize,
}

impl Default for InterventionConfig {
    fn default() -> Self {
        Self { weeks: 8 }
    }
}

/// Defaults for ad hoc trend queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendsConfig {
    /// Historical weeks reported when the caller does not specify.
    pub default_weeks: usize,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self { default_weeks: 4 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priorities_follow_variant_order() {
        let priorities: Vec<u8> = Pattern::all().iter().map(|p| p.priority()).collect();
        assert_eq!(priorities, [5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn pattern_names_round_trip_through_strum() {
        for pattern in Pattern::all() {
            let name = pattern.to_string();
            let parsed: Pattern = name.parse().unwrap();
            assert_eq!(parsed, *pattern, "{name:?} did not parse back");
        }
        assert_eq!(Pattern::LowLevelActivity.to_string(), "low_level_activity");
        assert_eq!(Pattern::Unclassified.to_string(), "");
    }

    #[test]
    fn unclassified_serializes_as_empty_string() {
        let alert = PatternAlert::no_alerts("POBLACION");
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["pattern"], "");
        assert_eq!(json["alertText"], PatternAlert::NO_ALERTS);
    }

    #[test]
    fn outcome_is_tagged() {
        let outcome: AnalysisOutcome<PatternAlert> =
            AnalysisOutcome::unavailable(AnalysisOutcome::<PatternAlert>::NO_DATA);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "data_unavailable");
        assert!(outcome.as_per_neighborhood().is_none());
    }

    #[test]
    fn collecting_stops_at_unavailable_data() {
        let alerts = vec![
            AnalysisOutcome::PerNeighborhood(PatternAlert::no_alerts("A")),
            AnalysisOutcome::PerNeighborhood(PatternAlert::no_alerts("B")),
        ];
        assert_eq!(AnalysisOutcome::collect_available(alerts).unwrap().len(), 2);

        let missing = vec![
            AnalysisOutcome::PerNeighborhood(PatternAlert::no_alerts("A")),
            AnalysisOutcome::unavailable("file gone"),
        ];
        assert_eq!(
            AnalysisOutcome::collect_available(missing).unwrap_err(),
            "file gone"
        );
    }

    #[test]
    fn window_contains_whole_days() {
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let window = WeekWindow {
            start: monday.and_hms_opt(0, 0, 0).unwrap(),
            end: sunday.and_hms_milli_opt(23, 59, 59, 999).unwrap(),
        };
        assert!(window.contains(monday));
        assert!(window.contains(sunday));
        assert!(!window.contains(sunday.succ_opt().unwrap()));
        assert_eq!(window.label(), "2024-03-04 to 2024-03-10");
    }

    #[test]
    fn config_defaults_apply_to_partial_input() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"spike": {"eps": 3.5}}"#).unwrap();
        assert!((config.spike.eps - 3.5).abs() < f64::EPSILON);
        assert_eq!(config.spike.min_samples, 2);
        assert_eq!(config.deaths.window_days, 14);
        assert_eq!(config.intervention.weeks, 8);
    }
}
