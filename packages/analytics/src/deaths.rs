//! Death priority ranking.
//!
//! Sums deaths per neighborhood over a trailing window ending today and
//! words each neighborhood's alert by how its total compares to the
//! worst-hit neighborhood.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use dengue_watch_analytics_models::{AnalysisOutcome, DeathPriorityAlert, DeathsConfig};
use dengue_watch_neighborhood::normalize::{collapse_whitespace, neighborhood_key};

use crate::dataset::{CaseSource, load_for_analysis};

/// Recommendation for neighborhoods with the highest death toll.
pub const URGENT_RECOMMENDATION: &str = "Conduct immediate death reviews, verify hospital case \
     management and referral, and deploy a rapid response team to the area.";

/// Recommendation for neighborhoods with fewer deaths than the maximum.
pub const DEATHS_RECOMMENDATION: &str =
    "Review each fatal case and strengthen early consultation messaging.";

/// Recommendation for neighborhoods without deaths in the window.
pub const NO_DEATHS_RECOMMENDATION: &str = "Continue monitoring.";

struct DeathTally {
    name: String,
    deaths: u64,
}

/// Ranks neighborhoods by deaths admitted in the last
/// `config.window_days` days up to and including `today`.
///
/// Every neighborhood with a record in the window gets an entry, sorted
/// by deaths (highest first) and then by name. An empty window yields an
/// empty list; an empty or unreadable dataset yields a single
/// [`AnalysisOutcome::DataUnavailable`].
#[must_use]
pub fn death_priority(
    source: &CaseSource<'_>,
    config: &DeathsConfig,
    today: NaiveDate,
) -> Vec<AnalysisOutcome<DeathPriorityAlert>> {
    let records = match load_for_analysis(source) {
        Ok(records) => records,
        Err(reason) => return vec![AnalysisOutcome::unavailable(reason)],
    };

    let window_start = today
        .checked_sub_days(Days::new(u64::from(config.window_days)))
        .unwrap_or(NaiveDate::MIN);

    let mut tallies: BTreeMap<String, DeathTally> = BTreeMap::new();
    for record in records
        .iter()
        .filter(|r| window_start <= r.admission_date && r.admission_date <= today)
    {
        let key = neighborhood_key(&record.neighborhood);
        if key.is_empty() {
            continue;
        }
        tallies
            .entry(key)
            .or_insert_with(|| DeathTally {
                name: collapse_whitespace(&record.neighborhood),
                deaths: 0,
            })
            .deaths += u64::from(record.deaths);
    }

    let max = tallies.values().map(|t| t.deaths).max().unwrap_or(0);
    let days = config.window_days;

    let mut alerts: Vec<DeathPriorityAlert> = tallies
        .into_values()
        .map(|tally| death_alert(tally, max, days))
        .collect();
    alerts.sort_by(|a, b| {
        b.deaths
            .cmp(&a.deaths)
            .then_with(|| a.neighborhood.cmp(&b.neighborhood))
    });

    log::info!(
        "Death priority: {} neighborhood(s) in the {days}-day window ending {today}, max {max}",
        alerts.len()
    );

    alerts
        .into_iter()
        .map(AnalysisOutcome::PerNeighborhood)
        .collect()
}

fn death_alert(tally: DeathTally, max: u64, days: u32) -> DeathPriorityAlert {
    let DeathTally { name, deaths } = tally;

    let (alert_text, recommendation) = match deaths {
        0 => (
            format!("No deaths reported in the last {days} days."),
            NO_DEATHS_RECOMMENDATION,
        ),
        1 if max == 1 => (
            format!("Death alert: 1 death reported in the last {days} days."),
            URGENT_RECOMMENDATION,
        ),
        _ if deaths == max => (
            format!("Highest death toll: {deaths} deaths in the last {days} days."),
            URGENT_RECOMMENDATION,
        ),
        1 => (
            format!("1 death reported in the last {days} days."),
            DEATHS_RECOMMENDATION,
        ),
        _ => (
            format!("{deaths} deaths reported in the last {days} days."),
            DEATHS_RECOMMENDATION,
        ),
    };

    DeathPriorityAlert {
        neighborhood: name,
        deaths,
        alert_text,
        recommendation: recommendation.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dengue_watch_case_models::CaseRecord;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    fn record(days_ago: u64, name: &str, deaths: u32) -> CaseRecord {
        CaseRecord {
            deaths,
            ..CaseRecord::cases(today() - Days::new(days_ago), name, deaths.max(1))
        }
    }

    fn rank(records: &[CaseRecord]) -> Vec<DeathPriorityAlert> {
        death_priority(
            &CaseSource::Records(records),
            &DeathsConfig::default(),
            today(),
        )
        .into_iter()
        .map(|o| o.into_per_neighborhood().unwrap())
        .collect()
    }

    #[test]
    fn worst_neighborhood_gets_urgent_wording() {
        let alerts = rank(&[
            record(1, "A", 1),
            record(2, "B", 2),
            record(3, "B", 1),
            record(4, "C", 0),
        ]);

        let names: Vec<&str> = alerts.iter().map(|a| a.neighborhood.as_str()).collect();
        assert_eq!(names, ["B", "A", "C"]);

        assert_eq!(alerts[0].deaths, 3);
        assert!(alerts[0].alert_text.starts_with("Highest death toll"), "{}", alerts[0].alert_text);
        assert_eq!(alerts[0].recommendation, URGENT_RECOMMENDATION);

        assert_eq!(alerts[1].alert_text, "1 death reported in the last 14 days.");
        assert_eq!(alerts[1].recommendation, DEATHS_RECOMMENDATION);

        assert_eq!(alerts[2].alert_text, "No deaths reported in the last 14 days.");
        assert_eq!(alerts[2].recommendation, NO_DEATHS_RECOMMENDATION);
    }

    #[test]
    fn ties_at_the_maximum_are_all_urgent() {
        let alerts = rank(&[record(0, "A", 2), record(0, "B", 2)]);
        assert!(alerts.iter().all(|a| a.recommendation == URGENT_RECOMMENDATION));
    }

    #[test]
    fn single_death_maximum_uses_singular_wording() {
        let alerts = rank(&[record(0, "A", 1), record(5, "B", 1), record(6, "C", 0)]);
        assert_eq!(alerts[0].alert_text, "Death alert: 1 death reported in the last 14 days.");
        assert_eq!(alerts[1].alert_text, alerts[0].alert_text);
        assert_eq!(alerts[2].deaths, 0);
    }

    #[test]
    fn window_is_inclusive_at_both_ends() {
        let alerts = rank(&[
            record(14, "EDGE", 1),
            record(15, "OLD", 5),
            CaseRecord {
                deaths: 4,
                ..CaseRecord::cases(today() + Days::new(1), "FUTURE", 4)
            },
        ]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].neighborhood, "EDGE");
    }

    #[test]
    fn empty_window_yields_no_entries() {
        assert!(rank(&[record(30, "A", 3)]).is_empty());
    }

    #[test]
    fn empty_dataset_yields_sentinel() {
        let outputs = death_priority(
            &CaseSource::Records(&[]),
            &DeathsConfig::default(),
            today(),
        );
        assert_eq!(outputs.len(), 1);
        assert!(outputs[0].is_unavailable());
    }
}
