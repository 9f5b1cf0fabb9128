//! Weekly trend reports for a single neighborhood.

use chrono::{Days, NaiveDateTime};
use dengue_watch_analytics_models::{
    AnalysisOutcome, WeekTrend, WeekWindow, WeeklyTotal, WeeklyTrendReport,
};

use crate::aggregate::{NeighborhoodIndex, aggregate_weekly_totals};
use crate::calendar::{compute_week_windows, monday_of, week_starting};
use crate::dataset::{CaseSource, load_for_analysis};

/// Reports the live week plus `number_of_weeks` earlier weeks for
/// `neighborhood`, anchored at `now`.
///
/// The live week ends at `now` rather than on Sunday. When the
/// neighborhood has no records at all, every week is zero-filled with no
/// date range. An empty or unreadable dataset yields
/// [`AnalysisOutcome::DataUnavailable`].
#[must_use]
pub fn weekly_trends(
    neighborhood: &str,
    number_of_weeks: usize,
    source: &CaseSource<'_>,
    now: NaiveDateTime,
) -> AnalysisOutcome<WeeklyTrendReport> {
    let records = match load_for_analysis(source) {
        Ok(records) => records,
        Err(reason) => return AnalysisOutcome::unavailable(reason),
    };

    let index = NeighborhoodIndex::build(&records);
    let Some(cases) = index.get(neighborhood) else {
        log::warn!("No case records for '{neighborhood}'; reporting empty weeks");
        return AnalysisOutcome::PerNeighborhood(WeeklyTrendReport {
            neighborhood: neighborhood.trim().to_string(),
            current_week: WeekTrend::default(),
            weeks: vec![WeekTrend::default(); number_of_weeks],
        });
    };

    let monday = monday_of(now.date());
    let current_window = WeekWindow {
        end: now,
        ..week_starting(monday)
    };
    let history = monday
        .checked_sub_days(Days::new(7))
        .map(|previous| compute_week_windows(previous, number_of_weeks))
        .unwrap_or_default();

    let current_week = aggregate_weekly_totals(cases.records.iter().copied(), &[current_window])
        .first()
        .map(trend)
        .unwrap_or_default();
    let weeks: Vec<WeekTrend> = aggregate_weekly_totals(cases.records.iter().copied(), &history)
        .iter()
        .map(trend)
        .collect();

    log::debug!(
        "{}: {} case(s) this week, {} earlier week(s)",
        cases.name,
        current_week.total,
        weeks.len()
    );

    AnalysisOutcome::PerNeighborhood(WeeklyTrendReport {
        neighborhood: cases.name.clone(),
        current_week,
        weeks,
    })
}

fn trend(total: &WeeklyTotal) -> WeekTrend {
    WeekTrend {
        start: Some(total.window.start),
        end: Some(total.window.end),
        total: total.total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dengue_watch_case_models::CaseRecord;

    use crate::calendar::start_of_day;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> NaiveDateTime {
        date(2024, 3, 6).and_hms_opt(14, 30, 0).unwrap()
    }

    fn report(neighborhood: &str, weeks: usize, records: &[CaseRecord]) -> WeeklyTrendReport {
        weekly_trends(neighborhood, weeks, &CaseSource::Records(records), now())
            .into_per_neighborhood()
            .unwrap()
    }

    #[test]
    fn live_week_ends_now() {
        let records = vec![
            CaseRecord::cases(date(2024, 3, 4), "A", 2),
            CaseRecord::cases(date(2024, 3, 6), "A", 1),
            CaseRecord::cases(date(2024, 3, 1), "A", 5),
            CaseRecord::cases(date(2024, 2, 20), "a", 3),
        ];

        let report = report("A", 3, &records);

        assert_eq!(report.current_week.start, Some(start_of_day(date(2024, 3, 4))));
        assert_eq!(report.current_week.end, Some(now()));
        assert_eq!(report.current_week.total, 3);

        let totals: Vec<u64> = report.weeks.iter().map(|w| w.total).collect();
        assert_eq!(totals, [5, 3, 0]);
        assert_eq!(report.weeks[0].start, Some(start_of_day(date(2024, 2, 26))));
    }

    #[test]
    fn unknown_neighborhood_is_zero_filled() {
        let records = vec![CaseRecord::cases(date(2024, 3, 4), "A", 2)];
        let report = report("B", 4, &records);
        assert_eq!(report.weeks.len(), 4);
        assert_eq!(report.current_week, WeekTrend::default());
        assert!(report.weeks.iter().all(|w| w.start.is_none() && w.total == 0));
    }

    #[test]
    fn empty_dataset_is_unavailable() {
        assert!(weekly_trends("A", 4, &CaseSource::Records(&[]), now()).is_unavailable());
    }
}
