//! Calendar windowing.
//!
//! Weeks run Monday 00:00:00.000 through Sunday 23:59:59.999. Windows are
//! anchored to the Monday of a reference date's week; index 0 always
//! contains the reference date, and each following index is exactly
//! seven days earlier. The reference week is never clipped here; callers
//! that report a live week clamp its end themselves.

use chrono::{Datelike as _, Days, NaiveDate, NaiveDateTime, NaiveTime};
use dengue_watch_analytics_models::WeekWindow;

/// Returns the Monday of the week containing `date`.
#[must_use]
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// First instant of `date`.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last millisecond of `date`.
#[must_use]
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999).unwrap_or_default()
}

/// The full week starting on `monday`.
#[must_use]
pub fn week_starting(monday: NaiveDate) -> WeekWindow {
    let sunday = monday.checked_add_days(Days::new(6)).unwrap_or(monday);
    WeekWindow {
        start: start_of_day(monday),
        end: end_of_day(sunday),
    }
}

/// Computes `number_of_weeks` windows walking backward from the week
/// containing `reference`. Index 0 is the reference week.
#[must_use]
pub fn compute_week_windows(reference: NaiveDate, number_of_weeks: usize) -> Vec<WeekWindow> {
    std::iter::successors(Some(monday_of(reference)), |monday| {
        monday.checked_sub_days(Days::new(7))
    })
    .take(number_of_weeks)
    .map(week_starting)
    .collect()
}

/// Computes `number_of_weeks` windows walking forward from the week that
/// starts on `monday`. Index 0 is that week.
#[must_use]
pub fn weeks_forward(monday: NaiveDate, number_of_weeks: usize) -> Vec<WeekWindow> {
    std::iter::successors(Some(monday), |monday| monday.checked_add_days(Days::new(7)))
        .take(number_of_weeks)
        .map(week_starting)
        .collect()
}
