//! Weekly aggregation and the per-neighborhood record index.
//!
//! Records are indexed by neighborhood once per analysis run and the
//! index is shared by every detector, so each detector only touches the
//! records of the neighborhood it is classifying.

use std::collections::BTreeMap;

use dengue_watch_analytics_models::{WeekWindow, WeeklyTotal};
use dengue_watch_case_models::CaseRecord;
use dengue_watch_neighborhood::normalize::{collapse_whitespace, neighborhood_key};

/// Sums the case counts of `records` admitted within each window.
///
/// The result is parallel to `windows`. Weeks without records total 0.
#[must_use]
pub fn aggregate_weekly_totals<'a, I>(records: I, windows: &[WeekWindow]) -> Vec<WeeklyTotal>
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    let mut totals: Vec<WeeklyTotal> = windows
        .iter()
        .map(|window| WeeklyTotal {
            window: *window,
            total: 0,
        })
        .collect();

    for record in records {
        for entry in &mut totals {
            if entry.window.contains(record.admission_date) {
                entry.total += u64::from(record.case_count);
            }
        }
    }

    totals
}

/// The records of one neighborhood.
#[derive(Debug, Clone)]
pub struct NeighborhoodCases<'a> {
    /// Display name: the first spelling seen, whitespace-collapsed.
    pub name: String,
    /// Every record for the neighborhood.
    pub records: Vec<&'a CaseRecord>,
}

/// Case records grouped by neighborhood key.
///
/// Iterates in key order, so detector output is deterministic.
#[derive(Debug, Clone, Default)]
pub struct NeighborhoodIndex<'a> {
    groups: BTreeMap<String, NeighborhoodCases<'a>>,
}

impl<'a> NeighborhoodIndex<'a> {
    /// Groups `records` by neighborhood, matching names case-insensitively.
    #[must_use]
    pub fn build(records: &'a [CaseRecord]) -> Self {
        let mut groups: BTreeMap<String, NeighborhoodCases<'a>> = BTreeMap::new();

        for record in records {
            let key = neighborhood_key(&record.neighborhood);
            if key.is_empty() {
                log::warn!(
                    "Skipping record dated {} with a blank neighborhood",
                    record.admission_date
                );
                continue;
            }
            groups
                .entry(key)
                .or_insert_with(|| NeighborhoodCases {
                    name: collapse_whitespace(&record.neighborhood),
                    records: Vec::new(),
                })
                .records
                .push(record);
        }

        log::debug!(
            "Indexed {} records across {} neighborhoods",
            records.len(),
            groups.len()
        );

        Self { groups }
    }

    /// Returns the records of one neighborhood, if it has any.
    #[must_use]
    pub fn get(&self, neighborhood: &str) -> Option<&NeighborhoodCases<'a>> {
        self.groups.get(&neighborhood_key(neighborhood))
    }

    /// Iterates over every neighborhood's records.
    pub fn iter(&self) -> impl Iterator<Item = &NeighborhoodCases<'a>> {
        self.groups.values()
    }

    /// Number of distinct neighborhoods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if no neighborhoods were indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::compute_week_windows;
    use chrono::{Days, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sums_per_window_and_zero_fills() {
        let windows = compute_week_windows(date(2024, 3, 13), 3);
        let records = vec![
            CaseRecord::cases(date(2024, 3, 11), "A", 2),
            CaseRecord::cases(date(2024, 3, 17), "A", 3),
            CaseRecord::cases(date(2024, 2, 26), "A", 4),
        ];

        let totals = aggregate_weekly_totals(&records, &windows);
        let values: Vec<u64> = totals.iter().map(|t| t.total).collect();
        assert_eq!(values, [5, 0, 4]);
        assert_eq!(totals[1].window, windows[1]);
    }

    #[test]
    fn totals_never_double_count_or_omit() {
        let reference = date(2024, 6, 30);
        let windows = compute_week_windows(reference, 6);
        let records: Vec<CaseRecord> = (0..60_u32)
            .map(|i| {
                CaseRecord::cases(
                    reference - Days::new(u64::from(i)),
                    "A",
                    i % 5,
                )
            })
            .collect();

        let in_windows: u64 = records
            .iter()
            .filter(|r| windows.iter().any(|w| w.contains(r.admission_date)))
            .map(|r| u64::from(r.case_count))
            .sum();
        let aggregated: u64 = aggregate_weekly_totals(&records, &windows)
            .iter()
            .map(|t| t.total)
            .sum();
        assert_eq!(aggregated, in_windows);
    }

    #[test]
    fn index_groups_names_case_insensitively() {
        let records = vec![
            CaseRecord::cases(date(2024, 3, 4), "San  Jose", 1),
            CaseRecord::cases(date(2024, 3, 5), "SAN JOSE", 1),
            CaseRecord::cases(date(2024, 3, 5), "Tagpuro", 1),
            CaseRecord::cases(date(2024, 3, 5), "   ", 1),
        ];
        let index = NeighborhoodIndex::build(&records);
        assert_eq!(index.len(), 2);
        let san_jose = index.get("san jose").unwrap();
        assert_eq!(san_jose.name, "San Jose");
        assert_eq!(san_jose.records.len(), 2);
    }
}
