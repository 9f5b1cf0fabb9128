//! Grouping validated admissions into canonical summary rows.

use std::collections::BTreeMap;
use std::io::Read;
use std::sync::Arc;

use chrono::NaiveDate;
use dengue_watch_case_models::{Admission, CaseRecord, Outcome};
use dengue_watch_ingest_models::IngestReport;
use dengue_watch_neighborhood::normalize::NameNormalizer;

use crate::IngestError;
use crate::progress::ProgressCallback;
use crate::raw::{RawRows, validate};

/// Rows between progress updates.
const PROGRESS_INTERVAL: u64 = 1_000;

/// Summary rows plus the report of the run that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// One row per `(admission date, neighborhood)`, ascending by date and
    /// then neighborhood.
    pub groups: Vec<CaseRecord>,
    /// Row and group counts plus every rejected row.
    pub report: IngestReport,
}

/// Running counts keyed by `(admission date, normalized neighborhood)`.
#[derive(Debug, Default)]
pub struct SummaryGroups {
    groups: BTreeMap<(NaiveDate, String), CaseRecord>,
}

impl SummaryGroups {
    /// Counts one admission toward its group.
    pub fn add(&mut self, admission: Admission) {
        let Admission {
            admission_date,
            neighborhood,
            outcome,
            ..
        } = admission;

        let group = self
            .groups
            .entry((admission_date, neighborhood))
            .or_insert_with_key(|(date, name)| CaseRecord::cases(*date, name, 0));

        group.case_count = group.case_count.saturating_add(1);
        match outcome {
            Outcome::Died => group.deaths = group.deaths.saturating_add(1),
            Outcome::Alive => group.recoveries = group.recoveries.saturating_add(1),
            Outcome::Other => {}
        }
    }

    /// Number of distinct groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if nothing has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the summary rows in ascending date order.
    #[must_use]
    pub fn into_records(self) -> Vec<CaseRecord> {
        self.groups.into_values().collect()
    }
}

/// Streams raw line-list rows from `source`, validating and grouping
/// them as they arrive.
///
/// Invalid rows are collected in the report and never abort the run.
/// Memory use grows with the number of groups, not the number of rows.
///
/// # Errors
///
/// Returns [`IngestError::MissingHeaders`] if the header row lacks a
/// required column, or [`IngestError::Csv`] if the source cannot be read.
pub fn aggregate_admissions(
    source: impl Read,
    normalizer: &NameNormalizer,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Aggregation, IngestError> {
    let mut rows = RawRows::new(source)?;
    let mut groups = SummaryGroups::default();
    let mut report = IngestReport::default();

    while let Some(row) = rows.next() {
        let row = row?;
        report.rows_read += 1;

        match row.and_then(|row| validate(&row, normalizer)) {
            Ok(admission) => {
                log::trace!(
                    "Admitted {} on {}",
                    admission.neighborhood,
                    admission.admission_date
                );
                report.rows_valid += 1;
                groups.add(admission);
            }
            Err(rejection) => {
                log::debug!("Rejected {rejection}");
                report.errors.push(rejection);
            }
        }

        if report.rows_read % PROGRESS_INTERVAL == 0 {
            progress.set_position(rows.byte_position());
            progress.set_message(format!("{} rows read", report.rows_read));
        }
    }

    report.groups_produced = groups.len() as u64;
    progress.set_position(rows.byte_position());

    if report.errors.is_empty() {
        log::info!(
            "Aggregated {} rows into {} groups",
            report.rows_valid,
            report.groups_produced
        );
    } else {
        log::warn!(
            "Aggregated {} of {} rows into {} groups; {} row(s) rejected",
            report.rows_valid,
            report.rows_read,
            report.groups_produced,
            report.errors.len()
        );
    }

    Ok(Aggregation {
        groups: groups.into_records(),
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::null_progress;
    use dengue_watch_ingest_models::RejectionReason;
    use dengue_watch_neighborhood::registry::default_normalizer;

    fn aggregate(csv: &str) -> Aggregation {
        aggregate_admissions(csv.as_bytes(), &default_normalizer(), &null_progress()).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn same_day_and_neighborhood_collapse_to_one_row() {
        let csv = "\
DateAdmitted,DateOnset,Neighborhood,Outcome,City
2024-03-04,2024-03-01,San Jose,Died,X
2024-03-04,2024-03-02,SAN JOSE,alive,X
2024-03-04,2024-03-02,san  jose,ALIVE,X
2024-03-04,2024-03-03,San Jose,Transferred,X
03/04/2024,2024-03-03,San Jose,,X
";
        let result = aggregate(csv);

        assert_eq!(result.groups.len(), 1);
        let group = &result.groups[0];
        assert_eq!(group.case_count, 4);
        assert_eq!(group.deaths, 1);
        assert_eq!(group.recoveries, 2);
        assert_eq!(group.neighborhood, "SAN JOSE");

        assert_eq!(result.report.rows_read, 5);
        assert_eq!(result.report.rows_valid, 4);
        assert_eq!(result.report.groups_produced, 1);
        assert_eq!(result.report.errors.len(), 1);
        assert_eq!(result.report.errors[0].reason, RejectionReason::MissingField);
        assert_eq!(result.report.errors[0].line, 6);
    }

    #[test]
    fn groups_sort_by_date_then_name() {
        let csv = "\
DateAdmitted,DateOnset,Neighborhood,Outcome,City
2024-03-05,2024-03-01,B,Alive,X
2024-03-04,2024-03-01,C,Alive,X
2024-03-05,2024-03-01,A,Alive,X
2024-03-04,2024-03-01,A,Alive,X
";
        let keys: Vec<(NaiveDate, String)> = aggregate(csv)
            .groups
            .into_iter()
            .map(|g| (g.admission_date, g.neighborhood))
            .collect();
        assert_eq!(
            keys,
            [
                (date(2024, 3, 4), "A".to_string()),
                (date(2024, 3, 4), "C".to_string()),
                (date(2024, 3, 5), "A".to_string()),
                (date(2024, 3, 5), "B".to_string()),
            ]
        );
    }

    #[test]
    fn aliases_merge_spelling_variants() {
        let csv = "\
DateAdmitted,DateOnset,Neighborhood,Outcome,City
2024-03-04,2024-03-01,Sto. Nino,Alive,X
2024-03-04,2024-03-01,SANTO NIÑO,Alive,X
";
        let result = aggregate(csv);
        assert_eq!(result.groups.len(), 1, "{:?}", result.groups);
        assert_eq!(result.groups[0].case_count, 2);
    }

    #[test]
    fn bad_rows_never_abort_the_run() {
        let csv = "\
DateAdmitted,DateOnset,Neighborhood,Outcome,City
1899-12-31,1899-12-30,A,Alive,X
tomorrow,2024-03-01,A,Alive,X
2024-03-04,2024-03-01,A,Alive,X
";
        let result = aggregate(csv);
        assert_eq!(result.report.rows_read, 3);
        assert_eq!(result.report.rows_valid, 1);
        assert_eq!(result.report.errors.len(), 2);
        assert!(
            result
                .report
                .errors
                .iter()
                .all(|e| e.reason == RejectionReason::InvalidDate)
        );
    }

    #[test]
    fn latin1_rows_are_rejected_instead_of_split_off() {
        let mut csv = b"DateAdmitted,DateOnset,Neighborhood,Outcome,City\n".to_vec();
        csv.extend_from_slice(b"2024-03-04,2024-03-01,Santo Ni\xF1o,Alive,X\n");
        csv.extend_from_slice("2024-03-04,2024-03-01,Santo Niño,Alive,X\n".as_bytes());

        let result =
            aggregate_admissions(csv.as_slice(), &default_normalizer(), &null_progress()).unwrap();

        assert_eq!(result.groups.len(), 1, "{:?}", result.groups);
        assert_eq!(result.groups[0].neighborhood, "SANTO NIÑO");
        assert_eq!(result.groups[0].case_count, 1);
        assert_eq!(result.report.rows_read, 2);
        assert_eq!(result.report.rows_valid, 1);
        assert_eq!(result.report.errors.len(), 1);
        assert_eq!(result.report.errors[0].reason, RejectionReason::Malformed);
        assert_eq!(result.report.errors[0].line, 2);
    }

    #[test]
    fn missing_header_is_fatal() {
        let csv = "DateAdmitted,Neighborhood\n2024-03-04,A\n";
        let err = aggregate_admissions(csv.as_bytes(), &NameNormalizer::default(), &null_progress())
            .unwrap_err();
        assert!(matches!(err, IngestError::MissingHeaders { .. }), "{err}");
    }
}
