//! Canonical summary loading.
//!
//! Analyzers either receive records the caller already holds or a path
//! to the canonical summary CSV written by ingestion. Malformed rows
//! (unparseable dates, negative or non-numeric counts) are skipped and
//! logged so one bad line never sinks the whole analysis.

use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

use dengue_watch_analytics_models::AnalysisOutcome;
use dengue_watch_case_models::{CaseRecord, SUMMARY_HEADERS};

use crate::AnalyticsError;

/// Where an analyzer gets its case records from.
#[derive(Debug, Clone, Copy)]
pub enum CaseSource<'a> {
    /// Records already loaded by the caller.
    Records(&'a [CaseRecord]),
    /// Path to a canonical summary CSV.
    File(&'a Path),
}

impl<'a> CaseSource<'a> {
    /// Loads the records, reading and parsing the file if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError`] if the file cannot be read or lacks
    /// required columns.
    pub fn load(&self) -> Result<Cow<'a, [CaseRecord]>, AnalyticsError> {
        match *self {
            Self::Records(records) => Ok(Cow::Borrowed(records)),
            Self::File(path) => read_summary_file(path).map(Cow::Owned),
        }
    }
}

/// Loads a source for analysis, turning a failure or an empty dataset
/// into the reason reported by
/// [`AnalysisOutcome::DataUnavailable`].
///
/// # Errors
///
/// Returns the unavailability reason if the source cannot be read or has
/// no records.
pub fn load_for_analysis<'a>(source: &CaseSource<'a>) -> Result<Cow<'a, [CaseRecord]>, String> {
    match source.load() {
        Ok(records) if records.is_empty() => {
            log::warn!("Case dataset is empty");
            Err(AnalysisOutcome::<()>::NO_DATA.to_string())
        }
        Ok(records) => Ok(records),
        Err(e) => {
            log::warn!("Failed to load case dataset: {e}");
            Err(format!("{} ({e})", AnalysisOutcome::<()>::NO_DATA))
        }
    }
}

/// Reads a canonical summary CSV file.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the file cannot be opened or lacks
/// required columns.
pub fn read_summary_file(path: &Path) -> Result<Vec<CaseRecord>, AnalyticsError> {
    let file = std::fs::File::open(path)?;
    let records = read_summary(file)?;
    log::debug!("Loaded {} summary rows from {}", records.len(), path.display());
    Ok(records)
}

/// Reads canonical summary rows from any reader.
///
/// Rows that fail to parse are skipped with a warning.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the header row cannot be read or lacks
/// required columns.
pub fn read_summary(reader: impl Read) -> Result<Vec<CaseRecord>, AnalyticsError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = SUMMARY_HEADERS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .map(|required| (*required).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AnalyticsError::MissingColumns { missing });
    }

    let mut records = Vec::new();
    let mut skipped = 0_u64;

    for (i, result) in reader.deserialize::<CaseRecord>().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                // Header is line 1, first data row is line 2.
                log::warn!("Skipping summary row {}: {e}", i + 2);
            }
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} malformed summary row(s)");
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SUMMARY: &str = "\
DateAdmitted,Neighborhood,CaseCount,Deaths,Recoveries
2024-03-04,POBLACION,3,1,2
2024-03-05,\"SAN JOSE, NORTE\",2,0,2
not-a-date,POBLACION,1,0,1
2024-03-06,POBLACION,-4,0,0
2024-03-07,TAGPURO,abc,0,0
";

    #[test]
    fn reads_rows_and_skips_malformed_ones() {
        let records = read_summary(SUMMARY.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            CaseRecord {
                admission_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                neighborhood: "POBLACION".to_string(),
                case_count: 3,
                deaths: 1,
                recoveries: 2,
            }
        );
        assert_eq!(records[1].neighborhood, "SAN JOSE, NORTE");
    }

    #[test]
    fn missing_columns_fail_the_file() {
        let err = read_summary("DateAdmitted,Neighborhood\n2024-03-04,X\n".as_bytes()).unwrap_err();
        assert!(
            matches!(err, AnalyticsError::MissingColumns { ref missing } if missing.len() == 3),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn empty_and_unreadable_sources_are_unavailable() {
        let empty: Vec<CaseRecord> = Vec::new();
        assert!(load_for_analysis(&CaseSource::Records(&empty)).is_err());

        let missing = Path::new("/nonexistent/dengue/summary.csv");
        let reason = load_for_analysis(&CaseSource::File(missing)).unwrap_err();
        assert!(reason.starts_with(AnalysisOutcome::<()>::NO_DATA), "{reason}");
    }
}
