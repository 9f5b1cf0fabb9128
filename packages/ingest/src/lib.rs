#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ingestion of raw dengue admission line-lists.
//!
//! Reads the per-admission CSV as a stream, validates each row, normalizes
//! neighborhood names through a [`NameNormalizer`] supplied by the caller,
//! and aggregates admissions into the canonical
//! `(admission date, neighborhood)` summary that the analytics crate
//! reads. Invalid rows are reported, not fatal; a missing header column is
//! the one failure that aborts a file.

pub mod aggregate;
pub mod progress;
pub mod raw;
pub mod summary;

use std::path::Path;
use std::sync::Arc;

use dengue_watch_ingest_models::IngestReport;
use dengue_watch_neighborhood::normalize::NameNormalizer;
use thiserror::Error;

use crate::aggregate::aggregate_admissions;
use crate::progress::ProgressCallback;
use crate::summary::write_summary_file;

/// Errors that can abort an ingestion run.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Reading the input or writing the output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV stream could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The raw file lacks required header columns.
    #[error("Raw line-list is missing required columns: {}", missing.join(", "))]
    MissingHeaders {
        /// Names of the absent columns.
        missing: Vec<String>,
    },

    /// More rows were rejected than the caller allows.
    #[error("{} rows failed validation (limit {limit}); summary not written", report.rows_rejected())]
    TooManyRejections {
        /// The configured limit.
        limit: u64,
        /// Report of the aborted run.
        report: Box<IngestReport>,
    },
}

/// Ingests the raw line-list at `input` and writes the canonical summary
/// to `output`.
///
/// The output is written through a temporary file and renamed into
/// place, so a failed run never leaves a partial summary behind. When
/// `max_rejections` is set and more rows than that fail validation,
/// nothing is written.
///
/// # Errors
///
/// Returns [`IngestError`] if `input` cannot be read, its header is
/// missing required columns, too many rows are rejected, or `output`
/// cannot be written.
pub fn ingest_file(
    input: &Path,
    output: &Path,
    normalizer: &NameNormalizer,
    progress: &Arc<dyn ProgressCallback>,
    max_rejections: Option<u64>,
) -> Result<IngestReport, IngestError> {
    let file = std::fs::File::open(input)?;
    if let Ok(metadata) = file.metadata() {
        progress.set_total(metadata.len());
    }
    progress.set_message(format!("Reading {}", input.display()));

    let aggregation = aggregate_admissions(std::io::BufReader::new(file), normalizer, progress)?;
    let report = aggregation.report;

    progress.finish(format!(
        "{} rows -> {} groups",
        report.rows_read, report.groups_produced
    ));

    if let Some(limit) = max_rejections
        && report.rows_rejected() > limit
    {
        return Err(IngestError::TooManyRejections {
            limit,
            report: Box::new(report),
        });
    }

    write_summary_file(output, &aggregation.groups)?;
    log::info!("Wrote {} summary rows to {}", report.groups_produced, output.display());

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::null_progress;
    use dengue_watch_neighborhood::registry::default_normalizer;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "dengue_watch_ingest_{name}_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn ingests_file_to_summary() {
        let dir = scratch_dir("roundtrip");
        let input = dir.join("raw.csv");
        let output = dir.join("summary.csv");
        std::fs::write(
            &input,
            "\
DateAdmitted,DateOnset,Neighborhood,Outcome,City
2024-03-05,2024-03-01,Poblacion,Alive,X
2024-03-04,2024-03-01,Pob.,Died,X
2024-03-04,2024-03-02,POBLACION,Died,X
bad,2024-03-02,POBLACION,Died,X
",
        )
        .unwrap();

        let report =
            ingest_file(&input, &output, &default_normalizer(), &null_progress(), None).unwrap();

        assert_eq!(report.rows_read, 4);
        assert_eq!(report.rows_valid, 3);
        assert_eq!(report.groups_produced, 2);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "DateAdmitted,Neighborhood,CaseCount,Deaths,Recoveries\n\
             2024-03-04,POBLACION,2,2,0\n\
             2024-03-05,POBLACION,1,0,1\n"
        );
        assert!(!dir.join("summary.csv.tmp").exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn header_failure_leaves_no_output() {
        let dir = scratch_dir("bad_header");
        let input = dir.join("raw.csv");
        let output = dir.join("summary.csv");
        std::fs::write(&input, "DateAdmitted,City\n2024-03-04,X\n").unwrap();

        let err = ingest_file(
            &input,
            &output,
            &NameNormalizer::default(),
            &null_progress(),
            None,
        )
        .unwrap_err();

        assert!(matches!(err, IngestError::MissingHeaders { .. }), "{err}");
        assert!(!output.exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn rejection_limit_blocks_the_write() {
        let dir = scratch_dir("rejection_limit");
        let input = dir.join("raw.csv");
        let output = dir.join("summary.csv");
        std::fs::write(
            &input,
            "\
DateAdmitted,DateOnset,Neighborhood,Outcome,City
2024-03-04,2024-03-01,A,Alive,X
someday,2024-03-01,A,Alive,X
2024-03-04,,A,Alive,X
",
        )
        .unwrap();
        let normalizer = NameNormalizer::default();

        let err = ingest_file(&input, &output, &normalizer, &null_progress(), Some(1)).unwrap_err();
        match err {
            IngestError::TooManyRejections { limit, report } => {
                assert_eq!(limit, 1);
                assert_eq!(report.rows_rejected(), 2);
                assert_eq!(report.rows_valid, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!output.exists());

        let report = ingest_file(&input, &output, &normalizer, &null_progress(), Some(2)).unwrap();
        assert_eq!(report.rows_rejected(), 2);
        assert!(output.exists());

        std::fs::remove_dir_all(&dir).ok();
    }
}
