//! Streaming reader and validation for the raw line-list CSV.
//!
//! [`RawRows`] checks the header row up front and then yields one
//! [`RawAdmissionRow`] per data line, lazily. It is single-pass: to read
//! the file again, open it again. [`validate`] turns a raw row into an
//! [`Admission`] or a [`RowValidationError`].

use std::io::Read;

use chrono::{Datelike as _, NaiveDate, NaiveDateTime};
use dengue_watch_case_models::{Admission, Outcome, RawAdmissionRow, RawColumn};
use dengue_watch_ingest_models::{RejectionReason, RowValidationError};
use dengue_watch_neighborhood::normalize::NameNormalizer;

use crate::IngestError;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Alternate header spelling accepted for each column.
const fn camel_case_header(column: RawColumn) -> &'static str {
    match column {
        RawColumn::DateAdmitted => "admissionDate",
        RawColumn::DateOnset => "onsetDate",
        RawColumn::Neighborhood => "neighborhood",
        RawColumn::Outcome => "outcome",
        RawColumn::City => "city",
    }
}

fn header_matches(column: RawColumn, header: &str) -> bool {
    let header = header.trim();
    header.eq_ignore_ascii_case(column.as_ref())
        || header.eq_ignore_ascii_case(camel_case_header(column))
}

/// One data line: the decoded row, or why its bytes could not be read.
pub type RawRow = Result<RawAdmissionRow, RowValidationError>;

/// Lazily reads raw admission rows from a CSV source.
///
/// Reading stops with an [`IngestError`] only when the CSV stream itself
/// fails. A line whose fields are not valid UTF-8 is yielded as a
/// [`RejectionReason::Malformed`] row error.
pub struct RawRows<R: Read> {
    reader: csv::Reader<R>,
    /// Field index of each [`RawColumn::all`] column.
    columns: Vec<usize>,
    record: csv::ByteRecord,
}

impl<R: Read> RawRows<R> {
    /// Reads and checks the header row.
    ///
    /// Header names match case-insensitively, as `DateAdmitted` or
    /// `admissionDate` style. Extra columns are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::MissingHeaders`] if any required column is
    /// absent, or [`IngestError::Csv`] if the header cannot be read.
    pub fn new(source: R) -> Result<Self, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(source);

        let headers: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|h| String::from_utf8_lossy(h).trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut columns = Vec::with_capacity(RawColumn::all().len());
        let mut missing = Vec::new();
        for column in RawColumn::all() {
            match headers.iter().position(|h| header_matches(*column, h)) {
                Some(index) => columns.push(index),
                None => missing.push(column.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(IngestError::MissingHeaders { missing });
        }

        Ok(Self {
            reader,
            columns,
            record: csv::ByteRecord::new(),
        })
    }

    /// Bytes of the source consumed so far.
    #[must_use]
    pub fn byte_position(&self) -> u64 {
        self.reader.position().byte()
    }

    fn field(&self, line: u64, column: RawColumn) -> Result<String, RowValidationError> {
        let Some(value) = RawColumn::all()
            .iter()
            .position(|c| *c == column)
            .and_then(|position| self.columns.get(position))
            .and_then(|index| self.record.get(*index))
        else {
            return Ok(String::new());
        };

        String::from_utf8(value.to_vec()).map_err(|e| RowValidationError {
            line,
            column: Some(column.to_string()),
            reason: RejectionReason::Malformed,
            message: format!(
                "{column} is not valid UTF-8 (invalid byte at offset {})",
                e.utf8_error().valid_up_to()
            ),
        })
    }

    fn decode(&self) -> RawRow {
        let line = self.record.position().map_or(0, csv::Position::line);
        Ok(RawAdmissionRow {
            line,
            admission_date: self.field(line, RawColumn::DateAdmitted)?,
            onset_date: self.field(line, RawColumn::DateOnset)?,
            neighborhood: self.field(line, RawColumn::Neighborhood)?,
            outcome: self.field(line, RawColumn::Outcome)?,
            city: self.field(line, RawColumn::City)?,
        })
    }
}

impl<R: Read> Iterator for RawRows<R> {
    type Item = Result<RawRow, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_byte_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => Some(Ok(self.decode())),
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// Parses a raw date in any accepted format.
///
/// Returns `None` unless the year is strictly between 1900 and 2100.
#[must_use]
pub fn parse_raw_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    let date = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|datetime| datetime.date())
        })?;

    (1900 < date.year() && date.year() < 2100).then_some(date)
}

/// Validates a raw row and normalizes its neighborhood.
///
/// # Errors
///
/// Returns a [`RowValidationError`] for the first empty required field or
/// unparseable date.
pub fn validate(
    row: &RawAdmissionRow,
    normalizer: &NameNormalizer,
) -> Result<Admission, RowValidationError> {
    let rejection = |column: RawColumn, reason: RejectionReason, message: String| {
        RowValidationError {
            line: row.line,
            column: Some(column.to_string()),
            reason,
            message,
        }
    };

    if let Some(column) = RawColumn::all()
        .iter()
        .find(|column| row.get(**column).trim().is_empty())
    {
        return Err(rejection(
            *column,
            RejectionReason::MissingField,
            format!("missing required field {column}"),
        ));
    }

    let date = |column: RawColumn| {
        parse_raw_date(row.get(column)).ok_or_else(|| {
            rejection(
                column,
                RejectionReason::InvalidDate,
                format!("invalid {column} '{}'", row.get(column).trim()),
            )
        })
    };

    Ok(Admission {
        admission_date: date(RawColumn::DateAdmitted)?,
        onset_date: date(RawColumn::DateOnset)?,
        neighborhood: normalizer.normalize(&row.neighborhood),
        outcome: Outcome::classify(&row.outcome),
        city: row.city.trim().to_string(),
    })
}
