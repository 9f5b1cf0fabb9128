#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dengue case record types shared by ingestion and analytics.
//!
//! The canonical summary CSV (one row per admission date and
//! neighborhood) maps directly onto [`CaseRecord`], so the same type is
//! used to write the summary during ingestion and to read it back in the
//! analyzers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Column headers of the canonical summary CSV, in file order.
pub const SUMMARY_HEADERS: [&str; 5] = [
    "DateAdmitted",
    "Neighborhood",
    "CaseCount",
    "Deaths",
    "Recoveries",
];

/// Patient outcome recorded on a raw admission row.
///
/// Parsing is case-insensitive. Anything other than `died` or `alive`
/// classifies as [`Outcome::Other`], which still counts as a case.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Outcome {
    /// The patient died.
    Died,
    /// The patient recovered.
    Alive,
    /// Any other or unrecorded outcome.
    Other,
}

impl Outcome {
    /// Classifies a raw outcome value.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        raw.trim().parse().unwrap_or(Self::Other)
    }
}

/// Columns of the raw per-admission line-list CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum RawColumn {
    /// Date the patient was admitted.
    DateAdmitted,
    /// Date symptoms began.
    DateOnset,
    /// Free-text neighborhood (barangay) name.
    Neighborhood,
    /// Outcome of the admission (`Died`, `Alive`, ...).
    Outcome,
    /// City of residence.
    City,
}

impl RawColumn {
    /// Returns all required raw columns in file order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::DateAdmitted,
            Self::DateOnset,
            Self::Neighborhood,
            Self::Outcome,
            Self::City,
        ]
    }
}

/// One aggregated `(admission date, neighborhood)` bucket.
///
/// Field names map onto the canonical summary CSV columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Admission date of every case in this bucket.
    #[serde(rename = "DateAdmitted")]
    pub admission_date: NaiveDate,
    /// Normalized neighborhood name.
    #[serde(rename = "Neighborhood")]
    pub neighborhood: String,
    /// Number of admissions.
    #[serde(rename = "CaseCount")]
    pub case_count: u32,
    /// Number of admissions with a `Died` outcome.
    #[serde(rename = "Deaths")]
    pub deaths: u32,
    /// Number of admissions with an `Alive` outcome.
    #[serde(rename = "Recoveries")]
    pub recoveries: u32,
}

impl CaseRecord {
    /// Creates a record with no deaths or recoveries.
    #[must_use]
    pub fn cases(admission_date: NaiveDate, neighborhood: &str, case_count: u32) -> Self {
        Self {
            admission_date,
            neighborhood: neighborhood.to_string(),
            case_count,
            deaths: 0,
            recoveries: 0,
        }
    }
}

/// One line of the raw line-list CSV, as read.
///
/// Values are untrimmed strings; validation happens in the ingestion
/// pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAdmissionRow {
    /// 1-based line number in the source file (header is line 1).
    pub line: u64,
    /// Raw `DateAdmitted` value.
    pub admission_date: String,
    /// Raw `DateOnset` value.
    pub onset_date: String,
    /// Raw `Neighborhood` value.
    pub neighborhood: String,
    /// Raw `Outcome` value.
    pub outcome: String,
    /// Raw `City` value.
    pub city: String,
}

impl RawAdmissionRow {
    /// Returns the raw value for a column.
    #[must_use]
    pub fn get(&self, column: RawColumn) -> &str {
        match column {
            RawColumn::DateAdmitted => &self.admission_date,
            RawColumn::DateOnset => &self.onset_date,
            RawColumn::Neighborhood => &self.neighborhood,
            RawColumn::Outcome => &self.outcome,
            RawColumn::City => &self.city,
        }
    }
}

/// A raw admission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    /// Parsed admission date.
    pub admission_date: NaiveDate,
    /// Parsed onset date.
    pub onset_date: NaiveDate,
    /// Neighborhood name after alias lookup and normalization.
    pub neighborhood: String,
    /// Classified outcome.
    pub outcome: Outcome,
    /// City, trimmed.
    pub city: String,
}
