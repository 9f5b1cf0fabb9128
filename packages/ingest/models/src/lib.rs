#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ingestion report and row validation types.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Why a raw row was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RejectionReason {
    /// A required field is empty.
    MissingField,
    /// A date field could not be parsed or its year is out of range.
    InvalidDate,
    /// A field is not valid UTF-8.
    Malformed,
}

/// A raw row that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowValidationError {
    /// 1-based line number in the source file (header is line 1).
    pub line: u64,
    /// Offending column, when the failure is tied to one.
    pub column: Option<String>,
    /// Category of the failure.
    pub reason: RejectionReason,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for RowValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Outcome of one ingestion run.
///
/// `rows_read == rows_valid + errors.len()` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    /// Data rows read, excluding the header.
    pub rows_read: u64,
    /// Rows that passed validation and were aggregated.
    pub rows_valid: u64,
    /// Distinct `(admission date, neighborhood)` groups produced.
    pub groups_produced: u64,
    /// Every rejected row, in file order.
    pub errors: Vec<RowValidationError>,
}

impl IngestReport {
    /// Number of rejected rows.
    #[must_use]
    pub const fn rows_rejected(&self) -> u64 {
        self.rows_read - self.rows_valid
    }
}
