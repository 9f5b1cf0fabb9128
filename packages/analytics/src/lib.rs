#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dengue surveillance time-series analytics.
//!
//! Takes the canonical `(admission date, neighborhood)` case summary and
//! answers the questions health officers ask each week: which
//! neighborhoods are spiking, rising, declining, smoldering, or flat;
//! where people are dying; whether a fogging or clean-up drive reduced
//! cases; and how a single neighborhood's recent weeks compare.
//!
//! Every analyzer accepts a [`dataset::CaseSource`] (records already in
//! memory, or a path to the summary CSV) and an explicit reference date,
//! and returns plain data from `dengue_watch_analytics_models`. A missing
//! or empty dataset yields
//! [`AnalysisOutcome::DataUnavailable`](dengue_watch_analytics_models::AnalysisOutcome)
//! rather than an error.

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod dataset;
pub mod deaths;
pub mod hotspots;
pub mod intervention;
pub mod patterns;
pub mod priority;
pub mod summary;
pub mod trends;

use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Reading a dataset or config file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The summary CSV could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The summary CSV lacks required columns.
    #[error("Summary CSV is missing columns: {}", missing.join(", "))]
    MissingColumns {
        /// Names of the absent columns.
        missing: Vec<String>,
    },

    /// The analysis config is not valid TOML for its schema.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// A regression could not be fitted for a neighborhood.
    #[error("Regression failed for {neighborhood}: {message}")]
    Regression {
        /// Neighborhood whose series was degenerate.
        neighborhood: String,
        /// Description of what went wrong.
        message: String,
    },
}
