#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighborhood name normalization, registry loading, and adjacency.
//!
//! Raw line-lists spell barangay names inconsistently (missing
//! diacritics, abbreviated saints' names, stray hyphens). The
//! [`normalize::NameNormalizer`] rewrites known variants to a canonical
//! spelling before uppercasing, so that every downstream grouping sees a
//! single name per neighborhood. The default alias table is embedded at
//! compile time; adjacency tables are read at runtime.

pub mod adjacency;
pub mod normalize;
pub mod registry;

use thiserror::Error;

/// Errors that can occur while loading neighborhood tables.
#[derive(Debug, Error)]
pub enum NeighborhoodError {
    /// Reading a table file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A table file is not valid TOML for its schema.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The same variant maps to two different canonical names.
    #[error("Alias '{variant}' maps to both '{first}' and '{second}'")]
    ConflictingAlias {
        /// The variant spelling, normalized.
        variant: String,
        /// Canonical name it was first mapped to.
        first: String,
        /// Canonical name it was mapped to again.
        second: String,
    },
}
