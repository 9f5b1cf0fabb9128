//! Compile-time default alias table and known-neighborhood list loading.
//!
//! The default alias table is embedded via `include_str!`. Adding a
//! newly observed misspelling only requires editing
//! `aliases/default.toml`.

use std::collections::BTreeSet;
use std::io::BufRead;

use dengue_watch_neighborhood_models::AliasTable;

use crate::NeighborhoodError;
use crate::normalize::{NameNormalizer, collapse_whitespace, neighborhood_key};

/// Embedded default alias table.
const DEFAULT_ALIASES: &str = include_str!("../aliases/default.toml");

/// Returns the parsed default alias table.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. Since it is a
/// compile-time constant, a parse failure indicates a development error
/// and is caught by the tests below.
#[must_use]
pub fn default_alias_table() -> AliasTable {
    toml::de::from_str(DEFAULT_ALIASES)
        .unwrap_or_else(|e| panic!("Failed to parse default alias table: {e}"))
}

/// Returns a normalizer built from the embedded default alias table.
///
/// # Panics
///
/// Panics if the embedded table fails to parse or contains conflicting
/// aliases.
#[must_use]
pub fn default_normalizer() -> NameNormalizer {
    NameNormalizer::from_table(&default_alias_table())
        .unwrap_or_else(|e| panic!("Invalid default alias table: {e}"))
}

/// Reads a known-neighborhood list, one name per line.
///
/// Blank lines and lines starting with `#` are ignored. Names are
/// whitespace-collapsed and deduplicated case-insensitively, keeping the
/// first spelling seen and the original order.
///
/// # Errors
///
/// Returns [`NeighborhoodError::Io`] if reading fails.
pub fn read_known_neighborhoods(reader: impl BufRead) -> Result<Vec<String>, NeighborhoodError> {
    let mut seen = BTreeSet::new();
    let mut names = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let name = collapse_whitespace(&line);
        if name.is_empty() || name.starts_with('#') {
            continue;
        }
        if seen.insert(neighborhood_key(&name)) {
            names.push(name);
        } else {
            log::debug!("Skipping duplicate known neighborhood '{name}'");
        }
    }

    Ok(names)
}
