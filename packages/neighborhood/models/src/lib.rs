#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighborhood name alias and adjacency table types.
//!
//! Defines the TOML schema for the table of known historical
//! misspellings and variants of neighborhood (barangay) names, and for
//! the optional adjacency table used to expand hotspots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A table of neighborhood name aliases, deserialized from TOML.
///
/// ```toml
/// [[alias]]
/// canonical = "Santo Niño"
/// variants = ["Sto. Nino", "Sto Niño", "Santo Nino"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AliasTable {
    /// Alias groups, one per canonical name.
    #[serde(default, rename = "alias")]
    pub aliases: Vec<NameAlias>,
}

/// A canonical neighborhood name and the variants that map onto it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameAlias {
    /// Name every variant is rewritten to.
    pub canonical: String,
    /// Known spellings found in historical line-lists.
    pub variants: Vec<String>,
}

/// Neighborhood adjacency, deserialized from TOML.
///
/// ```toml
/// [neighbors]
/// "POBLACION" = ["SAN ISIDRO", "SANTA CRUZ"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdjacencyTable {
    /// Neighbor names keyed by neighborhood name.
    #[serde(default)]
    pub neighbors: BTreeMap<String, Vec<String>>,
}
