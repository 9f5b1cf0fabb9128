//! Neighborhood adjacency lookup.
//!
//! The geospatial adjacency computation lives outside this workspace.
//! Analytics only needs "who borders this neighborhood", expressed by
//! [`NeighborLookup`]. A static TOML-backed table is provided for the CLI
//! and for tests; closures implement the trait directly.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use dengue_watch_neighborhood_models::AdjacencyTable;

use crate::NeighborhoodError;
use crate::normalize::neighborhood_key;

/// Source of neighbor names for a neighborhood.
pub trait NeighborLookup {
    /// Returns the names of the neighborhoods adjacent to `neighborhood`.
    fn neighbors(&self, neighborhood: &str) -> Vec<String>;
}

impl<F> NeighborLookup for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn neighbors(&self, neighborhood: &str) -> Vec<String> {
        self(neighborhood)
    }
}

/// Symmetric adjacency loaded from an [`AdjacencyTable`].
///
/// If the table lists `A -> B`, lookups of `B` also return `A`.
#[derive(Debug, Clone, Default)]
pub struct StaticAdjacency {
    /// Neighborhood key -> neighbor display names.
    neighbors: BTreeMap<String, BTreeSet<String>>,
}

impl StaticAdjacency {
    /// Builds a symmetric lookup from a parsed table.
    #[must_use]
    pub fn from_table(table: &AdjacencyTable) -> Self {
        let mut neighbors: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for (name, adjacent) in &table.neighbors {
            for other in adjacent {
                if neighborhood_key(name) == neighborhood_key(other) {
                    continue;
                }
                neighbors
                    .entry(neighborhood_key(name))
                    .or_default()
                    .insert(other.trim().to_string());
                neighbors
                    .entry(neighborhood_key(other))
                    .or_default()
                    .insert(name.trim().to_string());
            }
        }

        Self { neighbors }
    }

    /// Parses an adjacency table from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`NeighborhoodError::Toml`] if the TOML is invalid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, NeighborhoodError> {
        let table: AdjacencyTable = toml::de::from_str(toml_str)?;
        Ok(Self::from_table(&table))
    }

    /// Reads and parses an adjacency table file.
    ///
    /// # Errors
    ///
    /// Returns [`NeighborhoodError`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, NeighborhoodError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

impl NeighborLookup for StaticAdjacency {
    fn neighbors(&self, neighborhood: &str) -> Vec<String> {
        self.neighbors
            .get(&neighborhood_key(neighborhood))
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_adjacency_is_symmetric() {
        let adjacency = StaticAdjacency::from_toml_str(
            r#"
[neighbors]
"POBLACION" = ["SAN JOSE", "SANTA CRUZ"]
"#,
        )
        .unwrap();

        assert_eq!(adjacency.neighbors("Poblacion"), ["SAN JOSE", "SANTA CRUZ"]);
        assert_eq!(adjacency.neighbors("san jose"), ["POBLACION"]);
        assert!(adjacency.neighbors("TAGPURO").is_empty());
    }

    #[test]
    fn ignores_self_adjacency() {
        let adjacency = StaticAdjacency::from_toml_str(
            r#"
[neighbors]
"POBLACION" = ["Poblacion"]
"#,
        )
        .unwrap();
        assert!(adjacency.neighbors("POBLACION").is_empty());
    }

    #[test]
    fn closures_are_lookups() {
        let lookup = |name: &str| vec![format!("{name} NORTE")];
        assert_eq!(lookup.neighbors("TIGBAO"), ["TIGBAO NORTE"]);
    }
}
