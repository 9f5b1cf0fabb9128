//! Neighborhood name normalization.
//!
//! Applied to every raw line-list row before grouping, and to names
//! supplied by callers before matching, so that "Sto. Nino",
//! "sto  niño" and "SANTO NIÑO" all land in the same bucket.

use std::collections::BTreeMap;
use std::path::Path;

use dengue_watch_neighborhood_models::AliasTable;

use crate::NeighborhoodError;

/// Collapses every run of whitespace into a single space and trims the
/// ends.
#[must_use]
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the matching key for a neighborhood name: trimmed,
/// whitespace-collapsed, and uppercased.
///
/// Two names refer to the same neighborhood when their keys are equal.
#[must_use]
pub fn neighborhood_key(name: &str) -> String {
    collapse_whitespace(name).to_uppercase()
}

/// Immutable lookup from known name variants to canonical names.
///
/// Built once at startup and passed by reference into ingestion.
#[derive(Debug, Clone, Default)]
pub struct NameNormalizer {
    /// Variant key -> canonical key.
    aliases: BTreeMap<String, String>,
}

impl NameNormalizer {
    /// Builds a normalizer from a parsed alias table.
    ///
    /// # Errors
    ///
    /// Returns [`NeighborhoodError::ConflictingAlias`] if a variant is
    /// listed under two different canonical names.
    pub fn from_table(table: &AliasTable) -> Result<Self, NeighborhoodError> {
        let mut aliases: BTreeMap<String, String> = BTreeMap::new();

        for alias in &table.aliases {
            let canonical = neighborhood_key(&alias.canonical);
            for variant in &alias.variants {
                let key = neighborhood_key(variant);
                if let Some(existing) = aliases.get(&key)
                    && *existing != canonical
                {
                    return Err(NeighborhoodError::ConflictingAlias {
                        variant: key,
                        first: existing.clone(),
                        second: canonical,
                    });
                }
                aliases.insert(key, canonical.clone());
            }
        }

        log::debug!("Loaded {} neighborhood name aliases", aliases.len());

        Ok(Self { aliases })
    }

    /// Parses an alias table from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`NeighborhoodError`] if the TOML is invalid or contains
    /// conflicting aliases.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, NeighborhoodError> {
        let table: AliasTable = toml::de::from_str(toml_str)?;
        Self::from_table(&table)
    }

    /// Reads and parses an alias table file.
    ///
    /// # Errors
    ///
    /// Returns [`NeighborhoodError`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, NeighborhoodError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Normalizes a raw neighborhood name.
    ///
    /// Known variants are rewritten to their canonical spelling; the
    /// result is always uppercased and whitespace-collapsed.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        let key = neighborhood_key(raw);
        match self.aliases.get(&key) {
            Some(canonical) => canonical.clone(),
            None => key,
        }
    }

    /// Number of variant spellings in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns `true` if the table has no aliases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
[[alias]]
canonical = "Santo Niño"
variants = ["Sto. Nino", "Sto Niño", "Santo Nino"]

[[alias]]
canonical = "San Jose"
variants = ["San-Jose", "Sn. Jose"]
"#;

    #[test]
    fn collapses_internal_whitespace() {
        assert_eq!(collapse_whitespace("  San   Isidro \t Norte "), "San Isidro Norte");
    }

    #[test]
    fn keys_are_case_insensitive() {
        assert_eq!(neighborhood_key(" poblacion "), neighborhood_key("POBLACION"));
    }

    #[test]
    fn rewrites_known_variants() {
        let normalizer = NameNormalizer::from_toml_str(TABLE).unwrap();
        assert_eq!(normalizer.normalize("sto. nino"), "SANTO NIÑO");
        assert_eq!(normalizer.normalize("Sto  Niño"), "SANTO NIÑO");
        assert_eq!(normalizer.normalize("san-jose"), "SAN JOSE");
    }

    #[test]
    fn passes_through_unknown_names() {
        let normalizer = NameNormalizer::from_toml_str(TABLE).unwrap();
        assert_eq!(normalizer.normalize("  Tagpuro  "), "TAGPURO");
    }

    #[test]
    fn empty_normalizer_only_uppercases() {
        let normalizer = NameNormalizer::default();
        assert!(normalizer.is_empty());
        assert_eq!(normalizer.normalize("sto. nino"), "STO. NINO");
    }

    #[test]
    fn rejects_conflicting_variants() {
        let table = r#"
[[alias]]
canonical = "San Jose"
variants = ["SJ"]

[[alias]]
canonical = "San Juan"
variants = ["sj"]
"#;
        let err = NameNormalizer::from_toml_str(table).unwrap_err();
        assert!(
            matches!(err, NeighborhoodError::ConflictingAlias { ref variant, .. } if variant == "SJ"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn repeated_variant_for_same_canonical_is_accepted() {
        let table = r#"
[[alias]]
canonical = "Poblacion"
variants = ["Pob.", "POB."]

[[alias]]
canonical = "poblacion"
variants = ["pob."]
"#;
        let normalizer = NameNormalizer::from_toml_str(table).unwrap();
        assert_eq!(normalizer.normalize("Pob."), "POBLACION");
    }
}
