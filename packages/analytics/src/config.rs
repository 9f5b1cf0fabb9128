//! Loading [`AnalysisConfig`] from TOML.
//!
//! ```toml
//! [spike]
//! eps = 2.0
//! min_samples = 2
//!
//! [stability]
//! slope_threshold = 0.0
//! ```
//!
//! Omitted sections and fields keep their defaults.

use std::path::Path;

use dengue_watch_analytics_models::AnalysisConfig;

use crate::AnalyticsError;

/// Parses a config from TOML text.
///
/// # Errors
///
/// Returns [`AnalyticsError::Config`] if the TOML is invalid.
pub fn parse_config(toml_str: &str) -> Result<AnalysisConfig, AnalyticsError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// Reads a config file.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<AnalysisConfig, AnalyticsError> {
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    log::debug!("Loaded analysis config from {}: {config:?}", path.display());
    Ok(config)
}
