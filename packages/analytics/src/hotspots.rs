//! Hotspot expansion.
//!
//! A neighborhood whose resolved pattern is a spike or a gradual rise is
//! a hotspot. Its neighbors that are not hotspots themselves are at risk.

use std::collections::{BTreeMap, BTreeSet};

use dengue_watch_analytics_models::{Hotspot, HotspotKind, Pattern, PatternAlert};
use dengue_watch_neighborhood::adjacency::NeighborLookup;
use dengue_watch_neighborhood::normalize::{collapse_whitespace, neighborhood_key};

/// Returns `true` for patterns that make a neighborhood a hotspot.
#[must_use]
pub const fn is_hotspot_pattern(pattern: Pattern) -> bool {
    matches!(pattern, Pattern::Spike | Pattern::GradualRise)
}

/// Lists hotspots in `resolved` order, followed by their at-risk
/// neighbors in the order they were first reached.
///
/// Each at-risk neighbor appears once, naming every hotspot it borders.
#[must_use]
pub fn expand_hotspots(resolved: &[PatternAlert], lookup: &dyn NeighborLookup) -> Vec<Hotspot> {
    let mut hotspots: Vec<Hotspot> = Vec::new();
    let mut hotspot_keys: BTreeSet<String> = BTreeSet::new();

    for alert in resolved.iter().filter(|a| is_hotspot_pattern(a.pattern)) {
        if hotspot_keys.insert(neighborhood_key(&alert.neighborhood)) {
            hotspots.push(Hotspot {
                neighborhood: alert.neighborhood.clone(),
                kind: HotspotKind::Hotspot {
                    pattern: alert.pattern,
                },
            });
        }
    }

    let mut at_risk: Vec<Hotspot> = Vec::new();
    let mut positions: BTreeMap<String, usize> = BTreeMap::new();

    for hotspot in &hotspots {
        for neighbor in lookup.neighbors(&hotspot.neighborhood) {
            let key = neighborhood_key(&neighbor);
            if key.is_empty() || hotspot_keys.contains(&key) {
                continue;
            }

            let position = *positions.entry(key).or_insert_with(|| {
                at_risk.push(Hotspot {
                    neighborhood: collapse_whitespace(&neighbor),
                    kind: HotspotKind::AtRisk {
                        adjacent_to: Vec::new(),
                    },
                });
                at_risk.len() - 1
            });

            if let HotspotKind::AtRisk { adjacent_to } = &mut at_risk[position].kind
                && !adjacent_to.contains(&hotspot.neighborhood)
            {
                adjacent_to.push(hotspot.neighborhood.clone());
            }
        }
    }

    log::info!(
        "{} hotspot(s) with {} at-risk neighbor(s)",
        hotspots.len(),
        at_risk.len()
    );

    hotspots.extend(at_risk);
    hotspots
}
