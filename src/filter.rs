//! The dynamic per-request policy a graph is built under: which lines and
//! stations to avoid, which modes to allow, and whether to account for
//! waiting time at all.

use std::collections::BTreeSet;

use crate::config::Config;
use crate::map::StationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteType {
    Theory,
    Waiting,
}

/// Every field is part of the graph cache fingerprint, so equality
/// here must match exactly what changes the built graph.
#[derive(Debug, Clone)]
pub struct FilterSet {
    pub ignored_lines: BTreeSet<String>,
    pub avoided_stations: BTreeSet<StationId>,
    pub allow_high_speed: bool,
    pub allow_boat: bool,
    pub lrt_only: bool,
    pub allow_wild_walking: bool,
    pub route_type: RouteType,
    pub max_wild_blocks: f64,
}

impl FilterSet {
    /// The filter shape `GraphCache` is willing to persist: empty
    /// `avoided_stations`, boats allowed, not LRT-only, waiting mode.
    pub fn is_cacheable(&self) -> bool {
        self.avoided_stations.is_empty()
            && self.allow_boat
            && !self.lrt_only
            && self.route_type == RouteType::Waiting
    }
}

impl Default for FilterSet {
    fn default() -> Self {
        let config = Config::default();
        Self {
            ignored_lines: BTreeSet::new(),
            avoided_stations: BTreeSet::new(),
            allow_high_speed: true,
            allow_boat: true,
            lrt_only: false,
            allow_wild_walking: false,
            route_type: RouteType::Waiting,
            max_wild_blocks: config.default_max_wild_blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_set_is_cacheable() {
        assert!(FilterSet::default().is_cacheable());
    }

    #[test]
    fn avoided_stations_makes_it_uncacheable() {
        let mut filters = FilterSet::default();
        filters.avoided_stations.insert("a".to_string());
        assert!(!filters.is_cacheable());
    }

    #[test]
    fn theory_mode_is_uncacheable() {
        let mut filters = FilterSet::default();
        filters.route_type = RouteType::Theory;
        assert!(!filters.is_cacheable());
    }
}
