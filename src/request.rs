//! The routing request contract the presentation layer consumes:
//! free-text endpoints plus the dynamic filter toggles, wired through
//! name resolution, graph build/cache, search, and formatting.

use std::collections::BTreeSet;

use crate::cache::GraphCache;
use crate::config::Config;
use crate::error::{CancellationToken, RouteError, RouteResult};
use crate::filter::{FilterSet, RouteType};
use crate::frequency::FrequencyStore;
use crate::graph::GraphBuilder;
use crate::itinerary::{Itinerary, ItineraryFormatter};
use crate::map::MapStore;
use crate::names::{fold, NameResolver};
use crate::router::Router;

#[derive(Debug, Clone)]
pub struct RoutingRequest {
    pub origin: String,
    pub destination: String,
    pub route_type: RouteType,
    pub banned_lines: Vec<String>,
    pub banned_stations: Vec<String>,
    /// Optional whitelist; when non-empty every line not listed here is
    /// treated as banned.
    pub only_lines: Vec<String>,
    pub ban_high_speed: bool,
    pub ban_boat: bool,
    pub only_lrt: bool,
    pub calculate_walking_wild: bool,
    pub detail: bool,
}

impl Default for RoutingRequest {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            route_type: RouteType::Waiting,
            banned_lines: Vec::new(),
            banned_stations: Vec::new(),
            only_lines: Vec::new(),
            ban_high_speed: false,
            ban_boat: false,
            only_lrt: false,
            calculate_walking_wild: false,
            detail: false,
        }
    }
}

/// Wires `MapStore` + `FrequencyStore` + `NameResolver` + `GraphBuilder` +
/// `GraphCache` + `Router` + `ItineraryFormatter` together behind the
/// routing request contract — the entry point an embedding application
/// calls once per journey request.
pub struct RoutingEngine<'a> {
    map: &'a MapStore,
    frequencies: &'a FrequencyStore,
    resolver: &'a NameResolver,
    cache: Option<&'a GraphCache>,
    config: &'a Config,
}

impl<'a> RoutingEngine<'a> {
    pub fn new(
        map: &'a MapStore,
        frequencies: &'a FrequencyStore,
        resolver: &'a NameResolver,
        cache: Option<&'a GraphCache>,
        config: &'a Config,
    ) -> Self {
        Self { map, frequencies, resolver, cache, config }
    }

    pub fn plan(&self, request: &RoutingRequest, cancel: &CancellationToken) -> RouteResult<Itinerary> {
        cancel.check()?;

        let origin_id = self
            .resolver
            .resolve_station(self.map, &request.origin, true)
            .ok_or_else(|| RouteError::UnknownStation(request.origin.clone()))?;
        let destination_id = self
            .resolver
            .resolve_station(self.map, &request.destination, true)
            .ok_or_else(|| RouteError::UnknownStation(request.destination.clone()))?;

        if origin_id == destination_id {
            return Err(RouteError::SameStation);
        }

        let filters = self.build_filter_set(request);

        let fingerprint = GraphCache::is_eligible(&filters).then(|| {
            GraphCache::fingerprint(self.map.version(), self.frequencies.version(), &filters)
        });

        let cached = fingerprint.as_ref().and_then(|fp| self.cache.and_then(|c| c.load(fp)));

        let (graph, original) = match cached {
            Some(hit) => hit,
            None => {
                let mut map_copy = self.map.clone();
                let built =
                    GraphBuilder::new(self.config, self.resolver).build(&mut map_copy, self.frequencies, &filters, cancel)?;
                if let (Some(fp), Some(cache)) = (&fingerprint, self.cache) {
                    let _ = cache.store(fp, &built.0, &built.1);
                }
                built
            }
        };

        let path = Router::new(&graph).shortest_path(&origin_id, &destination_id, cancel)?;
        let formatter = ItineraryFormatter::new(self.map, self.frequencies, self.config);
        Ok(formatter.format(&graph, &original, &path, request.detail))
    }

    fn build_filter_set(&self, request: &RoutingRequest) -> FilterSet {
        let mut ignored_lines: BTreeSet<String> = request.banned_lines.iter().cloned().collect();

        if !request.only_lines.is_empty() {
            let allowed: std::collections::HashSet<String> = request.only_lines.iter().map(|s| fold(s)).collect();
            for route in self.map.routes() {
                let route_matches = allowed.contains(&fold(&route.name))
                    || route.name.split('|').any(|v| allowed.contains(&fold(v)));
                if !route_matches {
                    ignored_lines.insert(route.name.clone());
                }
            }
        }

        let avoided_stations: BTreeSet<String> = request
            .banned_stations
            .iter()
            .map(|text| {
                self.resolver
                    .resolve_station(self.map, text, true)
                    .unwrap_or_else(|| text.clone())
            })
            .collect();

        FilterSet {
            ignored_lines,
            avoided_stations,
            allow_high_speed: !request.ban_high_speed,
            allow_boat: !request.ban_boat,
            lrt_only: request.only_lrt,
            allow_wild_walking: request.calculate_walking_wild,
            route_type: request.route_type,
            max_wild_blocks: self.config.default_max_wild_blocks,
        }
    }
}
