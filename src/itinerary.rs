//! Re-expands a winning [`ShortestPath`] into a human-legible itinerary:
//! terminus, mode, line number, waiting, headway, per-leg duration.

use std::fmt;

use petgraph::visit::EdgeRef;

use crate::config::Config;
use crate::frequency::FrequencyStore;
use crate::graph::{EdgeLabel, OriginalDurations, TransitGraph};
use crate::map::{Circular, MapStore, Mode, StationId};
use crate::router::ShortestPath;

/// One line or walk a rider could take for a given leg; when several are
/// equally fast they are grouped as alternatives under one [`Leg`].
#[derive(Debug, Clone)]
pub struct LegOption {
    pub label: String,
    pub mode: Option<Mode>,
    pub colour: u32,
    /// `None` for walking options, which have no direction to announce.
    pub terminus: Option<String>,
    pub headway_s: Option<u64>,
    /// This option's own in-vehicle/walk duration, recovered from the
    /// original-duration table for rail options since the leg's
    /// overall `duration_s` is the collapsed minimum across all options.
    pub duration_s: f64,
}

#[derive(Debug, Clone)]
pub struct Leg {
    pub from: StationId,
    pub to: StationId,
    pub duration_s: f64,
    pub waiting_s: f64,
    pub options: Vec<LegOption>,
}

#[derive(Debug, Clone)]
pub struct Itinerary {
    pub legs: Vec<Leg>,
    pub total_time_s: f64,
    pub in_vehicle_time_s: f64,
    pub waiting_time_s: f64,
}

impl fmt::Display for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "total {:.0}s (in-vehicle {:.0}s, waiting {:.0}s)",
            self.total_time_s, self.in_vehicle_time_s, self.waiting_time_s
        )?;
        for leg in &self.legs {
            let options: Vec<String> = leg
                .options
                .iter()
                .map(|o| match &o.terminus {
                    Some(terminus) => format!("{} towards {}", o.label, terminus),
                    None => o.label.clone(),
                })
                .collect();
            writeln!(f, "  {} -> {}: {} ({:.0}s)", leg.from, leg.to, options.join(" / "), leg.duration_s)?;
        }
        Ok(())
    }
}

pub struct ItineraryFormatter<'a> {
    map: &'a MapStore,
    frequencies: &'a FrequencyStore,
    config: &'a Config,
}

impl<'a> ItineraryFormatter<'a> {
    pub fn new(map: &'a MapStore, frequencies: &'a FrequencyStore, config: &'a Config) -> Self {
        Self { map, frequencies, config }
    }

    /// Builds the rider-facing itinerary for `path`. When `detail` is
    /// false, each leg reports only the option actually selected by the
    /// search; when true, it also lists every other same-weight candidate
    /// line a rider could have taken instead.
    pub fn format(&self, graph: &TransitGraph, original: &OriginalDurations, path: &ShortestPath, detail: bool) -> Itinerary {
        let mut legs = Vec::with_capacity(path.edges.len());
        let mut in_vehicle_time_s = 0.0;
        let mut waiting_time_s = 0.0;

        for path_edge in &path.edges {
            let inner = graph.inner();
            let selected = &inner[path_edge.edge_index];

            let mut options = Vec::new();
            if detail {
                let u_idx = graph.node_index(&path_edge.from).expect("path endpoint is a graph vertex");
                let v_idx = graph.node_index(&path_edge.to).expect("path endpoint is a graph vertex");
                for edge_ref in inner.edges_connecting(u_idx, v_idx) {
                    let candidate = edge_ref.weight();
                    if (candidate.weight() - selected.weight()).abs() > self.config.collapse_window_s {
                        continue;
                    }
                    for label in &candidate.labels {
                        options.push(self.describe(label, &path_edge.from, &path_edge.to, candidate.duration, original));
                    }
                }
            }
            if options.is_empty() {
                for label in &selected.labels {
                    options.push(self.describe(label, &path_edge.from, &path_edge.to, selected.duration, original));
                }
            }

            in_vehicle_time_s += selected.duration;
            waiting_time_s += selected.waiting;

            legs.push(Leg {
                from: path_edge.from.clone(),
                to: path_edge.to.clone(),
                duration_s: selected.duration,
                waiting_s: selected.waiting,
                options,
            });
        }

        Itinerary { total_time_s: in_vehicle_time_s + waiting_time_s, in_vehicle_time_s, waiting_time_s, legs }
    }

    fn describe(
        &self,
        label: &EdgeLabel,
        boarding_station: &str,
        alighting_station: &str,
        fallback_duration: f64,
        original: &OriginalDurations,
    ) -> LegOption {
        match label {
            EdgeLabel::Rail { route_id, name, mode } => {
                let route = self.map.route_by_id(route_id);
                let colour = route.map(|r| r.colour).unwrap_or(0);
                let terminus = route.map(|r| self.terminus(r, boarding_station));
                let headway_s = self
                    .frequencies
                    .mean_headway(name)
                    .or_else(|| Some(self.config.mode_default_headway(*mode)));
                let key = (name.clone(), boarding_station.to_string(), alighting_station.to_string());
                let duration_s = original.get(&key).copied().unwrap_or(fallback_duration);
                LegOption { label: name.clone(), mode: Some(*mode), colour, terminus, headway_s, duration_s }
            }
            EdgeLabel::TransferWalk { .. } | EdgeLabel::WildWalk { .. } => LegOption {
                label: label.display(),
                mode: None,
                colour: 0,
                terminus: None,
                headway_s: None,
                duration_s: fallback_duration,
            },
        }
    }

    /// The terminus rule, including the asymmetric "no via on the last
    /// stop" case for circular routes.
    fn terminus(&self, route: &crate::map::Route, boarding_station: &str) -> String {
        let stop_name = |id: &str| self.map.station_by_id(id).map(|s| s.name.clone()).unwrap_or_else(|| id.to_string());

        if !route.circular.is_circular() {
            return route.stops.last().map(|id| stop_name(id)).unwrap_or_default();
        }

        let direction = match route.circular {
            Circular::Clockwise => "clockwise",
            Circular::CounterClockwise => "counterclockwise",
            Circular::None => unreachable!("checked circular above"),
        };

        let last_index = route.stops.len() - 1;
        let boarding_index = route.stops.iter().position(|s| s == boarding_station).unwrap_or(0);

        if boarding_index == last_index {
            format!("({}) {}", direction, stop_name(&route.stops[0]))
        } else {
            format!("({}) via {}", direction, stop_name(&route.stops[boarding_index + 1]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CancellationToken;
    use crate::filter::FilterSet;
    use crate::graph::GraphBuilder;
    use crate::names::NameResolver;
    use crate::router::Router;

    fn two_station_map() -> &'static str {
        r#"{
            "stations": {
                "a": { "name": "A", "x": 0.0, "z": 0.0 },
                "b": { "name": "B", "x": 100.0, "z": 0.0 }
            },
            "routes": { "r1": {
                "id": "r1", "name": "L1", "number": "1", "type": "train_normal", "circularState": "none",
                "stations": [{"id": "a"}, {"id": "b"}], "durations": [120000]
            }}
        }"#
    }

    #[test]
    fn formats_direct_journey() {
        let mut map = MapStore::load(two_station_map()).unwrap();
        let config = Config::default();
        let resolver = NameResolver::new(&config);
        let freq = FrequencyStore::empty();
        let filters = FilterSet::default();
        let (graph, original) =
            GraphBuilder::new(&config, &resolver).build(&mut map, &freq, &filters, &CancellationToken::new()).unwrap();

        let path = Router::new(&graph).shortest_path("a", "b", &CancellationToken::new()).unwrap();
        let itinerary = ItineraryFormatter::new(&map, &freq, &config).format(&graph, &original, &path, true);

        assert_eq!(itinerary.legs.len(), 1);
        assert_eq!(itinerary.in_vehicle_time_s, 120.0);
        assert_eq!(itinerary.legs[0].options[0].terminus.as_deref(), Some("B"));
    }

    #[test]
    fn non_detailed_format_reports_only_the_selected_option() {
        // Theory mode keeps every candidate as its own parallel edge
        // instead of merging them, so a -> b has two edges within the
        // same collapse window: a real multi-option case for `detail`.
        let json = r#"{
            "stations": {
                "a": { "name": "A", "x": 0.0, "z": 0.0 },
                "b": { "name": "B", "x": 1000.0, "z": 0.0 }
            },
            "routes": {
                "r1": { "id": "r1", "name": "L1", "number": "1", "type": "train_normal", "circularState": "none",
                    "stations": [{"id": "a"}, {"id": "b"}], "durations": [120000] },
                "r2": { "id": "r2", "name": "L2", "number": "2", "type": "train_normal", "circularState": "none",
                    "stations": [{"id": "a"}, {"id": "b"}], "durations": [130000] }
            }
        }"#;
        let mut map = MapStore::load(json).unwrap();
        let config = Config::default();
        let resolver = NameResolver::new(&config);
        let freq = FrequencyStore::empty();
        let mut filters = FilterSet::default();
        filters.route_type = crate::filter::RouteType::Theory;
        let (graph, original) =
            GraphBuilder::new(&config, &resolver).build(&mut map, &freq, &filters, &CancellationToken::new()).unwrap();

        let path = Router::new(&graph).shortest_path("a", "b", &CancellationToken::new()).unwrap();
        let detailed = ItineraryFormatter::new(&map, &freq, &config).format(&graph, &original, &path, true);
        let terse = ItineraryFormatter::new(&map, &freq, &config).format(&graph, &original, &path, false);

        assert_eq!(terse.legs[0].options.len(), 1);
        assert_eq!(detailed.legs[0].options.len(), 2);
    }

    #[test]
    fn theory_mode_has_no_waiting() {
        let mut map = MapStore::load(two_station_map()).unwrap();
        let config = Config::default();
        let resolver = NameResolver::new(&config);
        let freq = FrequencyStore::empty();
        let mut filters = FilterSet::default();
        filters.route_type = crate::filter::RouteType::Theory;
        let (graph, original) =
            GraphBuilder::new(&config, &resolver).build(&mut map, &freq, &filters, &CancellationToken::new()).unwrap();

        let path = Router::new(&graph).shortest_path("a", "b", &CancellationToken::new()).unwrap();
        let itinerary = ItineraryFormatter::new(&map, &freq, &config).format(&graph, &original, &path, false);

        assert_eq!(itinerary.waiting_time_s, 0.0);
    }
}
