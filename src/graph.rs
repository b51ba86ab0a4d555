//! Builds the weighted multi-digraph a [`crate::router::Router`] searches:
//! vertex selection, transfer/wild-walk edges, per-route rail candidates,
//! and the parallel-edge collapse that turns many competing lines at a stop
//! pair into one frequency-aware edge.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};

use crate::config::Config;
use crate::error::{CancellationToken, RouteResult};
use crate::filter::{FilterSet, RouteType};
use crate::frequency::FrequencyStore;
use crate::geometry::GeometryUtil;
use crate::map::{MapStore, Mode, Point, RouteId, StationId};
use crate::names::{fold, NameResolver};

/// What one surviving candidate, or one merged group of candidates, is
/// labelled with in the final graph.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeLabel {
    Rail { route_id: RouteId, name: String, mode: Mode },
    TransferWalk { distance_blocks: f64 },
    WildWalk { distance_blocks: f64 },
}

impl EdgeLabel {
    pub fn display(&self) -> String {
        match self {
            Self::Rail { name, .. } => name.clone(),
            Self::TransferWalk { distance_blocks } => format!("transfer walk {:.0}m", distance_blocks),
            Self::WildWalk { distance_blocks } => format!("wild walk {:.0}m", distance_blocks),
        }
    }

    fn is_walk(&self) -> bool {
        matches!(self, Self::TransferWalk { .. } | Self::WildWalk { .. })
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    label: EdgeLabel,
    duration: f64,
}

/// A finished graph edge: `weight = duration + waiting`.
#[derive(Debug, Clone)]
pub struct EdgeWeight {
    pub duration: f64,
    pub waiting: f64,
    pub labels: Vec<EdgeLabel>,
}

impl EdgeWeight {
    pub fn weight(&self) -> f64 {
        self.duration + self.waiting
    }
}

/// `original[(route_name, u, v)] -> in-vehicle duration`, kept so the
/// formatter can recover per-leg duration after candidates have been
/// merged away by collapse.
pub type OriginalDurations = HashMap<(String, StationId, StationId), f64>;

pub struct TransitGraph {
    graph: DiGraph<StationId, EdgeWeight>,
    index_of: HashMap<StationId, NodeIndex>,
}

impl TransitGraph {
    pub(crate) fn from_parts(graph: DiGraph<StationId, EdgeWeight>, index_of: HashMap<StationId, NodeIndex>) -> Self {
        Self { graph, index_of }
    }

    pub fn inner(&self) -> &DiGraph<StationId, EdgeWeight> {
        &self.graph
    }

    pub fn node_index(&self, station_id: &str) -> Option<NodeIndex> {
        self.index_of.get(station_id).copied()
    }

    pub fn station_id(&self, index: NodeIndex) -> &StationId {
        &self.graph[index]
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

pub struct GraphBuilder<'a> {
    config: &'a Config,
    resolver: &'a NameResolver,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(config: &'a Config, resolver: &'a NameResolver) -> Self {
        Self { config, resolver }
    }

    pub fn build(
        &self,
        map: &mut MapStore,
        frequencies: &FrequencyStore,
        filters: &FilterSet,
        cancel: &CancellationToken,
    ) -> RouteResult<(TransitGraph, OriginalDurations)> {
        cancel.check()?;

        let mut vertex_ids: Vec<StationId> = map
            .stations()
            .filter(|s| s.is_routable() && !filters.avoided_stations.contains(&s.id))
            .map(|s| s.id.clone())
            .collect();
        vertex_ids.sort();

        let mut graph = DiGraph::new();
        let mut index_of = HashMap::with_capacity(vertex_ids.len());
        for id in &vertex_ids {
            index_of.insert(id.clone(), graph.add_node(id.clone()));
        }
        let vertex_set: HashSet<&StationId> = vertex_ids.iter().collect();

        let mut candidates: BTreeMap<(StationId, StationId), Vec<Candidate>> = BTreeMap::new();

        self.add_transfer_edges(map, &vertex_set, &mut candidates);

        let mut original = OriginalDurations::new();
        self.add_rail_edges(map, frequencies, filters, cancel, &vertex_set, &mut candidates, &mut original)?;

        if filters.allow_wild_walking {
            self.add_wild_walk_edges(map, filters, &vertex_ids, &mut candidates);
        }

        cancel.check()?;

        for ((u, v), group) in candidates {
            let Some(u_idx) = index_of.get(&u).copied() else { continue };
            let Some(v_idx) = index_of.get(&v).copied() else { continue };

            for edge in collapse(group, filters.route_type, frequencies, self.config) {
                if edge.weight() <= 0.0 {
                    continue;
                }
                graph.add_edge(u_idx, v_idx, edge);
            }
        }

        Ok((TransitGraph { graph, index_of }, original))
    }

    /// Adds symmetric edges to every declared transfer neighbour, plus any
    /// extra neighbour named in `Config::transfer_addition` for that
    /// station that isn't already a declared one. Declared and configured
    /// pairs are collected into one deduplicated undirected set first, so a
    /// pair declared from only one side (or from both) still yields exactly
    /// one walk candidate in each direction.
    fn add_transfer_edges(
        &self,
        map: &MapStore,
        vertex_set: &HashSet<&StationId>,
        candidates: &mut BTreeMap<(StationId, StationId), Vec<Candidate>>,
    ) {
        let mut pairs: BTreeSet<(StationId, StationId)> = BTreeSet::new();

        for station in map.stations() {
            if !vertex_set.contains(&station.id) {
                continue;
            }

            for neighbour_id in &station.connections {
                if !vertex_set.contains(neighbour_id) || neighbour_id == &station.id {
                    continue;
                }
                pairs.insert(ordered_pair(station.id.clone(), neighbour_id.clone()));
            }

            for name in self.config.transfer_addition.get(&fold(&station.name)).into_iter().flatten() {
                let Some(neighbour_id) = resolve_named_station(map, name) else { continue };
                if !vertex_set.contains(&neighbour_id) || neighbour_id == station.id {
                    continue;
                }
                if station.connections.contains(&neighbour_id) {
                    continue;
                }
                pairs.insert(ordered_pair(station.id.clone(), neighbour_id));
            }
        }

        for (a, b) in pairs {
            let (Some(a_station), Some(b_station)) = (map.station_by_id(&a), map.station_by_id(&b)) else { continue };
            let (Some(a_pos), Some(b_pos)) = (a_station.position, b_station.position) else { continue };

            let distance = GeometryUtil::distance(a_pos, b_pos);
            let duration = distance / self.config.transfer_walk_speed;

            for (u, v) in [(a.clone(), b.clone()), (b.clone(), a.clone())] {
                candidates
                    .entry((u, v))
                    .or_default()
                    .push(Candidate { label: EdgeLabel::TransferWalk { distance_blocks: distance }, duration });
            }
        }
    }

    /// Walks each included route's stop sequence, enumerating a rail
    /// candidate for every ordered pair of stops it serves.
    fn add_rail_edges(
        &self,
        map: &mut MapStore,
        frequencies: &FrequencyStore,
        filters: &FilterSet,
        cancel: &CancellationToken,
        vertex_set: &HashSet<&StationId>,
        candidates: &mut BTreeMap<(StationId, StationId), Vec<Candidate>>,
        original: &mut OriginalDurations,
    ) -> RouteResult<()> {
        let route_ids: Vec<RouteId> = map.routes().map(|r| r.id.clone()).collect();

        for route_id in route_ids {
            cancel.check()?;

            if !self.route_included(map.route_by_id(&route_id).expect("route id from map"), filters) {
                continue;
            }

            self.interpolate_zero_durations(map, &route_id)?;

            let route = map.route_by_id(&route_id).expect("route id from map");
            let stops = route.stops.clone();
            let durations = route.durations.clone();
            let dwell_times = route.dwell_times.clone();
            let name = route.name.clone();
            let route_id_owned = route.id.clone();
            let mode = route.mode;

            for i in 0..stops.len() {
                for j in (i + 1)..stops.len() {
                    if !vertex_set.contains(&stops[i]) || !vertex_set.contains(&stops[j]) {
                        continue;
                    }
                    if stops[i..=j].iter().any(|s| filters.avoided_stations.contains(s)) {
                        continue;
                    }

                    let dur: f64 = durations[i..j].iter().sum::<f64>() + dwell_times[i + 1..j].iter().sum::<f64>();

                    original.insert((name.clone(), stops[i].clone(), stops[j].clone()), dur);

                    candidates
                        .entry((stops[i].clone(), stops[j].clone()))
                        .or_default()
                        .push(Candidate {
                            label: EdgeLabel::Rail { route_id: route_id_owned.clone(), name: name.clone(), mode },
                            duration: dur,
                        });
                }
            }
        }

        Ok(())
    }

    fn route_included(&self, route: &crate::map::Route, filters: &FilterSet) -> bool {
        if !route.is_usable() {
            return false;
        }

        // Every spelling this route could be matched under: its folded full
        // name and number, each pipe-separated variant, and whatever script
        // conversions the configured `ScriptConverter` offers for the full
        // name, mirroring `NameResolver::resolve_routes`.
        let mut route_names: Vec<String> = vec![fold(&route.name), fold(&route.number)];
        route_names.extend(route.name.split('|').map(fold));
        route_names.extend(self.resolver.candidate_texts(&fold(&route.name)));

        let name_is_ignored = filters.ignored_lines.iter().any(|ignored| {
            self.resolver.candidate_texts(&fold(ignored)).iter().any(|c| route_names.contains(c))
        });
        if name_is_ignored {
            return false;
        }

        if filters.lrt_only {
            return route.mode.is_light_rail();
        }
        if route.mode.is_high_speed() && !filters.allow_high_speed {
            return false;
        }
        if route.mode.is_boat() && !filters.allow_boat {
            return false;
        }
        true
    }

    /// Replaces zero-duration segments with `GeometryUtil::nominal_time`,
    /// persisting the result back into the map snapshot.
    fn interpolate_zero_durations(&self, map: &mut MapStore, route_id: &str) -> RouteResult<()> {
        let route = map.route_by_id(route_id).expect("route id from map");
        if !route.durations.iter().any(|d| *d == 0.0) {
            return Ok(());
        }

        let positions: Vec<Option<Point>> =
            route.stops.iter().map(|id| map.station_by_id(id).and_then(|s| s.position)).collect();
        let geometry = GeometryUtil::new(self.config);
        let route = map.route_by_id(route_id).expect("route id from map");

        let mut updated = route.durations.clone();
        for (i, dur) in updated.iter_mut().enumerate() {
            if *dur != 0.0 {
                continue;
            }
            let filled = geometry.nominal_time(route, &positions, i, i + 1).unwrap_or(0.0);
            *dur = if filled <= 0.0 { 0.01 } else { filled };
        }

        map.route_by_id_mut(route_id).expect("route id from map").durations = updated;
        Ok(())
    }

    /// Adds wild-walk edges for unconnected close-enough pairs, removing
    /// rail edges that walking clearly beats.
    fn add_wild_walk_edges(
        &self,
        map: &MapStore,
        filters: &FilterSet,
        vertex_ids: &[StationId],
        candidates: &mut BTreeMap<(StationId, StationId), Vec<Candidate>>,
    ) {
        self.add_named_wild_edges(map, vertex_ids, candidates);

        let max_sq = filters.max_wild_blocks * filters.max_wild_blocks;

        for (a_idx, a) in vertex_ids.iter().enumerate() {
            let Some(a_pos) = map.station_by_id(a).and_then(|s| s.position) else { continue };
            for b in vertex_ids.iter().skip(a_idx + 1) {
                let Some(b_pos) = map.station_by_id(b).and_then(|s| s.position) else { continue };

                let distance = GeometryUtil::distance(a_pos, b_pos);
                if distance.powi(2) > max_sq {
                    continue;
                }
                let walk_duration = distance / self.config.wild_walk_speed;

                for (u, v) in [(a.clone(), b.clone()), (b.clone(), a.clone())] {
                    self.apply_wild_walk_pair(&u, &v, distance, walk_duration, candidates);
                }
            }
        }
    }

    /// Adds the named wild-walk neighbours from `Config::wild_addition`,
    /// ahead of the proximity scan so a declared pair always wins and the
    /// scan's own `has_walk_already` check skips it.
    fn add_named_wild_edges(
        &self,
        map: &MapStore,
        vertex_ids: &[StationId],
        candidates: &mut BTreeMap<(StationId, StationId), Vec<Candidate>>,
    ) {
        let vertex_set: HashSet<&StationId> = vertex_ids.iter().collect();

        for station in map.stations() {
            if !vertex_set.contains(&station.id) {
                continue;
            }
            let Some(from) = station.position else { continue };

            for name in self.config.wild_addition.get(&fold(&station.name)).into_iter().flatten() {
                let Some(neighbour_id) = resolve_named_station(map, name) else { continue };
                if !vertex_set.contains(&neighbour_id) || neighbour_id == station.id {
                    continue;
                }
                let Some(neighbour) = map.station_by_id(&neighbour_id) else { continue };
                let Some(to) = neighbour.position else { continue };

                let distance = GeometryUtil::distance(from, to);
                let walk_duration = distance / self.config.wild_walk_speed;

                for (u, v) in [(station.id.clone(), neighbour_id.clone()), (neighbour_id.clone(), station.id.clone())] {
                    self.apply_wild_walk_pair(&u, &v, distance, walk_duration, candidates);
                }
            }
        }
    }

    fn apply_wild_walk_pair(
        &self,
        u: &StationId,
        v: &StationId,
        distance: f64,
        walk_duration: f64,
        candidates: &mut BTreeMap<(StationId, StationId), Vec<Candidate>>,
    ) {
        let key = (u.clone(), v.clone());
        let existing = candidates.get(&key);

        let has_walk_already = existing.map(|c| c.iter().any(|cand| cand.label.is_walk())).unwrap_or(false);
        if has_walk_already {
            return;
        }

        let min_rail = existing.and_then(|c| {
            c.iter()
                .filter(|cand| !cand.label.is_walk())
                .map(|cand| cand.duration)
                .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.min(d))))
        });

        let add_wild = match min_rail {
            Some(rail_min) => rail_min > walk_duration + self.config.collapse_window_s,
            None => true,
        };

        if let Some(rail_min) = min_rail {
            if walk_duration + self.config.wild_walk_preemption_margin_s < rail_min {
                if let Some(group) = candidates.get_mut(&key) {
                    group.retain(|cand| cand.label.is_walk());
                }
            }
        }

        if add_wild {
            candidates.entry(key).or_default().push(Candidate {
                label: EdgeLabel::WildWalk { distance_blocks: distance },
                duration: walk_duration,
            });
        }
    }
}

/// Looks up a station by exact (folded) name or pipe-separated variant, the
/// same rule `route_included`/`NameResolver` use for literal matches. Used
/// to resolve the free-text neighbour names in `transfer_addition` and
/// `wild_addition`.
fn resolve_named_station(map: &MapStore, text: &str) -> Option<StationId> {
    let folded = fold(text);
    map.stations()
        .find(|s| fold(&s.name) == folded || s.name.split('|').any(|v| fold(v) == folded))
        .map(|s| s.id.clone())
}

fn ordered_pair(a: StationId, b: StationId) -> (StationId, StationId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Merges candidates at one `(u, v)` pair into the final edge(s).
fn collapse(
    mut group: Vec<Candidate>,
    route_type: RouteType,
    frequencies: &FrequencyStore,
    config: &Config,
) -> Vec<EdgeWeight> {
    if group.is_empty() {
        return Vec::new();
    }

    if route_type == RouteType::Theory {
        return group
            .into_iter()
            .map(|c| EdgeWeight { duration: c.duration, waiting: 0.0, labels: vec![c.label] })
            .collect();
    }

    group.sort_by(|a, b| a.duration.partial_cmp(&b.duration).unwrap());

    let rail: Vec<&Candidate> = group.iter().filter(|c| !c.label.is_walk()).collect();
    let walk: Vec<&Candidate> = group.iter().filter(|c| c.label.is_walk()).collect();

    if rail.is_empty() {
        // Only walking candidates survived (e.g. the rail edge was
        // preempted); the fastest walk wins, no waiting.
        let min = walk.iter().map(|c| c.duration).fold(f64::INFINITY, f64::min);
        let labels = walk.iter().filter(|c| c.duration - min <= config.collapse_window_s).map(|c| c.label.clone()).collect();
        return vec![EdgeWeight { duration: min, waiting: 0.0, labels }];
    }

    let dur_min = rail[0].duration;
    let surviving: Vec<&Candidate> = rail.iter().copied().filter(|c| c.duration - dur_min <= config.collapse_window_s).collect();

    let headways: Vec<u64> = surviving
        .iter()
        .filter_map(|c| match &c.label {
            EdgeLabel::Rail { name, mode, .. } => {
                Some(frequencies.mean_headway(name).unwrap_or_else(|| config.mode_default_headway(*mode)))
            }
            _ => None,
        })
        .collect();

    let combined_waiting = harmonic_half_wait(&headways);

    let mut labels: Vec<EdgeLabel> = surviving.iter().map(|c| c.label.clone()).collect();
    if let Some(fastest_walk) = walk.iter().min_by(|a, b| a.duration.partial_cmp(&b.duration).unwrap()) {
        if (fastest_walk.duration - dur_min).abs() <= config.collapse_window_s {
            labels.push(fastest_walk.label.clone());
        }
    }

    vec![EdgeWeight { duration: dur_min, waiting: combined_waiting, labels }]
}

/// Half the harmonic mean of a set of headways, computed via their LCM to
/// stay in exact integer arithmetic until the final division.
fn harmonic_half_wait(headways: &[u64]) -> f64 {
    let nonzero: Vec<u64> = headways.iter().copied().filter(|h| *h != 0).collect();
    if nonzero.is_empty() {
        return 0.0;
    }

    let l = nonzero.iter().copied().fold(1u64, lcm);
    let sum_rate: u64 = nonzero.iter().map(|h| l / h).sum();
    if sum_rate == 0 {
        return 0.0;
    }

    (l as f64) / (sum_rate as f64) / 2.0
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: u64, b: u64) -> u64 {
    if a == 0 || b == 0 {
        0
    } else {
        a / gcd(a, b) * b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::ScriptConverter;
    use crate::router::Router;

    #[test]
    fn harmonic_half_wait_matches_worked_example() {
        // Two lines, 6 min and 3 min headway -> waiting = 1 min.
        let wait = harmonic_half_wait(&[360, 180]);
        assert!((wait - 60.0).abs() < 1e-9);
    }

    #[test]
    fn harmonic_half_wait_is_zero_with_no_headways() {
        assert_eq!(harmonic_half_wait(&[]), 0.0);
    }

    #[test]
    fn theory_mode_keeps_every_candidate_with_no_waiting() {
        let config = Config::default();
        let freq = FrequencyStore::empty();
        let group = vec![
            Candidate { label: EdgeLabel::Rail { route_id: "r1".into(), name: "L1".into(), mode: crate::map::Mode::TrainNormal }, duration: 120.0 },
            Candidate { label: EdgeLabel::Rail { route_id: "r2".into(), name: "L2".into(), mode: crate::map::Mode::TrainNormal }, duration: 130.0 },
        ];
        let edges = collapse(group, RouteType::Theory, &freq, &config);
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.waiting == 0.0));
    }

    fn two_station_json(a_connections: &str, b_connections: &str) -> String {
        format!(
            r#"{{
                "stations": {{
                    "a": {{ "name": "A", "x": 0.0, "z": 0.0, "connections": [{a_connections}] }},
                    "b": {{ "name": "B", "x": 100.0, "z": 0.0, "connections": [{b_connections}] }}
                }},
                "routes": {{}}
            }}"#
        )
    }

    #[test]
    fn one_sided_connection_still_yields_a_symmetric_transfer() {
        let map = MapStore::load(&two_station_json(r#""b""#, "")).unwrap();
        let config = Config::default();
        let resolver = NameResolver::new(&config);
        let frequencies = FrequencyStore::empty();
        let filters = FilterSet::default();
        let (graph, _original) = GraphBuilder::new(&config, &resolver)
            .build(&mut map.clone(), &frequencies, &filters, &CancellationToken::new())
            .unwrap();

        assert!(Router::new(&graph).shortest_path("a", "b", &CancellationToken::new()).is_ok());
        assert!(Router::new(&graph).shortest_path("b", "a", &CancellationToken::new()).is_ok());
    }

    #[test]
    fn transfer_addition_connects_stations_with_no_declared_connection() {
        let map = MapStore::load(&two_station_json("", "")).unwrap();
        let mut config = Config::default();
        config.transfer_addition.insert("a".to_string(), vec!["B".to_string()]);
        let resolver = NameResolver::new(&config);
        let frequencies = FrequencyStore::empty();
        let filters = FilterSet::default();
        let (graph, _original) = GraphBuilder::new(&config, &resolver)
            .build(&mut map.clone(), &frequencies, &filters, &CancellationToken::new())
            .unwrap();

        assert!(Router::new(&graph).shortest_path("a", "b", &CancellationToken::new()).is_ok());
        assert!(Router::new(&graph).shortest_path("b", "a", &CancellationToken::new()).is_ok());
    }

    #[test]
    fn wild_addition_connects_stations_beyond_the_distance_cap() {
        let json = r#"{
            "stations": {
                "a": { "name": "A", "x": 0.0, "z": 0.0 },
                "b": { "name": "B", "x": 100000.0, "z": 0.0 }
            },
            "routes": {}
        }"#;
        let map = MapStore::load(json).unwrap();
        let mut config = Config::default();
        config.wild_addition.insert("a".to_string(), vec!["B".to_string()]);
        let resolver = NameResolver::new(&config);
        let frequencies = FrequencyStore::empty();
        let mut filters = FilterSet::default();
        filters.allow_wild_walking = true;
        filters.max_wild_blocks = 10.0;
        let (graph, _original) = GraphBuilder::new(&config, &resolver)
            .build(&mut map.clone(), &frequencies, &filters, &CancellationToken::new())
            .unwrap();

        let path = Router::new(&graph).shortest_path("a", "b", &CancellationToken::new()).unwrap();
        assert_eq!(path.edges.len(), 1);
    }

    struct UppercaseScriptConverter;
    impl ScriptConverter for UppercaseScriptConverter {
        fn variants(&self, text: &str) -> Vec<String> {
            vec![text.to_uppercase()]
        }
    }

    #[test]
    fn route_included_ignores_a_route_via_a_script_variant_name() {
        let json = r#"{
            "stations": {
                "a": { "name": "A", "x": 0.0, "z": 0.0 },
                "b": { "name": "B", "x": 100.0, "z": 0.0 }
            },
            "routes": { "r1": {
                "id": "r1", "name": "l1", "number": "1", "type": "train_normal", "circularState": "none",
                "stations": [{"id": "a"}, {"id": "b"}], "durations": [120000]
            }}
        }"#;
        let map = MapStore::load(json).unwrap();
        let config = Config::default();
        let resolver = NameResolver::with_converter(&config, Box::new(UppercaseScriptConverter));
        let frequencies = FrequencyStore::empty();
        let mut filters = FilterSet::default();
        filters.ignored_lines.insert("L1".to_string());
        let (graph, _original) = GraphBuilder::new(&config, &resolver)
            .build(&mut map.clone(), &frequencies, &filters, &CancellationToken::new())
            .unwrap();

        assert!(matches!(
            Router::new(&graph).shortest_path("a", "b", &CancellationToken::new()),
            Err(crate::error::RouteError::NoPath)
        ));
    }

    #[test]
    fn waiting_mode_collapses_within_window() {
        let config = Config::default();
        let freq = FrequencyStore::load(
            &serde_json::to_string(&HashMap::from([
                ("L1".to_string(), vec![0.0, 360.0]),
                ("L2".to_string(), vec![0.0, 180.0]),
            ]))
            .unwrap(),
            10,
            10,
        )
        .unwrap();

        let group = vec![
            Candidate { label: EdgeLabel::Rail { route_id: "r1".into(), name: "L1".into(), mode: crate::map::Mode::TrainNormal }, duration: 120.0 },
            Candidate { label: EdgeLabel::Rail { route_id: "r2".into(), name: "L2".into(), mode: crate::map::Mode::TrainNormal }, duration: 130.0 },
        ];
        let edges = collapse(group, RouteType::Waiting, &freq, &config);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].duration, 120.0);
        assert_eq!(edges[0].labels.len(), 2);
    }
}
