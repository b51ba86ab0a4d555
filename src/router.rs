//! Shortest-path search over a built [`TransitGraph`]: minimum total weight,
//! tie-broken by fewest hops.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::error::{CancellationToken, RouteError, RouteResult};
use crate::graph::TransitGraph;
use crate::map::StationId;

/// One step of a resolved path: the edge taken to reach `to`, and the
/// multi-edge index at `(from, to)` the formatter should expand.
#[derive(Debug, Clone)]
pub struct PathEdge {
    pub from: StationId,
    pub to: StationId,
    pub edge_index: petgraph::graph::EdgeIndex,
}

#[derive(Debug, Clone)]
pub struct ShortestPath {
    pub total_weight: f64,
    pub edges: Vec<PathEdge>,
}

pub struct Router<'a> {
    graph: &'a TransitGraph,
}

#[derive(Clone, Copy, PartialEq)]
struct Key {
    weight: f64,
    hops: u32,
}

impl Eq for Key {}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the smallest weight
        // first, tie-broken by fewest hops.
        other
            .weight
            .partial_cmp(&self.weight)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.hops.cmp(&self.hops))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct HeapEntry {
    key: Key,
    node: NodeIndex,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}
impl Eq for HeapEntry {}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl<'a> Router<'a> {
    pub fn new(graph: &'a TransitGraph) -> Self {
        Self { graph }
    }

    /// Finds the minimum-weight path from `origin` to `destination`,
    /// breaking ties among equal-weight paths by fewest hops.
    pub fn shortest_path(
        &self,
        origin: &str,
        destination: &str,
        cancel: &CancellationToken,
    ) -> RouteResult<ShortestPath> {
        cancel.check()?;

        if origin == destination {
            return Err(RouteError::SameStation);
        }

        let origin_idx = self.graph.node_index(origin).ok_or_else(|| RouteError::UnknownStation(origin.to_string()))?;
        let destination_idx = self
            .graph
            .node_index(destination)
            .ok_or_else(|| RouteError::UnknownStation(destination.to_string()))?;

        self.dijkstra(origin_idx, destination_idx, cancel)
    }

    fn dijkstra(&self, source: NodeIndex, target: NodeIndex, cancel: &CancellationToken) -> RouteResult<ShortestPath> {
        let inner = self.graph.inner();

        let mut best: HashMap<NodeIndex, Key> = HashMap::new();
        let mut prev: HashMap<NodeIndex, (NodeIndex, petgraph::graph::EdgeIndex)> = HashMap::new();
        let mut heap = BinaryHeap::new();

        let start_key = Key { weight: 0.0, hops: 0 };
        best.insert(source, start_key);
        heap.push(HeapEntry { key: start_key, node: source });

        while let Some(HeapEntry { key, node }) = heap.pop() {
            cancel.check()?;

            if node == target {
                return Ok(self.reconstruct(source, target, key.weight, &prev));
            }

            if best.get(&node).is_some_and(|recorded| is_worse(&key, recorded)) {
                continue;
            }

            for edge_ref in inner.edges(node) {
                let next = edge_ref.target();
                let candidate = Key { weight: key.weight + edge_ref.weight().weight(), hops: key.hops + 1 };

                let improves = match best.get(&next) {
                    Some(existing) => is_better(&candidate, existing),
                    None => true,
                };
                if improves {
                    best.insert(next, candidate);
                    prev.insert(next, (node, edge_ref.id()));
                    heap.push(HeapEntry { key: candidate, node: next });
                }
            }
        }

        Err(RouteError::NoPath)
    }

    fn reconstruct(
        &self,
        source: NodeIndex,
        target: NodeIndex,
        total_weight: f64,
        prev: &HashMap<NodeIndex, (NodeIndex, petgraph::graph::EdgeIndex)>,
    ) -> ShortestPath {
        let mut edges = Vec::new();
        let mut current = target;
        while current != source {
            let (from, edge_index) = prev[&current];
            edges.push(PathEdge {
                from: self.graph.station_id(from).clone(),
                to: self.graph.station_id(current).clone(),
                edge_index,
            });
            current = from;
        }
        edges.reverse();
        ShortestPath { total_weight, edges }
    }
}

fn is_better(candidate: &Key, existing: &Key) -> bool {
    candidate.weight < existing.weight - 1e-9
        || ((candidate.weight - existing.weight).abs() <= 1e-9 && candidate.hops < existing.hops)
}

fn is_worse(candidate: &Key, recorded: &Key) -> bool {
    candidate.weight > recorded.weight + 1e-9
        || ((candidate.weight - recorded.weight).abs() <= 1e-9 && candidate.hops > recorded.hops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::CancellationToken;
    use crate::filter::FilterSet;
    use crate::frequency::FrequencyStore;
    use crate::graph::GraphBuilder;
    use crate::map::MapStore;
    use crate::names::NameResolver;

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
    fn finds_direct_path() {
        let mut map = MapStore::load(two_station_map()).unwrap();
        let config = Config::default();
        let resolver = NameResolver::new(&config);
        let freq = FrequencyStore::empty();
        let filters = FilterSet::default();
        let (graph, _original) =
            GraphBuilder::new(&config, &resolver).build(&mut map, &freq, &filters, &CancellationToken::new()).unwrap();

        let router = Router::new(&graph);
        let path = router.shortest_path("a", "b", &CancellationToken::new()).unwrap();
        assert_eq!(path.edges.len(), 1);
    }

    #[test]
    fn same_station_errors() {
        let mut map = MapStore::load(two_station_map()).unwrap();
        let config = Config::default();
        let resolver = NameResolver::new(&config);
        let freq = FrequencyStore::empty();
        let filters = FilterSet::default();
        let (graph, _) =
            GraphBuilder::new(&config, &resolver).build(&mut map, &freq, &filters, &CancellationToken::new()).unwrap();

        let router = Router::new(&graph);
        assert!(matches!(router.shortest_path("a", "a", &CancellationToken::new()), Err(RouteError::SameStation)));
    }

    #[test]
    fn unknown_station_errors() {
        let mut map = MapStore::load(two_station_map()).unwrap();
        let config = Config::default();
        let resolver = NameResolver::new(&config);
        let freq = FrequencyStore::empty();
        let filters = FilterSet::default();
        let (graph, _) =
            GraphBuilder::new(&config, &resolver).build(&mut map, &freq, &filters, &CancellationToken::new()).unwrap();

        let router = Router::new(&graph);
        assert!(matches!(
            router.shortest_path("a", "nowhere", &CancellationToken::new()),
            Err(RouteError::UnknownStation(_))
        ));
    }

    #[test]
    fn no_path_when_only_line_is_banned() {
        let mut map = MapStore::load(two_station_map()).unwrap();
        let config = Config::default();
        let resolver = NameResolver::new(&config);
        let freq = FrequencyStore::empty();
        let mut filters = FilterSet::default();
        filters.ignored_lines.insert("L1".to_string());
        let (graph, _) =
            GraphBuilder::new(&config, &resolver).build(&mut map, &freq, &filters, &CancellationToken::new()).unwrap();

        let router = Router::new(&graph);
        assert!(matches!(
            router.shortest_path("a", "b", &CancellationToken::new()),
            Err(RouteError::NoPath)
        ));
    }
}
