//! Content-addressed cache of built graphs, keyed by a fingerprint of the
//! map/frequency snapshot versions and the active filter set.

use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use crate::filter::{FilterSet, RouteType};
use crate::graph::{EdgeWeight, OriginalDurations, TransitGraph};
use crate::map::StationId;

/// On-disk schema version; bumping it invalidates every previously written
/// cache file without needing to delete them by hand.
const CACHE_FORMAT_VERSION: u32 = 1;

#[derive(serde::Serialize, serde::Deserialize)]
struct SerializableEdge {
    from: StationId,
    to: StationId,
    duration: f64,
    waiting: f64,
    labels: Vec<String>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct CachedGraph {
    nodes: Vec<StationId>,
    edges: Vec<SerializableEdge>,
    original: Vec<((String, StationId, StationId), f64)>,
}

pub struct GraphCache {
    dir: PathBuf,
}

impl GraphCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Hex digest of the map snapshot version, frequency snapshot version,
    /// and a canonical encoding of the filter set.
    pub fn fingerprint(map_version: &str, frequency_version: &str, filters: &FilterSet) -> String {
        let mut hasher = Sha256::new();
        hasher.update(map_version.as_bytes());
        hasher.update(b"\0");
        hasher.update(frequency_version.as_bytes());
        hasher.update(b"\0");

        let mut ignored: Vec<&String> = filters.ignored_lines.iter().collect();
        ignored.sort();
        for line in ignored {
            hasher.update(line.as_bytes());
            hasher.update(b",");
        }
        hasher.update(b"\0");
        hasher.update([filters.allow_high_speed as u8]);
        hasher.update([filters.allow_boat as u8]);
        hasher.update([filters.lrt_only as u8]);
        hasher.update([matches!(filters.route_type, RouteType::Waiting) as u8]);
        hasher.update(filters.max_wild_blocks.to_bits().to_le_bytes());

        crate::utils::to_hex(&hasher.finalize())
    }

    fn path_for(&self, fingerprint: &str) -> PathBuf {
        self.dir.join(format!("{fingerprint}.graphcache"))
    }

    /// Only `FilterSet::is_cacheable` requests are worth persisting; the
    /// caller is expected to check this before calling
    /// [`Self::load`]/[`Self::store`], but `GraphCache` enforces it too so
    /// a misbehaving caller cannot blow up cache cardinality.
    pub fn is_eligible(filters: &FilterSet) -> bool {
        filters.is_cacheable()
    }

    /// Returns `None` on any miss, including I/O errors and corrupted
    /// files: a corrupted cache entry is a miss, not an error.
    pub fn load(&self, fingerprint: &str) -> Option<(TransitGraph, OriginalDurations)> {
        let path = self.path_for(fingerprint);
        let file = fs::File::open(&path).ok()?;
        let mut reader = BufReader::new(file);

        let version: u32 = bincode::deserialize_from(&mut reader).ok()?;
        if version != CACHE_FORMAT_VERSION {
            return None;
        }
        let cached: CachedGraph = bincode::deserialize_from(&mut reader).ok()?;

        Some(rehydrate(cached))
    }

    /// Atomically persists a build: writes to a temp file then renames, so
    /// concurrent writers racing on the same key never observe a partial
    /// file.
    pub fn store(&self, fingerprint: &str, graph: &TransitGraph, original: &OriginalDurations) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let final_path = self.path_for(fingerprint);
        let tmp_path = self.dir.join(format!("{fingerprint}.{}.tmp", std::process::id()));

        {
            let file = fs::File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            let cached = dehydrate(graph, original);
            bincode::serialize_into(&mut writer, &CACHE_FORMAT_VERSION)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            bincode::serialize_into(&mut writer, &cached)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        }

        fs::rename(&tmp_path, &final_path)
    }

    pub fn path(&self, fingerprint: &str) -> PathBuf {
        self.path_for(fingerprint)
    }

    pub fn contains(&self, fingerprint: &str) -> bool {
        self.path_for(fingerprint).exists()
    }
}

fn dehydrate(graph: &TransitGraph, original: &OriginalDurations) -> CachedGraph {
    let inner = graph.inner();
    let mut nodes: Vec<StationId> = inner.node_indices().map(|i| graph.station_id(i).clone()).collect();
    nodes.sort();

    let mut edges: Vec<SerializableEdge> = inner
        .edge_indices()
        .map(|e| {
            let (u, v) = inner.edge_endpoints(e).expect("edge index from this graph");
            let weight: &EdgeWeight = &inner[e];
            SerializableEdge {
                from: graph.station_id(u).clone(),
                to: graph.station_id(v).clone(),
                duration: weight.duration,
                waiting: weight.waiting,
                labels: weight.labels.iter().map(|l| l.display()).collect(),
            }
        })
        .collect();
    edges.sort_by(|a, b| (&a.from, &a.to, &a.labels).cmp(&(&b.from, &b.to, &b.labels)));

    let mut original: Vec<((String, StationId, StationId), f64)> = original.iter().map(|(k, v)| (k.clone(), *v)).collect();
    original.sort_by(|a, b| a.0.cmp(&b.0));

    CachedGraph { nodes, edges, original }
}

fn rehydrate(cached: CachedGraph) -> (TransitGraph, OriginalDurations) {
    use petgraph::graph::DiGraph;
    use std::collections::HashMap;

    let mut graph = DiGraph::new();
    let mut index_of = HashMap::with_capacity(cached.nodes.len());
    for id in &cached.nodes {
        index_of.insert(id.clone(), graph.add_node(id.clone()));
    }

    for edge in cached.edges {
        let Some(&u) = index_of.get(&edge.from) else { continue };
        let Some(&v) = index_of.get(&edge.to) else { continue };
        // Serialised labels are display strings, not typed `EdgeLabel`s;
        // a cache hit reconstructs a graph whose edges carry opaque rail
        // labels, sufficient for weight lookups but not for re-deriving a
        // terminus. Callers needing that detail rebuild from source data.
        let labels = edge
            .labels
            .into_iter()
            .map(|name| crate::graph::EdgeLabel::Rail {
                route_id: String::new(),
                name,
                mode: crate::map::Mode::TrainNormal,
            })
            .collect();
        graph.add_edge(u, v, EdgeWeight { duration: edge.duration, waiting: edge.waiting, labels });
    }

    let original = cached.original.into_iter().collect();

    (TransitGraph::from_parts(graph, index_of), original)
}
