//! Loads and validates a transit map snapshot: stations, routes, and the
//! geometry/duration normalisation the raw game-server JSON needs before it
//! can be turned into a graph.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{RouteError, RouteResult};

pub type StationId = String;
pub type RouteId = String;

/// One scheduled line in one direction, or one loop orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    TrainNormal,
    TrainLightRail,
    TrainHighSpeed,
    BoatNormal,
    BoatLightRail,
    BoatHighSpeed,
    CableCarNormal,
    AirplaneNormal,
}

impl Mode {
    fn from_wire(kind: &str) -> Option<Self> {
        Some(match kind {
            "train_normal" => Self::TrainNormal,
            "train_light_rail" => Self::TrainLightRail,
            "train_high_speed" => Self::TrainHighSpeed,
            "boat_normal" => Self::BoatNormal,
            "boat_light_rail" => Self::BoatLightRail,
            "boat_high_speed" => Self::BoatHighSpeed,
            "cable_car_normal" => Self::CableCarNormal,
            "airplane_normal" => Self::AirplaneNormal,
            _ => return None,
        })
    }

    pub fn is_high_speed(self) -> bool {
        matches!(self, Self::TrainHighSpeed)
    }

    pub fn is_boat(self) -> bool {
        matches!(self, Self::BoatNormal | Self::BoatLightRail | Self::BoatHighSpeed)
    }

    pub fn is_light_rail(self) -> bool {
        matches!(self, Self::TrainLightRail)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Circular {
    None,
    Clockwise,
    CounterClockwise,
}

impl Circular {
    fn from_wire(text: &str) -> Self {
        match text {
            "clockwise" => Self::Clockwise,
            "anticlockwise" | "counterclockwise" => Self::CounterClockwise,
            _ => Self::None,
        }
    }

    pub fn is_circular(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Plane coordinates in Minecraft blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub z: f64,
}

#[derive(Debug, Clone)]
pub struct Station {
    pub id: StationId,
    /// Pipe-separated script variants of the display name.
    pub name: String,
    pub colour: u32,
    pub position: Option<Point>,
    pub connections: Vec<StationId>,
    /// Stable, enumeration-order-assigned short id for compact URLs.
    pub short_id: u32,
}

impl Station {
    pub fn is_routable(&self) -> bool {
        self.position.is_some()
    }

    /// Script variants of the name, split on `|`.
    pub fn name_variants(&self) -> impl Iterator<Item = &str> {
        self.name.split('|').map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    pub number: String,
    pub mode: Mode,
    pub circular: Circular,
    pub colour: u32,
    pub stops: Vec<StationId>,
    /// `durations[i]` is the in-vehicle time from `stops[i]` to `stops[i+1]`,
    /// in seconds, after the ms->s conversion and any zero-entry
    /// interpolation.
    pub durations: Vec<f64>,
    /// Dwell time in seconds at `stops[i]`, zero on snapshots that predate it.
    pub dwell_times: Vec<f64>,
}

impl Route {
    pub fn is_usable(&self) -> bool {
        self.stops.len() >= 2 && self.durations.len() == self.stops.len() - 1
    }
}

/// Immutable snapshot of the transit map, as loaded from the map-fetcher's
/// JSON dump. Derived data (computed coordinates, interpolated
/// durations, short ids) lives alongside the raw fields rather than in a
/// separate mutable overlay, since the snapshot is never mutated after load
/// except for the single zero-duration interpolation pass.
#[derive(Clone)]
pub struct MapStore {
    stations: BTreeMap<StationId, Station>,
    routes: BTreeMap<RouteId, Route>,
    version: String,
}

impl MapStore {
    /// Content hash of the raw snapshot text, used by `GraphCache` so a new
    /// snapshot can never be shadowed by a stale cached build.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn station_by_id(&self, id: &str) -> Option<&Station> {
        self.stations.get(id)
    }

    pub fn route_by_id(&self, id: &str) -> Option<&Route> {
        self.routes.get(id)
    }

    pub fn route_by_id_mut(&mut self, id: &str) -> Option<&mut Route> {
        self.routes.get_mut(id)
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Parses a map snapshot from JSON text, accepting both the current
    /// object form and the legacy single-element array wrapper.
    pub fn load(json: &str) -> RouteResult<Self> {
        let version = content_hash(json.as_bytes());
        let raw: RawSnapshotEnvelope = serde_json::from_str(json)?;
        let raw = raw.into_snapshot()?;
        Self::from_raw(raw, version)
    }

    fn from_raw(raw: RawSnapshot, version: String) -> RouteResult<Self> {
        if raw.stations.is_empty() {
            log::warn!("map snapshot has no stations");
        }

        // Accumulate per-station coordinate contributions from every route
        // segment that references the station, since some snapshot variants
        // only carry per-stop geometry rather than per-station geometry.
        let mut coord_sum: HashMap<&str, (f64, f64, u32)> = HashMap::new();
        for route in &raw.routes {
            for stop in &route.stations {
                if !raw.stations.contains_key(&stop.id) {
                    return Err(RouteError::InvalidSnapshot(format!(
                        "route {} references unknown station {}",
                        route.id, stop.id
                    )));
                }
                if let (Some(x), Some(z)) = (stop.x, stop.z) {
                    let entry = coord_sum.entry(stop.id.as_str()).or_insert((0.0, 0.0, 0));
                    entry.0 += x;
                    entry.1 += z;
                    entry.2 += 1;
                }
            }
        }

        // Stable enumeration order for short-id assignment.
        let mut ordered_ids: Vec<&str> = raw.stations.keys().map(String::as_str).collect();
        ordered_ids.sort_unstable();

        let mut stations = BTreeMap::new();
        for (short_id, id) in ordered_ids.iter().enumerate() {
            let raw_station = &raw.stations[*id];
            let position = match (raw_station.x, raw_station.z) {
                (Some(x), Some(z)) => Some(Point { x, z }),
                _ => coord_sum
                    .get(id)
                    .filter(|(_, _, n)| *n > 0)
                    .map(|(sx, sz, n)| Point { x: sx / f64::from(*n), z: sz / f64::from(*n) }),
            };

            stations.insert(
                (*id).to_owned(),
                Station {
                    id: (*id).to_owned(),
                    name: raw_station.name.clone(),
                    colour: raw_station.color.unwrap_or(0),
                    position,
                    connections: raw_station.connections.clone().unwrap_or_default(),
                    short_id: short_id as u32,
                },
            );
        }

        let mut routes = BTreeMap::new();
        for raw_route in raw.routes {
            let stops: Vec<StationId> = raw_route.stations.iter().map(|s| s.id.clone()).collect();
            let durations: Vec<f64> = raw_route.durations.iter().map(|ms| (*ms / 1000.0).round()).collect();
            let dwell_times: Vec<f64> = raw_route
                .stations
                .iter()
                .map(|s| s.dwell_time.unwrap_or(0.0) / 1000.0)
                .collect();

            let mode = Mode::from_wire(&raw_route.route_type).unwrap_or_else(|| {
                log::warn!("route {} has unknown type {:?}, defaulting to train_normal", raw_route.id, raw_route.route_type);
                Mode::TrainNormal
            });

            routes.insert(
                raw_route.id.clone(),
                Route {
                    id: raw_route.id,
                    name: raw_route.name,
                    number: raw_route.number.unwrap_or_default(),
                    mode,
                    circular: Circular::from_wire(&raw_route.circular_state),
                    colour: raw_route.color.unwrap_or(0),
                    stops,
                    durations,
                    dwell_times,
                },
            );
        }

        Ok(Self { stations, routes, version })
    }
}

fn content_hash(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    crate::utils::to_hex(&Sha256::digest(bytes))
}

// --- wire format -----------------------------------------------------------

/// The map snapshot may arrive as a bare object or wrapped in a single
/// element array, a legacy form some exporters still emit.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSnapshotEnvelope {
    Direct(RawSnapshot),
    Wrapped(Vec<RawSnapshot>),
}

impl RawSnapshotEnvelope {
    fn into_snapshot(self) -> RouteResult<RawSnapshot> {
        match self {
            Self::Direct(snapshot) => Ok(snapshot),
            Self::Wrapped(mut snapshots) => {
                if snapshots.is_empty() {
                    return Err(RouteError::InvalidSnapshot("empty snapshot array".into()));
                }
                Ok(snapshots.remove(0))
            }
        }
    }
}

#[derive(Deserialize)]
struct RawSnapshot {
    stations: HashMap<String, RawStation>,
    #[serde(deserialize_with = "routes_as_vec")]
    routes: Vec<RawRoute>,
}

#[derive(Deserialize)]
struct RawStation {
    name: String,
    color: Option<u32>,
    x: Option<f64>,
    z: Option<f64>,
    connections: Option<Vec<String>>,
    #[serde(rename = "dwellTime")]
    #[allow(dead_code)]
    dwell_time: Option<f64>,
    #[serde(default)]
    #[allow(dead_code)]
    station: Option<String>,
}

#[derive(Deserialize)]
struct RawRoute {
    id: String,
    name: String,
    number: Option<String>,
    color: Option<u32>,
    #[serde(rename = "type")]
    route_type: String,
    #[serde(rename = "circularState", default)]
    circular_state: String,
    stations: Vec<RawRouteStop>,
    #[serde(default)]
    durations: Vec<f64>,
}

#[derive(Deserialize)]
struct RawRouteStop {
    id: String,
    x: Option<f64>,
    z: Option<f64>,
    #[serde(rename = "dwellTime")]
    dwell_time: Option<f64>,
}

/// `routes` may be a JSON array (v3 snapshots) or an object keyed by route id
/// (v4 snapshots) — both are seen in the wild.
fn routes_as_vec<'de, D>(deserializer: D) -> Result<Vec<RawRoute>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RoutesField {
        List(Vec<RawRoute>),
        Map(HashMap<String, RawRoute>),
    }

    Ok(match RoutesField::deserialize(deserializer)? {
        RoutesField::List(list) => list,
        RoutesField::Map(map) => map.into_values().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "stations": {
                "a": { "name": "Alpha", "x": 0.0, "z": 0.0, "connections": ["b"] },
                "b": { "name": "Beta", "x": 100.0, "z": 0.0, "connections": ["a"] }
            },
            "routes": {
                "r1": {
                    "id": "r1",
                    "name": "Red Line",
                    "number": "1",
                    "type": "train_normal",
                    "circularState": "none",
                    "stations": [{"id": "a"}, {"id": "b"}],
                    "durations": [120000]
                }
            }
        }"#
    }

    #[test]
    fn loads_object_form() {
        let store = MapStore::load(sample_json()).unwrap();
        assert_eq!(store.station_count(), 2);
        assert_eq!(store.route_count(), 1);
        let route = store.route_by_id("r1").unwrap();
        assert_eq!(route.durations, vec![120.0]);
    }

    #[test]
    fn loads_legacy_array_wrapper() {
        let wrapped = format!("[{}]", sample_json());
        let store = MapStore::load(&wrapped).unwrap();
        assert_eq!(store.station_count(), 2);
    }

    #[test]
    fn unknown_station_reference_is_rejected() {
        let json = r#"{
            "stations": { "a": { "name": "Alpha", "x": 0.0, "z": 0.0 } },
            "routes": { "r1": {
                "id": "r1", "name": "x", "type": "train_normal", "circularState": "none",
                "stations": [{"id": "a"}, {"id": "missing"}], "durations": [1000]
            }}
        }"#;
        assert!(matches!(MapStore::load(json), Err(RouteError::InvalidSnapshot(_))));
    }

    #[test]
    fn station_without_coordinates_is_not_routable() {
        let json = r#"{
            "stations": { "a": { "name": "Alpha" } },
            "routes": {}
        }"#;
        let store = MapStore::load(json).unwrap();
        assert!(!store.station_by_id("a").unwrap().is_routable());
    }

    #[test]
    fn coordinates_are_averaged_from_route_segments() {
        let json = r#"{
            "stations": { "a": { "name": "Alpha" } },
            "routes": { "r1": {
                "id": "r1", "name": "x", "type": "train_normal", "circularState": "none",
                "stations": [{"id": "a", "x": 10.0, "z": 20.0}], "durations": []
            }, "r2": {
                "id": "r2", "name": "y", "type": "train_normal", "circularState": "none",
                "stations": [{"id": "a", "x": 30.0, "z": 40.0}], "durations": []
            }}
        }"#;
        let store = MapStore::load(json).unwrap();
        let pos = store.station_by_id("a").unwrap().position.unwrap();
        assert_eq!(pos.x, 20.0);
        assert_eq!(pos.z, 30.0);
    }
}
