use transit_pathfinder::{Config, FrequencyStore, MapStore, StationId};

// Common example data for unit tests and benchmarks.

/// A small in-memory map snapshot: three lines sharing one interchange,
/// plus a short spur only reachable on foot, big enough to exercise
/// transfers, parallel-edge collapse, and wild-walking without pulling in
/// a real map dump.
pub fn example_map_json() -> String {
    let mut stations = serde_json::Map::new();
    for (id, name, x, z) in example_station_geometry() {
        stations.insert(id.to_string(), serde_json::json!({ "name": name, "x": x, "z": z }));
    }

    let routes = serde_json::json!({
        "red": {
            "id": "red", "name": "Red Line", "number": "1", "type": "train_normal",
            "circularState": "none",
            "stations": (["a", "b", "c", "d"].map(|id| serde_json::json!({ "id": id }))),
            "durations": [120000, 150000, 130000],
        },
        "blue": {
            "id": "blue", "name": "Blue Line", "number": "2", "type": "train_normal",
            "circularState": "none",
            "stations": (["e", "b", "c", "f"].map(|id| serde_json::json!({ "id": id }))),
            "durations": [100000, 150000, 140000],
        },
        "loop": {
            "id": "loop", "name": "Loop Line", "number": "3", "type": "train_light_rail",
            "circularState": "clockwise",
            "stations": (["c", "g", "h", "c"].map(|id| serde_json::json!({ "id": id }))),
            "durations": [90000, 95000, 100000],
        },
    });

    serde_json::json!({ "stations": stations, "routes": routes }).to_string()
}

fn example_station_geometry() -> [(&'static str, &'static str, f64, f64); 8] {
    [
        ("a", "Alpha", 0.0, 0.0),
        ("b", "Bravo|布拉沃", 1000.0, 0.0),
        ("c", "Charlie", 2200.0, 0.0),
        ("d", "Delta", 3300.0, 0.0),
        ("e", "Echo", 1000.0, -900.0),
        ("f", "Foxtrot", 3600.0, 300.0),
        ("g", "Golf", 2250.0, 400.0),
        ("h", "Hotel", 2150.0, 700.0),
    ]
}

/// Evenly spaced departures for each line, tuned so `FrequencyStore`
/// produces distinct, easy-to-reason-about headways in tests.
pub fn example_frequency_json() -> String {
    let departures = |headway_s: i64| -> Vec<f64> { (0..144).map(|i| (i * headway_s) as f64).collect() };

    serde_json::json!({
        "Red Line": departures(360),
        "Blue Line": departures(180),
        "Loop Line": departures(240),
    })
    .to_string()
}

pub fn load_example_map() -> MapStore {
    MapStore::load(&example_map_json()).expect("example map snapshot is well-formed")
}

pub fn load_example_frequencies() -> FrequencyStore {
    let config = Config::default();
    FrequencyStore::load(&example_frequency_json(), config.headway_rounding_s, config.min_headway_s)
        .expect("example frequency dump is well-formed")
}

/// A ready-to-route scenario: map, frequencies, config, and an origin and
/// destination a few hops apart with a transfer in the middle.
pub fn example_scenario() -> (MapStore, FrequencyStore, Config, StationId, StationId) {
    let map = load_example_map();
    let frequencies = load_example_frequencies();
    let config = Config::default();
    (map, frequencies, config, "a".to_string(), "f".to_string())
}
