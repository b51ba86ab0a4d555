use std::io::{stdout, Write};

use transit_pathfinder::{CancellationToken, Config, FrequencyStore, GraphCache, MapStore, NameResolver, RoutingEngine, RoutingRequest};

fn prompt(label: &str) -> std::io::Result<String> {
    print!("{label} ");
    stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let map_path = std::env::args().nth(1).ok_or("usage: plan <map-snapshot.json> [frequency-dump.json]")?;
    let map_json = std::fs::read_to_string(&map_path)?;
    let map = MapStore::load(&map_json)?;
    log::info!("loaded {} stations, {} routes", map.station_count(), map.route_count());

    let config = Config::default();
    let frequencies = match std::env::args().nth(2) {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            FrequencyStore::load(&json, config.headway_rounding_s, config.min_headway_s)?
        }
        None => FrequencyStore::empty(),
    };

    let resolver = NameResolver::new(&config);
    let cache = GraphCache::new(std::env::temp_dir().join("transit-pathfinder-cache"));
    let engine = RoutingEngine::new(&map, &frequencies, &resolver, Some(&cache), &config);

    loop {
        let origin = prompt("Where are you starting?")?;
        let destination = prompt("Where are you going?")?;

        let request = RoutingRequest { origin, destination, ..RoutingRequest::default() };

        match engine.plan(&request, &CancellationToken::new()) {
            Ok(itinerary) => println!("{itinerary}"),
            Err(e) => println!("Could not plan that journey: {e}"),
        }

        println!();
        if prompt("Plan another journey? (y/n)")?.eq_ignore_ascii_case("n") {
            break;
        }
    }

    Ok(())
}
