//! Fuzzy resolution of free-text station and line names, with a pluggable
//! multi-script fallback.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::config::Config;
use crate::map::{MapStore, RouteId, StationId};

/// Converts a name between script variants (e.g. simplified <-> traditional
/// Chinese, traditional <-> Japanese kanji). The default converter is a
/// no-op: script conversion tables are an external data dependency this
/// crate does not embed, leaving that policy to the caller rather than
/// hardcoding it.
pub trait ScriptConverter: Send + Sync {
    /// Additional spellings of `text` worth trying, beyond the literal
    /// input. Returning an empty vec is always a legal "I don't know".
    fn variants(&self, text: &str) -> Vec<String>;
}

#[derive(Default)]
pub struct IdentityScriptConverter;

impl ScriptConverter for IdentityScriptConverter {
    fn variants(&self, _text: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Resolves free-text station and line names against a [`MapStore`],
/// memoising folded text -> station id. The memo is process-wide from the
/// caller's point of view (one `NameResolver` is expected to be shared), and
/// must be cleared whenever the backing `MapStore` is reloaded.
pub struct NameResolver {
    converter: Box<dyn ScriptConverter>,
    fuzzy_match_threshold: f64,
    memo: Mutex<HashMap<String, Option<StationId>>>,
}

impl NameResolver {
    pub fn new(config: &Config) -> Self {
        Self::with_converter(config, Box::new(IdentityScriptConverter))
    }

    pub fn with_converter(config: &Config, converter: Box<dyn ScriptConverter>) -> Self {
        Self {
            converter,
            fuzzy_match_threshold: config.fuzzy_match_threshold,
            memo: Mutex::new(HashMap::new()),
        }
    }

    pub fn clear_memo(&self) {
        self.memo.lock().expect("name resolver memo poisoned").clear();
    }

    /// Resolves free text to a routable station id.
    pub fn resolve_station(&self, map: &MapStore, text: &str, fuzzy: bool) -> Option<StationId> {
        let folded = fold(text);
        if let Some(cached) = self.memo.lock().expect("name resolver memo poisoned").get(&folded) {
            return cached.clone();
        }

        let resolved = self.resolve_station_uncached(map, &folded, fuzzy);
        self.memo
            .lock()
            .expect("name resolver memo poisoned")
            .insert(folded, resolved.clone());
        resolved
    }

    fn resolve_station_uncached(&self, map: &MapStore, folded: &str, fuzzy: bool) -> Option<StationId> {
        let candidates = self.candidate_texts(folded);

        for station in map.stations().filter(|s| s.is_routable()) {
            if station_name_matches(&station.name, &candidates) {
                return Some(station.id.clone());
            }
        }

        if !fuzzy {
            return None;
        }

        let mut best: Option<(f64, &StationId)> = None;
        for station in map.stations().filter(|s| s.is_routable()) {
            for variant in station.name_variants() {
                let folded_variant = fold(variant);
                for candidate in &candidates {
                    let score = strsim::normalized_levenshtein(candidate, &folded_variant);
                    let better = match best {
                        Some((best_score, _)) => score > best_score,
                        None => true,
                    };
                    if better {
                        best = Some((score, &station.id));
                    }
                }
            }
        }

        match best {
            Some((score, id)) if score >= self.fuzzy_match_threshold => Some(id.clone()),
            _ => None,
        }
    }

    /// Resolves free text to every route id sharing that display name,
    /// trying `"{base} {number}"` combinations as well.
    pub fn resolve_routes(&self, map: &MapStore, text: &str) -> Vec<RouteId> {
        let folded = fold(text);
        let candidates = self.candidate_texts(&folded);

        let mut matches = Vec::new();
        for route in map.routes() {
            let name_candidates = [
                fold(&route.name),
                fold(&format!("{} {}", route.name, route.number)),
            ];
            let route_variants: Vec<String> = route
                .name
                .split('|')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(fold)
                .collect();

            let is_match = candidates.iter().any(|c| {
                name_candidates.iter().any(|n| n == c) || route_variants.iter().any(|v| v == c)
            });
            if is_match {
                matches.push(route.id.clone());
            }
        }
        matches
    }

    /// The literal folded text plus every script conversion the configured
    /// converter offers.
    pub(crate) fn candidate_texts(&self, folded: &str) -> Vec<String> {
        let mut candidates = vec![folded.to_string()];
        candidates.extend(self.converter.variants(folded).into_iter().map(|v| fold(&v)));
        candidates
    }
}

pub(crate) fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

/// True if any candidate text exactly matches the full (pipe-joined) name,
/// one of its pipe-separated variants, the text before the first slash of
/// the last variant, or the first variant.
fn station_name_matches(name: &str, candidates: &[String]) -> bool {
    let folded_full = fold(name);
    if candidates.iter().any(|c| c == &folded_full) {
        return true;
    }

    let variants: Vec<&str> = name.split('|').map(str::trim).filter(|s| !s.is_empty()).collect();
    if variants.iter().any(|v| candidates.iter().any(|c| c == &fold(v))) {
        return true;
    }

    if let Some(last) = variants.last() {
        let before_slash = last.split('/').next().unwrap_or(last);
        if candidates.iter().any(|c| c == &fold(before_slash)) {
            return true;
        }
    }

    if let Some(first) = variants.first() {
        if candidates.iter().any(|c| c == &fold(first)) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with_stations() -> MapStore {
        let json = r#"{
            "stations": {
                "a": { "name": "Central|中環", "x": 0.0, "z": 0.0 },
                "b": { "name": "Admiralty|金鐘/Gold Bell", "x": 100.0, "z": 0.0 }
            },
            "routes": {}
        }"#;
        MapStore::load(json).unwrap()
    }

    #[test]
    fn exact_match_on_first_variant() {
        let map = map_with_stations();
        let resolver = NameResolver::new(&Config::default());
        assert_eq!(resolver.resolve_station(&map, "Central", false), Some("a".to_string()));
    }

    #[test]
    fn exact_match_on_second_variant() {
        let map = map_with_stations();
        let resolver = NameResolver::new(&Config::default());
        assert_eq!(resolver.resolve_station(&map, "中環", false), Some("a".to_string()));
    }

    #[test]
    fn exact_match_before_slash() {
        let map = map_with_stations();
        let resolver = NameResolver::new(&Config::default());
        assert_eq!(resolver.resolve_station(&map, "金鐘", false), Some("b".to_string()));
    }

    #[test]
    fn case_folded_match() {
        let map = map_with_stations();
        let resolver = NameResolver::new(&Config::default());
        assert_eq!(resolver.resolve_station(&map, "CENTRAL", false), Some("a".to_string()));
    }

    #[test]
    fn fuzzy_match_within_threshold() {
        let map = map_with_stations();
        let resolver = NameResolver::new(&Config::default());
        assert_eq!(resolver.resolve_station(&map, "Centrall", true), Some("a".to_string()));
    }

    #[test]
    fn no_fuzzy_match_without_flag() {
        let map = map_with_stations();
        let resolver = NameResolver::new(&Config::default());
        assert_eq!(resolver.resolve_station(&map, "Centrall", false), None);
    }

    #[test]
    fn memo_is_cleared() {
        let map = map_with_stations();
        let resolver = NameResolver::new(&Config::default());
        resolver.resolve_station(&map, "Central", false);
        assert!(resolver.memo.lock().unwrap().contains_key("central"));
        resolver.clear_memo();
        assert!(resolver.memo.lock().unwrap().is_empty());
    }
}
