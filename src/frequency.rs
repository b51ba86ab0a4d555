//! Observed-departure statistics: how often a line actually runs, used to
//! approximate expected waiting time without simulating a full timetable.

use std::collections::HashMap;

use crate::error::RouteResult;

/// `mean_headway[route_name] -> seconds`, computed from a departures dump
///. Construction never fails: an absent or empty dump just yields an
/// empty store, and callers fall back to `Config::mode_default_headway`.
#[derive(Debug, Clone, Default)]
pub struct FrequencyStore {
    mean_headway: HashMap<String, u64>,
    version: String,
}

impl FrequencyStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Content hash of the raw departures dump, part of the graph cache
    /// fingerprint.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn mean_headway(&self, route_name: &str) -> Option<u64> {
        self.mean_headway.get(route_name).copied()
    }

    pub fn len(&self) -> usize {
        self.mean_headway.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean_headway.is_empty()
    }

    /// Loads a departures dump: `{ route_id -> [seconds_in_day, ...] }`. Each
    /// list need not be sorted; this function sorts it before taking deltas.
    pub fn load(json: &str, round_to_s: u64, min_headway_s: u64) -> RouteResult<Self> {
        let version = {
            use sha2::{Digest, Sha256};
            crate::utils::to_hex(&Sha256::digest(json.as_bytes()))
        };

        let raw: HashMap<String, Vec<f64>> = serde_json::from_str(json)?;
        let mut mean_headway = HashMap::with_capacity(raw.len());

        for (route_name, mut departures) in raw {
            let Some(headway) = low_median_headway(&mut departures, round_to_s, min_headway_s) else {
                continue;
            };
            mean_headway.insert(route_name, headway);
        }

        Ok(Self { mean_headway, version })
    }
}

/// Low median of consecutive departure deltas, wrapping the day (last
/// departure to first departure of the next day counts as `86400 -
/// last + first`), rounded to the nearest `round_to_s` with a floor of
/// `min_headway_s`.
fn low_median_headway(departures: &mut [f64], round_to_s: u64, min_headway_s: u64) -> Option<u64> {
    if departures.len() < 2 {
        return None;
    }
    departures.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut deltas: Vec<f64> = departures.windows(2).map(|w| w[1] - w[0]).collect();
    let wraparound = 86400.0 - departures[departures.len() - 1] + departures[0];
    deltas.push(wraparound);

    deltas.sort_by(|a, b| a.partial_cmp(b).unwrap());
    // Low median: for an even count, take the lower of the two middle values.
    let low_median = deltas[(deltas.len() - 1) / 2];

    let rounded = ((low_median / round_to_s as f64).round() as u64) * round_to_s;
    Some(rounded.max(min_headway_s))
}
