use std::collections::HashMap;

use crate::map::Mode;

/// Tunable constants for the routing algorithm, with `Default` set to the
/// values a rider would expect (transfer/wild-walk speeds, collapse and
/// preemption margins, fuzzy-match threshold, headway rounding). Collected
/// into one struct so an embedding application can override any of them
/// without threading individual parameters through every constructor.
#[derive(Debug, Clone)]
pub struct Config {
    /// Candidates within this many seconds of the minimum in-vehicle time
    /// survive the parallel-edge collapse.
    pub collapse_window_s: f64,
    /// Transfer-walk speed, blocks/second.
    pub transfer_walk_speed: f64,
    /// Wild-walk speed, blocks/second.
    pub wild_walk_speed: f64,
    /// Default cap on wild-walk edge length, blocks.
    pub default_max_wild_blocks: f64,
    /// A wild-walk edge is only preferred over an existing rail edge if it is
    /// faster by more than this many seconds.
    pub wild_walk_preemption_margin_s: f64,
    /// Minimum fuzzy-match similarity ratio for name resolution.
    pub fuzzy_match_threshold: f64,
    /// Mean headway rounding granularity, seconds.
    pub headway_rounding_s: u64,
    /// Minimum mean headway, seconds.
    pub min_headway_s: u64,
    /// Extra transfer neighbours, keyed by folded station name, added on
    /// top of whatever the snapshot's own `connections` declare. Lets an
    /// operator patch a missing or one-sided transfer without editing the
    /// map snapshot itself.
    pub transfer_addition: HashMap<String, Vec<String>>,
    /// Extra named wild-walk neighbours, keyed by folded station name,
    /// added regardless of `max_wild_blocks` distance gating.
    pub wild_addition: HashMap<String, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            collapse_window_s: 60.0,
            transfer_walk_speed: 4.317,
            wild_walk_speed: 2.25,
            default_max_wild_blocks: 1500.0,
            wild_walk_preemption_margin_s: 120.0,
            fuzzy_match_threshold: 0.2,
            headway_rounding_s: 10,
            min_headway_s: 10,
            transfer_addition: HashMap::new(),
            wild_addition: HashMap::new(),
        }
    }
}

impl Config {
    /// Nominal mode speed in blocks/second, used to interpolate missing
    /// segment durations.
    pub fn mode_speed(&self, mode: Mode) -> f64 {
        match mode {
            Mode::TrainNormal => 14.0,
            Mode::TrainLightRail => 11.0,
            Mode::TrainHighSpeed => 40.0,
            Mode::BoatNormal => 10.0,
            Mode::BoatLightRail => 10.0,
            Mode::BoatHighSpeed => 13.0,
            Mode::CableCarNormal => 8.0,
            Mode::AirplaneNormal => 70.0,
        }
    }

    /// Default mean headway in seconds for a mode with no observed
    /// departures.
    pub fn mode_default_headway(&self, mode: Mode) -> u64 {
        match mode {
            Mode::TrainHighSpeed => 600,
            Mode::TrainLightRail | Mode::BoatLightRail => 180,
            Mode::BoatNormal | Mode::BoatHighSpeed => 900,
            Mode::CableCarNormal => 2,
            Mode::TrainNormal | Mode::AirplaneNormal => 300,
        }
    }
}
