//! Station-to-station distance and nominal travel-time interpolation,
//! used to fill in segment durations the map snapshot left as zero.

use crate::config::Config;
use crate::map::{Point, Route};

pub struct GeometryUtil<'a> {
    config: &'a Config,
}

impl<'a> GeometryUtil<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn distance(a: Point, b: Point) -> f64 {
        ((a.x - b.x).powi(2) + (a.z - b.z).powi(2)).sqrt()
    }

    /// Sums interpolated per-segment time over `[i1..i2]` for a route's stop
    /// positions, at the route's nominal mode speed. Returns `None`
    /// if any stop in range is missing coordinates, so the caller can drop
    /// the candidate edge instead of fabricating a distance.
    pub fn nominal_time(&self, route: &Route, positions: &[Option<Point>], i1: usize, i2: usize) -> Option<f64> {
        debug_assert!(i1 <= i2);
        let speed = self.config.mode_speed(route.mode);
        let mut total = 0.0;
        for k in i1..i2 {
            let p = positions.get(k)?.as_ref().copied()?;
            let q = positions.get(k + 1)?.as_ref().copied()?;
            total += Self::distance(p, q) / speed;
        }
        Some(total)
    }
}
