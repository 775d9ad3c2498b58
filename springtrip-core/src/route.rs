//! Route results produced by an optimize cycle.
//!
//! A [`RouteResult`] is derived state: it is recomputed on every optimize and
//! discarded whenever the trip changes.

use std::time::Duration;

use geo::LineString;

use crate::Waypoint;

/// Which optimizer tier produced the waypoint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSource {
    /// The external optimizing provider.
    Provider,
    /// The sort-by-distance-from-start heuristic.
    Fallback,
}

/// Where the distance/duration figures came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsSource {
    /// A road-aware provider.
    Provider,
    /// Summed great-circle legs; ignores the road network.
    Approximate,
}

/// An ordered, measured, renderable route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// Waypoints in visiting order; the start is implicit before the first.
    pub order: Vec<Waypoint>,
    /// Tier that produced `order`.
    pub order_source: OrderSource,
    /// Path vertices from the start through every stop.
    pub geometry: LineString<f64>,
    /// Total distance in miles.
    pub distance_miles: f64,
    /// Total driving time.
    pub duration: Duration,
    /// Provenance of `distance_miles` and `duration`.
    pub stats_source: StatsSource,
}

/// Summary figures for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripStats {
    /// Number of stops after the start.
    pub stops: usize,
    /// Total distance in miles.
    pub distance_miles: f64,
    /// Total driving time.
    pub duration: Duration,
    /// Whether the figures ignore the road network.
    pub approximate: bool,
}

impl RouteResult {
    /// Identifiers of the ordered waypoints.
    #[must_use]
    pub fn waypoint_ids(&self) -> Vec<String> {
        self.order.iter().map(|waypoint| waypoint.id.clone()).collect()
    }

    /// Summary statistics.
    #[must_use]
    pub fn stats(&self) -> TripStats {
        TripStats {
            stops: self.order.len(),
            distance_miles: self.distance_miles,
            duration: self.duration,
            approximate: self.stats_source == StatsSource::Approximate,
        }
    }
}
