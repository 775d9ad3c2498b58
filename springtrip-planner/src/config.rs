//! Planner tuning knobs.

use std::time::Duration;

/// Configuration for [`Planner`](crate::Planner).
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Limit for the optimizing provider call.
    pub optimize_timeout: Duration,
    /// Limit for the directions provider call.
    pub directions_timeout: Duration,
    /// Limit for the POI provider call.
    pub poi_timeout: Duration,
    /// Degrees added around the route envelope when searching for POIs.
    pub poi_buffer_degrees: f64,
    /// Most POI categories presented alongside a route.
    pub max_poi_categories: usize,
    /// Speed used to derive approximate durations.
    pub average_speed_mph: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            optimize_timeout: Duration::from_secs(10),
            directions_timeout: Duration::from_secs(10),
            poi_timeout: Duration::from_secs(10),
            poi_buffer_degrees: 0.045,
            max_poi_categories: 3,
            average_speed_mph: 45.0,
        }
    }
}

impl PlannerConfig {
    /// Apply `limit` to every provider call.
    #[must_use]
    pub const fn with_timeout(mut self, limit: Duration) -> Self {
        self.optimize_timeout = limit;
        self.directions_timeout = limit;
        self.poi_timeout = limit;
        self
    }

    /// Set the assumed average speed.
    #[must_use]
    pub const fn with_average_speed_mph(mut self, mph: f64) -> Self {
        self.average_speed_mph = mph;
        self
    }
}
