//! Route geometry and aggregate figures for an ordered trip.

use std::sync::Arc;
use std::time::Duration;

use geo::{Coord, LineString};
use springtrip_core::{
    DirectionsProvider, StatsSource, approximate_duration, approximate_path_distance,
};

use crate::timeout::{CallOutcome, with_timeout};

/// Path and figures for an ordered list of stops.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    /// Path vertices.
    pub geometry: LineString<f64>,
    /// Total distance in miles.
    pub distance_miles: f64,
    /// Total driving time.
    pub duration: Duration,
    /// Provenance of the figures.
    pub source: StatsSource,
}

impl RouteGeometry {
    /// Straight segments between consecutive `stops`, with great-circle
    /// distance and a duration at `average_speed_mph`.
    #[must_use]
    pub fn straight_segments(stops: &[Coord<f64>], average_speed_mph: f64) -> Self {
        let distance_miles = approximate_path_distance(stops);
        Self {
            geometry: LineString::new(stops.to_vec()),
            distance_miles,
            duration: approximate_duration(distance_miles, average_speed_mph),
            source: StatsSource::Approximate,
        }
    }
}

/// Fetches road-following geometry, falling back to straight segments.
pub struct GeometryFetcher {
    provider: Arc<dyn DirectionsProvider>,
    timeout: Duration,
    average_speed_mph: f64,
}

impl std::fmt::Debug for GeometryFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryFetcher")
            .field("provider", &"<dyn DirectionsProvider>")
            .field("timeout", &self.timeout)
            .field("average_speed_mph", &self.average_speed_mph)
            .finish()
    }
}

impl GeometryFetcher {
    /// Build a fetcher around `provider`.
    #[must_use]
    pub fn new(
        provider: Arc<dyn DirectionsProvider>,
        timeout: Duration,
        average_speed_mph: f64,
    ) -> Self {
        Self {
            provider,
            timeout,
            average_speed_mph,
        }
    }

    /// Geometry through `stops`, start first.
    ///
    /// Never fails: any provider failure yields
    /// [`RouteGeometry::straight_segments`].
    pub async fn fetch(&self, stops: &[Coord<f64>]) -> RouteGeometry {
        match with_timeout(self.timeout, self.provider.directions(stops)).await {
            CallOutcome::Success(directions) if !directions.geometry.0.is_empty() => {
                RouteGeometry {
                    geometry: directions.geometry,
                    distance_miles: directions.distance_miles,
                    duration: directions.duration,
                    source: StatsSource::Provider,
                }
            }
            CallOutcome::Success(_) => {
                log::warn!("directions provider returned an empty geometry; using straight segments");
                self.fallback(stops)
            }
            CallOutcome::Failed(err) => {
                log::warn!("directions provider failed: {err}; using straight segments");
                self.fallback(stops)
            }
            CallOutcome::TimedOut => {
                log::warn!(
                    "directions provider timed out after {}s; using straight segments",
                    self.timeout.as_secs()
                );
                self.fallback(stops)
            }
        }
    }

    fn fallback(&self, stops: &[Coord<f64>]) -> RouteGeometry {
        RouteGeometry::straight_segments(stops, self.average_speed_mph)
    }
}
