//! One optimize cycle: order, measure and annotate a trip.

use std::sync::Arc;

use geo::Coord;
use springtrip_core::{
    DirectionsProvider, NearbyPoi, OptimizingProvider, PoiProvider, PreconditionError,
    RouteResult, TripStats, Waypoint,
};

use crate::config::PlannerConfig;
use crate::enrich::PoiEnricher;
use crate::geometry::GeometryFetcher;
use crate::optimizer::RouteOptimizer;

/// External services a [`Planner`] coordinates.
#[derive(Clone)]
pub struct Providers {
    /// Tier-one waypoint optimizer.
    pub optimizer: Arc<dyn OptimizingProvider>,
    /// Road-following directions.
    pub directions: Arc<dyn DirectionsProvider>,
    /// Nearby amenities.
    pub pois: Arc<dyn PoiProvider>,
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers").finish_non_exhaustive()
    }
}

/// Everything derived from one optimize cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTrip {
    /// Ordered, measured route.
    pub route: RouteResult,
    /// Amenities near the route.
    pub pois: Vec<NearbyPoi>,
}

impl PlannedTrip {
    /// Summary statistics of the route.
    #[must_use]
    pub fn stats(&self) -> TripStats {
        self.route.stats()
    }
}

/// Optimizer, geometry fetcher and POI enricher run in sequence.
#[derive(Debug)]
pub struct Planner {
    optimizer: RouteOptimizer,
    geometry: GeometryFetcher,
    enricher: PoiEnricher,
}

impl Planner {
    /// Wire `providers` with the limits in `config`.
    #[must_use]
    pub fn new(providers: Providers, config: &PlannerConfig) -> Self {
        Self {
            optimizer: RouteOptimizer::new(providers.optimizer, config.optimize_timeout),
            geometry: GeometryFetcher::new(
                providers.directions,
                config.directions_timeout,
                config.average_speed_mph,
            ),
            enricher: PoiEnricher::new(
                providers.pois,
                config.poi_timeout,
                config.poi_buffer_degrees,
                config.max_poi_categories,
            ),
        }
    }

    /// Plan a trip from `start` through `waypoints`.
    ///
    /// Provider failures degrade the result but never fail it.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionError`] when the waypoint count is outside the
    /// supported range.
    pub async fn plan(
        &self,
        start: Coord<f64>,
        waypoints: Vec<Waypoint>,
    ) -> Result<PlannedTrip, PreconditionError> {
        let ordered = self.optimizer.optimize(start, waypoints).await?;

        let stops: Vec<Coord<f64>> = std::iter::once(start)
            .chain(ordered.order.iter().map(|waypoint| waypoint.location))
            .collect();
        let measured = self.geometry.fetch(&stops).await;

        let pois = self.enricher.enrich(&measured.geometry).await;
        log::info!(
            "planned {} stops ({:?} order, {:?} stats, {} POIs)",
            ordered.order.len(),
            ordered.source,
            measured.source,
            pois.len()
        );

        Ok(PlannedTrip {
            route: RouteResult {
                order: ordered.order,
                order_source: ordered.source,
                geometry: measured.geometry,
                distance_miles: measured.distance_miles,
                duration: measured.duration,
                stats_source: measured.source,
            },
            pois,
        })
    }
}
