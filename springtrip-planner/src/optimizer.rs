//! Tiered waypoint ordering.
//!
//! Tier one asks the optimizing provider to reorder the stops. Any failure,
//! including a missing credential or a timeout, drops to the geometric
//! fallback, which always succeeds. Only precondition failures reach the
//! caller.

use std::sync::Arc;
use std::time::Duration;

use geo::Coord;
use springtrip_core::{
    OptimizeRequest, OptimizedOrder, OptimizingProvider, OrderSource, PreconditionError,
    ProviderError, Waypoint, check_optimize_input, distance,
};

use crate::timeout::{CallOutcome, with_timeout};

/// Waypoints in visiting order, with the tier that ordered them.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedWaypoints {
    /// Visiting order; the start is implicit before the first entry.
    pub order: Vec<Waypoint>,
    /// Tier that produced `order`.
    pub source: OrderSource,
    /// Aggregate distance reported by the provider tier.
    pub distance_miles: Option<f64>,
    /// Aggregate duration reported by the provider tier.
    pub duration: Option<Duration>,
}

/// Sort `waypoints` by ascending great-circle distance from `start`.
///
/// The sort is stable, so equidistant waypoints keep their relative order.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use springtrip_core::Waypoint;
/// use springtrip_planner::fallback_order;
///
/// let start = Coord { x: -120.74, y: 47.60 };
/// let far = Waypoint::new("far", "Far", Coord { x: -119.0, y: 46.0 });
/// let near = Waypoint::new("near", "Near", Coord { x: -120.5, y: 47.5 });
/// let order = fallback_order(start, vec![far, near]);
/// assert_eq!(order[0].id, "near");
/// ```
#[must_use]
pub fn fallback_order(start: Coord<f64>, waypoints: Vec<Waypoint>) -> Vec<Waypoint> {
    let mut keyed: Vec<(f64, Waypoint)> = waypoints
        .into_iter()
        .map(|waypoint| (distance(start, waypoint.location), waypoint))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    keyed.into_iter().map(|(_, waypoint)| waypoint).collect()
}

/// Route optimizer with a provider tier and a geometric fallback.
pub struct RouteOptimizer {
    provider: Arc<dyn OptimizingProvider>,
    timeout: Duration,
}

impl std::fmt::Debug for RouteOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteOptimizer")
            .field("provider", &"<dyn OptimizingProvider>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RouteOptimizer {
    /// Build an optimizer around `provider`, bounding each call by `timeout`.
    #[must_use]
    pub fn new(provider: Arc<dyn OptimizingProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Order `waypoints` for a trip starting at `start`.
    ///
    /// The result is always a permutation of `waypoints`.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionError`] for fewer than two or more than fifty
    /// waypoints, before any provider is contacted.
    pub async fn optimize(
        &self,
        start: Coord<f64>,
        waypoints: Vec<Waypoint>,
    ) -> Result<OrderedWaypoints, PreconditionError> {
        check_optimize_input(Some(start), waypoints.len())?;

        match self.provider_tier(start, &waypoints).await {
            Some(ordered) => Ok(ordered),
            None => {
                log::debug!("ordering {} waypoints by distance from start", waypoints.len());
                Ok(OrderedWaypoints {
                    order: fallback_order(start, waypoints),
                    source: OrderSource::Fallback,
                    distance_miles: None,
                    duration: None,
                })
            }
        }
    }

    async fn provider_tier(
        &self,
        start: Coord<f64>,
        waypoints: &[Waypoint],
    ) -> Option<OrderedWaypoints> {
        let (destination, intermediates) = waypoints.split_last()?;
        let request = OptimizeRequest {
            origin: start,
            destination: destination.location,
            intermediates: intermediates.iter().map(|waypoint| waypoint.location).collect(),
        };

        let order = match with_timeout(self.timeout, self.provider.optimize(&request)).await {
            CallOutcome::Success(order) => order,
            CallOutcome::Failed(ProviderError::MissingCredential) => {
                log::debug!("optimizing provider is not configured; skipping");
                return None;
            }
            CallOutcome::Failed(err) => {
                log::warn!("optimizing provider failed: {err}");
                return None;
            }
            CallOutcome::TimedOut => {
                log::warn!(
                    "optimizing provider timed out after {}s",
                    self.timeout.as_secs()
                );
                return None;
            }
        };

        let Some(mut order_waypoints) = apply_order(&order, intermediates) else {
            log::warn!(
                "optimizing provider returned an invalid order {:?}",
                order.waypoint_order
            );
            return None;
        };
        order_waypoints.push(destination.clone());
        Some(OrderedWaypoints {
            order: order_waypoints,
            source: OrderSource::Provider,
            distance_miles: order.distance_miles,
            duration: order.duration,
        })
    }
}

/// Map the provider's permutation onto `intermediates`.
fn apply_order(order: &OptimizedOrder, intermediates: &[Waypoint]) -> Option<Vec<Waypoint>> {
    order.validate(intermediates.len()).ok()?;
    order
        .waypoint_order
        .iter()
        .map(|&index| intermediates.get(index).cloned())
        .collect()
}
