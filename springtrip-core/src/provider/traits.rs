//! Provider traits and the values they exchange.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use geo::{Coord, LineString, Rect};

use super::error::ProviderError;
use crate::poi::{PoiCategory, RawPoi};
use crate::waypoint::{CatalogError, WaypointRecord};

/// Input to an [`OptimizingProvider`].
///
/// The provider may reorder `intermediates`; `origin` and `destination` stay
/// fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeRequest {
    /// Trip start.
    pub origin: Coord<f64>,
    /// Final stop.
    pub destination: Coord<f64>,
    /// Stops the provider is free to reorder.
    pub intermediates: Vec<Coord<f64>>,
}

/// Reordering returned by an [`OptimizingProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedOrder {
    /// Permutation of intermediate indices in visiting order.
    pub waypoint_order: Vec<usize>,
    /// Aggregate distance in miles, if reported.
    pub distance_miles: Option<f64>,
    /// Aggregate travel time, if reported.
    pub duration: Option<Duration>,
}

impl OptimizedOrder {
    /// Check that `waypoint_order` is a permutation of `0..intermediate_count`.
    ///
    /// # Examples
    /// ```
    /// use springtrip_core::OptimizedOrder;
    ///
    /// let order = OptimizedOrder { waypoint_order: vec![2, 0, 1], distance_miles: None, duration: None };
    /// assert!(order.validate(3).is_ok());
    /// assert!(order.validate(4).is_err());
    /// ```
    pub fn validate(&self, intermediate_count: usize) -> Result<(), ProviderError> {
        if self.waypoint_order.len() != intermediate_count {
            return Err(ProviderError::parse(format!(
                "expected {intermediate_count} waypoint indices, got {}",
                self.waypoint_order.len()
            )));
        }
        let mut seen = HashSet::with_capacity(intermediate_count);
        for &index in &self.waypoint_order {
            if index >= intermediate_count || !seen.insert(index) {
                return Err(ProviderError::parse(format!(
                    "waypoint order {:?} is not a permutation",
                    self.waypoint_order
                )));
            }
        }
        Ok(())
    }
}

/// Tier-one route optimizer: an external service that reorders stops for
/// minimal travel.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use springtrip_core::{OptimizeRequest, OptimizedOrder, OptimizingProvider, ProviderError};
///
/// struct Identity;
///
/// #[async_trait]
/// impl OptimizingProvider for Identity {
///     async fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizedOrder, ProviderError> {
///         Ok(OptimizedOrder {
///             waypoint_order: (0..request.intermediates.len()).collect(),
///             distance_miles: None,
///             duration: None,
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait OptimizingProvider: Send + Sync {
    /// Reorder `request.intermediates`.
    ///
    /// Implementations without a configured credential must return
    /// [`ProviderError::MissingCredential`] without touching the network.
    async fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizedOrder, ProviderError>;
}

/// Optimizing provider used when no credential is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredOptimizer;

#[async_trait]
impl OptimizingProvider for UnconfiguredOptimizer {
    async fn optimize(&self, _request: &OptimizeRequest) -> Result<OptimizedOrder, ProviderError> {
        Err(ProviderError::MissingCredential)
    }
}

/// Road-following path and aggregate figures for an ordered list of stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Directions {
    /// Path vertices.
    pub geometry: LineString<f64>,
    /// Total distance in miles.
    pub distance_miles: f64,
    /// Total driving time.
    pub duration: Duration,
}

/// Directions/geometry provider.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Route through `stops` in the given order.
    ///
    /// Implementations must return [`ProviderError::EmptyInput`] for an empty
    /// slice.
    async fn directions(&self, stops: &[Coord<f64>]) -> Result<Directions, ProviderError>;
}

/// Points-of-interest provider.
#[async_trait]
pub trait PoiProvider: Send + Sync {
    /// Every element of `categories` inside `envelope`.
    ///
    /// Elements may lack a name; consumers filter those out.
    async fn find_pois(
        &self,
        envelope: &Rect<f64>,
        categories: &[PoiCategory],
    ) -> Result<Vec<RawPoi>, ProviderError>;
}

/// Read-only source of the waypoint catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every record, following pagination to the end.
    async fn fetch_records(&self) -> Result<Vec<WaypointRecord>, CatalogError>;
}
