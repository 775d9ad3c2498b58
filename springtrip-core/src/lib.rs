//! Core domain types for the Springtrip trip-routing engine.
//!
//! The crate holds everything the engine needs that does not talk to the
//! network: waypoints and the catalog they live in, the bounded trip state,
//! great-circle distance and polyline geometry, route results, POI types, the
//! share-token codec and the persisted trip record. External services are
//! described by the async provider traits in [`provider`]; concrete HTTP
//! implementations live in `springtrip-data`.
//!
//! Coordinates are WGS84 [`geo::Coord`] values with `x = longitude` and
//! `y = latitude`. Wire and persisted formats use [`LatLng`].

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod coord;
pub mod distance;
pub mod geometry;
pub mod persist;
pub mod poi;
pub mod provider;
pub mod route;
pub mod share;
pub mod trip;
pub mod waypoint;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use coord::{CoordinateError, LatLng};
pub use distance::{
    EARTH_RADIUS_MILES, approximate_duration, approximate_path_distance, distance,
};
pub use geometry::{bounding_envelope, distance_to_polyline};
pub use persist::{PersistError, PersistedTrip, SlotStore, TRIP_SLOT};
pub use poi::{NearbyPoi, PoiCategory, RawPoi};
pub use provider::{
    CatalogSource, Directions, DirectionsProvider, OptimizeRequest, OptimizedOrder,
    OptimizingProvider, PoiProvider, ProviderError, UnconfiguredOptimizer,
};
pub use route::{OrderSource, RouteResult, StatsSource, TripStats};
pub use share::{
    MAX_SHARE_LENGTH, SHARE_PARAM_SPRINGS, SHARE_PARAM_START, ShareError, ShareToken,
};
pub use trip::{
    MAX_WAYPOINTS, MIN_OPTIMIZE_WAYPOINTS, PreconditionError, TripState, TripStateError,
    check_optimize_input,
};
pub use waypoint::{CatalogError, Waypoint, WaypointCatalog, WaypointRecord};
