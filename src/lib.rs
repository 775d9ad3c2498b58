//! Facade crate for the Springtrip trip-routing engine.
//!
//! This crate re-exports the core domain types and exposes the trip session
//! and the HTTP-backed providers behind feature flags.

#![forbid(unsafe_code)]

pub use springtrip_core::{
    CatalogError, CatalogSource, CoordinateError, DirectionsProvider, LatLng, NearbyPoi,
    OptimizingProvider, PersistedTrip, PoiCategory, PoiProvider, PreconditionError,
    ProviderError, RouteResult, ShareError, ShareToken, SlotStore, TripState, TripStateError,
    TripStats, Waypoint, WaypointCatalog, WaypointRecord,
};

#[cfg(feature = "planner")]
pub use springtrip_planner::{
    Command, CommandOutcome, OptimizeOutcome, PlannedTrip, Planner, PlannerConfig, Providers,
    RestoreSource, SessionError, TripPersistence, TripSession, load_catalog,
};

#[cfg(feature = "http-providers")]
pub use springtrip_data::{
    FileSlotStore, HttpCatalogSource, HttpOptimizingProvider, HttpProviderConfig,
    JsonFileCatalog, OsrmDirectionsProvider, OverpassPoiProvider,
};
