//! Test-only builders for `springtrip-planner`.
//!
//! The helpers wire deterministic stub providers from
//! `springtrip_core::test_support` into planners and sessions. They are gated
//! behind the `test-support` feature (and `cfg(test)`).

use std::rc::Rc;
use std::sync::Arc;

use springtrip_core::test_support::{
    MemorySlotStore, StubDirectionsProvider, StubPoiProvider, waypoint,
};
use springtrip_core::{UnconfiguredOptimizer, WaypointCatalog};

use crate::{Planner, PlannerConfig, Providers, TripPersistence, TripSession};

/// Five Washington hot springs.
///
/// # Examples
/// ```rust
/// use springtrip_planner::test_support::sample_catalog;
///
/// let catalog = sample_catalog();
/// assert!(catalog.contains("sol-duc"));
/// ```
#[must_use]
pub fn sample_catalog() -> WaypointCatalog {
    WaypointCatalog::new([
        waypoint("sol-duc", 47.9690, -123.8624),
        waypoint("baker", 48.7634, -121.6690),
        waypoint("goldmyer", 47.4856, -121.3873),
        waypoint("scenic", 47.7093, -121.1387),
        waypoint("olympic", 47.9756, -123.6846),
    ])
}

/// Providers with no optimizer credential, straight-line directions and no
/// POIs.
#[must_use]
pub fn offline_providers() -> Providers {
    Providers {
        optimizer: Arc::new(UnconfiguredOptimizer),
        directions: Arc::new(StubDirectionsProvider::following_stops()),
        pois: Arc::new(StubPoiProvider::empty()),
    }
}

/// A session over `catalog` and `providers`, persisting into `store`.
#[must_use]
pub fn session_with(
    catalog: WaypointCatalog,
    providers: Providers,
    store: Rc<MemorySlotStore>,
) -> TripSession {
    TripSession::new(
        catalog,
        Planner::new(providers, &PlannerConfig::default()),
        TripPersistence::new(store),
    )
}
