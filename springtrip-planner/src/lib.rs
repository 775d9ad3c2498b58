//! Trip planning and session orchestration for Springtrip.
//!
//! The [`Planner`] runs one optimize cycle: the [`RouteOptimizer`] orders the
//! waypoints (optimizing provider first, distance-from-start sort as the
//! fallback), the [`GeometryFetcher`] measures the ordered route, and the
//! [`PoiEnricher`] annotates it with nearby amenities. Every provider call is
//! bounded by [`with_timeout`]; provider failures degrade the result but never
//! fail it.
//!
//! [`TripSession`] owns the trip state and drives the planner, persistence and
//! share links. It is single-threaded and guards against overlapping and stale
//! optimize runs.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod catalog;
mod config;
mod enrich;
mod geometry;
mod optimizer;
mod persistence;
mod planner;
mod session;
mod timeout;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use catalog::load_catalog;
pub use config::PlannerConfig;
pub use enrich::{PoiEnricher, select_nearby};
pub use geometry::{GeometryFetcher, RouteGeometry};
pub use optimizer::{OrderedWaypoints, RouteOptimizer, fallback_order};
pub use persistence::TripPersistence;
pub use planner::{PlannedTrip, Planner, Providers};
pub use session::{
    Command, CommandOutcome, OptimizeOutcome, RestoreSource, SessionError, TripSession,
};
pub use timeout::{CallOutcome, with_timeout};
