//! Service adapters for the Springtrip engine.
//!
//! Responsibilities:
//! - Implement the provider traits from `springtrip-core` over HTTP: the
//!   waypoint optimizer, OSRM directions, Overpass points of interest and the
//!   paginated waypoint catalog.
//! - Provide the file-backed catalog and slot store.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `springtrip-core`).
//! - Do not decide fallbacks; callers wrap every call in their own timeout
//!   and choose what to do on failure.
//!
//! Invariants:
//! - Providers are `Send + Sync` and hold no mutable state.
//! - Blocking file I/O stays off async executors.

pub mod catalog;
pub mod http;
pub mod overpass;
pub mod routing;
pub mod slot;

pub use catalog::{DEFAULT_MAX_PAGES, HttpCatalogSource, JsonFileCatalog};
pub use http::{DEFAULT_USER_AGENT, HttpProviderConfig, ProviderBuildError};
pub use overpass::{DEFAULT_OVERPASS_URL, OverpassPoiProvider, overpass_query};
pub use routing::{HttpOptimizingProvider, METERS_PER_MILE, OsrmDirectionsProvider};
pub use slot::FileSlotStore;
