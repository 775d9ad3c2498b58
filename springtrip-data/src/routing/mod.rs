//! HTTP routing providers.
//!
//! - [`HttpOptimizingProvider`] reorders intermediate stops through a
//!   credentialed optimize endpoint.
//! - [`OsrmDirectionsProvider`] fetches road-following geometry and aggregate
//!   figures from an OSRM Route service.
//!
//! Both are async and never block; callers bound them with their own timeout
//! on top of the client-level request timeout.

mod directions;
mod optimize;
mod osrm;

pub use directions::{METERS_PER_MILE, OsrmDirectionsProvider};
pub use optimize::HttpOptimizingProvider;
