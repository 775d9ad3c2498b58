//! Boundaries to the external services the engine coordinates.
//!
//! Every service is unreliable: callers treat any [`ProviderError`] as a tier
//! failure and fall back. The traits are async because each call may suspend
//! on the network; implementations must be `Send + Sync` so a session can hold
//! them behind shared references.

mod error;
mod traits;

pub use error::ProviderError;
pub use traits::{
    CatalogSource, Directions, DirectionsProvider, OptimizeRequest, OptimizedOrder,
    OptimizingProvider, PoiProvider, UnconfiguredOptimizer,
};
