//! Road-following directions from OSRM's Route API.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use springtrip_core::DirectionsProvider;
//! use springtrip_data::routing::OsrmDirectionsProvider;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = OsrmDirectionsProvider::new("https://router.project-osrm.org")?;
//! let stops = [Coord { x: -120.74, y: 47.60 }, Coord { x: -121.81, y: 48.76 }];
//! let directions = provider.directions(&stops).await?;
//! println!("{:.1} miles", directions.distance_miles);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use geo::{Coord, LineString};
use reqwest::Client;
use springtrip_core::{Directions, DirectionsProvider, ProviderError};

use super::osrm::RouteResponse;
use crate::http::{HttpProviderConfig, ProviderBuildError};

/// Meters in a statute mile.
pub const METERS_PER_MILE: f64 = 1609.344;

/// Directions provider backed by an OSRM routing service.
#[derive(Debug)]
pub struct OsrmDirectionsProvider {
    client: Client,
    config: HttpProviderConfig,
}

impl OsrmDirectionsProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: HttpProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }

    /// Build the OSRM Route API URL for the given stops.
    ///
    /// The URL format is: `{base_url}/route/v1/driving/{coordinates}` where
    /// coordinates are semicolon-separated `lon,lat` pairs.
    fn build_route_url(&self, stops: &[Coord<f64>]) -> String {
        let coords = stops
            .iter()
            .map(|stop| format!("{},{}", stop.x, stop.y))
            .collect::<Vec<_>>()
            .join(";");
        format!(
            "{}?overview=full&geometries=geojson",
            self.config.endpoint(&format!("route/v1/driving/{coords}"))
        )
    }

    /// Convert an OSRM response into [`Directions`].
    fn convert_response(response: RouteResponse) -> Result<Directions, ProviderError> {
        if !response.is_ok() {
            return Err(ProviderError::Service {
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }

        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::parse("OSRM response contains no routes"))?;

        let geometry: LineString<f64> = route
            .geometry
            .coordinates
            .into_iter()
            .map(|[x, y]| Coord { x, y })
            .filter(|coord| coord.x.is_finite() && coord.y.is_finite())
            .collect();
        if geometry.0.is_empty() {
            return Err(ProviderError::parse("OSRM route geometry is empty"));
        }

        if !(route.distance.is_finite() && route.distance >= 0.0) {
            return Err(ProviderError::parse(format!(
                "OSRM route distance {} is invalid",
                route.distance
            )));
        }
        let duration = Duration::try_from_secs_f64(route.duration).map_err(|err| {
            ProviderError::parse(format!(
                "OSRM route duration {} is invalid: {err}",
                route.duration
            ))
        })?;

        Ok(Directions {
            geometry,
            distance_miles: route.distance / METERS_PER_MILE,
            duration,
        })
    }
}

#[async_trait]
impl DirectionsProvider for OsrmDirectionsProvider {
    async fn directions(&self, stops: &[Coord<f64>]) -> Result<Directions, ProviderError> {
        if stops.is_empty() {
            return Err(ProviderError::EmptyInput);
        }
        let url = self.build_route_url(stops);
        log::debug!("requesting directions for {} stops", stops.len());
        let response: RouteResponse = self
            .config
            .fetch_json(self.client.get(&url), &url)
            .await?;
        Self::convert_response(response)
    }
}
