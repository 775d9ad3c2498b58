//! Waypoint-order optimization through a credentialed directions service.
//!
//! The service receives the origin, a fixed destination and the intermediate
//! stops with `optimizeWaypoints: true`, and answers with the visiting order
//! of the intermediates as indices into the request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use springtrip_core::{
    LatLng, OptimizeRequest, OptimizedOrder, OptimizingProvider, ProviderError,
};

use super::directions::METERS_PER_MILE;
use crate::http::{HttpProviderConfig, ProviderBuildError};

/// Path of the optimize endpoint below the base URL.
const OPTIMIZE_PATH: &str = "directions/optimize";

/// Request body sent to the optimize endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OptimizeBody {
    origin: LatLng,
    destination: LatLng,
    waypoints: Vec<LatLng>,
    optimize_waypoints: bool,
}

impl From<&OptimizeRequest> for OptimizeBody {
    fn from(request: &OptimizeRequest) -> Self {
        Self {
            origin: request.origin.into(),
            destination: request.destination.into(),
            waypoints: request.intermediates.iter().copied().map(LatLng::from).collect(),
            optimize_waypoints: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptimizeResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<OptimizedRoute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptimizedRoute {
    waypoint_order: Vec<usize>,
    #[serde(default)]
    distance_meters: Option<f64>,
    #[serde(default)]
    duration_seconds: Option<f64>,
}

/// HTTP [`OptimizingProvider`].
///
/// Without an API key every call fails fast with
/// [`ProviderError::MissingCredential`] and no request is made.
#[derive(Debug)]
pub struct HttpOptimizingProvider {
    client: Client,
    config: HttpProviderConfig,
}

impl HttpOptimizingProvider {
    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: HttpProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }

    /// Whether a credential is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn convert_response(
        response: OptimizeResponse,
        intermediate_count: usize,
    ) -> Result<OptimizedOrder, ProviderError> {
        if response.status != "OK" {
            return Err(ProviderError::Service {
                code: response.status,
                message: response.error_message.unwrap_or_default(),
            });
        }
        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::parse("optimize response contains no routes"))?;

        let duration = route
            .duration_seconds
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(|secs| {
                Duration::try_from_secs_f64(secs).map_err(|err| {
                    ProviderError::parse(format!("optimize duration {secs} is invalid: {err}"))
                })
            })
            .transpose()?;
        let order = OptimizedOrder {
            waypoint_order: route.waypoint_order,
            distance_miles: route
                .distance_meters
                .filter(|meters| meters.is_finite() && *meters >= 0.0)
                .map(|meters| meters / METERS_PER_MILE),
            duration,
        };
        order.validate(intermediate_count)?;
        Ok(order)
    }
}

#[async_trait]
impl OptimizingProvider for HttpOptimizingProvider {
    async fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizedOrder, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::MissingCredential);
        }
        let url = self.config.endpoint(OPTIMIZE_PATH);
        let body = OptimizeBody::from(request);
        let builder = self.config.authorize(self.client.post(&url).json(&body));
        let response: OptimizeResponse = self.config.fetch_json(builder, &url).await?;
        Self::convert_response(response, request.intermediates.len())
    }
}
