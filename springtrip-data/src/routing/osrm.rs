//! OSRM API response types for the Route service.
//!
//! Only the fields the directions provider reads are modelled. Requests are
//! made with `geometries=geojson`, so route geometry arrives as a GeoJSON
//! `LineString` of `[longitude, latitude]` pairs.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;

/// OSRM Route API response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route between the coordinates
    /// - `"InvalidQuery"` - Invalid query parameters
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Alternative routes, best first. Absent on failure.
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

/// One route through every requested coordinate.
#[derive(Debug, Deserialize)]
pub struct Route {
    /// Total distance in meters.
    pub distance: f64,
    /// Total duration in seconds.
    pub duration: f64,
    /// Road-following path.
    pub geometry: GeoJsonLineString,
}

/// GeoJSON `LineString` geometry.
#[derive(Debug, Deserialize)]
pub struct GeoJsonLineString {
    /// `[longitude, latitude]` vertices.
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}
