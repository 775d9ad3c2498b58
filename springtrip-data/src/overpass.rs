//! Points of interest from an Overpass API endpoint.
//!
//! The provider sends one Overpass QL query per request, covering every
//! requested category inside the bounding envelope. Ways and relations are
//! reported at their centre point.

use std::collections::BTreeMap;

use async_trait::async_trait;
use geo::{Coord, Rect};
use reqwest::Client;
use serde::Deserialize;
use springtrip_core::{PoiCategory, PoiProvider, ProviderError, RawPoi};

use crate::http::{HttpProviderConfig, ProviderBuildError};

/// Public Overpass instance.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Server-side query timeout in seconds, embedded in the query header.
const QUERY_TIMEOUT_SECS: u64 = 25;

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(default)]
    id: u64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

impl OverpassElement {
    fn location(&self) -> Option<Coord<f64>> {
        let (lat, lon) = match (self.lat, self.lon, &self.center) {
            (Some(lat), Some(lon), _) => (lat, lon),
            (_, _, Some(center)) => (center.lat, center.lon),
            _ => return None,
        };
        (lat.is_finite() && lon.is_finite()).then_some(Coord { x: lon, y: lat })
    }

    fn category(&self, wanted: &[PoiCategory]) -> Option<PoiCategory> {
        wanted.iter().copied().find(|category| {
            let (key, value) = category.osm_tag();
            self.tags.get(key).is_some_and(|tag| tag == value)
        })
    }

    fn into_raw(self, wanted: &[PoiCategory]) -> Option<RawPoi> {
        let category = self.category(wanted)?;
        let Some(location) = self.location() else {
            log::debug!("skipping overpass element {} without a position", self.id);
            return None;
        };
        let mut tags = self.tags;
        Some(RawPoi {
            category,
            name: tags.remove("name"),
            location,
        })
    }
}

/// Overpass QL for `categories` inside `envelope`.
///
/// # Examples
/// ```
/// use geo::{Coord, Rect};
/// use springtrip_core::PoiCategory;
/// use springtrip_data::overpass_query;
///
/// let envelope = Rect::new(Coord { x: -121.0, y: 47.0 }, Coord { x: -120.0, y: 48.0 });
/// let query = overpass_query(&envelope, &[PoiCategory::Cafe]);
/// assert!(query.contains(r#"nwr["amenity"="cafe"](47,-121,48,-120);"#));
/// ```
#[must_use]
pub fn overpass_query(envelope: &Rect<f64>, categories: &[PoiCategory]) -> String {
    let min = envelope.min();
    let max = envelope.max();
    let bbox = format!("({},{},{},{})", min.y, min.x, max.y, max.x);
    let mut query = format!("[out:json][timeout:{QUERY_TIMEOUT_SECS}];\n(\n");
    for category in categories {
        let (key, value) = category.osm_tag();
        query.push_str(&format!("  nwr[\"{key}\"=\"{value}\"]{bbox};\n"));
    }
    query.push_str(");\nout center;\n");
    query
}

/// [`PoiProvider`] backed by the Overpass API.
#[derive(Debug)]
pub struct OverpassPoiProvider {
    client: Client,
    config: HttpProviderConfig,
}

impl OverpassPoiProvider {
    /// Create a provider for the given interpreter URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpProviderConfig::new(base_url))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn with_config(config: HttpProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }

    fn convert_response(response: OverpassResponse, categories: &[PoiCategory]) -> Vec<RawPoi> {
        response
            .elements
            .into_iter()
            .filter_map(|element| element.into_raw(categories))
            .collect()
    }
}

#[async_trait]
impl PoiProvider for OverpassPoiProvider {
    async fn find_pois(
        &self,
        envelope: &Rect<f64>,
        categories: &[PoiCategory],
    ) -> Result<Vec<RawPoi>, ProviderError> {
        if categories.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.config.endpoint("");
        let query = overpass_query(envelope, categories);
        let request = self.client.post(&url).form(&[("data", query.as_str())]);
        let response: OverpassResponse = self.config.fetch_json(request, &url).await?;
        Ok(Self::convert_response(response, categories))
    }
}
