//! Points of interest along a route.
//!
//! The provider is queried once for every category inside the route's
//! buffered envelope. Unnamed results are discarded, the nearest result per
//! category is kept, and at most `max_categories` categories are presented in
//! [`PoiCategory::ALL`] order.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use geo::LineString;
use springtrip_core::{
    NearbyPoi, PoiCategory, PoiProvider, RawPoi, bounding_envelope, distance_to_polyline,
};

use crate::timeout::{CallOutcome, with_timeout};

/// Keep the nearest named POI per category, in category order.
///
/// Distances are measured to the nearest point on `route`.
#[must_use]
pub fn select_nearby(
    raw: Vec<RawPoi>,
    route: &LineString<f64>,
    max_categories: usize,
) -> Vec<NearbyPoi> {
    let mut nearest: BTreeMap<PoiCategory, NearbyPoi> = BTreeMap::new();
    for poi in raw {
        let Some(name) = poi
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
        else {
            continue;
        };
        let Some(miles) = distance_to_polyline(poi.location, route) else {
            continue;
        };
        let closer = nearest
            .get(&poi.category)
            .is_none_or(|current| miles < current.distance_from_route_miles);
        if closer {
            nearest.insert(
                poi.category,
                NearbyPoi {
                    category: poi.category,
                    name: name.to_owned(),
                    location: poi.location,
                    distance_from_route_miles: miles,
                },
            );
        }
    }
    nearest.into_values().take(max_categories).collect()
}

/// Annotates routes with nearby amenities.
pub struct PoiEnricher {
    provider: Arc<dyn PoiProvider>,
    timeout: Duration,
    buffer_degrees: f64,
    max_categories: usize,
}

impl std::fmt::Debug for PoiEnricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoiEnricher")
            .field("provider", &"<dyn PoiProvider>")
            .field("timeout", &self.timeout)
            .field("buffer_degrees", &self.buffer_degrees)
            .field("max_categories", &self.max_categories)
            .finish()
    }
}

impl PoiEnricher {
    /// Build an enricher around `provider`.
    #[must_use]
    pub fn new(
        provider: Arc<dyn PoiProvider>,
        timeout: Duration,
        buffer_degrees: f64,
        max_categories: usize,
    ) -> Self {
        Self {
            provider,
            timeout,
            buffer_degrees,
            max_categories,
        }
    }

    /// POIs near `route`.
    ///
    /// Never fails: provider failures and timeouts yield an empty list.
    pub async fn enrich(&self, route: &LineString<f64>) -> Vec<NearbyPoi> {
        let Some(envelope) = bounding_envelope(route, self.buffer_degrees) else {
            return Vec::new();
        };
        let call = self.provider.find_pois(&envelope, &PoiCategory::ALL);
        match with_timeout(self.timeout, call).await {
            CallOutcome::Success(raw) => select_nearby(raw, route, self.max_categories),
            CallOutcome::Failed(err) => {
                log::warn!("POI lookup failed: {err}");
                Vec::new()
            }
            CallOutcome::TimedOut => {
                log::warn!("POI lookup timed out after {}s", self.timeout.as_secs());
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};
    use springtrip_core::ProviderError;
    use springtrip_core::test_support::{StubPoiProvider, raw_poi};

    #[fixture]
    fn route() -> LineString<f64> {
        LineString::new(vec![
            Coord { x: -120.74, y: 47.60 },
            Coord { x: -120.50, y: 47.60 },
        ])
    }

    #[rstest]
    fn nameless_pois_are_dropped(route: LineString<f64>) {
        let selected = select_nearby(
            vec![
                raw_poi(PoiCategory::Cafe, None, 47.61, -120.6),
                raw_poi(PoiCategory::Cafe, Some("   "), 47.61, -120.6),
            ],
            &route,
            3,
        );
        assert!(selected.is_empty());
    }

    #[rstest]
    fn nearest_per_category_is_kept(route: LineString<f64>) {
        let selected = select_nearby(
            vec![
                raw_poi(PoiCategory::Restaurant, Some("Far Diner"), 47.64, -120.6),
                raw_poi(PoiCategory::Restaurant, Some("Near Diner"), 47.605, -120.6),
            ],
            &route,
            3,
        );
        assert_eq!(selected.len(), 1);
        let nearest = selected.first().expect("one restaurant kept");
        assert_eq!(nearest.name, "Near Diner");
    }

    #[rstest]
    fn distance_is_measured_to_the_polyline_not_its_vertices(route: LineString<f64>) {
        // Directly above the middle of the segment, far from either vertex.
        let selected = select_nearby(
            vec![raw_poi(PoiCategory::FuelStation, Some("Mid Gas"), 47.61, -120.62)],
            &route,
            3,
        );
        let miles = selected
            .first()
            .expect("fuel station kept")
            .distance_from_route_miles;
        assert!((0.6..0.75).contains(&miles), "got {miles}");
    }

    #[rstest]
    fn at_most_three_categories_in_fixed_order(route: LineString<f64>) {
        let selected = select_nearby(
            vec![
                raw_poi(PoiCategory::Cafe, Some("Beans"), 47.601, -120.6),
                raw_poi(PoiCategory::Campground, Some("Pines"), 47.601, -120.6),
                raw_poi(PoiCategory::FuelStation, Some("Gas"), 47.601, -120.6),
                raw_poi(PoiCategory::Restaurant, Some("Diner"), 47.601, -120.6),
            ],
            &route,
            3,
        );
        let categories: Vec<_> = selected.iter().map(|poi| poi.category).collect();
        assert_eq!(
            categories,
            [
                PoiCategory::Restaurant,
                PoiCategory::FuelStation,
                PoiCategory::Campground
            ]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn provider_failures_yield_nothing(route: LineString<f64>) {
        let enricher = PoiEnricher::new(
            Arc::new(StubPoiProvider::with_error(ProviderError::parse("bad json"))),
            Duration::from_secs(10),
            0.045,
            3,
        );
        assert!(enricher.enrich(&route).await.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn queries_the_buffered_envelope(route: LineString<f64>) {
        let provider = Arc::new(StubPoiProvider::with_pois(vec![raw_poi(
            PoiCategory::Cafe,
            Some("Edge Cafe"),
            47.64,
            -120.6,
        )]));
        let enricher = PoiEnricher::new(provider.clone(), Duration::from_secs(10), 0.045, 3);

        let pois = enricher.enrich(&route).await;

        assert_eq!(pois.len(), 1);
        let envelope = provider.last_envelope().expect("provider queried");
        assert!((envelope.max().y - 47.645).abs() < 1e-9);
        assert!((envelope.min().x - -120.785).abs() < 1e-9);
    }
}
