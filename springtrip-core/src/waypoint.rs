//! Selectable destinations and the catalog that holds them.
//!
//! A [`WaypointRecord`] is whatever the catalog source delivered; only records
//! with a complete, in-range coordinate become [`Waypoint`]s. The
//! [`WaypointCatalog`] is built once per session and resolves identifiers for
//! the trip state, persistence and share codec.

use std::collections::{BTreeMap, HashMap};

use geo::Coord;
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::LatLng;

/// A selectable destination.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use springtrip_core::Waypoint;
///
/// let spring = Waypoint::new("sol-duc", "Sol Duc", Coord { x: -123.86, y: 47.97 });
/// assert_eq!(spring.id, "sol-duc");
/// assert!(spring.attributes.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    /// Stable identifier, unique within a catalog.
    pub id: String,
    /// Display name.
    pub name: String,
    /// WGS84 position (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
    /// Free-form descriptive attributes (temperature, fee, ...).
    pub attributes: BTreeMap<String, String>,
}

impl Waypoint {
    /// Construct a waypoint without attributes.
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            attributes: BTreeMap::new(),
        }
    }

    /// Attach an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// A raw catalog record as delivered by a [`CatalogSource`](crate::CatalogSource).
///
/// Coordinates are optional because upstream data is incomplete; see
/// [`WaypointRecord::into_waypoint`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointRecord {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Latitude, when known.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude, when known.
    #[serde(default)]
    pub lng: Option<f64>,
    /// Free-form attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl WaypointRecord {
    /// Convert into a [`Waypoint`] when both coordinates are present and valid.
    #[must_use]
    pub fn into_waypoint(self) -> Option<Waypoint> {
        let (Some(lat), Some(lng)) = (self.lat, self.lng) else {
            return None;
        };
        let location = LatLng::new(lat, lng).ok()?.to_coord();
        Some(Waypoint {
            id: self.id,
            name: self.name,
            location,
            attributes: self.attributes,
        })
    }
}

/// Errors returned by catalog sources.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog could not be read from its source.
    #[error("failed to read catalog from {location}: {message}")]
    Unavailable {
        /// URL or path of the source.
        location: String,
        /// Underlying failure.
        message: String,
    },
    /// The catalog payload could not be decoded.
    #[error("failed to decode catalog from {location}: {message}")]
    Malformed {
        /// URL or path of the source.
        location: String,
        /// Decoder message.
        message: String,
    },
}

/// In-memory catalog of selectable waypoints, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaypointCatalog {
    waypoints: Vec<Waypoint>,
    index: HashMap<String, usize>,
}

impl WaypointCatalog {
    /// Build a catalog from validated waypoints.
    ///
    /// Later duplicates of an identifier are ignored.
    pub fn new<I>(waypoints: I) -> Self
    where
        I: IntoIterator<Item = Waypoint>,
    {
        let mut catalog = Self::default();
        for waypoint in waypoints {
            if catalog.index.contains_key(&waypoint.id) {
                warn!("ignoring duplicate catalog id {:?}", waypoint.id);
                continue;
            }
            catalog
                .index
                .insert(waypoint.id.clone(), catalog.waypoints.len());
            catalog.waypoints.push(waypoint);
        }
        catalog
    }

    /// Build a catalog from raw records, excluding records without a valid
    /// coordinate.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = WaypointRecord>,
    {
        Self::new(records.into_iter().filter_map(|record| {
            let id = record.id.clone();
            let waypoint = record.into_waypoint();
            if waypoint.is_none() {
                warn!("excluding catalog record {id:?}: missing or invalid coordinates");
            }
            waypoint
        }))
    }

    /// Look up a waypoint by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Waypoint> {
        self.index
            .get(id)
            .and_then(|&position| self.waypoints.get(position))
    }

    /// Whether the catalog contains `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Resolve identifiers in order, silently dropping unknown ones.
    pub fn resolve<'a, I>(&self, ids: I) -> Vec<&Waypoint>
    where
        I: IntoIterator<Item = &'a str>,
    {
        ids.into_iter().filter_map(|id| self.get(id)).collect()
    }

    /// All waypoints in source order.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn record(id: &str, lat: Option<f64>, lng: Option<f64>) -> WaypointRecord {
        WaypointRecord {
            id: id.to_owned(),
            name: id.to_uppercase(),
            lat,
            lng,
            attributes: BTreeMap::new(),
        }
    }

    #[fixture]
    fn catalog() -> WaypointCatalog {
        WaypointCatalog::from_records(vec![
            record("sol-duc", Some(47.97), Some(-123.86)),
            record("baker", Some(48.76), Some(-121.81)),
            record("goldmyer", Some(47.49), Some(-121.39)),
        ])
    }

    #[rstest]
    #[case(record("missing-lat", None, Some(-121.0)))]
    #[case(record("missing-lng", Some(47.0), None))]
    #[case(record("bad-lat", Some(91.0), Some(-121.0)))]
    #[case(record("bad-lng", Some(47.0), Some(-181.0)))]
    fn invalid_records_are_excluded(#[case] bad: WaypointRecord) {
        let catalog = WaypointCatalog::from_records(vec![
            bad.clone(),
            record("ok", Some(47.0), Some(-121.0)),
        ]);
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.contains(&bad.id));
    }

    #[rstest]
    fn resolve_preserves_order_and_drops_unknown(catalog: WaypointCatalog) {
        let resolved = catalog.resolve(["goldmyer", "gone", "sol-duc"]);
        let ids: Vec<_> = resolved.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["goldmyer", "sol-duc"]);
    }

    #[rstest]
    fn duplicate_ids_keep_first(catalog: WaypointCatalog) {
        let mut waypoints = catalog.waypoints().to_vec();
        waypoints.push(Waypoint::new("baker", "Imposter", Coord { x: 0.0, y: 0.0 }));
        let rebuilt = WaypointCatalog::new(waypoints);
        assert_eq!(rebuilt.len(), 3);
        assert_eq!(rebuilt.get("baker").map(|w| w.name.as_str()), Some("BAKER"));
    }

    #[test]
    fn record_deserialises_without_optional_fields() {
        let json = r#"{"id": "scenic", "name": "Scenic"}"#;
        let parsed: WaypointRecord = serde_json::from_str(json).expect("should deserialise");
        assert_eq!(parsed.lat, None);
        assert!(parsed.into_waypoint().is_none());
    }
}
