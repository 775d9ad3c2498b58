use std::fmt;

use geo::Coord;

/// Amenity categories queried around a route.
///
/// The declaration order is the presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PoiCategory {
    /// Somewhere to eat.
    Restaurant,
    /// Somewhere to refuel.
    FuelStation,
    /// Somewhere to camp.
    Campground,
    /// Somewhere for coffee.
    Cafe,
}

impl PoiCategory {
    /// Every category, in presentation order.
    pub const ALL: [Self; 4] = [
        Self::Restaurant,
        Self::FuelStation,
        Self::Campground,
        Self::Cafe,
    ];

    /// OpenStreetMap `(key, value)` tag identifying the category.
    #[must_use]
    pub const fn osm_tag(self) -> (&'static str, &'static str) {
        match self {
            Self::Restaurant => ("amenity", "restaurant"),
            Self::FuelStation => ("amenity", "fuel"),
            Self::Campground => ("tourism", "camp_site"),
            Self::Cafe => ("amenity", "cafe"),
        }
    }

    /// Category for an OpenStreetMap tag, if it is one of ours.
    #[must_use]
    pub fn from_osm_tag(key: &str, value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.osm_tag() == (key, value))
    }

    /// Short machine-readable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::FuelStation => "fuel",
            Self::Campground => "campground",
            Self::Cafe => "cafe",
        }
    }
}

impl fmt::Display for PoiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A POI exactly as a provider returned it; the name may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPoi {
    /// Matched category.
    pub category: PoiCategory,
    /// Name tag, if the element carried one.
    pub name: Option<String>,
    /// Position (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
}

/// A named POI annotated with its distance from the route.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyPoi {
    /// Category tag.
    pub category: PoiCategory,
    /// Display name.
    pub name: String,
    /// Position (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
    /// Miles to the nearest point on the route polyline.
    pub distance_from_route_miles: f64,
}
