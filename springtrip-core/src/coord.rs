//! Latitude/longitude pairs as they appear on the wire.
//!
//! Internally the engine works with [`geo::Coord`] (`x = longitude`,
//! `y = latitude`). Every serialized format (persisted slot, share token,
//! provider payloads) uses the explicit `{lat, lng}` shape instead.

use std::fmt;
use std::str::FromStr;

use geo::Coord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A WGS84 coordinate in `{lat, lng}` form.
///
/// # Examples
/// ```
/// use springtrip_core::LatLng;
///
/// let start: LatLng = "47.6062,-120.7401".parse()?;
/// assert_eq!(start.lat, 47.6062);
/// assert_eq!(start.to_coord().x, -120.7401);
/// # Ok::<(), springtrip_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees, `-90..=90`.
    pub lat: f64,
    /// Longitude in degrees, `-180..=180`.
    pub lng: f64,
}

/// Errors raised while parsing or validating a coordinate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    /// The text was not a `lat,lng` pair of numbers.
    #[error("expected \"lat,lng\", got {value:?}")]
    Malformed {
        /// Offending input.
        value: String,
    },
    /// The numbers were outside the WGS84 range or not finite.
    #[error("coordinate ({lat}, {lng}) is outside the valid range")]
    OutOfRange {
        /// Supplied latitude.
        lat: f64,
        /// Supplied longitude.
        lng: f64,
    },
}

impl LatLng {
    /// Validate and construct a coordinate.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        let candidate = Self { lat, lng };
        if candidate.is_valid() {
            Ok(candidate)
        } else {
            Err(CoordinateError::OutOfRange { lat, lng })
        }
    }

    /// Whether both components are finite and inside the WGS84 range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Convert into a [`geo::Coord`].
    #[must_use]
    pub const fn to_coord(self) -> Coord<f64> {
        Coord {
            x: self.lng,
            y: self.lat,
        }
    }
}

impl From<Coord<f64>> for LatLng {
    fn from(coord: Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lng: coord.x,
        }
    }
}

impl From<LatLng> for Coord<f64> {
    fn from(value: LatLng) -> Self {
        value.to_coord()
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for LatLng {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoordinateError::Malformed {
            value: s.to_owned(),
        };
        let (lat, lng) = s.split_once(',').ok_or_else(malformed)?;
        let lat: f64 = lat.trim().parse().map_err(|_| malformed())?;
        let lng: f64 = lng.trim().parse().map_err(|_| malformed())?;
        Self::new(lat, lng)
    }
}
