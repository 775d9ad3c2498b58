//! Great-circle distance between coordinates.
//!
//! Distances are reported in statute miles on a sphere of radius
//! [`EARTH_RADIUS_MILES`]. The summed variants ignore the road network and are
//! only ever used as an approximation when a routing provider is unavailable.

use std::time::Duration;

use geo::Coord;

/// Mean Earth radius in miles used by [`distance`].
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Haversine distance in miles between `a` and `b`.
///
/// Symmetric, and zero for identical points.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use springtrip_core::distance;
///
/// let a = Coord { x: -120.74, y: 47.60 };
/// let b = Coord { x: -120.5, y: 47.5 };
/// assert_eq!(distance(a, a), 0.0);
/// assert_eq!(distance(a, b), distance(b, a));
/// ```
#[must_use]
pub fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let delta_lat = (b.y - a.y).to_radians();
    let delta_lng = (b.x - a.x).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `h` marginally above one for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_MILES * c
}

/// Sum of consecutive [`distance`] values along `points`.
///
/// Returns zero for fewer than two points.
#[must_use]
pub fn approximate_path_distance(points: &[Coord<f64>]) -> f64 {
    points
        .windows(2)
        .map(|pair| match pair {
            [from, to] => distance(*from, *to),
            _ => 0.0,
        })
        .sum()
}

/// Travel time for `miles` at an assumed average speed.
///
/// Non-positive or non-finite speeds yield [`Duration::ZERO`]; figures too
/// large for a [`Duration`] saturate at [`Duration::MAX`].
#[must_use]
pub fn approximate_duration(miles: f64, average_speed_mph: f64) -> Duration {
    if !(average_speed_mph.is_finite() && average_speed_mph > 0.0) {
        return Duration::ZERO;
    }
    let seconds = miles / average_speed_mph * 3600.0;
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
}
