//! Route geometry helpers: search envelopes and point-to-polyline distance.

use geo::{BoundingRect, Coord, LineString, Rect};

use crate::distance::distance;

/// Axis-aligned envelope around `geometry`, expanded by `buffer_degrees`.
///
/// Latitudes are clamped to the poles. Returns `None` for an empty geometry.
///
/// # Examples
/// ```
/// use geo::{Coord, LineString};
/// use springtrip_core::bounding_envelope;
///
/// let line = LineString::from(vec![(-121.0, 48.0), (-120.5, 47.5)]);
/// let envelope = bounding_envelope(&line, 0.5).expect("non-empty line");
/// assert_eq!(envelope.min(), Coord { x: -121.5, y: 47.0 });
/// assert_eq!(envelope.max(), Coord { x: -120.0, y: 48.5 });
/// ```
#[must_use]
pub fn bounding_envelope(geometry: &LineString<f64>, buffer_degrees: f64) -> Option<Rect<f64>> {
    let rect = geometry.bounding_rect()?;
    let buffer = buffer_degrees.abs();
    let min = rect.min();
    let max = rect.max();
    Some(Rect::new(
        Coord {
            x: min.x - buffer,
            y: (min.y - buffer).max(-90.0),
        },
        Coord {
            x: max.x + buffer,
            y: (max.y + buffer).min(90.0),
        },
    ))
}

/// True distance in miles from `point` to the nearest point on `polyline`.
///
/// Each segment is projected in a local equirectangular frame centred on
/// `point`; the distance to the projected point is then measured with the
/// haversine formula. A single-vertex polyline degenerates to point distance.
/// Returns `None` for an empty polyline.
#[must_use]
pub fn distance_to_polyline(point: Coord<f64>, polyline: &LineString<f64>) -> Option<f64> {
    match polyline.0.as_slice() {
        [] => None,
        [only] => Some(distance(point, *only)),
        _ => polyline
            .lines()
            .map(|segment| distance(point, closest_on_segment(point, segment.start, segment.end)))
            .min_by(f64::total_cmp),
    }
}

fn closest_on_segment(point: Coord<f64>, start: Coord<f64>, end: Coord<f64>) -> Coord<f64> {
    // Longitude degrees shrink with latitude; scale them before projecting.
    let scale = point.y.to_radians().cos();
    let ax = (start.x - point.x) * scale;
    let ay = start.y - point.y;
    let dx = (end.x - start.x) * scale;
    let dy = end.y - start.y;

    let length_sq = dx * dx + dy * dy;
    if length_sq <= f64::EPSILON {
        return start;
    }
    let t = (-(ax * dx + ay * dy) / length_sq).clamp(0.0, 1.0);
    Coord {
        x: start.x + t * (end.x - start.x),
        y: start.y + t * (end.y - start.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn route() -> LineString<f64> {
        LineString::from(vec![(-121.0, 47.0), (-120.0, 47.0), (-120.0, 48.0)])
    }

    #[test]
    fn envelope_of_empty_geometry_is_none() {
        assert!(bounding_envelope(&LineString::new(Vec::new()), 0.1).is_none());
    }

    #[test]
    fn envelope_clamps_latitude() {
        let line = LineString::from(vec![(0.0, 89.99), (1.0, -89.99)]);
        let envelope = bounding_envelope(&line, 0.5).expect("envelope");
        assert_eq!(envelope.max().y, 90.0);
        assert_eq!(envelope.min().y, -90.0);
    }

    #[test]
    fn vertex_on_route_is_zero_distance() {
        let miles = distance_to_polyline(Coord { x: -120.0, y: 47.0 }, &route()).expect("distance");
        assert!(miles.abs() < 1e-9, "got {miles}");
    }

    #[test]
    fn perpendicular_offset_measures_to_segment_interior() {
        // 0.1 degrees north of the first (east-west) segment's midpoint.
        let point = Coord { x: -120.5, y: 47.1 };
        let miles = distance_to_polyline(point, &route()).expect("distance");
        let expected = distance(point, Coord { x: -120.5, y: 47.0 });
        assert!((miles - expected).abs() < 0.05, "got {miles}, want {expected}");
        // The nearest vertex is much further away than the segment.
        assert!(miles < distance(point, Coord { x: -121.0, y: 47.0 }));
    }

    #[rstest]
    #[case(Coord { x: -122.0, y: 47.0 }, Coord { x: -121.0, y: 47.0 })]
    #[case(Coord { x: -120.0, y: 49.0 }, Coord { x: -120.0, y: 48.0 })]
    fn beyond_the_ends_measures_to_endpoint(#[case] point: Coord<f64>, #[case] end: Coord<f64>) {
        let miles = distance_to_polyline(point, &route()).expect("distance");
        assert!((miles - distance(point, end)).abs() < 1e-9);
    }

    #[test]
    fn single_vertex_polyline_is_point_distance() {
        let line = LineString::from(vec![(-120.0, 47.0)]);
        let point = Coord { x: -120.0, y: 48.0 };
        assert_eq!(distance_to_polyline(point, &line), Some(distance(point, line.0[0])));
    }

    #[test]
    fn empty_polyline_has_no_distance() {
        assert_eq!(
            distance_to_polyline(Coord { x: 0.0, y: 0.0 }, &LineString::new(Vec::new())),
            None
        );
    }
}
