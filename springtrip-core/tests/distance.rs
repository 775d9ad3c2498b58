//! Great-circle distance and polyline proximity against known figures.

use geo::{Coord, LineString, coord};
use rstest::rstest;
use springtrip_core::{
    approximate_duration, approximate_path_distance, bounding_envelope, distance,
    distance_to_polyline,
};

const SEATTLE: Coord<f64> = coord! { x: -122.3321, y: 47.6062 };
const PORTLAND: Coord<f64> = coord! { x: -122.6784, y: 45.5152 };
const SPOKANE: Coord<f64> = coord! { x: -117.4260, y: 47.6588 };

#[rstest]
#[case(SEATTLE, PORTLAND, 140.0, 150.0)]
#[case(SEATTLE, SPOKANE, 225.0, 235.0)]
fn city_pairs_are_in_the_expected_range(
    #[case] a: Coord<f64>,
    #[case] b: Coord<f64>,
    #[case] low: f64,
    #[case] high: f64,
) {
    let miles = distance(a, b);
    assert!((low..high).contains(&miles), "got {miles}");
}

#[rstest]
fn path_distance_is_the_sum_of_its_legs() {
    let total = approximate_path_distance(&[PORTLAND, SEATTLE, SPOKANE]);
    let legs = distance(PORTLAND, SEATTLE) + distance(SEATTLE, SPOKANE);
    assert!((total - legs).abs() < 1e-9);
}

#[rstest]
fn ninety_miles_at_forty_five_mph_takes_two_hours() {
    let duration = approximate_duration(90.0, 45.0);
    assert_eq!(duration.as_secs(), 7200);
}

#[rstest]
fn a_point_on_the_route_is_zero_miles_away() {
    let route = LineString::new(vec![SEATTLE, SPOKANE]);
    let miles = distance_to_polyline(SEATTLE, &route).expect("non-empty route");
    assert!(miles.abs() < 1e-6);
}

#[rstest]
fn the_envelope_covers_the_route_plus_buffer() {
    let route = LineString::new(vec![PORTLAND, SEATTLE]);
    let envelope = bounding_envelope(&route, 0.045).expect("non-empty route");
    assert!((envelope.min().y - (PORTLAND.y - 0.045)).abs() < 1e-9);
    assert!((envelope.max().y - (SEATTLE.y + 0.045)).abs() < 1e-9);
    assert!((envelope.min().x - (PORTLAND.x - 0.045)).abs() < 1e-9);
    assert!((envelope.max().x - (SEATTLE.x + 0.045)).abs() < 1e-9);
}
