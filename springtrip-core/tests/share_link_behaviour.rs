//! Behavioural tests for share links using rstest-bdd.

use std::cell::RefCell;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use springtrip_core::{LatLng, ShareError, ShareToken, TripState, Waypoint, WaypointCatalog};

const SEATTLE: LatLng = LatLng {
    lat: 47.6062,
    lng: -120.7401,
};

#[derive(Debug, Default)]
struct ShareWorld {
    catalog: RefCell<WaypointCatalog>,
    trip: RefCell<TripState>,
    link: RefCell<Option<String>>,
    opened: RefCell<Option<Result<TripState, ShareError>>>,
}

impl ShareWorld {
    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn opened_trip(&self) -> TripState {
        self.opened
            .borrow()
            .clone()
            .expect("a link should be opened before assertions")
            .expect("the link should decode")
    }

    fn open(&self, link: &str) {
        let catalog = self.catalog.borrow();
        let outcome = ShareToken::decode(link)
            .map(|token| token.map(|t| t.into_trip(&catalog)).unwrap_or_default());
        self.opened.replace(Some(outcome));
    }
}

#[fixture]
fn world() -> ShareWorld {
    ShareWorld::default()
}

#[given("a catalog with Sol Duc and Baker")]
fn given_catalog(world: &ShareWorld) {
    world.catalog.replace(WaypointCatalog::new(vec![
        Waypoint::new("sol-duc", "Sol Duc Hot Springs", Coord { x: -123.86, y: 47.97 }),
        Waypoint::new("baker", "Baker Hot Springs", Coord { x: -121.81, y: 48.76 }),
    ]));
}

#[given("a trip visiting Sol Duc then Baker from Seattle")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn given_trip(world: &ShareWorld) {
    let catalog = world.catalog.borrow();
    let mut trip = world.trip.borrow_mut();
    trip.push_from_catalog("sol-duc", &catalog).expect("known id");
    trip.push_from_catalog("baker", &catalog).expect("known id");
    trip.set_start(SEATTLE).expect("valid start");
}

#[when("the trip is encoded as a share link")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn when_encoded(world: &ShareWorld) {
    let link = ShareToken::from_trip(&world.trip.borrow())
        .encode()
        .expect("short trips always encode");
    world.link.replace(Some(link));
}

#[then("the link reads \"springs=sol-duc,baker&start=47.6062,-120.7401\"")]
fn then_link_reads(world: &ShareWorld) {
    assert_eq!(
        world.link.borrow().as_deref(),
        Some("springs=sol-duc,baker&start=47.6062,-120.7401")
    );
}

#[when("the link is opened against the catalog")]
fn when_opened(world: &ShareWorld) {
    let link = world.link.borrow().clone().unwrap_or_default();
    world.open(&link);
}

#[when("a link naming an unknown spring is opened")]
fn when_unknown_opened(world: &ShareWorld) {
    world.open("https://example.org/?springs=sol-duc,ghost,baker");
}

#[when("a link with a malformed start is opened")]
fn when_malformed_opened(world: &ShareWorld) {
    world.open("springs=baker&start=north-ish");
}

#[then("the trip visits Sol Duc then Baker")]
fn then_visits(world: &ShareWorld) {
    assert_eq!(world.opened_trip().waypoint_ids(), ["sol-duc", "baker"]);
}

#[then("the trip starts in Seattle")]
fn then_starts_in_seattle(world: &ShareWorld) {
    assert_eq!(world.opened_trip().start(), Some(SEATTLE.to_coord()));
}

#[then("the trip has no start")]
fn then_no_start(world: &ShareWorld) {
    assert_eq!(world.opened_trip().start(), None);
}

#[then("the link is reported as invalid")]
fn then_invalid(world: &ShareWorld) {
    assert!(matches!(
        world.opened.borrow().as_ref(),
        Some(Err(ShareError::InvalidStart { .. }))
    ));
}

#[scenario(path = "tests/features/share_link.feature", index = 0)]
fn round_trip(world: ShareWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/share_link.feature", index = 1)]
fn unknown_springs_dropped(world: ShareWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/share_link.feature", index = 2)]
fn malformed_start_rejected(world: ShareWorld) {
    let _ = world;
}
