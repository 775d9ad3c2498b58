//! Behavioural tests for `RouteOptimizer` using rstest-bdd.

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use springtrip_core::test_support::{StubOptimizingProvider, waypoint};
use springtrip_core::{
    OptimizingProvider, OrderSource, PreconditionError, UnconfiguredOptimizer, Waypoint,
};
use springtrip_planner::{OrderedWaypoints, RouteOptimizer};
use tokio::runtime::Builder;

const START: Coord<f64> = Coord {
    x: -120.74,
    y: 47.60,
};

#[derive(Default)]
struct OptimizerWorld {
    waypoints: RefCell<Vec<Waypoint>>,
    stub: RefCell<Option<Arc<StubOptimizingProvider>>>,
    unconfigured: RefCell<bool>,
    result: RefCell<Option<Result<OrderedWaypoints, PreconditionError>>>,
}

impl OptimizerWorld {
    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn ordered(&self) -> OrderedWaypoints {
        self.result
            .borrow()
            .clone()
            .expect("optimize should run before assertions")
            .expect("optimize should succeed")
    }

    fn provider(&self) -> Arc<dyn OptimizingProvider> {
        match self.stub.borrow().clone() {
            Some(stub) if !*self.unconfigured.borrow() => stub,
            _ => Arc::new(UnconfiguredOptimizer),
        }
    }
}

#[fixture]
fn world() -> OptimizerWorld {
    OptimizerWorld::default()
}

#[given("springs A, B and C around the Cascades")]
fn given_three_springs(world: &OptimizerWorld) {
    world.waypoints.replace(vec![
        waypoint("a", 48.0, -121.0),
        waypoint("b", 46.0, -119.0),
        waypoint("c", 47.5, -120.5),
    ]);
}

#[given("spring A alone")]
fn given_one_spring(world: &OptimizerWorld) {
    world.waypoints.replace(vec![waypoint("a", 48.0, -121.0)]);
}

#[given("no optimizing credential")]
fn given_no_credential(world: &OptimizerWorld) {
    world.unconfigured.replace(true);
}

#[given("an optimizing provider that swaps the first two stops")]
fn given_swapping_provider(world: &OptimizerWorld) {
    world
        .stub
        .replace(Some(Arc::new(StubOptimizingProvider::with_order(vec![1, 0]))));
}

#[given("an optimizing provider that takes a minute to answer")]
fn given_slow_provider(world: &OptimizerWorld) {
    let stub = StubOptimizingProvider::with_order(vec![1, 0]).with_delay(Duration::from_secs(60));
    world.stub.replace(Some(Arc::new(stub)));
}

#[when("the springs are optimized from the start")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn when_optimized(world: &OptimizerWorld) {
    let runtime = Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("runtime should build");
    let optimizer = RouteOptimizer::new(world.provider(), Duration::from_secs(10));
    let waypoints = world.waypoints.borrow().clone();
    let result = runtime.block_on(optimizer.optimize(START, waypoints));
    world.result.replace(Some(result));
}

#[then("the order is C, A then B")]
fn then_fallback_order(world: &OptimizerWorld) {
    let ids: Vec<String> = world.ordered().order.into_iter().map(|w| w.id).collect();
    assert_eq!(ids, ["c", "a", "b"]);
}

#[then("the order is B, A then C")]
fn then_provider_order(world: &OptimizerWorld) {
    let ids: Vec<String> = world.ordered().order.into_iter().map(|w| w.id).collect();
    assert_eq!(ids, ["b", "a", "c"]);
}

#[then("the order came from the fallback")]
fn then_from_fallback(world: &OptimizerWorld) {
    assert_eq!(world.ordered().source, OrderSource::Fallback);
}

#[then("the order came from the provider")]
fn then_from_provider(world: &OptimizerWorld) {
    assert_eq!(world.ordered().source, OrderSource::Provider);
}

#[then("the optimize is refused for too few springs")]
fn then_refused(world: &OptimizerWorld) {
    assert_eq!(
        world.result.borrow().clone(),
        Some(Err(PreconditionError::TooFewWaypoints { found: 1 }))
    );
}

#[then("the provider was never called")]
fn then_not_called(world: &OptimizerWorld) {
    let calls = world.stub.borrow().as_ref().map_or(0, |stub| stub.calls());
    assert_eq!(calls, 0);
}

#[scenario(path = "tests/features/route_optimizer.feature", index = 0)]
fn unconfigured_fallback(world: OptimizerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_optimizer.feature", index = 1)]
fn provider_order(world: OptimizerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_optimizer.feature", index = 2)]
fn slow_provider_abandoned(world: OptimizerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_optimizer.feature", index = 3)]
fn single_spring_refused(world: OptimizerWorld) {
    let _ = world;
}
