//! Deterministic test doubles for the provider traits and the slot store.
//!
//! None of these touch the network. Each provider can be given a delay so
//! tests running on a paused Tokio clock can exercise timeouts and in-flight
//! behaviour.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use geo::{Coord, LineString, Rect};

use crate::{
    CatalogError, CatalogSource, Directions, DirectionsProvider, OptimizeRequest, OptimizedOrder,
    OptimizingProvider, PersistError, PoiCategory, PoiProvider, ProviderError, RawPoi, SlotStore,
    Waypoint, WaypointRecord, approximate_path_distance,
};

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[derive(Debug, Clone)]
enum StubOrder {
    Fixed(OptimizedOrder),
    Reversed,
    Error(ProviderError),
}

/// Stub [`OptimizingProvider`].
#[derive(Debug)]
pub struct StubOptimizingProvider {
    response: StubOrder,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubOptimizingProvider {
    /// Return `waypoint_order` for every request.
    #[must_use]
    pub fn with_order(waypoint_order: Vec<usize>) -> Self {
        Self::from_response(StubOrder::Fixed(OptimizedOrder {
            waypoint_order,
            distance_miles: None,
            duration: None,
        }))
    }

    /// Reverse the intermediates of every request.
    #[must_use]
    pub fn reversing() -> Self {
        Self::from_response(StubOrder::Reversed)
    }

    /// Fail every request with `error`.
    #[must_use]
    pub fn with_error(error: ProviderError) -> Self {
        Self::from_response(StubOrder::Error(error))
    }

    const fn from_response(response: StubOrder) -> Self {
        Self {
            response,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Wait `delay` before answering.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of requests received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OptimizingProvider for StubOptimizingProvider {
    async fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizedOrder, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        pause(self.delay).await;
        match &self.response {
            StubOrder::Fixed(order) => Ok(order.clone()),
            StubOrder::Reversed => Ok(OptimizedOrder {
                waypoint_order: (0..request.intermediates.len()).rev().collect(),
                distance_miles: None,
                duration: None,
            }),
            StubOrder::Error(error) => Err(error.clone()),
        }
    }
}

/// Stub [`DirectionsProvider`] that follows the stops in straight lines.
///
/// Reported distance is the great-circle distance scaled by `road_factor`, so
/// tests can tell provider figures from approximate ones.
#[derive(Debug)]
pub struct StubDirectionsProvider {
    error: Option<ProviderError>,
    road_factor: f64,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubDirectionsProvider {
    /// Succeed with distances 1.25 times the great-circle figure.
    #[must_use]
    pub const fn following_stops() -> Self {
        Self {
            error: None,
            road_factor: 1.25,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every request with `error`.
    #[must_use]
    pub fn with_error(error: ProviderError) -> Self {
        Self {
            error: Some(error),
            ..Self::following_stops()
        }
    }

    /// Wait `delay` before answering.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of requests received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectionsProvider for StubDirectionsProvider {
    async fn directions(&self, stops: &[Coord<f64>]) -> Result<Directions, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        pause(self.delay).await;
        if stops.is_empty() {
            return Err(ProviderError::EmptyInput);
        }
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        let distance_miles = approximate_path_distance(stops) * self.road_factor;
        Ok(Directions {
            geometry: LineString::new(stops.to_vec()),
            distance_miles,
            duration: Duration::from_secs(3600),
        })
    }
}

/// Stub [`PoiProvider`] returning a fixed list, filtered to the requested
/// categories and envelope.
#[derive(Debug)]
pub struct StubPoiProvider {
    pois: Result<Vec<RawPoi>, ProviderError>,
    delay: Duration,
    last_envelope: Mutex<Option<Rect<f64>>>,
}

impl StubPoiProvider {
    /// Serve `pois`.
    #[must_use]
    pub const fn with_pois(pois: Vec<RawPoi>) -> Self {
        Self {
            pois: Ok(pois),
            delay: Duration::ZERO,
            last_envelope: Mutex::new(None),
        }
    }

    /// Serve nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self::with_pois(Vec::new())
    }

    /// Fail every request with `error`.
    #[must_use]
    pub const fn with_error(error: ProviderError) -> Self {
        Self {
            pois: Err(error),
            delay: Duration::ZERO,
            last_envelope: Mutex::new(None),
        }
    }

    /// Wait `delay` before answering.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Envelope of the most recent request.
    #[must_use]
    pub fn last_envelope(&self) -> Option<Rect<f64>> {
        *self
            .last_envelope
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl PoiProvider for StubPoiProvider {
    async fn find_pois(
        &self,
        envelope: &Rect<f64>,
        categories: &[PoiCategory],
    ) -> Result<Vec<RawPoi>, ProviderError> {
        *self
            .last_envelope
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(*envelope);
        pause(self.delay).await;
        let pois = self.pois.clone()?;
        let min = envelope.min();
        let max = envelope.max();
        Ok(pois
            .into_iter()
            .filter(|poi| categories.contains(&poi.category))
            .filter(|poi| {
                (min.x..=max.x).contains(&poi.location.x)
                    && (min.y..=max.y).contains(&poi.location.y)
            })
            .collect())
    }
}

/// In-memory [`CatalogSource`].
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogSource {
    records: Vec<WaypointRecord>,
}

impl MemoryCatalogSource {
    /// Serve `records`.
    #[must_use]
    pub const fn with_records(records: Vec<WaypointRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl CatalogSource for MemoryCatalogSource {
    async fn fetch_records(&self) -> Result<Vec<WaypointRecord>, CatalogError> {
        Ok(self.records.clone())
    }
}

/// In-memory [`SlotStore`] for a single session.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: RefCell<HashMap<String, String>>,
}

impl MemorySlotStore {
    /// Raw contents of `slot`.
    pub fn get(&self, slot: &str) -> Option<String> {
        self.slots.borrow().get(slot).cloned()
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, slot: &str) -> Result<Option<String>, PersistError> {
        Ok(self.get(slot))
    }

    fn write(&self, slot: &str, value: &str) -> Result<(), PersistError> {
        self.slots
            .borrow_mut()
            .insert(slot.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<(), PersistError> {
        self.slots.borrow_mut().remove(slot);
        Ok(())
    }
}

/// Build a waypoint from `(id, lat, lng)`.
pub fn waypoint(id: &str, lat: f64, lng: f64) -> Waypoint {
    Waypoint::new(id, id.to_uppercase(), Coord { x: lng, y: lat })
}

/// Build a named raw POI at `(lat, lng)`.
pub fn raw_poi(category: PoiCategory, name: Option<&str>, lat: f64, lng: f64) -> RawPoi {
    RawPoi {
        category,
        name: name.map(str::to_owned),
        location: Coord { x: lng, y: lat },
    }
}
