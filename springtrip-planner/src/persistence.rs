//! Saving and restoring the trip through a [`SlotStore`].

use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use springtrip_core::{PersistError, PersistedTrip, SlotStore, TRIP_SLOT, TripState, WaypointCatalog};

/// Reads and writes the trip's single persisted slot.
#[derive(Clone)]
pub struct TripPersistence {
    store: Rc<dyn SlotStore>,
}

impl std::fmt::Debug for TripPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripPersistence")
            .field("slot", &TRIP_SLOT)
            .finish_non_exhaustive()
    }
}

impl TripPersistence {
    /// Persist into `store`.
    #[must_use]
    pub fn new(store: Rc<dyn SlotStore>) -> Self {
        Self { store }
    }

    /// Overwrite the slot with a snapshot of `trip`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] when the record cannot be encoded or written.
    pub fn save(&self, trip: &TripState) -> Result<PersistedTrip, PersistError> {
        let record = PersistedTrip::from_trip(trip, now_millis());
        self.store.write(TRIP_SLOT, &record.to_json()?)?;
        log::debug!("saved {} waypoints to {TRIP_SLOT}", record.waypoint_ids.len());
        Ok(record)
    }

    /// The stored record, unresolved.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] when the slot cannot be read or decoded.
    pub fn load_record(&self) -> Result<Option<PersistedTrip>, PersistError> {
        self.store
            .read(TRIP_SLOT)?
            .map(|json| PersistedTrip::from_json(&json))
            .transpose()
    }

    /// The stored trip resolved against `catalog`.
    ///
    /// Unreadable or corrupt slots are logged and treated as absent.
    #[must_use]
    pub fn load(&self, catalog: &WaypointCatalog) -> Option<TripState> {
        match self.load_record() {
            Ok(record) => record.map(|record| record.into_trip(catalog)),
            Err(err) => {
                log::warn!("ignoring saved trip: {err}");
                None
            }
        }
    }

    /// Remove the slot.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] when the store refuses the removal.
    pub fn clear(&self) -> Result<(), PersistError> {
        self.store.remove(TRIP_SLOT)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use springtrip_core::LatLng;
    use springtrip_core::test_support::{MemorySlotStore, waypoint};

    #[fixture]
    fn store() -> Rc<MemorySlotStore> {
        Rc::new(MemorySlotStore::default())
    }

    #[fixture]
    fn catalog() -> WaypointCatalog {
        WaypointCatalog::new([
            waypoint("sol-duc", 47.97, -123.86),
            waypoint("baker", 48.77, -121.81),
        ])
    }

    fn trip() -> TripState {
        let mut trip = TripState::default();
        trip.push("sol-duc").expect("push");
        trip.push("baker").expect("push");
        trip.set_start(LatLng {
            lat: 47.6062,
            lng: -120.7401,
        })
        .expect("start");
        trip
    }

    #[rstest]
    fn save_then_load_restores_the_trip(store: Rc<MemorySlotStore>, catalog: WaypointCatalog) {
        let persistence = TripPersistence::new(store);
        let record = persistence.save(&trip()).expect("save");
        assert!(record.created_at > 0);
        assert_eq!(persistence.load(&catalog), Some(trip()));
    }

    #[rstest]
    fn missing_slot_loads_nothing(store: Rc<MemorySlotStore>, catalog: WaypointCatalog) {
        assert_eq!(TripPersistence::new(store).load(&catalog), None);
    }

    #[rstest]
    fn corrupt_slot_is_treated_as_absent(store: Rc<MemorySlotStore>, catalog: WaypointCatalog) {
        store.write(TRIP_SLOT, "{not json").expect("write");
        let persistence = TripPersistence::new(store);
        assert!(persistence.load_record().is_err());
        assert_eq!(persistence.load(&catalog), None);
    }

    #[rstest]
    fn clear_removes_the_slot(store: Rc<MemorySlotStore>) {
        let persistence = TripPersistence::new(store.clone());
        persistence.save(&trip()).expect("save");
        persistence.clear().expect("clear");
        assert_eq!(store.get(TRIP_SLOT), None);
    }
}
