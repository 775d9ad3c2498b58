//! Durable local snapshot of the trip.
//!
//! The trip is stored as one JSON record in a single named slot
//! ([`TRIP_SLOT`]) of a [`SlotStore`]. Saving overwrites the slot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::LatLng;
use crate::trip::TripState;
use crate::waypoint::WaypointCatalog;

/// Name of the slot holding the saved trip.
pub const TRIP_SLOT: &str = "springtrip.trip";

/// The persisted record: `{ waypointIds, start: {lat, lng}, createdAt }`.
///
/// # Examples
/// ```
/// use springtrip_core::{LatLng, PersistedTrip};
///
/// let record = PersistedTrip {
///     waypoint_ids: vec!["sol-duc".into()],
///     start: Some(LatLng { lat: 47.6062, lng: -120.7401 }),
///     created_at: 1_700_000_000_000,
/// };
/// let json = record.to_json()?;
/// assert!(json.contains("\"waypointIds\""));
/// assert_eq!(PersistedTrip::from_json(&json)?, record);
/// # Ok::<(), springtrip_core::PersistError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTrip {
    /// Waypoint ids in trip order.
    pub waypoint_ids: Vec<String>,
    /// Start coordinate, if set.
    #[serde(default)]
    pub start: Option<LatLng>,
    /// Milliseconds since the Unix epoch when the record was written.
    #[serde(default)]
    pub created_at: u64,
}

impl PersistedTrip {
    /// Snapshot `trip` with the given creation timestamp.
    #[must_use]
    pub fn from_trip(trip: &TripState, created_at: u64) -> Self {
        Self {
            waypoint_ids: trip.waypoint_ids().to_vec(),
            start: trip.start().map(LatLng::from),
            created_at,
        }
    }

    /// Resolve against `catalog`, dropping ids it no longer contains.
    #[must_use]
    pub fn into_trip(self, catalog: &WaypointCatalog) -> TripState {
        TripState::resolved(
            self.waypoint_ids.iter().map(String::as_str),
            self.start,
            catalog,
        )
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, PersistError> {
        serde_json::to_string(self).map_err(|err| PersistError::Encode {
            message: err.to_string(),
        })
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        serde_json::from_str(json).map_err(|err| PersistError::Decode {
            message: err.to_string(),
        })
    }
}

/// Errors from a [`SlotStore`] or the persisted record codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistError {
    /// Reading the slot failed.
    #[error("failed to read slot {slot:?}: {message}")]
    Read {
        /// Slot name.
        slot: String,
        /// Underlying failure.
        message: String,
    },
    /// Writing the slot failed.
    #[error("failed to write slot {slot:?}: {message}")]
    Write {
        /// Slot name.
        slot: String,
        /// Underlying failure.
        message: String,
    },
    /// The record could not be serialized.
    #[error("failed to encode trip record: {message}")]
    Encode {
        /// Serializer message.
        message: String,
    },
    /// The slot held something other than a trip record.
    #[error("failed to decode trip record: {message}")]
    Decode {
        /// Parser message.
        message: String,
    },
}

/// Named-slot durable storage, the local-storage analogue.
pub trait SlotStore {
    /// Contents of `slot`, or `None` when it was never written.
    fn read(&self, slot: &str) -> Result<Option<String>, PersistError>;

    /// Overwrite `slot` with `value`.
    fn write(&self, slot: &str, value: &str) -> Result<(), PersistError>;

    /// Remove `slot`; removing a missing slot is not an error.
    fn remove(&self, slot: &str) -> Result<(), PersistError>;
}
