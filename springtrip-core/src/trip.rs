//! The user's trip: an ordered set of waypoint ids plus a start location.
//!
//! Insertion order is significant until the trip is optimized; afterwards the
//! order is whatever the optimizer assigned. Identifiers are distinct and the
//! trip holds at most [`MAX_WAYPOINTS`] of them, the waypoint limit of the
//! external routing providers.

use std::collections::HashSet;

use geo::Coord;
use thiserror::Error;

use crate::coord::LatLng;
use crate::waypoint::{Waypoint, WaypointCatalog};

/// Upper bound on waypoints in a trip.
pub const MAX_WAYPOINTS: usize = 50;

/// Minimum number of waypoints an optimize request needs.
pub const MIN_OPTIMIZE_WAYPOINTS: usize = 2;

/// Errors returned by [`TripState`] mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripStateError {
    /// The waypoint is already part of the trip.
    #[error("waypoint {id:?} is already in the trip")]
    Duplicate {
        /// Offending identifier.
        id: String,
    },
    /// The trip already holds the maximum number of waypoints.
    #[error("a trip holds at most {limit} waypoints")]
    Full {
        /// Maximum waypoint count.
        limit: usize,
    },
    /// The identifier does not resolve against the catalog.
    #[error("waypoint {id:?} is not in the catalog")]
    UnknownWaypoint {
        /// Offending identifier.
        id: String,
    },
    /// The identifier is not part of the trip.
    #[error("waypoint {id:?} is not in the trip")]
    NotInTrip {
        /// Offending identifier.
        id: String,
    },
    /// The start coordinate was out of range.
    #[error("start location is outside the valid coordinate range")]
    InvalidStart,
}

/// Reasons an optimize request cannot run.
///
/// These are the only optimize failures reported to the caller: no fallback
/// tier can produce a meaningful order without them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    /// Fewer than two waypoints were selected.
    #[error("select at least {min} waypoints to optimize (found {found})", min = MIN_OPTIMIZE_WAYPOINTS)]
    TooFewWaypoints {
        /// Number of waypoints selected.
        found: usize,
    },
    /// More waypoints than the providers accept.
    #[error("a trip holds at most {max} waypoints (found {found})", max = MAX_WAYPOINTS)]
    TooManyWaypoints {
        /// Number of waypoints selected.
        found: usize,
    },
    /// No start location has been set.
    #[error("set a start location before optimizing")]
    MissingStart,
    /// A trip entry no longer resolves against the catalog.
    #[error("waypoint {id:?} is not in the catalog")]
    UnknownWaypoint {
        /// Offending identifier.
        id: String,
    },
}

/// Check the optimize precondition for a start and waypoint count.
pub const fn check_optimize_input(
    start: Option<Coord<f64>>,
    waypoint_count: usize,
) -> Result<Coord<f64>, PreconditionError> {
    if waypoint_count < MIN_OPTIMIZE_WAYPOINTS {
        return Err(PreconditionError::TooFewWaypoints {
            found: waypoint_count,
        });
    }
    if waypoint_count > MAX_WAYPOINTS {
        return Err(PreconditionError::TooManyWaypoints {
            found: waypoint_count,
        });
    }
    match start {
        Some(start) => Ok(start),
        None => Err(PreconditionError::MissingStart),
    }
}

/// Ordered, bounded, duplicate-free trip state.
///
/// # Examples
/// ```
/// use springtrip_core::{LatLng, TripState};
///
/// let mut trip = TripState::default();
/// trip.push("sol-duc")?;
/// trip.push("baker")?;
/// trip.set_start(LatLng { lat: 47.6062, lng: -120.7401 })?;
/// assert_eq!(trip.waypoint_ids(), ["sol-duc", "baker"]);
/// assert!(trip.push("baker").is_err());
/// # Ok::<(), springtrip_core::TripStateError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripState {
    waypoint_ids: Vec<String>,
    start: Option<Coord<f64>>,
}

impl TripState {
    /// Append a waypoint id.
    pub fn push(&mut self, id: impl Into<String>) -> Result<(), TripStateError> {
        let id = id.into();
        if self.contains(&id) {
            return Err(TripStateError::Duplicate { id });
        }
        if self.waypoint_ids.len() >= MAX_WAYPOINTS {
            return Err(TripStateError::Full {
                limit: MAX_WAYPOINTS,
            });
        }
        self.waypoint_ids.push(id);
        Ok(())
    }

    /// Append a waypoint id after checking it resolves against `catalog`.
    pub fn push_from_catalog(
        &mut self,
        id: &str,
        catalog: &WaypointCatalog,
    ) -> Result<(), TripStateError> {
        if !catalog.contains(id) {
            return Err(TripStateError::UnknownWaypoint { id: id.to_owned() });
        }
        self.push(id)
    }

    /// Remove a waypoint id.
    pub fn remove(&mut self, id: &str) -> Result<(), TripStateError> {
        let position = self
            .waypoint_ids
            .iter()
            .position(|existing| existing == id)
            .ok_or_else(|| TripStateError::NotInTrip { id: id.to_owned() })?;
        self.waypoint_ids.remove(position);
        Ok(())
    }

    /// Set the start location.
    pub fn set_start(&mut self, start: LatLng) -> Result<(), TripStateError> {
        if !start.is_valid() {
            return Err(TripStateError::InvalidStart);
        }
        self.start = Some(start.to_coord());
        Ok(())
    }

    /// Forget all waypoints and the start location.
    pub fn clear(&mut self) {
        self.waypoint_ids.clear();
        self.start = None;
    }

    /// Replace the order with `ordered`, which must be a permutation of the
    /// current ids. Returns whether the order was applied.
    pub fn reorder(&mut self, ordered: Vec<String>) -> bool {
        let current: HashSet<&str> = self.waypoint_ids.iter().map(String::as_str).collect();
        let proposed: HashSet<&str> = ordered.iter().map(String::as_str).collect();
        if ordered.len() != self.waypoint_ids.len() || current != proposed {
            return false;
        }
        self.waypoint_ids = ordered;
        true
    }

    /// Build a trip from stored ids, dropping ids the catalog no longer holds,
    /// repeated ids and anything past [`MAX_WAYPOINTS`]. Relative order of the
    /// remainder is preserved.
    pub fn resolved<'a, I>(ids: I, start: Option<LatLng>, catalog: &WaypointCatalog) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut trip = Self {
            waypoint_ids: Vec::new(),
            start: start.filter(LatLng::is_valid).map(LatLng::to_coord),
        };
        for id in ids {
            if catalog.contains(id) && !trip.contains(id) && trip.len() < MAX_WAYPOINTS {
                trip.waypoint_ids.push(id.to_owned());
            }
        }
        trip
    }

    /// Ordered waypoint identifiers.
    #[must_use]
    pub fn waypoint_ids(&self) -> &[String] {
        &self.waypoint_ids
    }

    /// Start location, if set.
    #[must_use]
    pub const fn start(&self) -> Option<Coord<f64>> {
        self.start
    }

    /// Whether `id` is part of the trip.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.waypoint_ids.iter().any(|existing| existing == id)
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoint_ids.len()
    }

    /// Whether the trip has neither waypoints nor a start.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoint_ids.is_empty() && self.start.is_none()
    }

    /// Resolve the trip against `catalog` and check the optimize precondition.
    pub fn optimize_input(
        &self,
        catalog: &WaypointCatalog,
    ) -> Result<(Coord<f64>, Vec<Waypoint>), PreconditionError> {
        let start = check_optimize_input(self.start, self.waypoint_ids.len())?;
        let waypoints = self
            .waypoint_ids
            .iter()
            .map(|id| {
                catalog
                    .get(id)
                    .cloned()
                    .ok_or_else(|| PreconditionError::UnknownWaypoint { id: id.clone() })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((start, waypoints))
    }
}
