//! The trip session: state, derived route and the operations that change them.
//!
//! A [`TripSession`] owns the trip state, the last planned route and the
//! collaborators needed to recompute it. It is single-threaded: state lives in
//! `Cell`/`RefCell`, and [`TripSession::optimize`] suspends at each provider
//! call without holding a borrow.
//!
//! Two rules keep derived state coherent:
//!
//! - Only one optimize runs at a time. A second call while one is in flight
//!   returns [`OptimizeOutcome::AlreadyRunning`] and changes nothing.
//! - Every trip mutation bumps a generation counter and discards the planned
//!   route. An optimize that finishes after a mutation returns
//!   [`OptimizeOutcome::Stale`] and its result is dropped.

use std::cell::{Cell, RefCell};

use springtrip_core::{
    LatLng, PersistError, PersistedTrip, PreconditionError, ShareError, ShareToken,
    TripState, TripStateError, WaypointCatalog,
};
use thiserror::Error;

use crate::persistence::TripPersistence;
use crate::planner::{PlannedTrip, Planner};

/// Result of [`TripSession::optimize`].
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizeOutcome {
    /// The route was planned and applied to the trip.
    Applied(PlannedTrip),
    /// Another optimize was already running; nothing changed.
    AlreadyRunning,
    /// The trip changed while planning; the result was dropped.
    Stale,
}

/// Where [`TripSession::restore`] found the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreSource {
    /// A share token supplied the trip.
    Share,
    /// The locally saved slot supplied the trip.
    Local,
    /// Neither source had a trip.
    Empty,
}

/// User actions a session responds to.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append a catalog waypoint.
    AddWaypoint(String),
    /// Drop a waypoint from the trip.
    RemoveWaypoint(String),
    /// Move the start location.
    SetStart(LatLng),
    /// Plan the current trip.
    Optimize,
    /// Forget the trip and its saved copy.
    Clear,
    /// Save the trip locally.
    Save,
}

/// Result of [`TripSession::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// The trip state changed.
    Updated,
    /// An optimize ran.
    Optimized(OptimizeOutcome),
    /// The trip was saved.
    Saved(PersistedTrip),
}

/// Errors surfaced by [`TripSession::dispatch`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// The edit was rejected.
    #[error(transparent)]
    Trip(#[from] TripStateError),
    /// The trip cannot be optimized yet.
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    /// Local storage failed.
    #[error(transparent)]
    Persist(#[from] PersistError),
    /// The share link could not be built or read.
    #[error(transparent)]
    Share(#[from] ShareError),
}

/// Clears the in-flight flag when dropped.
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// A user's trip and everything derived from it.
#[derive(Debug)]
pub struct TripSession {
    catalog: WaypointCatalog,
    planner: Planner,
    persistence: TripPersistence,
    trip: RefCell<TripState>,
    planned: RefCell<Option<PlannedTrip>>,
    generation: Cell<u64>,
    in_flight: Cell<bool>,
}

impl TripSession {
    /// Start an empty session.
    #[must_use]
    pub fn new(catalog: WaypointCatalog, planner: Planner, persistence: TripPersistence) -> Self {
        Self {
            catalog,
            planner,
            persistence,
            trip: RefCell::new(TripState::default()),
            planned: RefCell::new(None),
            generation: Cell::new(0),
            in_flight: Cell::new(false),
        }
    }

    /// Populate the trip at start-up.
    ///
    /// The share token wins; the saved slot is consulted only when the token
    /// is absent, malformed or resolves to no waypoints.
    pub fn restore(&self, share: Option<&str>) -> RestoreSource {
        if let Some(Err(err)) = share.map(|input| self.apply_share(input)) {
            log::warn!("ignoring share link: {err}");
        }
        if self.has_waypoints() {
            return RestoreSource::Share;
        }
        match self.persistence.load(&self.catalog) {
            Some(trip) if !trip.waypoint_ids().is_empty() => {
                self.replace_trip(trip);
                RestoreSource::Local
            }
            _ => RestoreSource::Empty,
        }
    }

    /// Replace the trip with the one encoded in `input`.
    ///
    /// Returns whether `input` carried a share token.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError`] when the token is malformed.
    pub fn apply_share(&self, input: &str) -> Result<bool, ShareError> {
        let Some(token) = ShareToken::decode(input)? else {
            return Ok(false);
        };
        self.replace_trip(token.into_trip(&self.catalog));
        Ok(true)
    }

    /// Append a catalog waypoint.
    ///
    /// # Errors
    ///
    /// Returns [`TripStateError`] for unknown, duplicate or excess waypoints.
    pub fn add_waypoint(&self, id: &str) -> Result<(), TripStateError> {
        self.trip.borrow_mut().push_from_catalog(id, &self.catalog)?;
        self.invalidate();
        Ok(())
    }

    /// Drop a waypoint.
    ///
    /// # Errors
    ///
    /// Returns [`TripStateError::NotInTrip`] when `id` is not selected.
    pub fn remove_waypoint(&self, id: &str) -> Result<(), TripStateError> {
        self.trip.borrow_mut().remove(id)?;
        self.invalidate();
        Ok(())
    }

    /// Move the start location.
    ///
    /// # Errors
    ///
    /// Returns [`TripStateError::InvalidStart`] for out-of-range coordinates.
    pub fn set_start(&self, start: LatLng) -> Result<(), TripStateError> {
        self.trip.borrow_mut().set_start(start)?;
        self.invalidate();
        Ok(())
    }

    /// Forget the trip and remove its saved copy.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] when the saved copy cannot be removed. The
    /// in-memory trip is cleared regardless.
    pub fn clear(&self) -> Result<(), PersistError> {
        self.trip.borrow_mut().clear();
        self.invalidate();
        self.persistence.clear()
    }

    /// Save the trip locally.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] when the slot cannot be written.
    pub fn save(&self) -> Result<PersistedTrip, PersistError> {
        self.persistence.save(&self.trip.borrow())
    }

    /// Share query for the current trip.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::TooLong`] when the trip does not fit in a URL.
    pub fn share_query(&self) -> Result<String, ShareError> {
        ShareToken::from_trip(&self.trip.borrow()).encode()
    }

    /// Order, measure and annotate the current trip.
    ///
    /// On success the trip adopts the optimized order.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionError`] when the trip lacks a start, has too few
    /// or too many waypoints, or names a waypoint the catalog lacks.
    pub async fn optimize(&self) -> Result<OptimizeOutcome, PreconditionError> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            log::debug!("optimize already in flight; ignoring request");
            return Ok(OptimizeOutcome::AlreadyRunning);
        };
        let generation = self.generation.get();
        let (start, waypoints) = self.trip.borrow().optimize_input(&self.catalog)?;

        let planned = self.planner.plan(start, waypoints).await?;

        if self.generation.get() != generation {
            log::debug!("trip changed while optimizing; dropping result");
            return Ok(OptimizeOutcome::Stale);
        }
        if !self.trip.borrow_mut().reorder(planned.route.waypoint_ids()) {
            log::warn!("optimized order does not match the trip; dropping result");
            return Ok(OptimizeOutcome::Stale);
        }
        *self.planned.borrow_mut() = Some(planned.clone());
        Ok(OptimizeOutcome::Applied(planned))
    }

    /// Apply `command`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] wrapping the failing operation's error.
    pub async fn dispatch(&self, command: Command) -> Result<CommandOutcome, SessionError> {
        match command {
            Command::AddWaypoint(id) => self.add_waypoint(&id)?,
            Command::RemoveWaypoint(id) => self.remove_waypoint(&id)?,
            Command::SetStart(start) => self.set_start(start)?,
            Command::Clear => self.clear()?,
            Command::Optimize => return Ok(CommandOutcome::Optimized(self.optimize().await?)),
            Command::Save => return Ok(CommandOutcome::Saved(self.save()?)),
        }
        Ok(CommandOutcome::Updated)
    }

    /// Snapshot of the trip state.
    #[must_use]
    pub fn trip(&self) -> TripState {
        self.trip.borrow().clone()
    }

    /// The last applied plan, if the trip has not changed since.
    #[must_use]
    pub fn planned(&self) -> Option<PlannedTrip> {
        self.planned.borrow().clone()
    }

    /// Whether an optimize is running.
    #[must_use]
    pub fn is_optimizing(&self) -> bool {
        self.in_flight.get()
    }

    /// The catalog waypoints resolve against.
    #[must_use]
    pub const fn catalog(&self) -> &WaypointCatalog {
        &self.catalog
    }

    fn has_waypoints(&self) -> bool {
        !self.trip.borrow().waypoint_ids().is_empty()
    }

    fn replace_trip(&self, trip: TripState) {
        *self.trip.borrow_mut() = trip;
        self.invalidate();
    }

    fn invalidate(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        self.planned.replace(None);
    }
}
