//! JSON output written by the commands.

use std::io::Write;

use serde::Serialize;
use springtrip_core::{LatLng, NearbyPoi, OrderSource, TripState, Waypoint};
use springtrip_planner::{PlannedTrip, RestoreSource};

use crate::CliError;

/// One stop in visiting order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct StopReport {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) lat: f64,
    pub(crate) lng: f64,
}

impl From<&Waypoint> for StopReport {
    fn from(waypoint: &Waypoint) -> Self {
        Self {
            id: waypoint.id.clone(),
            name: waypoint.name.clone(),
            lat: waypoint.location.y,
            lng: waypoint.location.x,
        }
    }
}

/// Summary figures for the route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatsReport {
    pub(crate) stops: usize,
    pub(crate) distance_miles: f64,
    pub(crate) duration_seconds: u64,
    pub(crate) approximate: bool,
}

/// An amenity near the route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PoiReport {
    pub(crate) category: &'static str,
    pub(crate) name: String,
    pub(crate) lat: f64,
    pub(crate) lng: f64,
    pub(crate) distance_from_route_miles: f64,
}

impl From<&NearbyPoi> for PoiReport {
    fn from(poi: &NearbyPoi) -> Self {
        Self {
            category: poi.category.as_str(),
            name: poi.name.clone(),
            lat: poi.location.y,
            lng: poi.location.x,
            distance_from_route_miles: poi.distance_from_route_miles,
        }
    }
}

/// Output of `springtrip plan`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlanReport {
    pub(crate) order: Vec<StopReport>,
    pub(crate) order_source: &'static str,
    pub(crate) stats: StatsReport,
    /// `[lng, lat]` pairs, GeoJSON order.
    pub(crate) geometry: Vec<[f64; 2]>,
    pub(crate) pois: Vec<PoiReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) share: Option<String>,
    pub(crate) saved: bool,
}

impl PlanReport {
    pub(crate) fn new(planned: &PlannedTrip, share: Option<String>, saved: bool) -> Self {
        let stats = planned.stats();
        Self {
            order: planned.route.order.iter().map(StopReport::from).collect(),
            order_source: match planned.route.order_source {
                OrderSource::Provider => "provider",
                OrderSource::Fallback => "fallback",
            },
            stats: StatsReport {
                stops: stats.stops,
                distance_miles: stats.distance_miles,
                duration_seconds: stats.duration.as_secs(),
                approximate: stats.approximate,
            },
            geometry: planned
                .route
                .geometry
                .coords()
                .map(|coord| [coord.x, coord.y])
                .collect(),
            pois: planned.pois.iter().map(PoiReport::from).collect(),
            share,
            saved,
        }
    }
}

/// Output of `springtrip restore`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RestoreReport {
    pub(crate) source: &'static str,
    pub(crate) waypoint_ids: Vec<String>,
    pub(crate) start: Option<LatLng>,
}

impl RestoreReport {
    pub(crate) fn new(source: RestoreSource, trip: &TripState) -> Self {
        Self {
            source: match source {
                RestoreSource::Share => "share",
                RestoreSource::Local => "local",
                RestoreSource::Empty => "empty",
            },
            waypoint_ids: trip.waypoint_ids().to_vec(),
            start: trip.start().map(LatLng::from),
        }
    }
}

pub(crate) fn write_json(writer: &mut dyn Write, value: &impl Serialize) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    write_line(writer, &payload)
}

pub(crate) fn write_line(writer: &mut dyn Write, line: &str) -> Result<(), CliError> {
    writer
        .write_all(line.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
