//! Compact, URL-embeddable trip snapshots.
//!
//! A share token is a URL query with two parameters:
//!
//! - [`SHARE_PARAM_SPRINGS`]: comma-separated waypoint ids, in trip order;
//! - [`SHARE_PARAM_START`]: the start coordinate as `"lat,lng"`, rounded to
//!   four decimal places.
//!
//! Identifiers are percent-encoded individually so the separating commas stay
//! literal. Decoded tokens only make sense against a catalog; ids it does not
//! contain are dropped when the token is turned back into a [`TripState`].

use thiserror::Error;
use url::{Url, form_urlencoded};

use crate::coord::{CoordinateError, LatLng};
use crate::trip::TripState;
use crate::waypoint::WaypointCatalog;

/// Query parameter holding the waypoint ids.
pub const SHARE_PARAM_SPRINGS: &str = "springs";

/// Query parameter holding the start coordinate.
pub const SHARE_PARAM_START: &str = "start";

/// Longest query an encoded token may produce.
pub const MAX_SHARE_LENGTH: usize = 2000;

/// Errors from encoding or decoding a share token.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShareError {
    /// The encoded query would not fit in a URL.
    #[error("share link is {length} characters long (limit {limit})")]
    TooLong {
        /// Encoded length.
        length: usize,
        /// Maximum length.
        limit: usize,
    },
    /// The `start` parameter was not a valid coordinate.
    #[error("invalid start parameter {value:?}: {source}")]
    InvalidStart {
        /// Raw parameter value.
        value: String,
        /// Parse failure.
        #[source]
        source: CoordinateError,
    },
}

/// Decoded share parameters, before catalog resolution.
///
/// # Examples
/// ```
/// use springtrip_core::{LatLng, ShareToken};
///
/// let token = ShareToken {
///     waypoint_ids: vec!["sol-duc".into(), "baker".into()],
///     start: Some(LatLng { lat: 47.6062, lng: -120.7401 }),
/// };
/// let query = token.encode()?;
/// assert_eq!(query, "springs=sol-duc,baker&start=47.6062,-120.7401");
/// assert_eq!(ShareToken::decode(&query)?, Some(token));
/// # Ok::<(), springtrip_core::ShareError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ShareToken {
    /// Waypoint ids in trip order.
    pub waypoint_ids: Vec<String>,
    /// Start coordinate, if the trip had one.
    pub start: Option<LatLng>,
}

impl ShareToken {
    /// Snapshot a trip.
    #[must_use]
    pub fn from_trip(trip: &TripState) -> Self {
        Self {
            waypoint_ids: trip.waypoint_ids().to_vec(),
            start: trip.start().map(LatLng::from),
        }
    }

    /// Encode as a query string (without the leading `?`).
    pub fn encode(&self) -> Result<String, ShareError> {
        let springs = self
            .waypoint_ids
            .iter()
            .map(|id| form_urlencoded::byte_serialize(id.as_bytes()).collect::<String>())
            .collect::<Vec<_>>()
            .join(",");
        let mut query = format!("{SHARE_PARAM_SPRINGS}={springs}");
        if let Some(start) = self.start {
            query.push_str(&format!(
                "&{SHARE_PARAM_START}={:.4},{:.4}",
                start.lat, start.lng
            ));
        }
        if query.len() > MAX_SHARE_LENGTH {
            return Err(ShareError::TooLong {
                length: query.len(),
                limit: MAX_SHARE_LENGTH,
            });
        }
        Ok(query)
    }

    /// Encode onto `base`, replacing any existing query.
    pub fn to_url(&self, base: &Url) -> Result<Url, ShareError> {
        let query = self.encode()?;
        let mut url = base.clone();
        url.set_query(Some(&query));
        Ok(url)
    }

    /// Decode a full URL or a bare query string.
    ///
    /// Returns `Ok(None)` when no `springs` parameter is present.
    pub fn decode(input: &str) -> Result<Option<Self>, ShareError> {
        let query = Url::parse(input).map_or_else(
            |_| input.trim_start_matches('?').to_owned(),
            |url| url.query().unwrap_or_default().to_owned(),
        );

        let mut springs = None;
        let mut start = None;
        for pair in query.split('&') {
            let (key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                SHARE_PARAM_SPRINGS => springs = Some(decode_ids(raw_value)),
                SHARE_PARAM_START => start = Some(decode_start(raw_value)?),
                _ => {}
            }
        }

        Ok(springs.map(|waypoint_ids| Self {
            waypoint_ids,
            start,
        }))
    }

    /// Resolve against `catalog`, dropping ids it does not contain.
    #[must_use]
    pub fn into_trip(self, catalog: &WaypointCatalog) -> TripState {
        TripState::resolved(
            self.waypoint_ids.iter().map(String::as_str),
            self.start,
            catalog,
        )
    }
}

fn decode_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|piece| !piece.is_empty())
        // A lone piece parses as a key with an empty value.
        .filter_map(|piece| form_urlencoded::parse(piece.as_bytes()).next())
        .map(|(id, _)| id.into_owned())
        .collect()
}

fn decode_start(raw: &str) -> Result<LatLng, ShareError> {
    let value: String = form_urlencoded::parse(raw.as_bytes())
        .next()
        .map(|(decoded, _)| decoded.into_owned())
        .unwrap_or_default();
    value
        .parse()
        .map_err(|source| ShareError::InvalidStart { value, source })
}
