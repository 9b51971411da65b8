use serde::{Deserialize, Serialize};

use crate::{IdString, ServiceDayTime};

/// The time a vehicle arrives at and departs from a single stop of a trip.
///
/// Primary key: `(trip_id, stop_sequence)`. Arrival and departure are stored
/// as nanoseconds since midnight of the service day and may exceed 24h for
/// trips wrapping into the next calendar day.
///
/// See <https://gtfs.org/schedule/reference/#stop_timestxt>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTime {
    /// Foreign ID referencing `trips.id`.
    pub trip_id: IdString,

    /// Foreign ID referencing `stops.id`.
    pub stop_id: IdString,

    /// Order of the stop within the trip. Values increase along the trip but
    /// need not be consecutive.
    pub stop_sequence: i64,

    pub arrival_time: ServiceDayTime,
    pub departure_time: ServiceDayTime,

    /// Overrides the trip headsign when the destination signage changes
    /// between stops.
    pub headsign: Option<String>,

    pub pickup_type: Option<i64>,
    pub drop_off_type: Option<i64>,

    /// Distance traveled along the trip's shape from its first stop, in the
    /// same units used by the shape.
    pub shape_dist_traveled: Option<f64>,

    /// Whether the times are exact (1) or approximate (0).
    pub timepoint: Option<i64>,
}
