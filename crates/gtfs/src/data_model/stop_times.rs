use serde::Deserialize;

use crate::serde::deserialize_service_time_option;

/// A single line of stop_times.txt.
///
/// Times are measured from noon-minus-12h of the service day and may exceed
/// `24:00:00` for trips running past midnight. When only one of arrival and
/// departure is given, the conversion mirrors it into the other.
///
/// See <https://gtfs.org/schedule/reference/#stop_timestxt>
#[derive(Debug, Clone, Deserialize)]
pub struct StopTimeRow {
    /// Foreign ID referencing `trips.trip_id`.
    pub trip_id: String,

    #[serde(default, deserialize_with = "deserialize_service_time_option")]
    pub arrival_time: Option<i64>,

    #[serde(default, deserialize_with = "deserialize_service_time_option")]
    pub departure_time: Option<i64>,

    /// Foreign ID referencing `stops.stop_id`.
    pub stop_id: String,

    /// Values must increase along the trip but need not be consecutive.
    pub stop_sequence: i64,

    #[serde(default, rename = "stop_headsign")]
    pub headsign: Option<String>,

    #[serde(default)]
    pub pickup_type: Option<i64>,

    #[serde(default)]
    pub drop_off_type: Option<i64>,

    /// Distance traveled along the shape from the first stop of the trip,
    /// in the same units used by shapes.txt.
    #[serde(default)]
    pub shape_dist_traveled: Option<f64>,

    #[serde(default)]
    pub timepoint: Option<i64>,
}
