use serde::Deserialize;

/// A single line of trips.txt.
/// See <https://gtfs.org/schedule/reference/#tripstxt>
#[derive(Debug, Clone, Deserialize)]
pub struct TripRow {
    #[serde(rename = "trip_id")]
    pub id: String,

    /// Foreign ID referencing `routes.route_id`.
    pub route_id: String,

    /// Foreign ID referencing `calendar.service_id` or
    /// `calendar_dates.service_id`.
    pub service_id: String,

    #[serde(default, rename = "trip_headsign")]
    pub headsign: Option<String>,

    #[serde(default, rename = "trip_short_name")]
    pub short_name: Option<String>,

    #[serde(default)]
    pub direction_id: Option<i64>,

    #[serde(default)]
    pub block_id: Option<String>,

    #[serde(default)]
    pub shape_id: Option<String>,

    #[serde(default)]
    pub wheelchair_accessible: Option<i64>,

    #[serde(default)]
    pub bikes_allowed: Option<i64>,
}
