use serde::Deserialize;

/// A single line of stops.txt.
///
/// Coordinates are conditionally required by the reference; rows arriving
/// without them cannot be served (no spatial index entry, no direction
/// derivation) and are dropped with a warning during conversion.
///
/// See <https://gtfs.org/schedule/reference/#stopstxt>
#[derive(Debug, Clone, Deserialize)]
pub struct StopRow {
    #[serde(rename = "stop_id")]
    pub id: String,

    /// Short text or number identifying the location for riders, as used in
    /// phone-based information systems or printed on signage.
    #[serde(default, rename = "stop_code")]
    pub code: Option<String>,

    #[serde(default, rename = "stop_name")]
    pub name: Option<String>,

    #[serde(default, rename = "stop_desc")]
    pub description: Option<String>,

    #[serde(default, rename = "stop_lat")]
    pub latitude: Option<f64>,

    #[serde(default, rename = "stop_lon")]
    pub longitude: Option<f64>,

    #[serde(default)]
    pub zone_id: Option<String>,

    #[serde(default, rename = "stop_url")]
    pub url: Option<String>,

    #[serde(default)]
    pub location_type: Option<i64>,

    #[serde(default, rename = "stop_timezone")]
    pub timezone: Option<String>,

    #[serde(default)]
    pub wheelchair_boarding: Option<i64>,

    #[serde(default)]
    pub platform_code: Option<String>,

    /// Non-standard column some producers emit: the authored compass
    /// direction the stop faces, either as text ("north", "NE") or as
    /// geographic degrees. Takes precedence over shape-derived directions.
    #[serde(default, rename = "stop_direction")]
    pub direction: Option<String>,
}
