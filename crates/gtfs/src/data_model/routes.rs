use serde::Deserialize;

/// A single line of routes.txt.
/// See <https://gtfs.org/schedule/reference/#routestxt>
#[derive(Debug, Clone, Deserialize)]
pub struct RouteRow {
    #[serde(rename = "route_id")]
    pub id: String,

    /// Foreign ID referencing `agency.agency_id`. May be omitted in
    /// single-agency bundles.
    #[serde(default)]
    pub agency_id: Option<String>,

    #[serde(default, rename = "route_short_name")]
    pub short_name: Option<String>,

    #[serde(default, rename = "route_long_name")]
    pub long_name: Option<String>,

    #[serde(default, rename = "route_desc")]
    pub description: Option<String>,

    /// Vehicle type. Required by the reference; rows with a missing value
    /// are surfaced as warnings and default to bus.
    #[serde(default)]
    pub route_type: Option<i64>,

    #[serde(default, rename = "route_url")]
    pub url: Option<String>,

    #[serde(default, rename = "route_color")]
    pub color: Option<String>,

    #[serde(default, rename = "route_text_color")]
    pub text_color: Option<String>,

    #[serde(default)]
    pub continuous_pickup: Option<i64>,

    #[serde(default)]
    pub continuous_drop_off: Option<i64>,
}
