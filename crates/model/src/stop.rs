use serde::{Deserialize, Serialize};

use crate::{IdString, Latitude, Longitude};

/// A location where vehicles pick up or drop off riders.
///
/// Stops without coordinates are dropped at ingest; `latitude` and `longitude`
/// are therefore always present on a stored stop.
///
/// See <https://gtfs.org/schedule/reference/#stopstxt>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: IdString,

    /// Short text or number that identifies the location for riders, often
    /// printed on signage.
    pub code: Option<String>,

    /// Name of the location as printed on timetables.
    pub name: Option<String>,

    /// Description of the location that provides useful, quality information.
    pub description: Option<String>,

    pub latitude: Latitude,
    pub longitude: Longitude,

    /// Fare zone the stop belongs to.
    pub zone_id: Option<IdString>,

    /// URL of a web page about the location.
    pub url: Option<String>,

    /// Location type (stop/platform, station, entrance, ...).
    pub location_type: Option<i64>,

    /// Timezone of the location when it differs from the agency timezone.
    pub timezone: Option<String>,

    /// Whether wheelchair boardings are possible from the location.
    pub wheelchair_boarding: Option<i64>,

    /// Platform identifier for a platform stop, without words like "platform"
    /// or "track".
    pub platform_code: Option<String>,

    /// Authored compass direction the stop faces, either as free text
    /// ("north", "NE") or as numeric geographic degrees. When absent, the
    /// direction is derived from route shape geometry.
    pub direction: Option<String>,
}
