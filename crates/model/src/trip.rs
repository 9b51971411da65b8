use serde::{Deserialize, Serialize};

use crate::IdString;

/// A journey of a single vehicle through a sequence of stops.
///
/// See <https://gtfs.org/schedule/reference/#tripstxt>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: IdString,

    /// Foreign ID referencing `routes.id`.
    pub route_id: IdString,

    /// Foreign ID referencing `calendar.service_id`.
    pub service_id: IdString,

    /// Text that appears on signage identifying the trip's destination.
    pub headsign: Option<String>,

    /// Public-facing text used to identify the trip to riders.
    pub short_name: Option<String>,

    /// Direction of travel for bi-directional routes (0 or 1).
    pub direction_id: Option<i64>,

    /// Identifies the block the trip belongs to. A block is a group of
    /// sequential trips operated by the same vehicle.
    pub block_id: Option<IdString>,

    /// Foreign ID referencing `shapes.shape_id`.
    pub shape_id: Option<IdString>,

    pub wheelchair_accessible: Option<i64>,
    pub bikes_allowed: Option<i64>,
}
