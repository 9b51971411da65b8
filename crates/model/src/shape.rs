use serde::{Deserialize, Serialize};

use crate::{IdString, Latitude, Longitude};

/// One point of a route alignment polyline.
///
/// Points of a shape are ordered by `sequence`; sequences per shape form a
/// strictly increasing integer series.
///
/// See <https://gtfs.org/schedule/reference/#shapestxt>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapePoint {
    pub shape_id: IdString,
    pub sequence: i64,
    pub latitude: Latitude,
    pub longitude: Longitude,

    /// Distance traveled along the shape from the first point.
    pub dist_traveled: Option<f64>,
}
