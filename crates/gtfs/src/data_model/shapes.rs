use serde::Deserialize;

/// A single line of shapes.txt: one point of a route alignment.
/// See <https://gtfs.org/schedule/reference/#shapestxt>
#[derive(Debug, Clone, Deserialize)]
pub struct ShapeRow {
    pub shape_id: String,

    #[serde(rename = "shape_pt_lat")]
    pub point_latitude: f64,

    #[serde(rename = "shape_pt_lon")]
    pub point_longitude: f64,

    /// Sequence in which the points connect to form the shape. Values must
    /// increase along the shape but need not be consecutive; conversion
    /// renumbers each shape densely from zero.
    #[serde(rename = "shape_pt_sequence")]
    pub point_sequence: i64,

    #[serde(default, rename = "shape_dist_traveled")]
    pub distance_traveled: Option<f64>,
}
