use model::shape::ShapePoint;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShapePointRow {
    pub shape_id: String,
    pub sequence: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub dist_traveled: Option<f64>,
}

impl From<ShapePointRow> for ShapePoint {
    fn from(row: ShapePointRow) -> Self {
        ShapePoint {
            shape_id: row.shape_id,
            sequence: row.sequence,
            latitude: row.latitude,
            longitude: row.longitude,
            dist_traveled: row.dist_traveled,
        }
    }
}
