use model::stop_time::StopTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StopTimeRow {
    pub trip_id: String,
    pub stop_id: String,
    pub stop_sequence: i64,
    pub arrival_time: i64,
    pub departure_time: i64,
    pub headsign: Option<String>,
    pub pickup_type: Option<i64>,
    pub drop_off_type: Option<i64>,
    pub shape_dist_traveled: Option<f64>,
    pub timepoint: Option<i64>,
}

impl From<StopTimeRow> for StopTime {
    fn from(row: StopTimeRow) -> Self {
        StopTime {
            trip_id: row.trip_id,
            stop_id: row.stop_id,
            stop_sequence: row.stop_sequence,
            arrival_time: row.arrival_time,
            departure_time: row.departure_time,
            headsign: row.headsign,
            pickup_type: row.pickup_type,
            drop_off_type: row.drop_off_type,
            shape_dist_traveled: row.shape_dist_traveled,
            timepoint: row.timepoint,
        }
    }
}
