use model::trip::Trip;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TripRow {
    pub id: String,
    pub route_id: String,
    pub service_id: String,
    pub headsign: Option<String>,
    pub short_name: Option<String>,
    pub direction_id: Option<i64>,
    pub block_id: Option<String>,
    pub shape_id: Option<String>,
    pub wheelchair_accessible: Option<i64>,
    pub bikes_allowed: Option<i64>,
}

impl From<TripRow> for Trip {
    fn from(row: TripRow) -> Self {
        Trip {
            id: row.id,
            route_id: row.route_id,
            service_id: row.service_id,
            headsign: row.headsign,
            short_name: row.short_name,
            direction_id: row.direction_id,
            block_id: row.block_id,
            shape_id: row.shape_id,
            wheelchair_accessible: row.wheelchair_accessible,
            bikes_allowed: row.bikes_allowed,
        }
    }
}
