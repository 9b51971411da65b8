use model::stop::Stop;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StopRow {
    pub id: String,
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub zone_id: Option<String>,
    pub url: Option<String>,
    pub location_type: Option<i64>,
    pub timezone: Option<String>,
    pub wheelchair_boarding: Option<i64>,
    pub platform_code: Option<String>,
    pub direction: Option<String>,
}

impl From<StopRow> for Stop {
    fn from(row: StopRow) -> Self {
        Stop {
            id: row.id,
            code: row.code,
            name: row.name,
            description: row.description,
            latitude: row.latitude,
            longitude: row.longitude,
            zone_id: row.zone_id,
            url: row.url,
            location_type: row.location_type,
            timezone: row.timezone,
            wheelchair_boarding: row.wheelchair_boarding,
            platform_code: row.platform_code,
            direction: row.direction,
        }
    }
}

/// Bulk result joining a stop to the shapes of the trips serving it;
/// feeds the direction calculator's preload cache.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StopShapeContextRow {
    pub stop_id: String,
    pub shape_id: String,
    pub shape_dist_traveled: Option<f64>,
}
