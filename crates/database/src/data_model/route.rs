use model::route::Route;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RouteRow {
    pub id: String,
    pub agency_id: String,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub description: Option<String>,
    pub route_type: i64,
    pub url: Option<String>,
    pub color: Option<String>,
    pub text_color: Option<String>,
    pub continuous_pickup: Option<i64>,
    pub continuous_drop_off: Option<i64>,
}

impl From<RouteRow> for Route {
    fn from(row: RouteRow) -> Self {
        Route {
            id: row.id,
            agency_id: row.agency_id,
            short_name: row.short_name,
            long_name: row.long_name,
            description: row.description,
            route_type: row.route_type,
            url: row.url,
            color: row.color,
            text_color: row.text_color,
            continuous_pickup: row.continuous_pickup,
            continuous_drop_off: row.continuous_drop_off,
        }
    }
}
