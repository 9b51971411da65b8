use model::agency::Agency;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AgencyRow {
    pub id: String,
    pub name: String,
    pub url: String,
    pub timezone: String,
    pub language: Option<String>,
    pub phone: Option<String>,
    pub fare_url: Option<String>,
    pub email: Option<String>,
}

impl From<AgencyRow> for Agency {
    fn from(row: AgencyRow) -> Self {
        Agency {
            id: row.id,
            name: row.name,
            url: row.url,
            timezone: row.timezone,
            language: row.language,
            phone: row.phone,
            fare_url: row.fare_url,
            email: row.email,
        }
    }
}
