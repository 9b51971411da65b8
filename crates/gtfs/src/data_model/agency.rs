use serde::Deserialize;

/// One transit agency providing the data of this bundle.
/// See <https://gtfs.org/schedule/reference/#agencytxt>
#[derive(Debug, Clone, Deserialize)]
pub struct AgencyRow {
    /// Optional for bundles describing a single agency.
    #[serde(default, rename = "agency_id")]
    pub id: Option<String>,

    #[serde(rename = "agency_name")]
    pub name: String,

    #[serde(rename = "agency_url")]
    pub url: String,

    #[serde(rename = "agency_timezone")]
    pub timezone: String,

    #[serde(default, rename = "agency_lang")]
    pub language: Option<String>,

    #[serde(default, rename = "agency_phone")]
    pub phone: Option<String>,

    #[serde(default, rename = "agency_fare_url")]
    pub fare_url: Option<String>,

    #[serde(default, rename = "agency_email")]
    pub email: Option<String>,
}
