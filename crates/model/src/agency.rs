use serde::{Deserialize, Serialize};

use crate::IdString;

/// A transit agency operating one or more routes.
///
/// See <https://gtfs.org/schedule/reference/#agencytxt>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agency {
    pub id: IdString,

    /// Full name of the transit agency.
    pub name: String,

    /// URL of the transit agency.
    pub url: String,

    /// Timezone where the transit agency is located, e.g. `America/Los_Angeles`.
    pub timezone: String,

    /// Primary language used by this transit agency.
    pub language: Option<String>,

    /// A voice telephone number for the agency.
    pub phone: Option<String>,

    /// URL of a web page where a rider can purchase tickets or other fare
    /// instruments from the agency online.
    pub fare_url: Option<String>,

    /// Email address actively monitored by the agency's customer service
    /// department.
    pub email: Option<String>,
}
