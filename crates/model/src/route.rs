use serde::{Deserialize, Serialize};

use crate::IdString;

/// A group of trips displayed to riders as a single service.
///
/// See <https://gtfs.org/schedule/reference/#routestxt>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: IdString,

    /// Foreign ID referencing `agency.id`.
    pub agency_id: IdString,

    /// Short name of a route, often a number like `32` or `Green`.
    pub short_name: Option<String>,

    /// Full name of a route, generally more descriptive than the short name.
    pub long_name: Option<String>,

    /// Description of a route that provides useful, quality information.
    pub description: Option<String>,

    /// Vehicle type used on this route (bus, rail, ferry, ...), encoded as
    /// defined by the schedule reference.
    pub route_type: i64,

    /// URL of a web page about the particular route.
    pub url: Option<String>,

    /// Route color designation that matches public-facing material, as a
    /// six-digit hexadecimal number without the leading `#`.
    pub color: Option<String>,

    /// Legible color for text drawn against `color`.
    pub text_color: Option<String>,

    pub continuous_pickup: Option<i64>,
    pub continuous_drop_off: Option<i64>,
}

impl Route {
    /// Rider-facing display name: the long name when present, otherwise the
    /// short name, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.long_name
            .as_deref()
            .or(self.short_name.as_deref())
            .unwrap_or(&self.id)
    }
}
