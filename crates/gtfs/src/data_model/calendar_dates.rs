use chrono::NaiveDate;
use serde::Deserialize;
use serde_repr::Deserialize_repr;

use crate::serde::deserialize_yyyymmdd;

/// See <https://gtfs.org/schedule/reference/#calendar_datestxt>
#[derive(Deserialize_repr, PartialEq, Debug, Clone, Copy)]
#[repr(u8)]
pub enum ExceptionType {
    /// Service has been added for the specified date.
    Added = 1,
    /// Service has been removed for the specified date.
    Removed = 2,
}

/// An exception for a service on a single date.
/// See <https://gtfs.org/schedule/reference/#calendar_datestxt>
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarDateRow {
    pub service_id: String,

    #[serde(deserialize_with = "deserialize_yyyymmdd")]
    pub date: NaiveDate,

    pub exception_type: ExceptionType,
}
