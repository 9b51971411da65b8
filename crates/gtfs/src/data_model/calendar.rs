use chrono::NaiveDate;
use serde::Deserialize;
use serde_repr::Deserialize_repr;

use crate::serde::deserialize_yyyymmdd;

/// Indicates whether the service operates on a weekday.
/// See <https://gtfs.org/schedule/reference/#calendartxt>
#[derive(Deserialize_repr, PartialEq, Debug, Clone, Copy)]
#[repr(u8)]
pub enum ServiceAvailability {
    Unavailable = 0,
    Available = 1,
}

impl ServiceAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Service dates specified using a weekly schedule with start and end dates.
/// See <https://gtfs.org/schedule/reference/#calendartxt>
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarRow {
    pub service_id: String,
    pub monday: ServiceAvailability,
    pub tuesday: ServiceAvailability,
    pub wednesday: ServiceAvailability,
    pub thursday: ServiceAvailability,
    pub friday: ServiceAvailability,
    pub saturday: ServiceAvailability,
    pub sunday: ServiceAvailability,

    #[serde(deserialize_with = "deserialize_yyyymmdd")]
    pub start_date: NaiveDate,

    /// End service day of the interval, included in the interval.
    #[serde(deserialize_with = "deserialize_yyyymmdd")]
    pub end_date: NaiveDate,
}
