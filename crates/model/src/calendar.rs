use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::IdString;

/// Service dates specified as a weekly schedule with a start and end date.
///
/// See <https://gtfs.org/schedule/reference/#calendartxt>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    pub service_id: IdString,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
    pub start_date: NaiveDate,
    /// Inclusive end of the service interval.
    pub end_date: NaiveDate,
}

impl Calendar {
    /// Whether the weekly schedule covers `date`, ignoring exceptions.
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        if date < self.start_date || date > self.end_date {
            return false;
        }
        match date.weekday() {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

/// Whether an exception adds or removes service for a date.
#[derive(Serialize_repr, Deserialize_repr, PartialEq, Eq, Debug, Clone, Copy)]
#[repr(u8)]
pub enum ExceptionKind {
    Added = 1,
    Removed = 2,
}

/// A single-date exception to a weekly [`Calendar`].
///
/// See <https://gtfs.org/schedule/reference/#calendar_datestxt>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarException {
    pub service_id: IdString,
    pub date: NaiveDate,
    pub exception_kind: ExceptionKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weekday_calendar() -> Calendar {
        Calendar {
            service_id: "WK".to_owned(),
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: false,
            sunday: false,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        }
    }

    #[test]
    fn runs_on_respects_weekday_mask() {
        let calendar = weekday_calendar();
        // 2024-06-03 is a Monday, 2024-06-08 a Saturday.
        assert!(calendar.runs_on(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()));
        assert!(!calendar.runs_on(NaiveDate::from_ymd_opt(2024, 6, 8).unwrap()));
    }

    #[test]
    fn runs_on_respects_date_range() {
        let calendar = weekday_calendar();
        assert!(!calendar.runs_on(NaiveDate::from_ymd_opt(2023, 12, 29).unwrap()));
        assert!(!calendar.runs_on(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()));
        // End date is inclusive (a Tuesday).
        assert!(calendar.runs_on(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
    }
}
