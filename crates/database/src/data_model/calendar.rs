use chrono::NaiveDate;
use model::calendar::{Calendar, CalendarException, ExceptionKind};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CalendarRow {
    pub service_id: String,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<CalendarRow> for Calendar {
    fn from(row: CalendarRow) -> Self {
        Calendar {
            service_id: row.service_id,
            monday: row.monday,
            tuesday: row.tuesday,
            wednesday: row.wednesday,
            thursday: row.thursday,
            friday: row.friday,
            saturday: row.saturday,
            sunday: row.sunday,
            start_date: row.start_date,
            end_date: row.end_date,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CalendarDateRow {
    pub service_id: String,
    pub date: NaiveDate,
    pub exception_type: i64,
}

impl From<CalendarDateRow> for CalendarException {
    fn from(row: CalendarDateRow) -> Self {
        CalendarException {
            service_id: row.service_id,
            date: row.date,
            exception_kind: match row.exception_type {
                2 => ExceptionKind::Removed,
                _ => ExceptionKind::Added,
            },
        }
    }
}
