use chrono::{Datelike, NaiveDate, Weekday};
use model::calendar::{Calendar, CalendarException};
use sqlx::{Executor, Sqlite};

use crate::{
    data_model::{
        calendar::{CalendarDateRow, CalendarRow},
        into_models,
    },
    Result,
};

fn weekday_column(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

pub async fn get<'c, E>(executor: E, service_id: &str) -> Result<Option<Calendar>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let row: Option<CalendarRow> = sqlx::query_as(
        "
        SELECT
            service_id, monday, tuesday, wednesday, thursday, friday,
            saturday, sunday, start_date, end_date
        FROM
            calendar
        WHERE service_id = ?1;
        ",
    )
    .bind(service_id)
    .fetch_optional(executor)
    .await?;
    Ok(row.map(Calendar::from))
}

pub async fn exceptions_for_service<'c, E>(
    executor: E,
    service_id: &str,
) -> Result<Vec<CalendarException>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows: Vec<CalendarDateRow> = sqlx::query_as(
        "
        SELECT service_id, date, exception_type
        FROM calendar_dates
        WHERE service_id = ?1
        ORDER BY date;
        ",
    )
    .bind(service_id)
    .fetch_all(executor)
    .await?;
    Ok(into_models(rows))
}

/// Service ids running on `date`: the weekly mask filtered by removed-on-date
/// exceptions, plus added-on-date exceptions. The weekday column name is one
/// of seven static strings, never caller input.
pub async fn active_service_ids_for_date<'c, E>(
    executor: E,
    date: NaiveDate,
) -> Result<Vec<String>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let sql = format!(
        "
        SELECT service_id FROM calendar
        WHERE {} = 1 AND start_date <= ?1 AND end_date >= ?1
            AND service_id NOT IN (
                SELECT service_id FROM calendar_dates
                WHERE date = ?1 AND exception_type = 2
            )
        UNION
        SELECT service_id FROM calendar_dates
        WHERE date = ?1 AND exception_type = 1
        ORDER BY service_id;
        ",
        weekday_column(date)
    );
    let ids = sqlx::query_scalar(&sql)
        .bind(date)
        .fetch_all(executor)
        .await?;
    Ok(ids)
}

/// Whether one service runs on `date`, honoring single-date exceptions over
/// the weekly mask. Unknown service ids are reported as inactive.
pub async fn is_service_active_on<'c, E>(
    executor: E,
    service_id: &str,
    date: NaiveDate,
) -> Result<bool>
where
    E: Executor<'c, Database = Sqlite>,
{
    let row: Option<(bool, Option<i64>)> = sqlx::query_as(&format!(
        "
        SELECT
            c.{} = 1 AND c.start_date <= ?2 AND c.end_date >= ?2,
            (SELECT exception_type FROM calendar_dates
                WHERE service_id = ?1 AND date = ?2)
        FROM calendar c
        WHERE c.service_id = ?1;
        ",
        weekday_column(date)
    ))
    .bind(service_id)
    .bind(date)
    .fetch_optional(executor)
    .await?;

    Ok(match row {
        Some((_, Some(2))) => false,
        Some((_, Some(1))) => true,
        Some((weekly, _)) => weekly,
        None => false,
    })
}
