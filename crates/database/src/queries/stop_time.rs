use model::stop_time::StopTime;
use sqlx::{Executor, Sqlite};

use crate::{
    data_model::{into_models, stop_time::StopTimeRow},
    Result,
};

const STOP_TIME_COLUMNS: &str = "
    trip_id, stop_id, stop_sequence, arrival_time, departure_time,
    headsign, pickup_type, drop_off_type, shape_dist_traveled, timepoint";

pub async fn for_trip<'c, E>(executor: E, trip_id: &str) -> Result<Vec<StopTime>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows: Vec<StopTimeRow> = sqlx::query_as(&format!(
        "
        SELECT {STOP_TIME_COLUMNS}
        FROM stop_times
        WHERE trip_id = ?1
        ORDER BY stop_sequence;
        "
    ))
    .bind(trip_id)
    .fetch_all(executor)
    .await?;
    Ok(into_models(rows))
}

/// Stop times at a stop departing within `[from, to)`, as nanoseconds since
/// midnight of the service day. Callers that span the service-day boundary
/// query twice with wrapped windows.
pub async fn for_stop_in_window<'c, E>(
    executor: E,
    stop_id: &str,
    from: i64,
    to: i64,
) -> Result<Vec<StopTime>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows: Vec<StopTimeRow> = sqlx::query_as(&format!(
        "
        SELECT {STOP_TIME_COLUMNS}
        FROM stop_times
        WHERE stop_id = ?1 AND departure_time >= ?2 AND departure_time < ?3
        ORDER BY departure_time, trip_id;
        "
    ))
    .bind(stop_id)
    .bind(from)
    .bind(to)
    .fetch_all(executor)
    .await?;
    Ok(into_models(rows))
}
