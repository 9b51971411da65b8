use model::trip::Trip;
use sqlx::{Executor, Sqlite};

use crate::{
    data_model::{into_models, trip::TripRow},
    Result,
};

const TRIP_COLUMNS: &str = "
    id, route_id, service_id, headsign, short_name, direction_id,
    block_id, shape_id, wheelchair_accessible, bikes_allowed";

pub async fn get<'c, E>(executor: E, id: &str) -> Result<Option<Trip>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let row: Option<TripRow> = sqlx::query_as(&format!(
        "SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?1;"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(row.map(Trip::from))
}

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<Trip>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows: Vec<TripRow> = sqlx::query_as(&format!(
        "SELECT {TRIP_COLUMNS} FROM trips ORDER BY id;"
    ))
    .fetch_all(executor)
    .await?;
    Ok(into_models(rows))
}
