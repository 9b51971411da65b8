use model::block::{BlockTripEntry, BlockTripIndex};
use sqlx::{Executor, Sqlite};

use crate::{
    data_model::{
        block::{BlockTripEntryRow, BlockTripIndexRow},
        into_models,
    },
    Result,
};

pub async fn indices<'c, E>(executor: E) -> Result<Vec<BlockTripIndex>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows: Vec<BlockTripIndexRow> = sqlx::query_as(
        "
        SELECT id, service_id, first_stop_id
        FROM block_trip_index
        ORDER BY id;
        ",
    )
    .fetch_all(executor)
    .await?;
    Ok(into_models(rows))
}

pub async fn entries<'c, E>(executor: E) -> Result<Vec<BlockTripEntry>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows: Vec<BlockTripEntryRow> = sqlx::query_as(
        "
        SELECT index_id, trip_id, block_id, service_id, sequence
        FROM block_trip_entry
        ORDER BY index_id, sequence;
        ",
    )
    .fetch_all(executor)
    .await?;
    Ok(into_models(rows))
}
