use model::agency::Agency;
use sqlx::{Executor, Sqlite};

use crate::{
    data_model::{agency::AgencyRow, into_models},
    Result,
};

pub async fn get<'c, E>(executor: E, id: &str) -> Result<Option<Agency>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let row: Option<AgencyRow> = sqlx::query_as(
        "
        SELECT
            id, name, url, timezone, language, phone, fare_url, email
        FROM
            agencies
        WHERE id = ?1;
        ",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(row.map(Agency::from))
}

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<Agency>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows: Vec<AgencyRow> = sqlx::query_as(
        "
        SELECT
            id, name, url, timezone, language, phone, fare_url, email
        FROM
            agencies
        ORDER BY id;
        ",
    )
    .fetch_all(executor)
    .await?;
    Ok(into_models(rows))
}
