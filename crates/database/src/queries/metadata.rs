use model::import::ImportMetadata;
use sqlx::{Executor, Sqlite};

use crate::{data_model::metadata::ImportMetadataRow, Result};

pub async fn get<'c, E>(executor: E) -> Result<Option<ImportMetadata>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let row: Option<ImportMetadataRow> = sqlx::query_as(
        "
        SELECT file_hash, import_time, file_source
        FROM import_metadata
        WHERE id = 1;
        ",
    )
    .fetch_optional(executor)
    .await?;
    Ok(row.map(ImportMetadata::from))
}

pub(crate) async fn put<'c, E>(executor: E, metadata: &ImportMetadata) -> Result<()>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query(
        "
        INSERT INTO import_metadata (id, file_hash, import_time, file_source)
        VALUES (1, ?1, ?2, ?3)
        ON CONFLICT (id)
        DO UPDATE SET
            file_hash = excluded.file_hash,
            import_time = excluded.import_time,
            file_source = excluded.file_source;
        ",
    )
    .bind(&metadata.file_hash)
    .bind(metadata.import_time)
    .bind(&metadata.file_source)
    .execute(executor)
    .await?;
    Ok(())
}
