use model::import::ImportMetadata;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImportMetadataRow {
    pub file_hash: String,
    pub import_time: i64,
    pub file_source: String,
}

impl From<ImportMetadataRow> for ImportMetadata {
    fn from(row: ImportMetadataRow) -> Self {
        ImportMetadata {
            file_hash: row.file_hash,
            import_time: row.import_time,
            file_source: row.file_source,
        }
    }
}
