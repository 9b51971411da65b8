use model::block::{BlockTripEntry, BlockTripIndex};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlockTripIndexRow {
    pub id: i64,
    pub service_id: String,
    pub first_stop_id: String,
}

impl From<BlockTripIndexRow> for BlockTripIndex {
    fn from(row: BlockTripIndexRow) -> Self {
        BlockTripIndex {
            id: row.id,
            service_id: row.service_id,
            first_stop_id: row.first_stop_id,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlockTripEntryRow {
    pub index_id: i64,
    pub trip_id: String,
    pub block_id: Option<String>,
    pub service_id: String,
    pub sequence: i64,
}

impl From<BlockTripEntryRow> for BlockTripEntry {
    fn from(row: BlockTripEntryRow) -> Self {
        BlockTripEntry {
            index_id: row.index_id,
            trip_id: row.trip_id,
            block_id: row.block_id,
            service_id: row.service_id,
            sequence: row.sequence,
        }
    }
}
