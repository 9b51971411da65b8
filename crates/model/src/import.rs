use serde::{Deserialize, Serialize};

/// Bookkeeping for the most recent static import. Exactly one row exists in
/// a populated store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportMetadata {
    /// SHA-256 of the bundle bytes, lowercase hex.
    pub file_hash: String,

    /// Epoch seconds of the import that wrote this row.
    pub import_time: i64,

    /// URL or local path the bundle was acquired from.
    pub file_source: String,
}
