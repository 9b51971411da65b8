use serde::{Deserialize, Serialize};

use crate::IdString;

/// Groups trips that depart from the same layover on the same service:
/// all trips sharing `(service_id, first_stop_id)` land in one index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTripIndex {
    pub id: i64,
    pub service_id: IdString,
    pub first_stop_id: IdString,
}

/// One trip's membership in a [`BlockTripIndex`], ordered deterministically
/// by `(block_id, trip_id)` within the group; `sequence` is the trip's rank
/// under that ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTripEntry {
    pub index_id: i64,
    pub trip_id: IdString,
    pub block_id: Option<IdString>,
    pub service_id: IdString,
    pub sequence: i64,
}
