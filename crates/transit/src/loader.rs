//! Static bundle acquisition and import orchestration (C2): fetch or read
//! the bundle, optionally tidy it, hash it, short-circuit unchanged
//! reloads before parsing, and drive the store importer.

use database::{
    import::{self, ImportReport, ImportRequest, DEFAULT_BATCH_SIZE},
    SqliteStore,
};
use gtfs::{bundle, content_hash, fetch, tidy};
use model::dataset::StaticDataset;
use tokio_util::sync::CancellationToken;

use crate::{config::Config, error::Result};

/// A bundle that has been acquired, hashed and parsed, ready to import
/// into any store.
pub struct PreparedLoad {
    pub dataset: StaticDataset,
    pub file_hash: String,
    pub warnings: Vec<String>,
}

/// Acquires the configured bundle and parses it. Returns `None` when
/// `live_store` already holds exactly these bytes from this source, in
/// which case parsing is skipped entirely.
pub async fn acquire_and_parse(
    config: &Config,
    live_store: Option<&SqliteStore>,
    cancel: &CancellationToken,
) -> Result<Option<PreparedLoad>> {
    let bytes = fetch::acquire_static_bundle(
        &config.gtfs_url,
        &config.static_headers(),
        cancel,
    )
    .await?;
    let bytes = if config.enable_gtfs_tidy {
        tidy::tidy_bundle(bytes).await
    } else {
        bytes
    };

    let file_hash = content_hash(&bytes);
    if let Some(store) = live_store {
        if import::is_noop_reimport(store, &file_hash, &config.gtfs_url).await? {
            log::info!(
                "bundle from {} unchanged ({}), skipping reload",
                config.gtfs_url,
                file_hash
            );
            return Ok(None);
        }
    }

    let parsed = bundle::parse_bundle(&bytes)?;
    for warning in &parsed.warnings {
        log::warn!("bundle warning: {}", warning);
    }

    Ok(Some(PreparedLoad {
        dataset: parsed.dataset,
        file_hash,
        warnings: parsed.warnings,
    }))
}

/// Imports a prepared load into `store` inside one transaction.
pub async fn import_prepared(
    store: &SqliteStore,
    prepared: &PreparedLoad,
    source: &str,
    cancel: &CancellationToken,
) -> Result<ImportReport> {
    let report = import::import_dataset(
        store,
        ImportRequest {
            dataset: &prepared.dataset,
            file_hash: &prepared.file_hash,
            file_source: source,
            batch_size: DEFAULT_BATCH_SIZE,
        },
        cancel,
    )
    .await?;
    report.log();
    Ok(report)
}
