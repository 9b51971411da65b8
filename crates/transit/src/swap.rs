//! Hot-swap of the live store and its derived indices (C3).
//!
//! A refresh stages the new bundle into a sibling temp store, builds every
//! derived product against it, and only then takes the static write lock
//! for the brief rename-and-pointer-swap. Readers observe either the old
//! or the new snapshot. File-backed stores swap by `rename(2)`; ephemeral
//! stores swap the pool pointer, there being no file to rename.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use chrono::Utc;
use database::{queries, SqliteStore, StoreLocation};
use itertools::Itertools;
use model::region::RegionBounds;
use tokio_util::sync::CancellationToken;

use crate::{
    direction::{DirectionCalculator, DirectionContext},
    error::{CoreError, Result},
    loader::{self, PreparedLoad},
    manager::{StaticState, TransitManager},
};

/// Chunk size for the bulk context queries, kept far below SQLite's bind
/// parameter ceiling.
const BULK_QUERY_CHUNK: usize = 900;

/// Refreshes the static data. Serialized by the manager's update mutex so
/// only one swap is ever in flight.
pub(crate) async fn perform_update(
    manager: &TransitManager,
    cancel: &CancellationToken,
) -> Result<()> {
    let _serialized = manager.update_lock.lock().await;

    let live_store = manager.static_state.read().await.store.clone();
    let prepared = match loader::acquire_and_parse(
        &manager.config,
        live_store.as_ref(),
        cancel,
    )
    .await?
    {
        Some(prepared) => prepared,
        None => return Ok(()),
    };
    ensure_not_cancelled(cancel)?;

    match manager.config.resolved_store_location() {
        StoreLocation::Memory => swap_ephemeral(manager, prepared, cancel).await,
        StoreLocation::File(path) => {
            swap_file(manager, path, prepared, cancel).await
        }
    }
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(CoreError::Cancelled)
    } else {
        Ok(())
    }
}

/// `<dir>/<stem>.temp.db` next to the final store file.
pub(crate) fn temp_store_path(final_path: &Path) -> PathBuf {
    let stem = final_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "store".to_owned());
    final_path.with_file_name(format!("{}.temp.db", stem))
}

async fn swap_ephemeral(
    manager: &TransitManager,
    prepared: PreparedLoad,
    cancel: &CancellationToken,
) -> Result<()> {
    let staged = SqliteStore::open(StoreLocation::Memory).await?;
    let staged_result = async {
        loader::import_prepared(&staged, &prepared, &manager.config.gtfs_url, cancel)
            .await?;
        ensure_not_cancelled(cancel)?;
        build_static_state(staged.clone()).await
    }
    .await;

    let new_state = match staged_result {
        Ok(state) => state,
        Err(why) => {
            staged.close().await;
            return Err(why);
        }
    };

    let mut state = manager.static_state.write().await;
    let old_state = std::mem::replace(&mut *state, new_state);
    drop(state);
    if let Some(old_store) = old_state.store {
        old_store.close().await;
    }
    manager.mark_healthy();
    Ok(())
}

async fn swap_file(
    manager: &TransitManager,
    final_path: PathBuf,
    prepared: PreparedLoad,
    cancel: &CancellationToken,
) -> Result<()> {
    let temp_path = temp_store_path(&final_path);
    remove_store_files(&temp_path).await;

    // Stage: import into the temp store and build every derived index
    // against it, all outside any reader-visible lock.
    let staged = SqliteStore::open(StoreLocation::File(temp_path.clone())).await?;
    let staged_result = async {
        ensure_not_cancelled(cancel)?;
        loader::import_prepared(&staged, &prepared, &manager.config.gtfs_url, cancel)
            .await?;
        ensure_not_cancelled(cancel)?;
        build_static_state(staged.clone()).await
    }
    .await;

    let mut new_state = match staged_result {
        Ok(state) => state,
        Err(why) => {
            staged.close().await;
            remove_store_files(&temp_path).await;
            return Err(why);
        }
    };
    // Release the temp store's file handles before the rename.
    staged.close().await;
    new_state.store = None;

    // Critical section: close the old store, rename, reopen, repoint.
    let mut state = manager.static_state.write().await;
    let mut old_state = std::mem::replace(&mut *state, StaticState::empty());
    if let Some(old_store) = old_state.store.take() {
        old_store.close().await;
    }

    match std::fs::rename(&temp_path, &final_path) {
        Ok(()) => {
            match SqliteStore::open(StoreLocation::File(final_path.clone())).await
            {
                Ok(reopened) => {
                    new_state.store = Some(reopened);
                    new_state.last_updated = Some(Utc::now());
                    *state = new_state;
                    drop(state);
                    manager.mark_healthy();
                    Ok(())
                }
                Err(why) => {
                    // The rename went through but the store is unusable;
                    // leave the pointer empty so handlers fail fast.
                    drop(state);
                    manager.mark_unhealthy();
                    Err(CoreError::Fatal(format!(
                        "store reopen after swap failed: {}",
                        why
                    )))
                }
            }
        }
        Err(rename_error) => {
            log::error!("store swap rename failed: {}", rename_error);
            remove_store_files(&temp_path).await;
            // Keep serving the previous data if the old file still opens.
            match SqliteStore::open(StoreLocation::File(final_path.clone())).await
            {
                Ok(reopened) => {
                    old_state.store = Some(reopened);
                    *state = old_state;
                    drop(state);
                    Err(CoreError::transient(rename_error))
                }
                Err(reopen_error) => {
                    drop(state);
                    manager.mark_unhealthy();
                    Err(CoreError::Fatal(format!(
                        "swap rename failed ({}) and the old store would not \
                         reopen ({})",
                        rename_error, reopen_error
                    )))
                }
            }
        }
    }
}

/// Best-effort removal of a store file and its WAL sidecars.
async fn remove_store_files(path: &Path) {
    for candidate in [
        path.to_path_buf(),
        PathBuf::from(format!("{}-wal", path.display())),
        PathBuf::from(format!("{}-shm", path.display())),
    ] {
        match tokio::fs::remove_file(&candidate).await {
            Ok(()) => {}
            Err(why) if why.kind() == std::io::ErrorKind::NotFound => {}
            Err(why) => {
                log::warn!("could not remove {}: {}", candidate.display(), why)
            }
        }
    }
}

/// Builds the full derived snapshot from a populated store: lookup maps,
/// layover index, region bounds, and the stop direction cache. The spatial
/// index needs no separate build; it is the store's own R*Tree.
pub(crate) async fn build_static_state(store: SqliteStore) -> Result<StaticState> {
    let pool = store.pool();

    let agencies = queries::agency::get_all(pool).await?;
    let routes = queries::route::get_all(pool).await?;
    let stops = queries::stop::get_all(pool).await?;

    let mut agencies_by_id = HashMap::with_capacity(agencies.len());
    for agency in agencies {
        agencies_by_id.insert(agency.id.clone(), agency);
    }
    let mut routes_by_id = HashMap::with_capacity(routes.len());
    let mut routes_by_agency_id: HashMap<String, Vec<String>> = HashMap::new();
    for route in routes {
        routes_by_agency_id
            .entry(route.agency_id.clone())
            .or_default()
            .push(route.id.clone());
        routes_by_id.insert(route.id.clone(), route);
    }

    // Layover index: every block-trip entry grouped under its
    // (service, first stop) key.
    let indices = queries::block::indices(pool).await?;
    let entries = queries::block::entries(pool).await?;
    let key_by_index: HashMap<i64, (String, String)> = indices
        .into_iter()
        .map(|index| (index.id, (index.service_id, index.first_stop_id)))
        .collect();
    let mut layover_index: HashMap<
        (String, String),
        Vec<model::block::BlockTripEntry>,
    > = HashMap::new();
    for entry in entries {
        if let Some(key) = key_by_index.get(&entry.index_id) {
            layover_index.entry(key.clone()).or_default().push(entry);
        }
    }

    let region_bounds = match queries::shape::coordinate_bounds(pool).await? {
        Some(extremes) => extremes,
        None => queries::stop::coordinate_bounds(pool)
            .await?
            .unwrap_or((0.0, 0.0, 0.0, 0.0)),
    };
    let region_bounds = RegionBounds::from_extremes(
        region_bounds.0,
        region_bounds.1,
        region_bounds.2,
        region_bounds.3,
    );

    // Direction cache, fed by the bulk pre-load context.
    let stop_ids: Vec<String> = stops.iter().map(|stop| stop.id.clone()).collect();
    let mut context = DirectionContext::default();
    for chunk in stop_ids.chunks(BULK_QUERY_CHUNK) {
        for row in queries::stop::shape_context_by_ids(pool, chunk).await? {
            context
                .stop_shapes
                .entry(row.stop_id)
                .or_default()
                .push((row.shape_id, row.shape_dist_traveled));
        }
    }
    let shape_ids: Vec<String> = context
        .stop_shapes
        .values()
        .flat_map(|visits| visits.iter().map(|(shape_id, _)| shape_id.clone()))
        .sorted()
        .dedup()
        .collect();
    for chunk in shape_ids.chunks(BULK_QUERY_CHUNK) {
        for point in queries::shape::points_by_shape_ids(pool, chunk).await? {
            context
                .shape_points
                .entry(point.shape_id.clone())
                .or_default()
                .push(point);
        }
    }

    let mut calculator = DirectionCalculator::new();
    calculator.preload(context)?;
    let directions = calculator.compute_all(&stops);

    Ok(StaticState {
        store: Some(store),
        agencies_by_id,
        routes_by_id,
        routes_by_agency_id,
        layover_index,
        region_bounds,
        directions,
        last_updated: Some(Utc::now()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_sits_next_to_the_final_store() {
        assert_eq!(
            temp_store_path(Path::new("/var/lib/transit/gtfs.db")),
            Path::new("/var/lib/transit/gtfs.temp.db")
        );
        assert_eq!(
            temp_store_path(Path::new("store")),
            Path::new("store.temp.db")
        );
    }
}
