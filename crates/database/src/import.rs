//! Clear-and-reimport of a parsed static dataset.
//!
//! The whole import runs inside a single transaction: tables are cleared in
//! FK-safe reverse order, then repopulated in forward order. The two largest
//! tables (stop_times and shapes) go through a batched multi-row INSERT
//! pipeline whose statement preparation runs on a CPU-sized worker pool
//! while execution stays strictly sequential on the single writer.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use model::{dataset::StaticDataset, import::ImportMetadata};
use serde::Serialize;
use sqlx::{Sqlite, Transaction};
use tokio::task;
use tokio_util::sync::CancellationToken;

use crate::{queries, Result, SqliteStore, StoreError};

/// Rows per multi-row INSERT statement. At the widest table (stop_times,
/// 10 columns) this stays well below SQLite's bind-parameter ceiling.
pub const DEFAULT_BATCH_SIZE: usize = 3000;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub skipped_reimport: bool,
    pub agencies: usize,
    pub routes: usize,
    pub stops: usize,
    pub calendars: usize,
    pub calendar_exceptions: usize,
    pub trips: usize,
    pub stop_times: usize,
    pub shape_points: usize,
    pub block_trip_indices: usize,
    pub block_trip_entries: usize,
}

impl ImportReport {
    pub fn log(&self) {
        match serde_json::to_string(self) {
            Ok(json) => log::info!("import report: {}", json),
            Err(why) => log::warn!("import report unserializable: {}", why),
        }
    }
}

pub struct ImportRequest<'a> {
    pub dataset: &'a StaticDataset,
    /// SHA-256 of the bundle bytes, lowercase hex.
    pub file_hash: &'a str,
    pub file_source: &'a str,
    pub batch_size: usize,
}

/// Whether an import of `(file_hash, file_source)` would be a no-op because
/// the store already holds exactly that bundle. Callers use this to skip
/// parsing entirely.
pub async fn is_noop_reimport(
    store: &SqliteStore,
    file_hash: &str,
    file_source: &str,
) -> Result<bool> {
    let existing = queries::metadata::get(store.pool()).await?;
    Ok(existing.is_some_and(|metadata| {
        metadata.file_hash == file_hash && metadata.file_source == file_source
    }))
}

/// Imports the dataset, replacing all previously stored entities. Returns a
/// report of inserted row counts; when the stored hash and source already
/// match, nothing is touched and the report says so.
pub async fn import_dataset(
    store: &SqliteStore,
    request: ImportRequest<'_>,
    cancel: &CancellationToken,
) -> Result<ImportReport> {
    if is_noop_reimport(store, request.file_hash, request.file_source).await? {
        log::info!(
            "bundle {} from {} already imported, skipping",
            request.file_hash,
            request.file_source
        );
        return Ok(ImportReport {
            skipped_reimport: true,
            ..ImportReport::default()
        });
    }

    // CPU-bound statement preparation happens before the transaction opens;
    // the single writer then only binds and executes.
    let stop_time_batches =
        prepare_batches(&request.dataset.stop_times, request.batch_size, cancel)
            .await?;
    let shape_batches =
        prepare_batches(&request.dataset.shape_points, request.batch_size, cancel)
            .await?;

    let mut tx = store.pool().begin().await?;

    clear_tables(&mut tx).await?;
    ensure_not_cancelled(cancel)?;

    let mut report = ImportReport::default();
    report.agencies = insert_agencies(&mut tx, request.dataset).await?;
    report.routes = insert_routes(&mut tx, request.dataset).await?;
    report.stops = insert_stops(&mut tx, request.dataset).await?;
    ensure_not_cancelled(cancel)?;
    report.calendars = insert_calendars(&mut tx, request.dataset).await?;
    report.calendar_exceptions =
        insert_calendar_exceptions(&mut tx, request.dataset).await?;
    report.trips = insert_trips(&mut tx, request.dataset).await?;
    ensure_not_cancelled(cancel)?;

    report.stop_times =
        execute_batches(&mut tx, &stop_time_batches, cancel).await?;
    report.shape_points = execute_batches(&mut tx, &shape_batches, cancel).await?;

    // Derived products: spatial index, route search index, block-trip index.
    populate_spatial_index(&mut tx).await?;
    populate_route_search_index(&mut tx).await?;
    let (indices, entries) = insert_block_trip_index(&mut tx, request.dataset).await?;
    report.block_trip_indices = indices;
    report.block_trip_entries = entries;
    ensure_not_cancelled(cancel)?;

    queries::metadata::put(
        &mut *tx,
        &ImportMetadata {
            file_hash: request.file_hash.to_owned(),
            import_time: Utc::now().timestamp(),
            file_source: request.file_source.to_owned(),
        },
    )
    .await?;

    tx.commit().await?;
    Ok(report)
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(StoreError::Cancelled)
    } else {
        Ok(())
    }
}

/// FK-safe reverse order; the search and spatial indices are cleared just
/// ahead of their base tables.
async fn clear_tables(tx: &mut Transaction<'_, Sqlite>) -> Result<()> {
    for table in [
        "block_trip_entry",
        "block_trip_index",
        "stop_times",
        "shapes",
        "trips",
        "calendar_dates",
        "calendar",
        "stops_rtree",
        "stops",
        "routes_fts",
        "routes",
        "agencies",
    ] {
        sqlx::query(&format!("DELETE FROM {};", table))
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

async fn insert_agencies(
    tx: &mut Transaction<'_, Sqlite>,
    dataset: &StaticDataset,
) -> Result<usize> {
    for agency in &dataset.agencies {
        sqlx::query(
            "
            INSERT INTO agencies (
                id, name, url, timezone, language, phone, fare_url, email
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);
            ",
        )
        .bind(&agency.id)
        .bind(&agency.name)
        .bind(&agency.url)
        .bind(&agency.timezone)
        .bind(&agency.language)
        .bind(&agency.phone)
        .bind(&agency.fare_url)
        .bind(&agency.email)
        .execute(&mut **tx)
        .await?;
    }
    Ok(dataset.agencies.len())
}

async fn insert_routes(
    tx: &mut Transaction<'_, Sqlite>,
    dataset: &StaticDataset,
) -> Result<usize> {
    for route in &dataset.routes {
        sqlx::query(
            "
            INSERT INTO routes (
                id, agency_id, short_name, long_name, description, route_type,
                url, color, text_color, continuous_pickup, continuous_drop_off
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);
            ",
        )
        .bind(&route.id)
        .bind(&route.agency_id)
        .bind(&route.short_name)
        .bind(&route.long_name)
        .bind(&route.description)
        .bind(route.route_type)
        .bind(&route.url)
        .bind(&route.color)
        .bind(&route.text_color)
        .bind(route.continuous_pickup)
        .bind(route.continuous_drop_off)
        .execute(&mut **tx)
        .await?;
    }
    Ok(dataset.routes.len())
}

async fn insert_stops(
    tx: &mut Transaction<'_, Sqlite>,
    dataset: &StaticDataset,
) -> Result<usize> {
    for stop in &dataset.stops {
        sqlx::query(
            "
            INSERT INTO stops (
                id, code, name, description, latitude, longitude, zone_id,
                url, location_type, timezone, wheelchair_boarding,
                platform_code, direction
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);
            ",
        )
        .bind(&stop.id)
        .bind(&stop.code)
        .bind(&stop.name)
        .bind(&stop.description)
        .bind(stop.latitude)
        .bind(stop.longitude)
        .bind(&stop.zone_id)
        .bind(&stop.url)
        .bind(stop.location_type)
        .bind(&stop.timezone)
        .bind(stop.wheelchair_boarding)
        .bind(&stop.platform_code)
        .bind(&stop.direction)
        .execute(&mut **tx)
        .await?;
    }
    Ok(dataset.stops.len())
}

async fn insert_calendars(
    tx: &mut Transaction<'_, Sqlite>,
    dataset: &StaticDataset,
) -> Result<usize> {
    for calendar in &dataset.calendars {
        sqlx::query(
            "
            INSERT INTO calendar (
                service_id, monday, tuesday, wednesday, thursday, friday,
                saturday, sunday, start_date, end_date
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);
            ",
        )
        .bind(&calendar.service_id)
        .bind(calendar.monday)
        .bind(calendar.tuesday)
        .bind(calendar.wednesday)
        .bind(calendar.thursday)
        .bind(calendar.friday)
        .bind(calendar.saturday)
        .bind(calendar.sunday)
        .bind(calendar.start_date)
        .bind(calendar.end_date)
        .execute(&mut **tx)
        .await?;
    }
    Ok(dataset.calendars.len())
}

async fn insert_calendar_exceptions(
    tx: &mut Transaction<'_, Sqlite>,
    dataset: &StaticDataset,
) -> Result<usize> {
    for exception in &dataset.calendar_exceptions {
        sqlx::query(
            "
            INSERT INTO calendar_dates (service_id, date, exception_type)
            VALUES (?1, ?2, ?3);
            ",
        )
        .bind(&exception.service_id)
        .bind(exception.date)
        .bind(exception.exception_kind as i64)
        .execute(&mut **tx)
        .await?;
    }
    Ok(dataset.calendar_exceptions.len())
}

async fn insert_trips(
    tx: &mut Transaction<'_, Sqlite>,
    dataset: &StaticDataset,
) -> Result<usize> {
    for trip in &dataset.trips {
        sqlx::query(
            "
            INSERT INTO trips (
                id, route_id, service_id, headsign, short_name, direction_id,
                block_id, shape_id, wheelchair_accessible, bikes_allowed
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);
            ",
        )
        .bind(&trip.id)
        .bind(&trip.route_id)
        .bind(&trip.service_id)
        .bind(&trip.headsign)
        .bind(&trip.short_name)
        .bind(trip.direction_id)
        .bind(&trip.block_id)
        .bind(&trip.shape_id)
        .bind(trip.wheelchair_accessible)
        .bind(trip.bikes_allowed)
        .execute(&mut **tx)
        .await?;
    }
    Ok(dataset.trips.len())
}

async fn populate_spatial_index(tx: &mut Transaction<'_, Sqlite>) -> Result<()> {
    sqlx::query(
        "
        INSERT INTO stops_rtree (id, min_lat, max_lat, min_lon, max_lon)
        SELECT rowid, latitude, latitude, longitude, longitude FROM stops;
        ",
    )
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn populate_route_search_index(
    tx: &mut Transaction<'_, Sqlite>,
) -> Result<()> {
    sqlx::query(
        "
        INSERT INTO routes_fts (id, short_name, long_name, description)
        SELECT
            id,
            coalesce(short_name, ''),
            coalesce(long_name, ''),
            coalesce(description, '')
        FROM routes;
        ",
    )
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Groups trips by `(service_id, first_stop_id)` and writes one index row
/// per group with entries ranked by `(block_id, trip_id)`.
async fn insert_block_trip_index(
    tx: &mut Transaction<'_, Sqlite>,
    dataset: &StaticDataset,
) -> Result<(usize, usize)> {
    let groups = block_trip_groups(dataset);
    let mut entry_count = 0;

    for ((service_id, first_stop_id), members) in &groups {
        let index_id: i64 = sqlx::query_scalar(
            "
            INSERT INTO block_trip_index (service_id, first_stop_id)
            VALUES (?1, ?2)
            RETURNING id;
            ",
        )
        .bind(service_id)
        .bind(first_stop_id)
        .fetch_one(&mut **tx)
        .await?;

        for (sequence, (block_id, trip_id)) in members.iter().enumerate() {
            sqlx::query(
                "
                INSERT INTO block_trip_entry (
                    index_id, trip_id, block_id, service_id, sequence
                )
                VALUES (?1, ?2, ?3, ?4, ?5);
                ",
            )
            .bind(index_id)
            .bind(trip_id)
            .bind(block_id)
            .bind(service_id)
            .bind(sequence as i64)
            .execute(&mut **tx)
            .await?;
            entry_count += 1;
        }
    }

    Ok((groups.len(), entry_count))
}

/// `(service_id, first_stop_id)` to the group's `(block_id, trip_id)` pairs,
/// each group sorted by `(block_id, trip_id)`. A BTreeMap keeps group order
/// deterministic across imports.
pub fn block_trip_groups(
    dataset: &StaticDataset,
) -> BTreeMap<(String, String), Vec<(Option<String>, String)>> {
    let mut first_stops: HashMap<&str, (i64, &str)> = HashMap::new();
    for stop_time in &dataset.stop_times {
        first_stops
            .entry(stop_time.trip_id.as_str())
            .and_modify(|current| {
                if stop_time.stop_sequence < current.0 {
                    *current = (stop_time.stop_sequence, stop_time.stop_id.as_str());
                }
            })
            .or_insert((stop_time.stop_sequence, stop_time.stop_id.as_str()));
    }

    let mut groups: BTreeMap<(String, String), Vec<(Option<String>, String)>> =
        BTreeMap::new();
    for trip in &dataset.trips {
        let Some((_, first_stop_id)) = first_stops.get(trip.id.as_str()) else {
            continue;
        };
        groups
            .entry((trip.service_id.clone(), (*first_stop_id).to_owned()))
            .or_default()
            .push((trip.block_id.clone(), trip.id.clone()));
    }
    for members in groups.values_mut() {
        members.sort();
    }
    groups
}

// --- batched multi-row INSERT pipeline -----------------------------------

/// A value destined for a bind parameter. Preparation flattens rows into
/// these so workers never touch the database.
#[derive(Debug, Clone)]
enum Argument {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

#[derive(Debug)]
struct PreparedBatch {
    index: usize,
    sql: String,
    arguments: Vec<Argument>,
}

/// A row type that can participate in the batched pipeline.
trait BatchRow: Clone + Send + Sync + 'static {
    /// `INSERT INTO table (cols...) VALUES ` — the row tuples are appended.
    const INSERT_PREFIX: &'static str;
    const COLUMN_COUNT: usize;

    fn push_arguments(&self, out: &mut Vec<Argument>);
}

impl BatchRow for model::stop_time::StopTime {
    const INSERT_PREFIX: &'static str = "INSERT INTO stop_times (
        trip_id, stop_id, stop_sequence, arrival_time, departure_time,
        headsign, pickup_type, drop_off_type, shape_dist_traveled, timepoint
    ) VALUES ";
    const COLUMN_COUNT: usize = 10;

    fn push_arguments(&self, out: &mut Vec<Argument>) {
        out.push(Argument::Text(self.trip_id.clone()));
        out.push(Argument::Text(self.stop_id.clone()));
        out.push(Argument::Integer(self.stop_sequence));
        out.push(Argument::Integer(self.arrival_time));
        out.push(Argument::Integer(self.departure_time));
        out.push(optional_text(&self.headsign));
        out.push(optional_integer(self.pickup_type));
        out.push(optional_integer(self.drop_off_type));
        out.push(optional_real(self.shape_dist_traveled));
        out.push(optional_integer(self.timepoint));
    }
}

impl BatchRow for model::shape::ShapePoint {
    const INSERT_PREFIX: &'static str = "INSERT INTO shapes (
        shape_id, sequence, latitude, longitude, dist_traveled
    ) VALUES ";
    const COLUMN_COUNT: usize = 5;

    fn push_arguments(&self, out: &mut Vec<Argument>) {
        out.push(Argument::Text(self.shape_id.clone()));
        out.push(Argument::Integer(self.sequence));
        out.push(Argument::Real(self.latitude));
        out.push(Argument::Real(self.longitude));
        out.push(optional_real(self.dist_traveled));
    }
}

fn optional_text(value: &Option<String>) -> Argument {
    match value {
        Some(text) => Argument::Text(text.clone()),
        None => Argument::Null,
    }
}

fn optional_integer(value: Option<i64>) -> Argument {
    match value {
        Some(int) => Argument::Integer(int),
        None => Argument::Null,
    }
}

fn optional_real(value: Option<f64>) -> Argument {
    match value {
        Some(real) => Argument::Real(real),
        None => Argument::Null,
    }
}

fn prepare_batch<R: BatchRow>(index: usize, rows: &[R]) -> PreparedBatch {
    let tuple = format!("({})", crate::queries::placeholders(R::COLUMN_COUNT));
    let mut sql =
        String::with_capacity(R::INSERT_PREFIX.len() + rows.len() * (tuple.len() + 2));
    sql.push_str(R::INSERT_PREFIX);
    for i in 0..rows.len() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&tuple);
    }
    sql.push(';');

    let mut arguments = Vec::with_capacity(rows.len() * R::COLUMN_COUNT);
    for row in rows {
        row.push_arguments(&mut arguments);
    }
    PreparedBatch {
        index,
        sql,
        arguments,
    }
}

/// Prepares batches on a worker pool sized to the CPU count, then restores
/// the original batch order. Preparation is pure CPU work.
async fn prepare_batches<R: BatchRow>(
    rows: &[R],
    batch_size: usize,
    cancel: &CancellationToken,
) -> Result<Vec<PreparedBatch>> {
    let worker_count = std::thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(1);

    let indexed: Vec<(usize, Vec<R>)> = rows
        .chunks(batch_size.max(1))
        .enumerate()
        .map(|(index, chunk)| (index, chunk.to_vec()))
        .collect();

    let mut batches = Vec::with_capacity(indexed.len());
    for wave in indexed.chunks(worker_count) {
        ensure_not_cancelled(cancel)?;
        let handles: Vec<_> = wave
            .iter()
            .cloned()
            .map(|(index, chunk)| {
                task::spawn_blocking(move || prepare_batch(index, &chunk))
            })
            .collect();
        for handle in handles {
            batches.push(handle.await.map_err(StoreError::other)?);
        }
    }
    batches.sort_by_key(|batch| batch.index);
    Ok(batches)
}

/// Executes prepared batches sequentially inside the import transaction,
/// checking for cancellation between batches.
async fn execute_batches(
    tx: &mut Transaction<'_, Sqlite>,
    batches: &[PreparedBatch],
    cancel: &CancellationToken,
) -> Result<usize> {
    let mut rows = 0;
    for batch in batches {
        ensure_not_cancelled(cancel)?;
        let mut query = sqlx::query(&batch.sql);
        for argument in &batch.arguments {
            query = match argument {
                Argument::Null => query.bind(None::<String>),
                Argument::Integer(value) => query.bind(*value),
                Argument::Real(value) => query.bind(*value),
                Argument::Text(value) => query.bind(value.clone()),
            };
        }
        let result = query.execute(&mut **tx).await?;
        rows += result.rows_affected() as usize;
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{shape::ShapePoint, stop_time::StopTime, trip::Trip};

    fn stop_time(trip: &str, stop: &str, sequence: i64) -> StopTime {
        StopTime {
            trip_id: trip.to_owned(),
            stop_id: stop.to_owned(),
            stop_sequence: sequence,
            arrival_time: 0,
            departure_time: 0,
            headsign: None,
            pickup_type: None,
            drop_off_type: None,
            shape_dist_traveled: None,
            timepoint: None,
        }
    }

    fn trip(id: &str, service: &str, block: Option<&str>) -> Trip {
        Trip {
            id: id.to_owned(),
            route_id: "r1".to_owned(),
            service_id: service.to_owned(),
            headsign: None,
            short_name: None,
            direction_id: None,
            block_id: block.map(str::to_owned),
            shape_id: None,
            wheelchair_accessible: None,
            bikes_allowed: None,
        }
    }

    #[test]
    fn prepared_batch_sql_uses_placeholders_only() {
        let rows = vec![
            ShapePoint {
                shape_id: "s'; DROP TABLE shapes; --".to_owned(),
                sequence: 0,
                latitude: 1.0,
                longitude: 2.0,
                dist_traveled: None,
            },
            ShapePoint {
                shape_id: "s".to_owned(),
                sequence: 1,
                latitude: 3.0,
                longitude: 4.0,
                dist_traveled: Some(0.5),
            },
        ];
        let batch = prepare_batch(7, &rows);
        assert_eq!(batch.index, 7);
        assert!(!batch.sql.contains("DROP TABLE"));
        assert_eq!(batch.sql.matches("(?, ?, ?, ?, ?)").count(), 2);
        assert_eq!(batch.arguments.len(), 10);
    }

    #[tokio::test]
    async fn prepared_batches_keep_input_order() {
        let rows: Vec<ShapePoint> = (0..10)
            .map(|i| ShapePoint {
                shape_id: "s".to_owned(),
                sequence: i,
                latitude: 0.0,
                longitude: 0.0,
                dist_traveled: None,
            })
            .collect();
        let cancel = CancellationToken::new();
        let batches = prepare_batches(&rows, 3, &cancel).await.unwrap();
        assert_eq!(batches.len(), 4);
        let indices: Vec<usize> = batches.iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn prepare_batches_honors_cancellation() {
        let rows = vec![stop_time("t", "s", 0)];
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = prepare_batches(&rows, 1, &cancel).await;
        assert!(matches!(result, Err(StoreError::Cancelled)));
    }

    #[test]
    fn block_groups_rank_by_block_then_trip() {
        let dataset = StaticDataset {
            trips: vec![
                trip("t2", "svc", Some("b2")),
                trip("t1", "svc", Some("b1")),
                trip("t3", "svc", None),
            ],
            stop_times: vec![
                stop_time("t1", "first", 1),
                stop_time("t1", "later", 2),
                stop_time("t2", "first", 0),
                stop_time("t3", "first", 5),
            ],
            ..StaticDataset::default()
        };

        let groups = block_trip_groups(&dataset);
        assert_eq!(groups.len(), 1);
        let members = groups
            .get(&("svc".to_owned(), "first".to_owned()))
            .unwrap();
        // None sorts ahead of Some, then by trip id.
        assert_eq!(
            members
                .iter()
                .map(|(_, trip_id)| trip_id.as_str())
                .collect::<Vec<_>>(),
            vec!["t3", "t1", "t2"]
        );
    }

    #[test]
    fn trips_without_stop_times_are_left_out_of_block_groups() {
        let dataset = StaticDataset {
            trips: vec![trip("lonely", "svc", None)],
            ..StaticDataset::default()
        };
        assert!(block_trip_groups(&dataset).is_empty());
    }
}
