use model::stop::Stop;
use sqlx::{Executor, Sqlite};

use crate::{
    data_model::{
        into_models,
        stop::{StopRow, StopShapeContextRow},
    },
    Result,
};

use super::placeholders;

const STOP_COLUMNS: &str = "
    id, code, name, description, latitude, longitude, zone_id, url,
    location_type, timezone, wheelchair_boarding, platform_code, direction";

pub async fn get<'c, E>(executor: E, id: &str) -> Result<Option<Stop>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let row: Option<StopRow> = sqlx::query_as(&format!(
        "SELECT {STOP_COLUMNS} FROM stops WHERE id = ?1;"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(row.map(Stop::from))
}

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<Stop>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows: Vec<StopRow> = sqlx::query_as(&format!(
        "SELECT {STOP_COLUMNS} FROM stops ORDER BY id;"
    ))
    .fetch_all(executor)
    .await?;
    Ok(into_models(rows))
}

pub async fn by_ids<'c, E>(executor: E, ids: &[String]) -> Result<Vec<Stop>>
where
    E: Executor<'c, Database = Sqlite>,
{
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let sql = format!(
        "SELECT {STOP_COLUMNS} FROM stops WHERE id IN ({}) ORDER BY id;",
        placeholders(ids.len())
    );
    let mut query = sqlx::query_as(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let rows: Vec<StopRow> = query.fetch_all(executor).await?;
    Ok(into_models(rows))
}

/// Stops served by at least one route of the agency.
pub async fn ids_for_agency<'c, E>(executor: E, agency_id: &str) -> Result<Vec<String>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let ids = sqlx::query_scalar(
        "
        SELECT DISTINCT st.stop_id
        FROM
            stop_times st
            JOIN trips t ON t.id = st.trip_id
            JOIN routes r ON r.id = t.route_id
        WHERE r.agency_id = ?1
        ORDER BY st.stop_id;
        ",
    )
    .bind(agency_id)
    .fetch_all(executor)
    .await?;
    Ok(ids)
}

/// Stops inside the box, resolved through the spatial index. The rtree join
/// keeps this an index probe rather than a scan of `stops`.
pub async fn within_bounding_box<'c, E>(
    executor: E,
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
) -> Result<Vec<Stop>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows: Vec<StopRow> = sqlx::query_as(
        "
        SELECT
            s.id, s.code, s.name, s.description, s.latitude, s.longitude,
            s.zone_id, s.url, s.location_type, s.timezone,
            s.wheelchair_boarding, s.platform_code, s.direction
        FROM
            stops s
            JOIN stops_rtree r ON s.rowid = r.id
        WHERE
            r.min_lat >= ?1 AND r.max_lat <= ?2
            AND r.min_lon >= ?3 AND r.max_lon <= ?4
        ORDER BY s.id;
        ",
    )
    .bind(min_lat)
    .bind(max_lat)
    .bind(min_lon)
    .bind(max_lon)
    .fetch_all(executor)
    .await?;
    Ok(into_models(rows))
}

/// Min/max of all stop coordinates as
/// `(min_lat, max_lat, min_lon, max_lon)`, or `None` for an empty table.
/// Fallback for region bounds when a bundle ships no shapes.
pub async fn coordinate_bounds<'c, E>(
    executor: E,
) -> Result<Option<(f64, f64, f64, f64)>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let row: (Option<f64>, Option<f64>, Option<f64>, Option<f64>) =
        sqlx::query_as(
            "
            SELECT MIN(latitude), MAX(latitude), MIN(longitude), MAX(longitude)
            FROM stops;
            ",
        )
        .fetch_one(executor)
        .await?;
    Ok(match row {
        (Some(min_lat), Some(max_lat), Some(min_lon), Some(max_lon)) => {
            Some((min_lat, max_lat, min_lon, max_lon))
        }
        _ => None,
    })
}

/// Bulk lookup of the shape context of many stops at once: one row per
/// (stop, trip-shape) pairing with the stop-time's distance along the shape
/// when the bundle provides one.
pub async fn shape_context_by_ids<'c, E>(
    executor: E,
    stop_ids: &[String],
) -> Result<Vec<StopShapeContextRow>>
where
    E: Executor<'c, Database = Sqlite>,
{
    if stop_ids.is_empty() {
        return Ok(vec![]);
    }
    let sql = format!(
        "
        SELECT
            st.stop_id, t.shape_id, st.shape_dist_traveled
        FROM
            stop_times st
            JOIN trips t ON t.id = st.trip_id
        WHERE t.shape_id IS NOT NULL AND st.stop_id IN ({})
        ORDER BY st.stop_id, t.shape_id;
        ",
        placeholders(stop_ids.len())
    );
    let mut query = sqlx::query_as(&sql);
    for id in stop_ids {
        query = query.bind(id);
    }
    let rows = query.fetch_all(executor).await?;
    Ok(rows)
}
