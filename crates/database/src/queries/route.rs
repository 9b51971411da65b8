use model::route::Route;
use sqlx::{Executor, Sqlite};

use crate::{
    data_model::{into_models, route::RouteRow},
    Result,
};

use super::full_text_match_expression;

pub async fn get<'c, E>(executor: E, id: &str) -> Result<Option<Route>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let row: Option<RouteRow> = sqlx::query_as(
        "
        SELECT
            id, agency_id, short_name, long_name, description, route_type,
            url, color, text_color, continuous_pickup, continuous_drop_off
        FROM
            routes
        WHERE id = ?1;
        ",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(row.map(Route::from))
}

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<Route>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows: Vec<RouteRow> = sqlx::query_as(
        "
        SELECT
            id, agency_id, short_name, long_name, description, route_type,
            url, color, text_color, continuous_pickup, continuous_drop_off
        FROM
            routes
        ORDER BY id;
        ",
    )
    .fetch_all(executor)
    .await?;
    Ok(into_models(rows))
}

pub async fn ids_for_agency<'c, E>(executor: E, agency_id: &str) -> Result<Vec<String>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let ids = sqlx::query_scalar(
        "
        SELECT id FROM routes WHERE agency_id = ?1 ORDER BY id;
        ",
    )
    .bind(agency_id)
    .fetch_all(executor)
    .await?;
    Ok(ids)
}

/// All routes with at least one trip serving the stop.
pub async fn for_stop<'c, E>(executor: E, stop_id: &str) -> Result<Vec<Route>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows: Vec<RouteRow> = sqlx::query_as(
        "
        SELECT DISTINCT
            r.id, r.agency_id, r.short_name, r.long_name, r.description,
            r.route_type, r.url, r.color, r.text_color,
            r.continuous_pickup, r.continuous_drop_off
        FROM
            routes r
            JOIN trips t ON t.route_id = r.id
            JOIN stop_times st ON st.trip_id = t.id
        WHERE st.stop_id = ?1
        ORDER BY r.id;
        ",
    )
    .bind(stop_id)
    .fetch_all(executor)
    .await?;
    Ok(into_models(rows))
}

/// Prefix-matching, case-insensitive full-text search over route names and
/// descriptions. A blank query returns an empty result, never an error; a
/// `max_count` of zero means unbounded.
pub async fn search_full_text<'c, E>(
    executor: E,
    input: &str,
    max_count: usize,
) -> Result<Vec<Route>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let expression = match full_text_match_expression(input) {
        Some(expression) => expression,
        None => return Ok(vec![]),
    };
    // SQLite treats a negative LIMIT as no limit.
    let limit = if max_count == 0 { -1 } else { max_count as i64 };

    let rows: Vec<RouteRow> = sqlx::query_as(
        "
        SELECT
            r.id, r.agency_id, r.short_name, r.long_name, r.description,
            r.route_type, r.url, r.color, r.text_color,
            r.continuous_pickup, r.continuous_drop_off
        FROM
            routes r
            JOIN routes_fts ON routes_fts.id = r.id
        WHERE routes_fts MATCH ?1
        ORDER BY routes_fts.rank
        LIMIT ?2;
        ",
    )
    .bind(expression)
    .bind(limit)
    .fetch_all(executor)
    .await?;
    Ok(into_models(rows))
}
