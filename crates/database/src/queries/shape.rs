use model::shape::ShapePoint;
use sqlx::{Executor, Sqlite};

use crate::{
    data_model::{into_models, shape::ShapePointRow},
    Result,
};

use super::placeholders;

pub async fn points_for_shape<'c, E>(
    executor: E,
    shape_id: &str,
) -> Result<Vec<ShapePoint>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows: Vec<ShapePointRow> = sqlx::query_as(
        "
        SELECT shape_id, sequence, latitude, longitude, dist_traveled
        FROM shapes
        WHERE shape_id = ?1
        ORDER BY sequence;
        ",
    )
    .bind(shape_id)
    .fetch_all(executor)
    .await?;
    Ok(into_models(rows))
}

/// Points of a shape that carry a distance-traveled value, for callers
/// locating positions along the shape by distance.
pub async fn points_with_distance<'c, E>(
    executor: E,
    shape_id: &str,
) -> Result<Vec<ShapePoint>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows: Vec<ShapePointRow> = sqlx::query_as(
        "
        SELECT shape_id, sequence, latitude, longitude, dist_traveled
        FROM shapes
        WHERE shape_id = ?1 AND dist_traveled IS NOT NULL
        ORDER BY sequence;
        ",
    )
    .bind(shape_id)
    .fetch_all(executor)
    .await?;
    Ok(into_models(rows))
}

/// Min/max of all shape coordinates as
/// `(min_lat, max_lat, min_lon, max_lon)`, or `None` for an empty table.
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
            FROM shapes;
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

/// Bulk fetch of several shapes at once, sorted by `(shape_id, sequence)`.
pub async fn points_by_shape_ids<'c, E>(
    executor: E,
    shape_ids: &[String],
) -> Result<Vec<ShapePoint>>
where
    E: Executor<'c, Database = Sqlite>,
{
    if shape_ids.is_empty() {
        return Ok(vec![]);
    }
    let sql = format!(
        "
        SELECT shape_id, sequence, latitude, longitude, dist_traveled
        FROM shapes
        WHERE shape_id IN ({})
        ORDER BY shape_id, sequence;
        ",
        placeholders(shape_ids.len())
    );
    let mut query = sqlx::query_as(&sql);
    for id in shape_ids {
        query = query.bind(id);
    }
    let rows: Vec<ShapePointRow> = query.fetch_all(executor).await?;
    Ok(into_models(rows))
}
