use sqlx::{Postgres, Transaction};

use crate::database::{
    models::{Location, SRID},
    types::LocationRow,
    utils::sql,
};

/// Stores the location's point as `geometry(Point, 4326)`. Coordinates are not range-checked.
pub async fn save(
    tx: &mut Transaction<'_, Postgres>,
    location: &Location,
) -> Result<Location, sqlx::Error> {
    if let Some(id) = location.id {
        let merged = sqlx::query_as::<_, LocationRow>(&sql(r#"
                UPDATE
                    location
                SET
                    point = ST_SetSRID(ST_MakePoint(?, ?), ?)
                WHERE
                    id = ?
                RETURNING
                    id,
                    ST_X(point) AS x,
                    ST_Y(point) AS y
            "#))
        .bind(location.point.x)
        .bind(location.point.y)
        .bind(SRID)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        if let Some(merged) = merged {
            return Ok(merged.into());
        }
    }

    let row = sqlx::query_as::<_, LocationRow>(&sql(r#"
            INSERT INTO
                location (point)
            VALUES
                (ST_SetSRID(ST_MakePoint(?, ?), ?))
            RETURNING
                id,
                ST_X(point) AS x,
                ST_Y(point) AS y
        "#))
    .bind(location.point.x)
    .bind(location.point.y)
    .bind(SRID)
    .fetch_one(&mut **tx)
    .await?;

    log::debug!("Saved location {} at ({}, {})", row.id, row.x, row.y);

    Ok(row.into())
}

pub async fn find_by_id(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
) -> Result<Option<Location>, sqlx::Error> {
    let row = sqlx::query_as::<_, LocationRow>(&sql(r#"
            SELECT
                id,
                ST_X(point) AS x,
                ST_Y(point) AS y
            FROM
                location
            WHERE
                id = ?
        "#))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(row.map(|r| r.into()))
}

pub async fn find_all(tx: &mut Transaction<'_, Postgres>) -> Result<Vec<Location>, sqlx::Error> {
    let rows = sqlx::query_as::<_, LocationRow>(&sql(r#"
            SELECT
                id,
                ST_X(point) AS x,
                ST_Y(point) AS y
            FROM
                location
            ORDER BY
                id
        "#))
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows.into_iter().map(|row| row.into()).collect())
}

pub async fn count(tx: &mut Transaction<'_, Postgres>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM location")
        .fetch_one(&mut **tx)
        .await
}

pub async fn delete(
    tx: &mut Transaction<'_, Postgres>,
    location: &Location,
) -> Result<(), sqlx::Error> {
    let Some(id) = location.id else {
        return Ok(());
    };

    sqlx::query(&sql("DELETE FROM location WHERE id = ?"))
        .bind(id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// SRID actually stored for a location, as reported by PostGIS.
pub async fn srid_of(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(&sql("SELECT ST_SRID(point) FROM location WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}
