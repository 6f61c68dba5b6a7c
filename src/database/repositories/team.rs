use sqlx::{Postgres, Transaction};

use crate::database::{
    models::{Member, Team},
    utils::sql,
};

pub async fn save(tx: &mut Transaction<'_, Postgres>, team: &Team) -> Result<Team, sqlx::Error> {
    if let Some(id) = team.id {
        let merged = sqlx::query_as::<_, Team>(&sql(r#"
                UPDATE
                    team
                SET
                    name = ?
                WHERE
                    id = ?
                RETURNING
                    id,
                    name
            "#))
        .bind(&team.name)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        if let Some(merged) = merged {
            return Ok(merged);
        }
    }

    let saved = sqlx::query_as::<_, Team>(&sql(r#"
            INSERT INTO
                team (name)
            VALUES
                (?)
            RETURNING
                id,
                name
        "#))
    .bind(&team.name)
    .fetch_one(&mut **tx)
    .await?;

    Ok(saved)
}

pub async fn find_by_id(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
) -> Result<Option<Team>, sqlx::Error> {
    let team = sqlx::query_as::<_, Team>(&sql("SELECT id, name FROM team WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

    Ok(team)
}

pub async fn find_all(tx: &mut Transaction<'_, Postgres>) -> Result<Vec<Team>, sqlx::Error> {
    let teams = sqlx::query_as::<_, Team>("SELECT id, name FROM team ORDER BY id")
        .fetch_all(&mut **tx)
        .await?;

    Ok(teams)
}

pub async fn count(tx: &mut Transaction<'_, Postgres>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM team")
        .fetch_one(&mut **tx)
        .await
}

/// Deletes the team's row. Members still pointing at it make the statement fail.
pub async fn delete(tx: &mut Transaction<'_, Postgres>, team: &Team) -> Result<(), sqlx::Error> {
    let Some(id) = team.id else {
        return Ok(());
    };

    sqlx::query(&sql("DELETE FROM team WHERE id = ?"))
        .bind(id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

pub async fn find_members(
    tx: &mut Transaction<'_, Postgres>,
    team_id: i64,
) -> Result<Vec<Member>, sqlx::Error> {
    let members = sqlx::query_as::<_, Member>(&sql(r#"
            SELECT
                id,
                username,
                age,
                team_id
            FROM
                member
            WHERE
                team_id = ?
            ORDER BY
                username
        "#))
    .bind(team_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(members)
}
