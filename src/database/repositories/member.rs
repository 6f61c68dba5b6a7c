use sqlx::{Postgres, Transaction};

use crate::database::{
    models::{Member, MemberProperty, MemberWithTeam},
    paging::{Page, PageRequest, Slice},
    types::MemberTeamRow,
    utils::sql,
};

/// Inserts a new member, or merges one that already carries an id.
///
/// Merging a member whose row no longer exists inserts it again under a freshly
/// generated id.
pub async fn save(
    tx: &mut Transaction<'_, Postgres>,
    member: &Member,
) -> Result<Member, sqlx::Error> {
    if let Some(id) = member.id {
        let merged = sqlx::query_as::<_, Member>(&sql(r#"
                UPDATE
                    member
                SET
                    username = ?,
                    age = ?,
                    team_id = ?
                WHERE
                    id = ?
                RETURNING
                    id,
                    username,
                    age,
                    team_id
            "#))
        .bind(&member.username)
        .bind(member.age)
        .bind(member.team_id)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        if let Some(merged) = merged {
            return Ok(merged);
        }
    }

    let saved = sqlx::query_as::<_, Member>(&sql(r#"
            INSERT INTO
                member (
                    username,
                    age,
                    team_id
                )
            VALUES
                (?, ?, ?)
            RETURNING
                id,
                username,
                age,
                team_id
        "#))
    .bind(&member.username)
    .bind(member.age)
    .bind(member.team_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(saved)
}

pub async fn find_by_id(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
) -> Result<Option<Member>, sqlx::Error> {
    let member = sqlx::query_as::<_, Member>(&sql(r#"
            SELECT
                id,
                username,
                age,
                team_id
            FROM
                member
            WHERE
                id = ?
        "#))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(member)
}

pub async fn find_all(tx: &mut Transaction<'_, Postgres>) -> Result<Vec<Member>, sqlx::Error> {
    let members = sqlx::query_as::<_, Member>(&sql(r#"
            SELECT
                id,
                username,
                age,
                team_id
            FROM
                member
            ORDER BY
                id
        "#))
    .fetch_all(&mut **tx)
    .await?;

    Ok(members)
}

pub async fn count(tx: &mut Transaction<'_, Postgres>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM member")
        .fetch_one(&mut **tx)
        .await
}

/// Deletes the member's row. Unsaved members and rows that are already gone are ignored.
pub async fn delete(
    tx: &mut Transaction<'_, Postgres>,
    member: &Member,
) -> Result<(), sqlx::Error> {
    let Some(id) = member.id else {
        return Ok(());
    };

    sqlx::query(&sql("DELETE FROM member WHERE id = ?"))
        .bind(id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

pub async fn delete_all(tx: &mut Transaction<'_, Postgres>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM member")
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected())
}

pub async fn find_by_username_and_age_greater_than(
    tx: &mut Transaction<'_, Postgres>,
    username: &str,
    age: i32,
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
                username = ?
                AND age > ?
            ORDER BY
                id
        "#))
    .bind(username)
    .bind(age)
    .fetch_all(&mut **tx)
    .await?;

    Ok(members)
}

pub async fn find_by_age(
    tx: &mut Transaction<'_, Postgres>,
    age: i32,
    request: &PageRequest<MemberProperty>,
) -> Result<Page<Member>, sqlx::Error> {
    let content = sqlx::query_as::<_, Member>(&sql(&format!(
        r#"
            SELECT
                id,
                username,
                age,
                team_id
            FROM
                member
            WHERE
                age = ?
            {}
            LIMIT
                ?
            OFFSET
                ?
        "#,
        request.sort.order_by("id")
    )))
    .bind(age)
    .bind(request.limit())
    .bind(request.offset())
    .fetch_all(&mut **tx)
    .await?;

    let total_elements = sqlx::query_scalar::<_, i64>(&sql("SELECT COUNT(*) FROM member WHERE age = ?"))
        .bind(age)
        .fetch_one(&mut **tx)
        .await?;

    Ok(Page::new(content, request, total_elements))
}

/// Like [`find_by_age`] but without the count query: one extra row is fetched to
/// tell whether a next slice exists.
pub async fn find_slice_by_age(
    tx: &mut Transaction<'_, Postgres>,
    age: i32,
    request: &PageRequest<MemberProperty>,
) -> Result<Slice<Member>, sqlx::Error> {
    let rows = sqlx::query_as::<_, Member>(&sql(&format!(
        r#"
            SELECT
                id,
                username,
                age,
                team_id
            FROM
                member
            WHERE
                age = ?
            {}
            LIMIT
                ?
            OFFSET
                ?
        "#,
        request.sort.order_by("id")
    )))
    .bind(age)
    .bind(request.limit() + 1)
    .bind(request.offset())
    .fetch_all(&mut **tx)
    .await?;

    Ok(Slice::from_overfetch(rows, request))
}

/// Members with the given username, each loaded together with its team.
pub async fn find_member_by_username(
    tx: &mut Transaction<'_, Postgres>,
    username: &str,
) -> Result<Vec<MemberWithTeam>, sqlx::Error> {
    let rows = sqlx::query_as::<_, MemberTeamRow>(&sql(r#"
            SELECT
                m.id,
                m.username,
                m.age,
                m.team_id,
                t.name AS team_name
            FROM
                member m
                LEFT JOIN team t ON m.team_id = t.id
            WHERE
                m.username = ?
            ORDER BY
                m.id
        "#))
    .bind(username)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows.into_iter().map(|row| row.into()).collect())
}

pub async fn find_user(
    tx: &mut Transaction<'_, Postgres>,
    username: &str,
    age: i32,
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
                username = ?
                AND age = ?
        "#))
    .bind(username)
    .bind(age)
    .fetch_all(&mut **tx)
    .await?;

    Ok(members)
}

pub async fn find_by(tx: &mut Transaction<'_, Postgres>) -> Result<Vec<Member>, sqlx::Error> {
    let members = sqlx::query_as::<_, Member>("SELECT id, username, age, team_id FROM member")
        .fetch_all(&mut **tx)
        .await?;

    Ok(members)
}

/// Adds one year to every member aged `age` or older, in a single statement.
pub async fn bulk_age_plus(
    tx: &mut Transaction<'_, Postgres>,
    age: i32,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(&sql("UPDATE member SET age = age + 1 WHERE age >= ?"))
        .bind(age)
        .execute(&mut **tx)
        .await?;

    log::debug!(
        "Bulk age update (age >= {}) touched {} members",
        age,
        result.rows_affected()
    );

    Ok(result.rows_affected())
}
