//! Hand-written member access on top of a [`Session`].
//!
//! Every member that passes through here is kept in the session's identity map, and
//! [`find`] answers from that map before touching the database. [`bulk_age_plus`]
//! writes straight to the table, so cached copies keep their old age until the
//! session is cleared.

use crate::database::{
    models::Member, repositories::member as member_repo, session::Session, utils::sql,
};

pub async fn save(session: &mut Session, member: &Member) -> Result<Member, sqlx::Error> {
    let saved = member_repo::save(session.tx(), member).await?;

    // A merged copy replaces whatever the session held for that id
    session.remember(&saved);
    Ok(saved)
}

/// Returns the session's copy of the member when it has one, otherwise loads it.
pub async fn find(session: &mut Session, id: i64) -> Result<Option<Member>, sqlx::Error> {
    if let Some(cached) = session.cached_member(id) {
        return Ok(Some(cached.clone()));
    }

    let member = member_repo::find_by_id(session.tx(), id).await?;

    if let Some(member) = &member {
        session.remember(member);
    }

    Ok(member)
}

pub async fn find_by_id(session: &mut Session, id: i64) -> Result<Option<Member>, sqlx::Error> {
    find(session, id).await
}

pub async fn find_all(session: &mut Session) -> Result<Vec<Member>, sqlx::Error> {
    let rows = member_repo::find_all(session.tx()).await?;
    Ok(resolve(session, rows))
}

pub async fn count(session: &mut Session) -> Result<i64, sqlx::Error> {
    member_repo::count(session.tx()).await
}

pub async fn delete(session: &mut Session, member: &Member) -> Result<(), sqlx::Error> {
    member_repo::delete(session.tx(), member).await?;

    if let Some(id) = member.id {
        session.forget(id);
    }
    Ok(())
}

pub async fn find_by_username_and_age_greater_than(
    session: &mut Session,
    username: &str,
    age: i32,
) -> Result<Vec<Member>, sqlx::Error> {
    let rows =
        member_repo::find_by_username_and_age_greater_than(session.tx(), username, age).await?;
    Ok(resolve(session, rows))
}

/// Members of the given age ordered by username descending (ties by id), `limit` rows
/// from `offset`.
pub async fn find_by_page(
    session: &mut Session,
    age: i32,
    offset: i64,
    limit: i64,
) -> Result<Vec<Member>, sqlx::Error> {
    let rows = sqlx::query_as::<_, Member>(&sql(r#"
            SELECT
                id,
                username,
                age,
                team_id
            FROM
                member
            WHERE
                age = ?
            ORDER BY
                username DESC,
                id
            LIMIT
                ?
            OFFSET
                ?
        "#))
    .bind(age)
    .bind(limit)
    .bind(offset)
    .fetch_all(&mut **session.tx())
    .await?;

    Ok(resolve(session, rows))
}

pub async fn total_count(session: &mut Session, age: i32) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(&sql("SELECT COUNT(*) FROM member WHERE age = ?"))
        .bind(age)
        .fetch_one(&mut **session.tx())
        .await
}

/// Adds one year to every member aged `age` or older. The identity map is not refreshed.
pub async fn bulk_age_plus(session: &mut Session, age: i32) -> Result<u64, sqlx::Error> {
    let updated = member_repo::bulk_age_plus(session.tx(), age).await?;

    if session.cached_count() > 0 {
        log::debug!(
            "{} cached members may be stale after bulk update of {} rows",
            session.cached_count(),
            updated
        );
    }

    Ok(updated)
}

// Cached copies win over freshly loaded rows, as in `find`.
fn resolve(session: &mut Session, rows: Vec<Member>) -> Vec<Member> {
    rows.into_iter()
        .map(|row| {
            let cached = row.id.and_then(|id| session.cached_member(id).cloned());
            match cached {
                Some(cached) => cached,
                None => {
                    session.remember(&row);
                    row
                }
            }
        })
        .collect()
}
