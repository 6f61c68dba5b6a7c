use fake::{Fake, faker::name::en::Name};
use pretty_assertions::assert_eq;
use serial_test::serial;

use datajpa::database::{
    member_store,
    models::Member,
    repositories::member as member_repo,
    session::Session,
};

mod common;

async fn open_session(ctx: &common::TestContext) -> Session {
    let mut session = Session::begin(&ctx.pool).await.unwrap();
    member_repo::delete_all(session.tx()).await.unwrap();
    session
}

async fn save_seven(session: &mut Session) -> Vec<Member> {
    let mut saved = Vec::new();
    for username in ["aaa", "bbb", "ccc", "ddd", "eee", "fff", "ggg"] {
        saved.push(
            member_store::save(session, &Member::new(username).with_age(20))
                .await
                .unwrap(),
        );
    }
    saved
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL with PostGIS"]
async fn test_save_and_find() {
    let ctx = common::TestContext::new().await;
    let mut session = open_session(&ctx).await;

    let username: String = Name().fake();
    let saved = member_store::save(&mut session, &Member::new(username.clone()))
        .await
        .unwrap();

    let found = member_store::find(&mut session, saved.id.unwrap())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.id, saved.id);
    assert_eq!(found.username, username);
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL with PostGIS"]
async fn test_basic_read_count_and_delete() {
    let ctx = common::TestContext::new().await;
    let mut session = open_session(&ctx).await;

    let member1 = member_store::save(&mut session, &Member::new("memberA")).await.unwrap();
    let member2 = member_store::save(&mut session, &Member::new("memberB")).await.unwrap();

    let found1 = member_store::find_by_id(&mut session, member1.id.unwrap()).await.unwrap();
    let found2 = member_store::find_by_id(&mut session, member2.id.unwrap()).await.unwrap();
    assert_eq!(found1, Some(member1.clone()));
    assert_eq!(found2, Some(member2.clone()));

    assert_eq!(member_store::find_all(&mut session).await.unwrap().len(), 2);
    assert_eq!(member_store::count(&mut session).await.unwrap(), 2);

    member_store::delete(&mut session, &member1).await.unwrap();
    member_store::delete(&mut session, &member2).await.unwrap();

    assert_eq!(member_store::count(&mut session).await.unwrap(), 0);
    assert!(session.cached_member(member1.id.unwrap()).is_none());
    assert!(
        member_store::find(&mut session, member1.id.unwrap())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL with PostGIS"]
async fn test_find_by_username_and_age_greater_than() {
    let ctx = common::TestContext::new().await;
    let mut session = open_session(&ctx).await;

    member_store::save(&mut session, &Member::new("aaa").with_age(20)).await.unwrap();
    member_store::save(&mut session, &Member::new("bbb").with_age(25)).await.unwrap();

    let result = member_store::find_by_username_and_age_greater_than(&mut session, "aaa", 15)
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].username, "aaa");
    assert_eq!(result[0].age, 20);
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL with PostGIS"]
async fn test_paging() {
    let ctx = common::TestContext::new().await;
    let mut session = open_session(&ctx).await;
    save_seven(&mut session).await;

    let result = member_store::find_by_page(&mut session, 20, 0, 3).await.unwrap();
    let total_count = member_store::total_count(&mut session, 20).await.unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(total_count, 7);

    let usernames: Vec<&str> = result.iter().map(|m| m.username.as_str()).collect();
    assert_eq!(usernames, vec!["ggg", "fff", "eee"]);
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL with PostGIS"]
async fn test_bulk_update_leaves_cached_copies_stale() {
    let ctx = common::TestContext::new().await;
    let mut session = open_session(&ctx).await;
    let saved = save_seven(&mut session).await;
    let id = saved[0].id.unwrap();

    let update_count = member_store::bulk_age_plus(&mut session, 20).await.unwrap();
    assert_eq!(update_count, 7);

    // Still the copy cached by `save`
    let cached = member_store::find(&mut session, id).await.unwrap().unwrap();
    assert_eq!(cached.age, 20);

    session.clear();

    let refreshed = member_store::find(&mut session, id).await.unwrap().unwrap();
    assert_eq!(refreshed.age, 21);
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL with PostGIS"]
async fn test_repeated_find_returns_same_values() {
    let ctx = common::TestContext::new().await;
    let mut session = open_session(&ctx).await;
    let saved = member_store::save(&mut session, &Member::new("aaa").with_age(20))
        .await
        .unwrap();
    session.clear();

    let first = member_store::find(&mut session, saved.id.unwrap()).await.unwrap();
    let second = member_store::find(&mut session, saved.id.unwrap()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first, Some(saved));
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL with PostGIS"]
async fn test_rolled_back_session_leaves_nothing_behind() {
    let ctx = common::TestContext::new().await;
    let mut session = Session::begin(&ctx.pool).await.unwrap();
    let username: String = Name().fake();
    let saved = member_store::save(&mut session, &Member::new(username))
        .await
        .unwrap();
    session.rollback().await.unwrap();

    let mut session = Session::begin(&ctx.pool).await.unwrap();
    let found = member_store::find(&mut session, saved.id.unwrap()).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL with PostGIS"]
async fn test_merge_refreshes_cached_copy() {
    let ctx = common::TestContext::new().await;
    let mut session = open_session(&ctx).await;

    let mut member = member_store::save(&mut session, &Member::new("aaa").with_age(20))
        .await
        .unwrap();
    member.age = 30;
    let merged = member_store::save(&mut session, &member).await.unwrap();

    let id = merged.id.unwrap();
    assert_eq!(session.cached_member(id), Some(&merged));
    assert_eq!(member_store::find(&mut session, id).await.unwrap(), Some(merged.clone()));

    // The row itself was written, not just the cached copy
    let stored = member_repo::find_by_id(session.tx(), id).await.unwrap();
    assert_eq!(stored, Some(merged));
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL with PostGIS"]
async fn test_committed_session_is_visible_to_next_session() {
    let ctx = common::TestContext::new().await;
    let username: String = Name().fake();

    let mut session = Session::begin(&ctx.pool).await.unwrap();
    let saved = member_store::save(&mut session, &Member::new(username.clone()))
        .await
        .unwrap();
    session.commit().await.unwrap();

    let mut session = Session::begin(&ctx.pool).await.unwrap();
    let found = member_store::find(&mut session, saved.id.unwrap()).await.unwrap();
    assert_eq!(found.map(|m| m.username), Some(username));

    // Clean up the committed row
    member_store::delete(&mut session, &saved).await.unwrap();
    session.commit().await.unwrap();
}
