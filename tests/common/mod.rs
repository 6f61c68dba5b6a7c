#![allow(dead_code)]

use std::env;

use anyhow::Result;
use sqlx::{PgPool, Postgres, Transaction};

use datajpa::database::{
    init_database,
    models::{Member, Team},
    repositories::{member as member_repo, team as team_repo},
};

pub struct TestContext {
    pub pool: PgPool,
}

impl TestContext {
    /// Connects to `DATABASE_URL` and runs migrations. Database tests are
    /// `#[ignore]`d by default; run them with `cargo test -- --ignored`.
    pub async fn new() -> Self {
        setup_test_env();

        let database_url =
            env::var("DATABASE_URL").expect("DATABASE_URL must point at a Postgres with PostGIS");

        let pool = init_database(&database_url, 2)
            .await
            .expect("failed to initialise test database");

        Self { pool }
    }

    /// Opens a transaction with an empty `member` table. Dropping it rolls everything back.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await?;
        member_repo::delete_all(&mut tx).await?;
        Ok(tx)
    }
}

pub fn setup_test_env() {
    dotenvy::dotenv().ok();
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

/// Saves members `aaa`..`ggg`, all aged 20.
pub async fn save_seven_twenty_year_olds(tx: &mut Transaction<'_, Postgres>) -> Result<Vec<Member>> {
    let mut saved = Vec::new();
    for username in ["aaa", "bbb", "ccc", "ddd", "eee", "fff", "ggg"] {
        saved.push(member_repo::save(tx, &Member::new(username).with_age(20)).await?);
    }
    Ok(saved)
}

pub async fn save_team(tx: &mut Transaction<'_, Postgres>, name: &str) -> Result<Team> {
    Ok(team_repo::save(tx, &Team::new(name)).await?)
}
