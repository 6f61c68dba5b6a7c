use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};

use crate::database::models::Member;

/// One unit of work: an open transaction plus the members it has already loaded.
///
/// Lookups through [`crate::database::member_store`] answer from the identity map
/// first, so repeated reads inside a session see the same values. Statements that
/// change rows without loading them (bulk updates) leave the map untouched; call
/// [`Session::clear`] to force the next read back to the database.
///
/// Dropping a session without committing rolls the transaction back.
pub struct Session {
    tx: Transaction<'static, Postgres>,
    members: HashMap<i64, Member>,
}

impl Session {
    pub async fn begin(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let tx = pool.begin().await?;

        Ok(Self {
            tx,
            members: HashMap::new(),
        })
    }

    pub fn tx(&mut self) -> &mut Transaction<'static, Postgres> {
        &mut self.tx
    }

    pub fn cached_member(&self, id: i64) -> Option<&Member> {
        self.members.get(&id)
    }

    pub fn cached_count(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn remember(&mut self, member: &Member) {
        if let Some(id) = member.id {
            self.members.insert(id, member.clone());
        }
    }

    pub(crate) fn forget(&mut self, id: i64) {
        self.members.remove(&id);
    }

    /// Detaches every cached member.
    pub fn clear(&mut self) {
        log::debug!("Clearing {} cached members", self.members.len());
        self.members.clear();
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }

    pub async fn rollback(self) -> Result<(), sqlx::Error> {
        self.tx.rollback().await
    }
}
