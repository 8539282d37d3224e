//! Profiles Store

use async_trait::async_trait;
use mockall::automock;
use sqlx::query;

use crate::{
    database::Db,
    domain::{
        amount_to_db,
        profiles::{errors::ProfilesStoreError, models::ProfileUuid},
    },
};

const INCREMENT_CREDIT_SQL: &str = include_str!("sql/increment_credit.sql");

/// The one write checkout needs against profiles.
#[automock]
#[async_trait]
pub trait ProfilesStore: Send + Sync {
    /// Add `amount` minor units to the owner's store credit.
    async fn increment_credit(
        &self,
        owner: ProfileUuid,
        amount: u64,
    ) -> Result<(), ProfilesStoreError>;
}

#[derive(Debug, Clone)]
pub struct PgProfilesStore {
    db: Db,
}

impl PgProfilesStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfilesStore for PgProfilesStore {
    async fn increment_credit(
        &self,
        owner: ProfileUuid,
        amount: u64,
    ) -> Result<(), ProfilesStoreError> {
        let amount = amount_to_db(amount, "store_credit")?;

        let rows_affected = query(INCREMENT_CREDIT_SQL)
            .bind(owner.into_uuid())
            .bind(amount)
            .execute(self.db.pool())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(ProfilesStoreError::NotFound);
        }

        Ok(())
    }
}
