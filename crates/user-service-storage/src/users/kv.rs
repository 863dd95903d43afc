use super::{ProfileUpdate, UserRecord, UserStore};
use crate::{
    column_families::CF_USERS,
    errors::{StoreError, StoreResult},
    traits::Storage,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// User store backed by a key-value [`Storage`] engine
///
/// Records are stored bincode-encoded in the `users` column family under the
/// username. Uniqueness and update-in-place rely on the engine's conditional
/// writes, never on a separate read.
pub struct KvUserStore<S: Storage> {
    storage: Arc<S>,
}

impl<S: Storage> KvUserStore<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S: Storage + 'static> UserStore for KvUserStore<S> {
    async fn save(&self, record: &UserRecord) -> StoreResult<()> {
        let inserted = self
            .storage
            .put_if_absent(CF_USERS, &record.username, record)
            .await?;

        if !inserted {
            debug!(username = %record.username, "Rejected duplicate user record");
            return Err(StoreError::AlreadyExists(record.username.clone()));
        }

        Ok(())
    }

    async fn get(&self, username: &str) -> StoreResult<UserRecord> {
        self.storage
            .get::<_, UserRecord>(CF_USERS, &username)
            .await?
            .ok_or_else(|| StoreError::NotFound(username.to_string()))
    }

    async fn update(&self, update: &ProfileUpdate) -> StoreResult<UserRecord> {
        // Applied to whatever record is stored when the engine takes its lock,
        // so the secret written back is always the current one
        let updated = self
            .storage
            .update_if_present(CF_USERS, &update.username, |current: UserRecord| {
                current.with_profile(update)
            })
            .await?;

        updated.ok_or_else(|| {
            debug!(username = %update.username, "Update for unknown user");
            StoreError::NotFound(update.username.clone())
        })
    }

    async fn delete(&self, username: &str) -> StoreResult<()> {
        self.storage.delete(CF_USERS, &username).await?;
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<UserRecord>> {
        let mut records: Vec<UserRecord> = self
            .storage
            .scan_all::<UserRecord>(CF_USERS)
            .await?
            .into_iter()
            .map(|(_, record)| record)
            .collect();

        // Encoded keys are length-prefixed, so key order is not username order
        records.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(records)
    }
}
