use super::{ProfileUpdate, UserRecord, UserStore};
use crate::errors::{StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// In-process user store
///
/// Records live in a `BTreeMap` keyed by username, so `list` falls out in
/// username order. Used for tests and for `STORAGE_BACKEND=memory`.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<BTreeMap<String, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn save(&self, record: &UserRecord) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&record.username) {
            return Err(StoreError::AlreadyExists(record.username.clone()));
        }
        users.insert(record.username.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, username: &str) -> StoreResult<UserRecord> {
        self.users
            .read()
            .await
            .get(username)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(username.to_string()))
    }

    async fn update(&self, update: &ProfileUpdate) -> StoreResult<UserRecord> {
        let mut users = self.users.write().await;
        let existing = users
            .get_mut(&update.username)
            .ok_or_else(|| StoreError::NotFound(update.username.clone()))?;

        *existing = existing.with_profile(update);
        Ok(existing.clone())
    }

    async fn delete(&self, username: &str) -> StoreResult<()> {
        self.users.write().await.remove(username);
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<UserRecord>> {
        Ok(self.users.read().await.values().cloned().collect())
    }
}
