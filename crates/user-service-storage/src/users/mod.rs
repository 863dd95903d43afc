//! User record store contract and its adapters.

mod kv;
mod memory;

pub use kv::KvUserStore;
pub use memory::MemoryUserStore;

use crate::errors::StoreResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted user record
///
/// `credential_secret` holds the Argon2id PHC string of the user's secret. It
/// is never part of an outbound view and is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub credential_secret: String,
}

impl UserRecord {
    /// Copy of this record with the display attributes of `update` applied
    pub fn with_profile(&self, update: &ProfileUpdate) -> Self {
        Self {
            username: self.username.clone(),
            first_name: update.first_name.clone(),
            last_name: update.last_name.clone(),
            credential_secret: self.credential_secret.clone(),
        }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("credential_secret", &"<redacted>")
            .finish()
    }
}

/// Display-attribute change addressed by username
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// User store contract
///
/// All operations address records by username. Implementations must make
/// `save` an atomic test-and-set: of any number of concurrent saves for one
/// username exactly one succeeds. Engine failures surface as
/// `StoreError::Unavailable` and are never retried here.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new record, failing with `AlreadyExists` if the username is taken
    async fn save(&self, record: &UserRecord) -> StoreResult<()>;

    /// Fetch a record, failing with `NotFound`
    async fn get(&self, username: &str) -> StoreResult<UserRecord>;

    /// Replace the display attributes of an existing record
    ///
    /// The username and credential secret are never changed. Returns the new
    /// full record, or `NotFound`.
    async fn update(&self, update: &ProfileUpdate) -> StoreResult<UserRecord>;

    /// Remove a record. Deleting an absent username succeeds.
    async fn delete(&self, username: &str) -> StoreResult<()>;

    /// All records, ordered by username
    async fn list(&self) -> StoreResult<Vec<UserRecord>>;
}

#[cfg(test)]
pub(crate) mod contract_tests {
    //! Behaviour every `UserStore` adapter must show.

    use super::*;
    use crate::errors::StoreError;
    use std::sync::Arc;

    pub fn record(username: &str, first: &str, last: &str) -> UserRecord {
        UserRecord {
            username: username.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            credential_secret: format!("hash-of-{}", username),
        }
    }

    pub async fn save_rejects_duplicates<S: UserStore>(store: &S) {
        store.save(&record("alice", "A", "L")).await.unwrap();

        let err = store.save(&record("alice", "Other", "Person")).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(ref name) if name == "alice"));

        let stored = store.get("alice").await.unwrap();
        assert_eq!(stored.first_name, "A");
    }

    pub async fn get_missing_is_not_found<S: UserStore>(store: &S) {
        let err = store.get("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    pub async fn update_changes_display_attributes_only<S: UserStore>(store: &S) {
        store.save(&record("bob", "Bob", "Builder")).await.unwrap();

        let updated = store
            .update(&ProfileUpdate {
                username: "bob".to_string(),
                first_name: "Robert".to_string(),
                last_name: "Baumeister".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(updated.username, "bob");
        assert_eq!(updated.first_name, "Robert");
        assert_eq!(updated.last_name, "Baumeister");
        assert_eq!(updated.credential_secret, "hash-of-bob");
        assert_eq!(store.get("bob").await.unwrap(), updated);
    }

    pub async fn update_missing_is_not_found<S: UserStore>(store: &S) {
        let err = store
            .update(&ProfileUpdate {
                username: "ghost".to_string(),
                first_name: "G".to_string(),
                last_name: "H".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        // Update must never create the record
        assert!(matches!(
            store.get("ghost").await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    pub async fn delete_is_idempotent<S: UserStore>(store: &S) {
        store.delete("never-existed").await.unwrap();

        store.save(&record("carol", "C", "D")).await.unwrap();
        store.delete("carol").await.unwrap();
        store.delete("carol").await.unwrap();

        assert!(matches!(
            store.get("carol").await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    pub async fn list_is_ordered_by_username<S: UserStore>(store: &S) {
        for name in ["mallory", "al", "zed", "bob"] {
            store.save(&record(name, "F", "L")).await.unwrap();
        }

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.username)
            .collect();
        assert_eq!(names, vec!["al", "bob", "mallory", "zed"]);
    }

    pub async fn concurrent_saves_have_one_winner<S: UserStore + 'static>(store: Arc<S>) {
        let mut handles = Vec::new();
        for i in 0..24 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .save(&record("contended", &format!("writer-{}", i), "L"))
                    .await
            }));
        }

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => successes += 1,
                Err(StoreError::AlreadyExists(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {:?}", e),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 23);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
