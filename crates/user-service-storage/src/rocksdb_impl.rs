//! RocksDB storage implementation.

use crate::{
    column_families::all_column_families,
    errors::{Result, StorageError},
    traits::{deserialize_value, serialize_key, serialize_value, Storage},
};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, Options, DB};
use serde::{de::DeserializeOwned, Serialize};
use std::{path::Path, sync::Arc};
use tokio::sync::Mutex;
use tracing::debug;

/// RocksDB storage implementation
///
/// Engine calls run on the blocking pool, so a slow disk never stalls the
/// async workers and callers can put a timeout around any operation.
pub struct RocksDbStorage {
    db: Arc<DB>,
    /// Serializes every mutation so conditional writes are test-and-set.
    write_lock: Mutex<()>,
    /// Keeps a scratch directory alive for databases opened with `open_test`
    _temp_dir: Option<tempfile::TempDir>,
}

impl RocksDbStorage {
    /// Open RocksDB database at the specified path
    ///
    /// Creates all required column families if they don't exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let db = DB::open_cf(&opts, &path, all_column_families()).map_err(db_error)?;

        debug!("Opened RocksDB at {:?}", path.as_ref());

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
            _temp_dir: None,
        })
    }

    /// Open a RocksDB database in a fresh temporary directory
    ///
    /// The directory lives as long as the returned storage. This is public for
    /// use in other crates' test modules.
    pub fn open_test() -> Result<Self> {
        let temp_dir = tempfile::TempDir::new().map_err(StorageError::IoError)?;
        let mut storage = Self::open(temp_dir.path())?;
        storage._temp_dir = Some(temp_dir);
        Ok(storage)
    }

    /// Run `op` against a column family on the blocking pool
    async fn blocking<T, F>(&self, cf: &str, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&DB, &ColumnFamily) -> Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let cf = cf.to_string();

        tokio::task::spawn_blocking(move || {
            let handle = db
                .cf_handle(&cf)
                .ok_or_else(|| StorageError::InvalidColumnFamily(cf.clone()))?;
            op(&db, handle)
        })
        .await
        .map_err(|e| StorageError::Database(e.to_string()))?
    }

    async fn read(&self, cf: &str, key_bytes: Vec<u8>) -> Result<Option<Vec<u8>>> {
        self.blocking(cf, move |db, handle| {
            db.get_cf(handle, &key_bytes).map_err(db_error)
        })
        .await
    }

    async fn contains(&self, cf: &str, key_bytes: Vec<u8>) -> Result<bool> {
        self.blocking(cf, move |db, handle| {
            let pinned = db.get_pinned_cf(handle, &key_bytes).map_err(db_error)?;
            Ok(pinned.is_some())
        })
        .await
    }

    async fn write(&self, cf: &str, key_bytes: Vec<u8>, value_bytes: Vec<u8>) -> Result<()> {
        self.blocking(cf, move |db, handle| {
            db.put_cf(handle, &key_bytes, &value_bytes).map_err(db_error)
        })
        .await
    }
}

fn db_error(e: rocksdb::Error) -> StorageError {
    StorageError::Database(e.to_string())
}

#[async_trait]
impl Storage for RocksDbStorage {
    async fn get<K, V>(&self, cf: &str, key: &K) -> Result<Option<V>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned,
    {
        let key_bytes = serialize_key(key)?;

        match self.read(cf, key_bytes).await? {
            Some(bytes) => Ok(Some(deserialize_value(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn put<K, V>(&self, cf: &str, key: &K, value: &V) -> Result<()>
    where
        K: Serialize + Send + Sync,
        V: Serialize + Send + Sync,
    {
        let key_bytes = serialize_key(key)?;
        let value_bytes = serialize_value(value)?;

        let _guard = self.write_lock.lock().await;
        self.write(cf, key_bytes, value_bytes).await
    }

    async fn put_if_absent<K, V>(&self, cf: &str, key: &K, value: &V) -> Result<bool>
    where
        K: Serialize + Send + Sync,
        V: Serialize + Send + Sync,
    {
        let key_bytes = serialize_key(key)?;
        let value_bytes = serialize_value(value)?;

        let _guard = self.write_lock.lock().await;
        if self.contains(cf, key_bytes.clone()).await? {
            return Ok(false);
        }
        self.write(cf, key_bytes, value_bytes).await?;

        Ok(true)
    }

    async fn update_if_present<K, V, F>(&self, cf: &str, key: &K, update: F) -> Result<Option<V>>
    where
        K: Serialize + Send + Sync,
        V: Serialize + DeserializeOwned + Send,
        F: FnOnce(V) -> V + Send,
    {
        let key_bytes = serialize_key(key)?;

        let _guard = self.write_lock.lock().await;
        let current = match self.read(cf, key_bytes.clone()).await? {
            Some(bytes) => deserialize_value::<V>(&bytes)?,
            None => return Ok(None),
        };

        let updated = update(current);
        let value_bytes = serialize_value(&updated)?;
        self.write(cf, key_bytes, value_bytes).await?;

        Ok(Some(updated))
    }

    async fn delete<K>(&self, cf: &str, key: &K) -> Result<()>
    where
        K: Serialize + Send + Sync,
    {
        let key_bytes = serialize_key(key)?;

        let _guard = self.write_lock.lock().await;
        self.blocking(cf, move |db, handle| {
            db.delete_cf(handle, &key_bytes).map_err(db_error)
        })
        .await
    }

    async fn exists<K>(&self, cf: &str, key: &K) -> Result<bool>
    where
        K: Serialize + Send + Sync,
    {
        let key_bytes = serialize_key(key)?;
        self.contains(cf, key_bytes).await
    }

    async fn scan_all<V>(&self, cf: &str) -> Result<Vec<(Vec<u8>, V)>>
    where
        V: DeserializeOwned,
    {
        let entries = self
            .blocking(cf, |db, handle| {
                db.iterator_cf(handle, rocksdb::IteratorMode::Start)
                    .map(|item| {
                        item.map(|(key, value)| (key.to_vec(), value.to_vec()))
                            .map_err(db_error)
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .await?;

        entries
            .into_iter()
            .map(|(key, value)| deserialize_value(&value).map(|v| (key, v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_families::CF_USERS;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        name: String,
        value: u64,
    }

    fn data(name: &str, value: u64) -> TestData {
        TestData {
            name: name.to_string(),
            value,
        }
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let storage = RocksDbStorage::open_test().unwrap();

        storage.put(CF_USERS, &"alice", &data("alice", 42)).await.unwrap();

        let result: Option<TestData> = storage.get(CF_USERS, &"alice").await.unwrap();
        assert_eq!(result, Some(data("alice", 42)));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let storage = RocksDbStorage::open_test().unwrap();

        let result: Option<TestData> = storage.get(CF_USERS, &"nobody").await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let storage = RocksDbStorage::open_test().unwrap();

        storage.put(CF_USERS, &"alice", &data("alice", 1)).await.unwrap();
        assert!(storage.exists(CF_USERS, &"alice").await.unwrap());

        storage.delete(CF_USERS, &"alice").await.unwrap();
        storage.delete(CF_USERS, &"alice").await.unwrap();

        assert!(!storage.exists(CF_USERS, &"alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_put_if_absent_keeps_first_value() {
        let storage = RocksDbStorage::open_test().unwrap();

        assert!(storage
            .put_if_absent(CF_USERS, &"alice", &data("first", 1))
            .await
            .unwrap());
        assert!(!storage
            .put_if_absent(CF_USERS, &"alice", &data("second", 2))
            .await
            .unwrap());

        let stored: Option<TestData> = storage.get(CF_USERS, &"alice").await.unwrap();
        assert_eq!(stored, Some(data("first", 1)));
    }

    #[tokio::test]
    async fn test_update_if_present_requires_existing_key() {
        let storage = RocksDbStorage::open_test().unwrap();

        let missing = storage
            .update_if_present(CF_USERS, &"alice", |d: TestData| d)
            .await
            .unwrap();
        assert_eq!(missing, None);
        assert!(!storage.exists(CF_USERS, &"alice").await.unwrap());

        storage.put(CF_USERS, &"alice", &data("alice", 1)).await.unwrap();
        let updated = storage
            .update_if_present(CF_USERS, &"alice", |mut d: TestData| {
                d.value += 1;
                d
            })
            .await
            .unwrap();
        assert_eq!(updated, Some(data("alice", 2)));

        let stored: Option<TestData> = storage.get(CF_USERS, &"alice").await.unwrap();
        assert_eq!(stored, Some(data("alice", 2)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_not_lost() {
        let storage = Arc::new(RocksDbStorage::open_test().unwrap());
        storage.put(CF_USERS, &"counter", &data("counter", 0)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let storage = Arc::clone(&storage);
            handles.push(tokio::spawn(async move {
                storage
                    .update_if_present(CF_USERS, &"counter", |mut d: TestData| {
                        d.value += 1;
                        d
                    })
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stored: Option<TestData> = storage.get(CF_USERS, &"counter").await.unwrap();
        assert_eq!(stored, Some(data("counter", 16)));
    }

    #[tokio::test]
    async fn test_concurrent_put_if_absent_single_winner() {
        let storage = Arc::new(RocksDbStorage::open_test().unwrap());

        let mut handles = Vec::new();
        for i in 0..16u64 {
            let storage = Arc::clone(&storage);
            handles.push(tokio::spawn(async move {
                storage
                    .put_if_absent(CF_USERS, &"contended", &data("writer", i))
                    .await
                    .unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_scan_all() {
        let storage = RocksDbStorage::open_test().unwrap();

        storage.put(CF_USERS, &"a", &data("a", 1)).await.unwrap();
        storage.put(CF_USERS, &"b", &data("b", 2)).await.unwrap();

        let results: Vec<(Vec<u8>, TestData)> = storage.scan_all(CF_USERS).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_column_family() {
        let storage = RocksDbStorage::open_test().unwrap();

        let result: Result<Option<TestData>> = storage.get("missing", &"a").await;
        assert!(matches!(result, Err(StorageError::InvalidColumnFamily(_))));
    }
}
