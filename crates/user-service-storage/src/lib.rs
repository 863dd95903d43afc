//! # user-service-storage
//!
//! Persistence layer for the user service.
//!
//! Two layers live here:
//!
//! - a key-value [`Storage`] abstraction with a RocksDB implementation, and
//! - the [`UserStore`] contract over user records, with an in-memory adapter
//!   and an adapter built on any [`Storage`] engine.

#![warn(clippy::all)]

pub mod column_families;
pub mod errors;
pub mod rocksdb_impl;
pub mod traits;
pub mod users;

pub use column_families::*;
pub use errors::{Result, StorageError, StoreError, StoreResult};
pub use rocksdb_impl::RocksDbStorage;
pub use traits::Storage;
pub use users::{KvUserStore, MemoryUserStore, ProfileUpdate, UserRecord, UserStore};
