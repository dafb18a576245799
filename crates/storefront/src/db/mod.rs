//! Flat-file data access for the storefront.
//!
//! # Collections
//!
//! - `products` - Catalog products with their purchase/favorite counters
//! - `categories` - Product categories
//! - `orders` - Completed orders with line item snapshots
//! - `reviews` - Product reviews and admin replies
//! - `users` - Accounts with Argon2 password hashes
//!
//! Every collection is read whole, mutated in memory and written back whole.
//! Writers take a per-collection lock through [`Database::begin`]; an
//! operation spanning several collections locks them in [`Collection`]
//! order so two writers can never deadlock.
//!
//! Store calls are blocking file I/O and run on tokio's blocking pool.

pub mod seed;
pub mod store;
pub mod users;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

pub use store::{CollectionSnapshot, InMemoryStore, JsonFileStore, PersistenceStore};

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The storage medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored data doesn't match the expected shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Unique constraint violation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A write was attempted without holding the collection lock.
    #[error("collection {0} is not locked by this operation")]
    NotLocked(Collection),

    /// The id counter ran out.
    #[error("collection {0} has no ids left")]
    IdsExhausted(Collection),

    /// A blocking storage task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A named collection.
///
/// The declaration order is the lock acquisition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collection {
    Products,
    Categories,
    Orders,
    Reviews,
    Users,
}

impl Collection {
    pub const ALL: [Self; 5] = [
        Self::Products,
        Self::Categories,
        Self::Orders,
        Self::Reviews,
        Self::Users,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Orders => "orders",
            Self::Reviews => "reviews",
            Self::Users => "users",
        }
    }

    /// File name under the data directory.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One writer lock per collection.
#[derive(Debug, Default)]
struct CollectionLocks {
    products: Mutex<()>,
    categories: Mutex<()>,
    orders: Mutex<()>,
    reviews: Mutex<()>,
    users: Mutex<()>,
}

impl CollectionLocks {
    const fn get(&self, collection: Collection) -> &Mutex<()> {
        match collection {
            Collection::Products => &self.products,
            Collection::Categories => &self.categories,
            Collection::Orders => &self.orders,
            Collection::Reviews => &self.reviews,
            Collection::Users => &self.users,
        }
    }
}

/// Handle to the persisted collections.
///
/// Cheap to clone; all clones share the same store and locks.
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn PersistenceStore>,
    locks: Arc<CollectionLocks>,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Database {
    pub fn new(store: impl PersistenceStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
            locks: Arc::new(CollectionLocks::default()),
        }
    }

    /// A database over a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new())
    }

    /// Whether the backing store is readable.
    pub async fn is_ready(&self) -> bool {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.is_ready())
            .await
            .unwrap_or(false)
    }

    /// Read every record of a collection without locking.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a record doesn't decode
    /// as `T`, or `RepositoryError::Io` if the store fails.
    pub async fn read_all<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>, RepositoryError> {
        let snapshot = read_snapshot(&self.store, collection).await?;
        decode_records(collection, snapshot.records)
    }

    /// Lock `collections` for writing, in [`Collection`] order.
    pub async fn begin(&self, collections: &[Collection]) -> WriteGuard<'_> {
        let mut order = collections.to_vec();
        order.sort_unstable();
        order.dedup();

        let mut guards = Vec::with_capacity(order.len());
        for collection in &order {
            guards.push(self.locks.get(*collection).lock().await);
        }

        WriteGuard {
            store: Arc::clone(&self.store),
            locked: order,
            _guards: guards,
        }
    }
}

/// Exclusive write access to a set of collections.
///
/// Locks are released when the guard is dropped.
pub struct WriteGuard<'a> {
    store: Arc<dyn PersistenceStore>,
    locked: Vec<Collection>,
    _guards: Vec<MutexGuard<'a, ()>>,
}

impl WriteGuard<'_> {
    /// Load a locked collection for mutation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotLocked` if the collection isn't held by
    /// this guard, otherwise the same errors as [`Database::read_all`].
    pub async fn load<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Table<T>, RepositoryError> {
        self.ensure_locked(collection)?;
        let snapshot = read_snapshot(&self.store, collection).await?;
        Ok(Table {
            collection,
            next_id: snapshot.next_id,
            records: decode_records(collection, snapshot.records)?,
        })
    }

    /// Write a table back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotLocked` if the table's collection isn't
    /// held by this guard, or `RepositoryError::Io` if the store fails.
    pub async fn save<T: Serialize>(&self, table: &Table<T>) -> Result<(), RepositoryError> {
        self.ensure_locked(table.collection)?;
        let snapshot = CollectionSnapshot {
            next_id: table.next_id,
            records: table
                .records
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<_>, _>>()?,
        };

        let store = Arc::clone(&self.store);
        let collection = table.collection;
        tokio::task::spawn_blocking(move || store.write(collection, &snapshot)).await?
    }

    fn ensure_locked(&self, collection: Collection) -> Result<(), RepositoryError> {
        if self.locked.contains(&collection) {
            Ok(())
        } else {
            Err(RepositoryError::NotLocked(collection))
        }
    }
}

/// Typed, in-memory copy of one collection.
#[derive(Debug)]
pub struct Table<T> {
    collection: Collection,
    next_id: i32,
    records: Vec<T>,
}

impl<T> Table<T> {
    /// Reserve the next id. The counter is persisted with the next `save`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::IdsExhausted` once the counter hits `i32::MAX`.
    pub fn allocate_id(&mut self) -> Result<i32, RepositoryError> {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or(RepositoryError::IdsExhausted(self.collection))?;
        Ok(id)
    }

    #[must_use]
    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut Vec<T> {
        &mut self.records
    }

    #[must_use]
    pub const fn next_id(&self) -> i32 {
        self.next_id
    }
}

async fn read_snapshot(
    store: &Arc<dyn PersistenceStore>,
    collection: Collection,
) -> Result<CollectionSnapshot, RepositoryError> {
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || store.read(collection)).await?
}

fn decode_records<T: DeserializeOwned>(
    collection: Collection,
    records: Vec<serde_json::Value>,
) -> Result<Vec<T>, RepositoryError> {
    records
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid record in {collection}: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: i32,
        label: String,
    }

    #[tokio::test]
    async fn test_ids_are_monotonic_across_deletes() {
        let db = Database::in_memory();

        let guard = db.begin(&[Collection::Reviews]).await;
        let mut table: Table<Row> = guard.load(Collection::Reviews).await.unwrap();
        for label in ["a", "b"] {
            let id = table.allocate_id().unwrap();
            table.records_mut().push(Row {
                id,
                label: label.to_owned(),
            });
        }
        table.records_mut().retain(|row| row.id != 2);
        guard.save(&table).await.unwrap();
        drop(guard);

        let guard = db.begin(&[Collection::Reviews]).await;
        let mut table: Table<Row> = guard.load(Collection::Reviews).await.unwrap();
        assert_eq!(table.allocate_id().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_save_requires_lock() {
        let db = Database::in_memory();
        let guard = db.begin(&[Collection::Orders]).await;
        let result = guard.load::<Row>(Collection::Products).await;
        assert!(matches!(
            result,
            Err(RepositoryError::NotLocked(Collection::Products))
        ));
    }

    #[tokio::test]
    async fn test_begin_sorts_and_dedups() {
        let db = Database::in_memory();
        let guard = db
            .begin(&[Collection::Orders, Collection::Products, Collection::Orders])
            .await;
        assert_eq!(guard.locked, vec![Collection::Products, Collection::Orders]);
    }

    #[tokio::test]
    async fn test_mismatched_record_is_corruption() {
        let db = Database::in_memory();
        let guard = db.begin(&[Collection::Categories]).await;
        let mut table: Table<serde_json::Value> = guard.load(Collection::Categories).await.unwrap();
        table
            .records_mut()
            .push(serde_json::json!({"id": "one", "label": 3}));
        guard.save(&table).await.unwrap();
        drop(guard);

        let result = db.read_all::<Row>(Collection::Categories).await;
        assert!(matches!(result, Err(RepositoryError::DataCorruption(_))));
    }
}
