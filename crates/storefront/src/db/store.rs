//! Collection storage backends.
//!
//! A collection is persisted as one JSON document:
//!
//! ```json
//! { "nextId": 3, "records": [ { "id": 1, ... }, { "id": 2, ... } ] }
//! ```
//!
//! Files written by older deployments hold a bare array of records; those
//! are accepted on read and get `nextId = max(id) + 1`.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Collection, RepositoryError};

/// The full contents of one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSnapshot {
    /// Id handed to the next inserted record. Never decreases.
    pub next_id: i32,
    pub records: Vec<Value>,
}

impl Default for CollectionSnapshot {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: Vec::new(),
        }
    }
}

impl CollectionSnapshot {
    /// Build a snapshot from a legacy bare array of records.
    #[must_use]
    pub fn from_records(records: Vec<Value>) -> Self {
        let max_id = records
            .iter()
            .filter_map(|record| record.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0);
        let next_id = i32::try_from(max_id.saturating_add(1)).unwrap_or(i32::MAX);
        Self { next_id, records }
    }

    /// Decode either the envelope or a bare array.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the text is neither shape.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OnDisk {
            Envelope(CollectionSnapshot),
            Legacy(Vec<Value>),
        }

        Ok(match serde_json::from_str(raw)? {
            OnDisk::Envelope(snapshot) => snapshot,
            OnDisk::Legacy(records) => Self::from_records(records),
        })
    }
}

/// Read and overwrite whole collections.
///
/// Callers serialize writers per collection; implementations only need to
/// make each single `write` atomic.
pub trait PersistenceStore: Send + Sync {
    /// Read a collection. Missing or unreadable data reads as empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` only when the medium itself fails in a
    /// way that is not "missing".
    fn read(&self, collection: Collection) -> Result<CollectionSnapshot, RepositoryError>;

    /// Replace a collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the medium is unwritable.
    fn write(
        &self,
        collection: Collection,
        snapshot: &CollectionSnapshot,
    ) -> Result<(), RepositoryError>;

    /// Whether the backing medium can currently be read.
    fn is_ready(&self) -> bool {
        true
    }
}

/// Collections stored as `<data_dir>/<collection>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Open the store, creating the data directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the directory cannot be created.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }
}

impl PersistenceStore for JsonFileStore {
    fn read(&self, collection: Collection) -> Result<CollectionSnapshot, RepositoryError> {
        let path = self.path(collection);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CollectionSnapshot::default());
            }
            Err(e) => return Err(e.into()),
        };

        match CollectionSnapshot::parse(&raw) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                tracing::warn!(
                    collection = %collection,
                    path = %path.display(),
                    error = %e,
                    "Collection file is corrupt, reading as empty"
                );
                Ok(CollectionSnapshot::default())
            }
        }
    }

    fn write(
        &self,
        collection: Collection,
        snapshot: &CollectionSnapshot,
    ) -> Result<(), RepositoryError> {
        let path = self.path(collection);
        let tmp = path.with_extension("json.tmp");

        let body = serde_json::to_vec_pretty(snapshot)?;
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&body)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;

        tracing::debug!(
            collection = %collection,
            records = snapshot.records.len(),
            "Collection written"
        );
        Ok(())
    }

    fn is_ready(&self) -> bool {
        fs::read_dir(&self.data_dir).is_ok()
    }
}

/// Process-local store for tests and throwaway servers.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<Collection, CollectionSnapshot>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceStore for InMemoryStore {
    fn read(&self, collection: Collection) -> Result<CollectionSnapshot, RepositoryError> {
        let collections = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(collections.get(&collection).cloned().unwrap_or_default())
    }

    fn write(
        &self,
        collection: Collection,
        snapshot: &CollectionSnapshot,
    ) -> Result<(), RepositoryError> {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(collection, snapshot.clone());
        Ok(())
    }
}
