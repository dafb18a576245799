//! CLI command implementations.

pub mod admin;
pub mod seed;
pub mod stats;

use std::path::Path;

use flatstore_storefront::db::{Database, RepositoryError, store::JsonFileStore};

/// Open the collection files under `data_dir`.
fn open_database(data_dir: &Path) -> Result<Database, RepositoryError> {
    tracing::info!("Opening data directory {}", data_dir.display());
    Ok(Database::new(JsonFileStore::open(data_dir)?))
}
