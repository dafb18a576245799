//! Default data seeding.
//!
//! # Usage
//!
//! ```bash
//! fs-cli seed --data-dir data
//! ```
//!
//! Only collections that have never been written are touched, so running
//! the command twice is harmless.

use std::path::Path;

use flatstore_storefront::db::Collection;
use flatstore_storefront::db::seed::{SeedError, seed_defaults};

use super::open_database;

/// Seed the data directory and return the collections that received data.
///
/// # Errors
///
/// Returns `SeedError` if a collection cannot be read or written.
pub async fn run(data_dir: &Path) -> Result<Vec<Collection>, SeedError> {
    let db = open_database(data_dir)?;
    let seeded = seed_defaults(&db).await?;

    if seeded.is_empty() {
        tracing::info!("Nothing to seed, every collection already has data");
    } else {
        for collection in &seeded {
            tracing::info!("Seeded {}", collection);
        }
    }
    Ok(seeded)
}
