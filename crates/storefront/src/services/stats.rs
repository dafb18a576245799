//! Admin dashboard figures.

use flatstore_core::DashboardStats;
use flatstore_core::models::{Order, Product};

use crate::db::{Collection, Database, RepositoryError};

/// Revenue, order count and best sellers.
///
/// # Errors
///
/// Returns `RepositoryError` if products or orders cannot be read.
pub async fn dashboard(db: &Database) -> Result<DashboardStats, RepositoryError> {
    let products = db.read_all::<Product>(Collection::Products).await?;
    let orders = db.read_all::<Order>(Collection::Orders).await?;
    Ok(DashboardStats::compute(&products, &orders))
}
