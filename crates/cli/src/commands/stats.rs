//! Dashboard statistics command.

use std::path::Path;

use flatstore_core::DashboardStats;
use flatstore_storefront::db::RepositoryError;
use flatstore_storefront::services::stats::dashboard;

use super::open_database;

/// Log revenue, order count and the best sellers.
///
/// # Errors
///
/// Returns `RepositoryError` if the products or orders cannot be read.
pub async fn run(data_dir: &Path) -> Result<DashboardStats, RepositoryError> {
    let db = open_database(data_dir)?;
    let stats = dashboard(&db).await?;

    tracing::info!("Total revenue: {}", stats.total_revenue);
    tracing::info!("Total orders: {}", stats.total_orders);
    for (rank, product) in stats.top_products.iter().enumerate() {
        tracing::info!(
            "#{} {} ({} sold)",
            rank + 1,
            product.name,
            product.stats.purchased
        );
    }
    Ok(stats)
}
