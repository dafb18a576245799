//! Catalog administration and listing.
//!
//! Products reference categories weakly: a product may point at a category
//! id that no longer exists, and listings tolerate that. Deleting a category
//! cascades to every product in it.

use thiserror::Error;

use flatstore_core::catalog::{ProductWithCategory, join_categories};
use flatstore_core::models::{Category, NewCategory, NewProduct, Product, ProductPatch};
use flatstore_core::{CategoryId, PriceError, ProductId, StatKind};

use crate::db::{Collection, Database, RepositoryError};

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("category {0} not found")]
    CategoryNotFound(CategoryId),

    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Products and categories.
pub struct CatalogService<'a> {
    db: &'a Database,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All products in insertion order, each with its category if it exists.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if a collection cannot be read.
    pub async fn list_products(&self) -> Result<Vec<ProductWithCategory>, CatalogError> {
        let products = self.db.read_all::<Product>(Collection::Products).await?;
        let categories = self.db.read_all::<Category>(Collection::Categories).await?;
        Ok(join_categories(products, &categories))
    }

    /// All categories in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the collection cannot be read.
    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.db.read_all(Collection::Categories).await?)
    }

    /// Add a product with zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidPrice` if the price is not positive.
    pub async fn create_product(&self, new: NewProduct) -> Result<Product, CatalogError> {
        new.price.ensure_positive()?;

        let guard = self.db.begin(&[Collection::Products]).await;
        let mut products = guard.load::<Product>(Collection::Products).await?;
        let product = new.into_product(ProductId::new(products.allocate_id()?))?;
        products.records_mut().push(product.clone());
        guard.save(&products).await?;

        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Merge `patch` into an existing product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if no product has `id`, or
    /// `CatalogError::InvalidPrice` if the patch carries a non-positive price.
    pub async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, CatalogError> {
        let guard = self.db.begin(&[Collection::Products]).await;
        let mut products = guard.load::<Product>(Collection::Products).await?;

        let product = products
            .records_mut()
            .iter_mut()
            .find(|product| product.id == id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        patch.apply(product)?;
        let updated = product.clone();

        guard.save(&products).await?;
        tracing::info!(product_id = %id, "Product updated");
        Ok(updated)
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if no product has `id`.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError> {
        let guard = self.db.begin(&[Collection::Products]).await;
        let mut products = guard.load::<Product>(Collection::Products).await?;

        let before = products.records().len();
        products.records_mut().retain(|product| product.id != id);
        if products.records().len() == before {
            return Err(CatalogError::ProductNotFound(id));
        }

        guard.save(&products).await?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Adjust a product's favorited counter, flooring it at zero.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if no product has `id`.
    pub async fn apply_favorite_delta(
        &self,
        id: ProductId,
        delta: i64,
    ) -> Result<Product, CatalogError> {
        let guard = self.db.begin(&[Collection::Products]).await;
        let mut products = guard.load::<Product>(Collection::Products).await?;

        let product = products
            .records_mut()
            .iter_mut()
            .find(|product| product.id == id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        product.stats.apply_delta(StatKind::Favorited, delta);
        let updated = product.clone();

        guard.save(&products).await?;
        tracing::debug!(product_id = %id, delta, favorited = updated.stats.favorited, "Favorite counter adjusted");
        Ok(updated)
    }

    /// Add a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the collection cannot be written.
    pub async fn create_category(&self, new: NewCategory) -> Result<Category, CatalogError> {
        let guard = self.db.begin(&[Collection::Categories]).await;
        let mut categories = guard.load::<Category>(Collection::Categories).await?;

        let category = Category {
            id: CategoryId::new(categories.allocate_id()?),
            name: new.name,
        };
        categories.records_mut().push(category.clone());
        guard.save(&categories).await?;

        tracing::info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    /// Delete a category and every product in it.
    ///
    /// Returns the number of products removed.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CategoryNotFound` if no category has `id`; no
    /// product is touched in that case.
    pub async fn delete_category(&self, id: CategoryId) -> Result<usize, CatalogError> {
        let guard = self
            .db
            .begin(&[Collection::Products, Collection::Categories])
            .await;

        let mut categories = guard.load::<Category>(Collection::Categories).await?;
        let before = categories.records().len();
        categories.records_mut().retain(|category| category.id != id);
        if categories.records().len() == before {
            return Err(CatalogError::CategoryNotFound(id));
        }

        let mut products = guard.load::<Product>(Collection::Products).await?;
        let products_before = products.records().len();
        products
            .records_mut()
            .retain(|product| product.category_id != id);
        let removed = products_before - products.records().len();

        guard.save(&categories).await?;
        guard.save(&products).await?;

        tracing::info!(category_id = %id, products_removed = removed, "Category deleted");
        Ok(removed)
    }
}
