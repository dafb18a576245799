//! Product and category records.

use serde::{Deserialize, Serialize};

use crate::stats::ProductStats;
use crate::types::{CategoryId, DiscountPercent, Price, PriceError, ProductId, effective_price};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Price before discount.
    #[serde(rename = "price")]
    pub base_price: Price,
    /// Weak reference; the category may have been deleted.
    pub category_id: CategoryId,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub discount: DiscountPercent,
    #[serde(default)]
    pub stats: ProductStats,
}

impl Product {
    /// Price after the product's discount.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        effective_price(self.base_price, self.discount)
    }
}

/// Admin request to add a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub category_id: CategoryId,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub discount: DiscountPercent,
}

impl NewProduct {
    /// Build the stored product with fresh counters.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotPositive` if the price is zero or negative.
    pub fn into_product(self, id: ProductId) -> Result<Product, PriceError> {
        Ok(Product {
            id,
            name: self.name,
            base_price: self.price.ensure_positive()?,
            category_id: self.category_id,
            description: self.description,
            image: self.image,
            discount: self.discount,
            stats: ProductStats::default(),
        })
    }
}

/// Partial product update.
///
/// Only the listed fields can change; any other key is rejected when the
/// patch is deserialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<DiscountPercent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ProductStats>,
}

impl ProductPatch {
    /// Merge the present fields into `product`.
    ///
    /// Validation happens before anything is written, so a rejected patch
    /// leaves the product untouched.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotPositive` if a new price is zero or negative.
    pub fn apply(self, product: &mut Product) -> Result<(), PriceError> {
        let price = self.price.map(Price::ensure_positive).transpose()?;

        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = price {
            product.base_price = price;
        }
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(image) = self.image {
            product.image = Some(image);
        }
        if let Some(discount) = self.discount {
            product.discount = discount;
        }
        if let Some(stats) = self.stats {
            product.stats = stats;
        }
        Ok(())
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Admin request to add a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn phone() -> Product {
        serde_json::from_value(json!({
            "id": 1,
            "name": "Смартфон",
            "price": 150000,
            "categoryId": 1,
            "description": "Современный смартфон",
            "image": "/assets/phone.jpg",
            "discount": 0,
            "stats": { "purchased": 0, "favorited": 0 }
        }))
        .unwrap()
    }

    #[test]
    fn test_product_reads_stored_shape() {
        let product = phone();
        assert_eq!(product.base_price, Price::from_units(150_000));
        assert_eq!(product.category_id, CategoryId::new(1));
        assert_eq!(product.effective_price(), product.base_price);
    }

    #[test]
    fn test_product_without_optional_fields() {
        let product: Product = serde_json::from_value(json!({
            "id": 3,
            "name": "Книга",
            "price": 2500,
            "categoryId": 3
        }))
        .unwrap();
        assert_eq!(product.discount, DiscountPercent::NONE);
        assert_eq!(product.stats, ProductStats::default());
        assert!(product.image.is_none());

        let value = serde_json::to_value(&product).unwrap();
        assert!(value.get("image").is_none());
        assert_eq!(value["discount"], json!(0));
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let mut product = phone();
        let patch: ProductPatch =
            serde_json::from_value(json!({ "price": 120000, "discount": 10 })).unwrap();
        patch.apply(&mut product).unwrap();

        assert_eq!(product.base_price, Price::from_units(120_000));
        assert_eq!(product.discount, DiscountPercent::new(10).unwrap());
        assert_eq!(product.name, "Смартфон");
        assert_eq!(product.effective_price(), Price::from_units(108_000));
    }

    #[test]
    fn test_patch_rejects_unknown_fields() {
        let result = serde_json::from_value::<ProductPatch>(json!({ "id": 99 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_with_bad_price_leaves_product_untouched() {
        let mut product = phone();
        let patch = ProductPatch {
            name: Some("renamed".to_owned()),
            price: Some(Price::ZERO),
            ..ProductPatch::default()
        };
        assert_eq!(patch.apply(&mut product), Err(PriceError::NotPositive));
        assert_eq!(product, phone());
    }

    #[test]
    fn test_new_product_starts_with_zero_stats() {
        let new_product: NewProduct = serde_json::from_value(json!({
            "name": "Футболка",
            "price": 5000,
            "categoryId": 2,
            "description": "Хлопковая футболка",
            "discount": 5
        }))
        .unwrap();

        let product = new_product.into_product(ProductId::new(4)).unwrap();
        assert_eq!(product.id, ProductId::new(4));
        assert_eq!(product.stats, ProductStats::default());
        assert_eq!(product.discount, DiscountPercent::new(5).unwrap());
    }
}
