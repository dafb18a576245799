//! Catalog filtering and product display models.
//!
//! Products are joined with their category and priced through
//! [`effective_price`](crate::effective_price). Filtering never reorders:
//! output follows catalog insertion order.

use serde::{Deserialize, Serialize};

use crate::models::{Category, Product};
use crate::stats::ProductStats;
use crate::types::{CategoryId, DiscountPercent, Price, ProductId};

/// A product as the API returns it: the stored record plus its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    /// `None` when the category was deleted; the key is then omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Attach each product's category.
#[must_use]
pub fn join_categories(products: Vec<Product>, categories: &[Category]) -> Vec<ProductWithCategory> {
    products
        .into_iter()
        .map(|product| {
            let category = find_category(categories, product.category_id).cloned();
            ProductWithCategory { product, category }
        })
        .collect()
}

fn find_category(categories: &[Category], id: CategoryId) -> Option<&Category> {
    categories.iter().find(|category| category.id == id)
}

/// Display model for a product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub category: Option<Category>,
    pub discount: DiscountPercent,
    /// Set only when discounted, for strike-through display.
    pub original_price: Option<Price>,
    pub final_price: Price,
    pub stats: ProductStats,
}

impl ProductView {
    #[must_use]
    pub fn new(product: &Product, categories: &[Category]) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
            category: find_category(categories, product.category_id).cloned(),
            discount: product.discount,
            original_price: product.discount.is_active().then_some(product.base_price),
            final_price: product.effective_price(),
            stats: product.stats,
        }
    }
}

/// Product views in the requested category, or all when `category` is `None`.
#[must_use]
pub fn list_products(
    products: &[Product],
    categories: &[Category],
    category: Option<CategoryId>,
) -> Vec<ProductView> {
    products
        .iter()
        .filter(|product| category.is_none_or(|id| product.category_id == id))
        .map(|product| ProductView::new(product, categories))
        .collect()
}

/// The storefront's category selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    selected: Option<CategoryId>,
}

impl CatalogFilter {
    /// Select a category; `None` selects all products and drops any prior choice.
    pub const fn select(&mut self, category: Option<CategoryId>) {
        self.selected = category;
    }

    #[must_use]
    pub const fn selected(&self) -> Option<CategoryId> {
        self.selected
    }

    /// Whether `category` is the active button (`None` = "all products").
    #[must_use]
    pub fn is_active(&self, category: Option<CategoryId>) -> bool {
        self.selected == category
    }

    /// Views for the current selection.
    #[must_use]
    pub fn apply(&self, products: &[Product], categories: &[Category]) -> Vec<ProductView> {
        list_products(products, categories, self.selected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn category(id: i32, name: &str) -> Category {
        Category {
            id: CategoryId::new(id),
            name: name.to_owned(),
        }
    }

    fn product(id: i32, category: i32, price: i64, discount: u8) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            base_price: Price::from_units(price),
            category_id: CategoryId::new(category),
            description: String::new(),
            image: None,
            discount: DiscountPercent::new(discount).unwrap(),
            stats: ProductStats::default(),
        }
    }

    fn catalog() -> (Vec<Product>, Vec<Category>) {
        (
            vec![
                product(1, 1, 150_000, 0),
                product(2, 2, 5000, 10),
                product(3, 1, 100, 25),
                product(4, 9, 700, 0),
            ],
            vec![category(1, "Электроника"), category(2, "Одежда")],
        )
    }

    fn ids(views: &[ProductView]) -> Vec<i32> {
        views.iter().map(|v| v.id.as_i32()).collect()
    }

    #[test]
    fn test_filter_exact_category_keeps_order() {
        let (products, categories) = catalog();
        let views = list_products(&products, &categories, Some(CategoryId::new(1)));
        assert_eq!(ids(&views), vec![1, 3]);
    }

    #[test]
    fn test_all_products_includes_dangling_category() {
        let (products, categories) = catalog();
        let views = list_products(&products, &categories, None);
        assert_eq!(ids(&views), vec![1, 2, 3, 4]);
        assert!(views[3].category.is_none());
        assert_eq!(views[0].category, Some(category(1, "Электроника")));
    }

    #[test]
    fn test_view_prices_through_pricing_engine() {
        let (products, categories) = catalog();
        let views = list_products(&products, &categories, None);

        assert_eq!(views[0].original_price, None);
        assert_eq!(views[0].final_price, Price::from_units(150_000));
        assert_eq!(views[2].original_price, Some(Price::from_units(100)));
        assert_eq!(views[2].final_price, Price::from_units(75));
    }

    #[test]
    fn test_selecting_all_resets_and_is_idempotent() {
        let (products, categories) = catalog();
        let mut filter = CatalogFilter::default();

        filter.select(Some(CategoryId::new(2)));
        assert_eq!(ids(&filter.apply(&products, &categories)), vec![2]);

        filter.select(None);
        let first = filter.apply(&products, &categories);
        filter.select(None);
        let second = filter.apply(&products, &categories);

        assert_eq!(first, second);
        assert_eq!(ids(&first), vec![1, 2, 3, 4]);
        assert!(filter.is_active(None));
        assert_eq!(filter.selected(), None);
    }

    #[test]
    fn test_join_omits_missing_category_key() {
        let (products, categories) = catalog();
        let joined = join_categories(products, &categories);

        let dangling = serde_json::to_value(&joined[3]).unwrap();
        assert!(dangling.get("category").is_none());
        assert_eq!(dangling["categoryId"], json!(9));

        let present = serde_json::to_value(&joined[0]).unwrap();
        assert_eq!(present["category"]["name"], json!("Электроника"));
        assert_eq!(present["price"], json!(150_000.0));
    }
}
