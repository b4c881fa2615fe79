//! # Catalog Store
//!
//! Holds the product records and the category list.
//!
//! ## Read Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalog Queries                                      │
//! │                                                                         │
//! │  list()            ──► every product, catalog order                     │
//! │  by_id(3)          ──► Some(product) / None                             │
//! │  by_category(c)    ──► products in category c                           │
//! │  search("denim")   ──► case-insensitive substring over                  │
//! │                        name, description, category                      │
//! │  filter(c, "x")    ──► by_category ∩ search (grid filters)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queries have no side effects. Stock is changed only through the
//! crate-private `reserve` / `release` pair used by [`crate::cart::Cart`].

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Category, Product, ProductId};

/// Aggregate numbers for the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_products: usize,
    pub total_stock: u64,
    pub categories: usize,
}

/// The product catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<Category>,
}

impl Catalog {
    /// Creates a catalog from products. Categories are collected in first-seen
    /// order.
    pub fn new(products: Vec<Product>) -> Self {
        let mut categories = Vec::new();
        for product in &products {
            if !categories.contains(&product.category) {
                categories.push(product.category);
            }
        }
        Catalog {
            products,
            categories,
        }
    }

    /// The storefront's standard six-product catalog.
    pub fn seeded() -> Self {
        Catalog::new(seed_products())
    }

    /// Returns every product in catalog order.
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    /// Looks up a product. Unknown ids are `None`, never an error.
    pub fn by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Like [`Catalog::by_id`] but turns a miss into `ProductNotFound`.
    pub fn require(&self, id: ProductId) -> CoreResult<&Product> {
        self.by_id(id).ok_or(CoreError::ProductNotFound(id))
    }

    pub fn by_category(&self, category: Category) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Case-insensitive substring match over name, description and category.
    ///
    /// An empty (or whitespace-only) query matches every product.
    pub fn search(&self, text: &str) -> Vec<&Product> {
        let needle = text.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| matches_text(p, &needle))
            .collect()
    }

    /// Applies the grid's category filter and search box together.
    pub fn filter(&self, category: Option<Category>, text: Option<&str>) -> Vec<&Product> {
        let needle = text.map(|t| t.trim().to_lowercase()).unwrap_or_default();
        self.products
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .filter(|p| matches_text(p, &needle))
            .collect()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Units available across all products.
    pub fn total_stock(&self) -> u64 {
        self.products.iter().map(|p| u64::from(p.stock)).sum()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            total_products: self.products.len(),
            total_stock: self.total_stock(),
            categories: self.categories.len(),
        }
    }

    /// Takes `quantity` units out of stock.
    pub(crate) fn reserve(&mut self, id: ProductId, quantity: u32) -> CoreResult<()> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CoreError::ProductNotFound(id))?;

        if quantity > product.stock {
            return Err(CoreError::InsufficientStock {
                product_id: id,
                available: product.stock,
                requested: quantity,
            });
        }

        product.stock -= quantity;
        Ok(())
    }

    /// Puts `quantity` units back. Returns `false` when the product no longer
    /// resolves (the units are dropped).
    pub(crate) fn release(&mut self, id: ProductId, quantity: u32) -> bool {
        match self.products.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                product.stock = product.stock.saturating_add(quantity);
                true
            }
            None => false,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::seeded()
    }
}

fn matches_text(product: &Product, needle: &str) -> bool {
    needle.is_empty()
        || product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
        || product.category.as_str().contains(needle)
}

// =============================================================================
// Seed Data
// =============================================================================

/// Color names found in carts saved while the catalog was in Spanish.
/// `beige` and `khaki` were never translated.
const LEGACY_COLORS: [(&str, &str); 7] = [
    ("negro", "black"),
    ("blanco", "white"),
    ("gris", "grey"),
    ("azul marino", "navy"),
    ("verde militar", "olive"),
    ("azul claro", "light blue"),
    ("azul oscuro", "dark blue"),
];

/// Catalog name for an old Spanish color name, if `color` is one.
pub fn legacy_color(color: &str) -> Option<&'static str> {
    let color = color.trim();
    LEGACY_COLORS
        .iter()
        .find(|(old, _)| old.eq_ignore_ascii_case(color))
        .map(|(_, current)| *current)
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: ProductId,
    name: &str,
    description: &str,
    price_cents: i64,
    image: &str,
    category: Category,
    colors: [&str; 3],
    stock: u32,
) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: description.to_string(),
        price_cents,
        image: image.to_string(),
        category,
        sizes: ["S", "M", "L", "XL", "XXL"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        colors: colors.iter().map(|c| c.to_string()).collect(),
        stock,
    }
}

fn seed_products() -> Vec<Product> {
    vec![
        product(
            1,
            "Beige Oversize T-Shirt",
            "Premium cotton oversize tee, made for a relaxed casual look.",
            2999,
            "👕",
            Category::TShirts,
            ["beige", "black", "white"],
            15,
        ),
        product(
            2,
            "Black Oversize Hoodie",
            "Oversize hooded sweatshirt for cool days.",
            4999,
            "🧥",
            Category::Hoodies,
            ["black", "grey", "navy"],
            8,
        ),
        product(
            3,
            "Oversize Cargo Pants",
            "Cargo pants with plenty of pockets, urban and comfortable.",
            5999,
            "👖",
            Category::Pants,
            ["khaki", "black", "olive"],
            12,
        ),
        product(
            4,
            "Oversize Denim Jacket",
            "Classic, versatile oversize denim jacket.",
            7999,
            "🧥",
            Category::Jackets,
            ["light blue", "dark blue", "black"],
            6,
        ),
        product(
            5,
            "Oversize Shorts",
            "Roomy, comfortable shorts for summer.",
            3499,
            "🩳",
            Category::Shorts,
            ["beige", "black", "grey"],
            20,
        ),
        product(
            6,
            "Oversize Polo",
            "Oversize pique cotton polo, smart and casual.",
            3999,
            "👔",
            Category::Polos,
            ["white", "black", "navy"],
            10,
        ),
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_catalog() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.list().len(), 6);
        assert_eq!(catalog.categories(), &Category::ALL);
        assert_eq!(catalog.total_stock(), 15 + 8 + 12 + 6 + 20 + 10);

        let ids: Vec<ProductId> = catalog.list().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_legacy_colors_are_catalog_colors() {
        let catalog = Catalog::seeded();
        for (old, current) in LEGACY_COLORS {
            assert_eq!(legacy_color(old), Some(current));
            assert!(catalog.list().iter().any(|p| p.has_color(current)));
        }
        assert_eq!(legacy_color("Azul Marino"), Some("navy"));
        assert_eq!(legacy_color("black"), None);
        assert_eq!(legacy_color("beige"), None);
    }

    #[test]
    fn test_by_id_unknown_is_none() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.by_id(4).map(|p| p.price_cents), Some(7999));
        assert!(catalog.by_id(99).is_none());
        assert!(matches!(
            catalog.require(99),
            Err(CoreError::ProductNotFound(99))
        ));
    }

    #[test]
    fn test_by_category() {
        let catalog = Catalog::seeded();
        let hoodies = catalog.by_category(Category::Hoodies);
        assert_eq!(hoodies.len(), 1);
        assert_eq!(hoodies[0].id, 2);
    }

    #[test]
    fn test_search_is_case_insensitive_over_all_fields() {
        let catalog = Catalog::seeded();

        // name
        let ids: Vec<_> = catalog.search("DENIM").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![4]);

        // description
        let ids: Vec<_> = catalog.search("pockets").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3]);

        // category
        let ids: Vec<_> = catalog.search("polos").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![6]);

        assert_eq!(catalog.search("   ").len(), 6);
        assert!(catalog.search("sandals").is_empty());
    }

    #[test]
    fn test_filter_intersects_category_and_search() {
        let catalog = Catalog::seeded();

        let all_oversize = catalog.filter(None, Some("oversize"));
        assert_eq!(all_oversize.len(), 6);

        let ids: Vec<_> = catalog
            .filter(Some(Category::Shorts), Some("oversize"))
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![5]);

        assert!(catalog
            .filter(Some(Category::Shorts), Some("denim"))
            .is_empty());
        assert_eq!(catalog.filter(None, None).len(), 6);
    }

    #[test]
    fn test_reserve_and_release() {
        let mut catalog = Catalog::seeded();

        catalog.reserve(4, 5).unwrap();
        assert_eq!(catalog.by_id(4).unwrap().stock, 1);

        let err = catalog.reserve(4, 2).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                product_id: 4,
                available: 1,
                requested: 2
            }
        ));
        assert_eq!(catalog.by_id(4).unwrap().stock, 1);

        assert!(catalog.release(4, 5));
        assert_eq!(catalog.by_id(4).unwrap().stock, 6);
        assert!(!catalog.release(99, 1));
    }

    #[test]
    fn test_stats() {
        let stats = Catalog::seeded().stats();
        assert_eq!(stats.total_products, 6);
        assert_eq!(stats.total_stock, 71);
        assert_eq!(stats.categories, 6);
    }
}
