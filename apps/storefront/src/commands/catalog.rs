//! # Catalog Commands
//!
//! Product grid, product detail and store statistics.
//!
//! ## Filter Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Grid Filters                                 │
//! │                                                                         │
//! │  Category buttons ── "hoodies" ──┐                                     │
//! │                                  ├──► list_products(query)             │
//! │  Search box ──────── "black" ────┘         │                            │
//! │                                            ▼                            │
//! │                        parse category (unknown → INVALID_INPUT)        │
//! │                        trim search (> 100 chars → INVALID_INPUT)        │
//! │                                            │                            │
//! │                                            ▼                            │
//! │                        catalog.filter(category, text)                  │
//! │                        = by_category ∩ search, catalog order           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use fiftyone_core::validation::validate_search_query;
use fiftyone_core::{CatalogStats, Category, CoreError, Money, Product, ProductId};

use crate::error::{ApiError, ApiResult};
use crate::state::CartLedger;

/// Grid filters. Both are optional; an empty search matches everything.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// Catalog numbers plus the live cart figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub catalog: CatalogStats,
    pub cart_items: u32,
    pub cart_total: Money,
}

/// Lists products matching the grid filters.
pub fn list_products(ledger: &CartLedger, query: &ProductQuery) -> ApiResult<Vec<Product>> {
    debug!(category = ?query.category, search = ?query.search, "list_products command");

    let category = query
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty() && c.trim() != "all")
        .map(str::parse::<Category>)
        .transpose()
        .map_err(CoreError::from)?;

    let search = query
        .search
        .as_deref()
        .map(validate_search_query)
        .transpose()
        .map_err(CoreError::from)?;

    Ok(ledger.with_ledger(|l| {
        l.catalog
            .filter(category, search.as_deref())
            .into_iter()
            .cloned()
            .collect()
    }))
}

/// Gets one product for the detail panel.
pub fn get_product(ledger: &CartLedger, product_id: ProductId) -> ApiResult<Product> {
    debug!(product_id, "get_product command");
    ledger
        .with_ledger(|l| l.catalog.by_id(product_id).cloned())
        .ok_or_else(|| ApiError::not_found("Product", product_id))
}

/// The category buttons, in catalog order.
pub fn list_categories(ledger: &CartLedger) -> Vec<Category> {
    ledger.with_ledger(|l| l.catalog.categories().to_vec())
}

/// Store statistics.
pub fn get_stats(ledger: &CartLedger) -> StatsResponse {
    ledger.with_ledger(|l| StatsResponse {
        catalog: l.catalog.stats(),
        cart_items: l.cart.item_count(),
        cart_total: l.cart.total(&l.catalog),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use fiftyone_core::{Catalog, EventBus};
    use fiftyone_store::Storage;
    use std::sync::Arc;

    fn ledger() -> CartLedger {
        CartLedger::new(
            Catalog::seeded(),
            Storage::in_memory().carts(),
            Arc::new(EventBus::new()),
        )
    }

    fn query(category: Option<&str>, search: Option<&str>) -> ProductQuery {
        ProductQuery {
            category: category.map(String::from),
            search: search.map(String::from),
        }
    }

    #[test]
    fn test_list_products_filters() {
        let ledger = ledger();

        assert_eq!(list_products(&ledger, &query(None, None)).unwrap().len(), 6);
        assert_eq!(
            list_products(&ledger, &query(Some("all"), Some(""))).unwrap().len(),
            6
        );

        let found = list_products(&ledger, &query(Some("jackets"), Some("DENIM"))).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 4);
    }

    #[test]
    fn test_unknown_category_is_invalid_input() {
        let err = list_products(&ledger(), &query(Some("sandals"), None)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_get_product() {
        let ledger = ledger();
        assert_eq!(get_product(&ledger, 2).unwrap().name, "Black Oversize Hoodie");
        assert_eq!(get_product(&ledger, 42).unwrap_err().code, ErrorCode::NotFound);
    }

    #[test]
    fn test_stats_include_cart() {
        let ledger = ledger();
        ledger.add(1, 2, "M", None).unwrap();

        let stats = get_stats(&ledger);
        assert_eq!(stats.catalog.total_products, 6);
        assert_eq!(stats.catalog.total_stock, 71);
        assert_eq!(stats.cart_items, 2);
        assert_eq!(stats.cart_total.cents(), 5998);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalProducts"], 6);
        assert_eq!(json["cartItems"], 2);
    }

    #[test]
    fn test_categories() {
        assert_eq!(list_categories(&ledger()), Category::ALL.to_vec());
    }
}
