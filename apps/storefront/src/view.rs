//! # Text Views
//!
//! Renders storefront state as plain text. Every function here is a pure
//! `state -> String`; nothing reads the ledger or touches storage.
//!
//! ## Panels
//! ```text
//! ┌────────────────────────────┬────────────────────────────────────────────┐
//! │ Panel                      │ Rendered from                              │
//! ├────────────────────────────┼────────────────────────────────────────────┤
//! │ Catalog grid               │ Vec<Product>                               │
//! │ Product detail             │ Product                                    │
//! │ Cart panel                 │ CartResponse                               │
//! │ Checkout panel             │ CheckoutSummary                            │
//! │ Success panel              │ Order                                      │
//! │ Order history              │ Vec<Order>                                 │
//! │ Stats                      │ StatsResponse                              │
//! │ Notifications              │ Vec<Notification>                          │
//! │ Errors                     │ ApiError                                   │
//! └────────────────────────────┴────────────────────────────────────────────┘
//! ```

use std::fmt::Write;

use fiftyone_core::{Order, Product};

use crate::checkout::CheckoutSummary;
use crate::commands::cart::CartResponse;
use crate::commands::catalog::StatsResponse;
use crate::error::ApiError;
use crate::notifier::Notification;
use crate::state::AppConfig;

const RULE: &str = "────────────────────────────────────────";

// =============================================================================
// Catalog
// =============================================================================

/// The product grid.
pub fn render_catalog(config: &AppConfig, products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found\n".to_string();
    }

    let mut out = String::new();
    for product in products {
        let _ = writeln!(
            out,
            "[{}] {} {:<28} {:>9}  {}",
            product.id,
            product.image,
            product.name,
            config.format_currency(product.price()),
            stock_label(product)
        );
    }
    out
}

/// The detail panel: description, options and stock.
pub fn render_product(config: &AppConfig, product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", product.image, product.name);
    let _ = writeln!(out, "{}", product.description);
    let _ = writeln!(out, "Price:  {}", config.format_currency(product.price()));
    let _ = writeln!(out, "Sizes:  {}", product.sizes.join(", "));
    let _ = writeln!(out, "Colors: {}", product.colors.join(", "));
    let _ = writeln!(out, "{}", stock_label(product));
    out
}

fn stock_label(product: &Product) -> String {
    if product.in_stock() {
        format!("{} in stock", product.stock)
    } else {
        "Sold out".to_string()
    }
}

/// Store statistics.
pub fn render_stats(config: &AppConfig, stats: &StatsResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Products:    {}", stats.catalog.total_products);
    let _ = writeln!(out, "Categories:  {}", stats.catalog.categories);
    let _ = writeln!(out, "Total stock: {}", stats.catalog.total_stock);
    let _ = writeln!(out, "In cart:     {} items", stats.cart_items);
    let _ = writeln!(out, "Cart total:  {}", config.format_currency(stats.cart_total));
    out
}

// =============================================================================
// Cart & Checkout
// =============================================================================

/// The cart panel.
pub fn render_cart(config: &AppConfig, cart: &CartResponse) -> String {
    if cart.items.is_empty() {
        return "Your cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in &cart.items {
        let _ = writeln!(
            out,
            "{} {} ({} / {})  {} x {} = {}",
            item.image,
            item.name,
            item.size,
            item.color,
            item.quantity,
            config.format_currency(item.unit_price),
            config.format_currency(item.line_total)
        );
    }
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "{} items  Total: {}",
        cart.item_count,
        config.format_currency(cart.total)
    );
    out
}

/// The checkout panel: lines, subtotal, shipping and total.
pub fn render_checkout(config: &AppConfig, summary: &CheckoutSummary) -> String {
    let mut out = String::new();
    for item in &summary.items {
        let _ = writeln!(
            out,
            "{} x{} ({} / {})  {}",
            item.name,
            item.quantity,
            item.size,
            item.color,
            config.format_currency(item.line_total)
        );
    }
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Subtotal: {}", config.format_currency(summary.subtotal));
    let _ = writeln!(out, "Shipping: {}", config.format_currency(summary.shipping));
    let _ = writeln!(out, "Total:    {}", config.format_currency(summary.total));
    out
}

// =============================================================================
// Orders
// =============================================================================

/// The success panel shown after an order is confirmed.
pub fn render_success(config: &AppConfig, order: &Order) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order confirmed!");
    let _ = writeln!(out, "Order number: #{}", order.id);
    let _ = writeln!(out, "Total:        {}", config.format_currency(order.total));
    let _ = writeln!(out, "Date:         {}", order.created_at.format("%Y-%m-%d"));
    let _ = writeln!(out, "Status:       {}", order.status);
    out
}

/// Past orders, oldest first.
pub fn render_orders(config: &AppConfig, orders: &[Order]) -> String {
    if orders.is_empty() {
        return "No orders yet\n".to_string();
    }

    let mut out = String::new();
    for order in orders {
        let _ = writeln!(
            out,
            "#{}  {}  {} items  {}  {}",
            order.id,
            order.created_at.format("%Y-%m-%d %H:%M"),
            order.item_count(),
            config.format_currency(order.total),
            order.status
        );
    }
    out
}

// =============================================================================
// Messages
// =============================================================================

/// Transient notifications, one per line.
pub fn render_notifications(notifications: &[Notification]) -> String {
    notifications
        .iter()
        .map(|n| format!("[{}] {}\n", n.level, n.message))
        .collect()
}

/// An error, with one line per failing form field.
pub fn render_error(err: &ApiError) -> String {
    let mut out = format!("[error] {}\n", err.message);
    for field in &err.fields {
        let _ = writeln!(out, "  {}: {}", field.field, field.message);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::notifier::NotificationLevel;
    use crate::state::CartItem;
    use chrono::{TimeZone, Utc};
    use fiftyone_core::{Catalog, CustomerInfo, Money, OrderStatus};

    #[test]
    fn test_render_catalog() {
        let config = AppConfig::default();
        let catalog = Catalog::seeded();
        let out = render_catalog(&config, catalog.list());

        assert_eq!(out.lines().count(), 6);
        assert!(out.contains("Beige Oversize T-Shirt"));
        assert!(out.contains("$29.99"));
        assert!(out.contains("15 in stock"));
        assert_eq!(render_catalog(&config, &[]), "No products found\n");
    }

    #[test]
    fn test_render_sold_out() {
        let mut product = Catalog::seeded().list()[3].clone();
        product.stock = 0;
        assert!(render_product(&AppConfig::default(), &product).contains("Sold out"));
    }

    #[test]
    fn test_render_cart() {
        let config = AppConfig::default();
        let cart = CartResponse {
            items: vec![CartItem {
                product_id: 1,
                name: "Beige Oversize T-Shirt".to_string(),
                image: "👕".to_string(),
                size: "L".to_string(),
                color: "black".to_string(),
                quantity: 2,
                unit_price: Money::from_cents(2999),
                line_total: Money::from_cents(5998),
            }],
            item_count: 2,
            total: Money::from_cents(5998),
        };

        let out = render_cart(&config, &cart);
        assert!(out.contains("(L / black)  2 x $29.99 = $59.98"));
        assert!(out.contains("2 items  Total: $59.98"));

        let empty = CartResponse {
            items: vec![],
            item_count: 0,
            total: Money::zero(),
        };
        assert_eq!(render_cart(&config, &empty), "Your cart is empty\n");
    }

    #[test]
    fn test_render_success() {
        let order = Order {
            id: "abc".to_string(),
            items: vec![],
            subtotal: Money::from_cents(2999),
            shipping: Money::from_cents(599),
            total: Money::from_cents(3598),
            customer_info: CustomerInfo::default(),
            status: OrderStatus::Confirmed,
            created_at: Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap(),
        };

        let out = render_success(&AppConfig::default(), &order);
        assert!(out.contains("#abc"));
        assert!(out.contains("$35.98"));
        assert!(out.contains("2024-03-09"));
        assert!(out.contains("confirmed"));
    }

    #[test]
    fn test_render_error_fields() {
        let mut err = ApiError::new(ErrorCode::InvalidInput, "Please fix the highlighted fields");
        err.fields.push(crate::error::FieldError {
            field: "email".to_string(),
            message: "email is not valid".to_string(),
        });

        let out = render_error(&err);
        assert!(out.starts_with("[error] Please fix"));
        assert!(out.contains("  email: email is not valid"));
    }

    #[test]
    fn test_render_notifications() {
        let out = render_notifications(&[Notification {
            level: NotificationLevel::Success,
            message: "Cart updated (3 items)".to_string(),
        }]);
        assert_eq!(out, "[success] Cart updated (3 items)\n");
    }
}
