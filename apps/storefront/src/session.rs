//! # Session Driver
//!
//! Translates user actions into command calls and renders the result.
//!
//! ## Action Format
//! One JSON object per line, tagged by `action`:
//! ```text
//! {"action":"list_products","category":"hoodies","search":"black"}
//! {"action":"add_to_cart","productId":1,"quantity":2,"size":"L"}
//! {"action":"increment","productId":1,"size":"L","color":"beige"}
//! {"action":"submit_order","customerInfo":{"name":"Ana",...}}
//! {"action":"quit"}
//! ```
//!
//! ## Dispatch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  parse_action(line) ──► Action                                         │
//! │                           │                                             │
//! │                           ▼                                             │
//! │  dispatch(storefront, action)                                          │
//! │     ├── sync commands ──────► Outcome::Render(view + notifications)     │
//! │     ├── submit_order ───────► Outcome::Pending(customer)                │
//! │     │                          caller runs submit() off the input loop  │
//! │     │                          and renders with render_submission()     │
//! │     └── quit ───────────────► Outcome::Quit                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Deserialize;
use tracing::debug;

use fiftyone_core::{CustomerInfo, Order, ProductId};

use crate::checkout::OrderSimulator;
use crate::commands::cart::{self, LineSelector};
use crate::commands::catalog::{self, ProductQuery};
use crate::commands::{checkout, config};
use crate::error::{ApiError, ApiResult};
use crate::notifier::NotificationLevel;
use crate::view;
use crate::Storefront;

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    #[serde(rename_all = "camelCase")]
    ListProducts {
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        search: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    ShowProduct { product_id: ProductId },
    Categories,
    Stats,
    Config,

    #[serde(rename_all = "camelCase")]
    AddToCart {
        product_id: ProductId,
        #[serde(default)]
        quantity: Option<u32>,
        #[serde(default)]
        size: Option<String>,
        #[serde(default)]
        color: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    UpdateQuantity {
        product_id: ProductId,
        size: String,
        color: String,
        quantity: i64,
    },
    #[serde(rename_all = "camelCase")]
    Increment {
        product_id: ProductId,
        size: String,
        color: String,
    },
    #[serde(rename_all = "camelCase")]
    Decrement {
        product_id: ProductId,
        size: String,
        color: String,
    },
    #[serde(rename_all = "camelCase")]
    RemoveFromCart {
        product_id: ProductId,
        size: String,
        color: String,
    },
    ClearCart,
    ShowCart,
    ExportCart,
    ImportCart { snapshot: String },

    Checkout,
    #[serde(rename_all = "camelCase")]
    SubmitOrder { customer_info: CustomerInfo },
    Orders,
    ShowOrder { id: String },

    Quit,
}

/// What the caller should do after dispatching an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this.
    Render(String),
    /// Run [`submit`] for this customer, then [`render_submission`].
    Pending(CustomerInfo),
    Quit,
}

/// Parses one line of input.
pub fn parse_action(line: &str) -> ApiResult<Action> {
    serde_json::from_str(line.trim())
        .map_err(|e| ApiError::invalid_input(format!("Unrecognized action: {e}")))
}

/// Runs one action.
pub fn dispatch(app: &Storefront, action: Action) -> Outcome {
    debug!(?action, "Dispatching action");
    let cfg = &app.config;
    let ledger = &app.ledger;

    let rendered = match action {
        Action::Quit => return Outcome::Quit,
        Action::SubmitOrder { customer_info } => {
            app.notifier
                .push(NotificationLevel::Warning, "Processing order...");
            return Outcome::Pending(customer_info);
        }

        Action::ListProducts { category, search } => {
            catalog::list_products(ledger, &ProductQuery { category, search })
                .map(|products| view::render_catalog(cfg, &products))
        }
        Action::ShowProduct { product_id } => {
            catalog::get_product(ledger, product_id).map(|p| view::render_product(cfg, &p))
        }
        Action::Categories => Ok(catalog::list_categories(ledger)
            .iter()
            .map(|c| format!("{c}\n"))
            .collect()),
        Action::Stats => Ok(view::render_stats(cfg, &catalog::get_stats(ledger))),
        Action::Config => {
            let c = config::get_config(cfg);
            Ok(format!(
                "{}\nShipping: {}\nOrder processing: {} ms\n",
                c.store_name,
                cfg.format_currency(c.shipping_fee),
                c.order_delay_ms
            ))
        }

        Action::AddToCart {
            product_id,
            quantity,
            size,
            color,
        } => cart::add_to_cart(ledger, product_id, quantity, size.as_deref(), color.as_deref())
            .map(|c| view::render_cart(cfg, &c)),
        Action::UpdateQuantity {
            product_id,
            size,
            color,
            quantity,
        } => cart::update_cart_item(ledger, &selector(product_id, size, color), quantity)
            .map(|c| view::render_cart(cfg, &c)),
        Action::Increment {
            product_id,
            size,
            color,
        } => cart::step_cart_item(ledger, &selector(product_id, size, color), 1)
            .map(|c| view::render_cart(cfg, &c)),
        Action::Decrement {
            product_id,
            size,
            color,
        } => cart::step_cart_item(ledger, &selector(product_id, size, color), -1)
            .map(|c| view::render_cart(cfg, &c)),
        Action::RemoveFromCart {
            product_id,
            size,
            color,
        } => cart::remove_from_cart(ledger, &selector(product_id, size, color))
            .map(|c| view::render_cart(cfg, &c)),
        Action::ClearCart => cart::clear_cart(ledger).map(|c| view::render_cart(cfg, &c)),
        Action::ShowCart => Ok(view::render_cart(cfg, &cart::get_cart(ledger))),
        Action::ExportCart => cart::export_cart(ledger).map(|json| format!("{json}\n")),
        Action::ImportCart { snapshot } => cart::import_cart(ledger, &snapshot).map(|c| {
            app.notifier
                .push(NotificationLevel::Success, "Cart imported");
            view::render_cart(cfg, &c)
        }),

        Action::Checkout => Ok(view::render_checkout(
            cfg,
            &checkout::get_checkout_summary(&app.simulator),
        )),
        Action::Orders => {
            checkout::list_orders(&app.simulator).map(|orders| view::render_orders(cfg, &orders))
        }
        Action::ShowOrder { id } => {
            checkout::get_order(&app.simulator, &id).map(|o| view::render_success(cfg, &o))
        }
    };

    Outcome::Render(finish(app, rendered))
}

/// Validates and submits an order. Runs on a cloned simulator so the input
/// loop stays free during the processing delay.
pub async fn submit(simulator: OrderSimulator, customer: CustomerInfo) -> ApiResult<Order> {
    checkout::submit_order(&simulator, customer).await
}

/// Renders the outcome of [`submit`].
pub fn render_submission(app: &Storefront, result: ApiResult<Order>) -> String {
    let rendered = result.map(|order| {
        app.notifier.push(
            NotificationLevel::Success,
            format!("Order #{} placed", order.id),
        );
        view::render_success(&app.config, &order)
    });
    finish(app, rendered)
}

/// Pending notifications, if any.
pub fn flush(app: &Storefront) -> String {
    view::render_notifications(&app.notifier.drain())
}

fn selector(product_id: ProductId, size: String, color: String) -> LineSelector {
    LineSelector {
        product_id,
        size,
        color,
    }
}

/// Appends notifications to the view. Errors already announced on the bus
/// are shown only as notifications.
fn finish(app: &Storefront, rendered: ApiResult<String>) -> String {
    let notifications = app.notifier.drain();
    let announced = notifications
        .iter()
        .any(|n| n.level == NotificationLevel::Error);

    let mut out = String::new();
    match rendered {
        Ok(body) => out.push_str(&body),
        Err(err) if announced && err.fields.is_empty() => {}
        Err(err) => out.push_str(&view::render_error(&err)),
    }
    out.push_str(&view::render_notifications(&notifications));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppConfig;
    use fiftyone_store::Storage;

    fn storefront() -> Storefront {
        let config = AppConfig {
            order_delay_ms: 0,
            ..AppConfig::default()
        };
        Storefront::with_storage(config, Storage::in_memory()).unwrap()
    }

    fn render(app: &Storefront, line: &str) -> String {
        match dispatch(app, parse_action(line).unwrap()) {
            Outcome::Render(out) => out,
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!(
            parse_action(r#"{"action":"add_to_cart","productId":1,"size":"L"}"#).unwrap(),
            Action::AddToCart {
                product_id: 1,
                quantity: None,
                size: Some("L".to_string()),
                color: None,
            }
        );
        assert_eq!(parse_action(r#"{"action":"quit"}"#).unwrap(), Action::Quit);
        assert_eq!(
            parse_action(r#"{"action":"list_products"}"#).unwrap(),
            Action::ListProducts {
                category: None,
                search: None
            }
        );
        assert!(parse_action(r#"{"action":"fly"}"#).is_err());
        assert!(parse_action("not json").is_err());
    }

    #[test]
    fn test_add_renders_cart_and_notification() {
        let app = storefront();
        let out = render(&app, r#"{"action":"add_to_cart","productId":1,"quantity":2}"#);

        assert!(out.contains("Beige Oversize T-Shirt (M / beige)"));
        assert!(out.contains("[success] Cart updated (2 items)"));
    }

    #[test]
    fn test_rejected_add_shows_single_error() {
        let app = storefront();
        let out = render(&app, r#"{"action":"add_to_cart","productId":4,"quantity":7}"#);

        assert_eq!(out.matches("[error]").count(), 1);
        assert!(out.contains("Only 6 units"));
    }

    #[test]
    fn test_unannounced_error_is_rendered() {
        let app = storefront();
        let out = render(&app, r#"{"action":"show_product","productId":99}"#);
        assert!(out.starts_with("[error] Product not found: 99"));
    }

    #[test]
    fn test_submit_is_deferred() {
        let app = storefront();
        let action = parse_action(
            r#"{"action":"submit_order","customerInfo":{"name":"Ana","email":"ana@example.com","phone":"555","address":"Main 1","city":"Lima","zip":"15074"}}"#,
        )
        .unwrap();

        match dispatch(&app, action) {
            Outcome::Pending(customer) => assert_eq!(customer.city, "Lima"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(flush(&app).contains("[warning] Processing order..."));
    }

    #[tokio::test]
    async fn test_submission_rendering() {
        let app = storefront();
        render(&app, r#"{"action":"add_to_cart","productId":2}"#);
        let customer = CustomerInfo {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: "555 0101".to_string(),
            address: "Main 1".to_string(),
            city: "Lima".to_string(),
            zip: "15074".to_string(),
            ..CustomerInfo::default()
        };

        let result = submit(app.simulator.clone(), customer).await;
        let out = render_submission(&app, result);

        assert!(out.contains("Order confirmed!"));
        assert!(out.contains("$55.98"));
        assert!(out.contains("[success] Order #"));
        assert!(render(&app, r#"{"action":"show_cart"}"#).contains("Your cart is empty"));
    }

    #[tokio::test]
    async fn test_invalid_form_lists_fields() {
        let app = storefront();
        render(&app, r#"{"action":"add_to_cart","productId":2}"#);

        let result = submit(app.simulator.clone(), CustomerInfo::default()).await;
        let out = render_submission(&app, result);

        assert!(out.contains("  name:"));
        assert!(out.contains("  zip:"));
    }
}
