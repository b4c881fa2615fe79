//! End-to-end storefront flows over file-backed storage.

use std::time::Duration;

use fiftyone_core::{CartLine, CustomerInfo, ProductId};
use fiftyone_storefront::commands::cart::{self, LineSelector};
use fiftyone_storefront::commands::{catalog, checkout};
use fiftyone_storefront::error::ErrorCode;
use fiftyone_storefront::session::{self, Outcome};
use fiftyone_storefront::state::AppConfig;
use fiftyone_storefront::Storefront;
use fiftyone_store::{FileStore, KeyValueStore, CART_KEY, ORDERS_KEY, UNREADABLE_ORDERS_KEY};
use tempfile::TempDir;

fn config(dir: &TempDir, delay_ms: u64) -> AppConfig {
    AppConfig {
        data_dir: dir.path().to_path_buf(),
        order_delay_ms: delay_ms,
        ..AppConfig::default()
    }
}

fn stock(app: &Storefront, id: ProductId) -> u32 {
    catalog::get_product(&app.ledger, id).unwrap().stock
}

fn customer() -> CustomerInfo {
    CustomerInfo {
        name: "Ana Torres".to_string(),
        email: "ana@example.com".to_string(),
        phone: "+51 (1) 555-0101".to_string(),
        address: "Av. Larco 123".to_string(),
        city: "Lima".to_string(),
        zip: "15074".to_string(),
        ..CustomerInfo::default()
    }
}

#[test]
fn test_stock_follows_cart() {
    let dir = TempDir::new().unwrap();
    let app = Storefront::open(config(&dir, 0)).unwrap();

    cart::add_to_cart(&app.ledger, 1, Some(2), None, None).unwrap();
    cart::add_to_cart(&app.ledger, 1, Some(1), None, Some("beige")).unwrap();
    assert_eq!(cart::get_cart(&app.ledger).items.len(), 1);
    assert_eq!(stock(&app, 1), 12);

    let line = LineSelector {
        product_id: 1,
        size: "M".to_string(),
        color: "beige".to_string(),
    };
    cart::step_cart_item(&app.ledger, &line, -1).unwrap();
    assert_eq!(stock(&app, 1), 13);

    let err = cart::add_to_cart(&app.ledger, 1, Some(14), Some("S"), None).unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert_eq!(stock(&app, 1), 13);

    cart::clear_cart(&app.ledger).unwrap();
    assert_eq!(stock(&app, 1), 15);
}

#[test]
fn test_cart_survives_restart() {
    let dir = TempDir::new().unwrap();
    {
        let app = Storefront::open(config(&dir, 0)).unwrap();
        cart::add_to_cart(&app.ledger, 4, Some(2), Some("L"), Some("black")).unwrap();
    }

    let app = Storefront::open(config(&dir, 0)).unwrap();
    let cart = cart::get_cart(&app.ledger);
    assert_eq!(cart.item_count, 2);
    assert_eq!(cart.items[0].color, "black");
    assert_eq!(stock(&app, 4), 4);
}

#[test]
fn test_oversized_stored_cart_is_repaired() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let lines = vec![
        CartLine {
            product_id: 2,
            quantity: 3,
            size: "M".to_string(),
            color: "grey".to_string(),
            added_at: chrono::Utc::now(),
        },
        CartLine {
            product_id: 4,
            quantity: 50,
            size: "M".to_string(),
            color: "black".to_string(),
            added_at: chrono::Utc::now(),
        },
    ];
    store
        .set(CART_KEY, &serde_json::to_string(&lines).unwrap())
        .unwrap();

    let app = Storefront::open(config(&dir, 0)).unwrap();

    assert_eq!(cart::get_cart(&app.ledger).item_count, 3);
    assert_eq!(stock(&app, 2), 5);
    assert_eq!(stock(&app, 4), 6);

    let stored: Vec<CartLine> =
        serde_json::from_str(&store.get(CART_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_order_history_survives_restart() {
    let dir = TempDir::new().unwrap();
    let order = {
        let app = Storefront::open(config(&dir, 0)).unwrap();
        cart::add_to_cart(&app.ledger, 3, Some(1), Some("XL"), None).unwrap();
        assert_eq!(stock(&app, 3), 11);
        let order = checkout::submit_order(&app.simulator, customer()).await.unwrap();
        assert_eq!(stock(&app, 3), 12);
        order
    };

    let app = Storefront::open(config(&dir, 0)).unwrap();
    let history = checkout::list_orders(&app.simulator).unwrap();
    assert_eq!(history, vec![order.clone()]);
    assert_eq!(history[0].total.cents(), 5999 + 599);
    assert!(cart::get_cart(&app.ledger).items.is_empty());
    assert_eq!(stock(&app, 3), 12);
}

/// History written by the browser version of the shop: timestamp ids,
/// dollar amounts and Spanish color names.
const BROWSER_ORDERS: &str = r#"[{
    "id": 1714557600000,
    "items": [{"id": 1, "name": "Camiseta Básica Premium", "price": 29.99, "quantity": 1,
               "size": "M", "color": "negro", "addedAt": "2024-05-01T09:58:00.000Z"}],
    "subtotal": 29.99,
    "shipping": 5.99,
    "total": 35.980000000000004,
    "customerInfo": {"name": "Ana Torres", "email": "ana@example.com", "phone": "555 0101",
                     "address": "Av. Larco 123", "city": "Lima", "state": "",
                     "zip": "15074", "notes": ""},
    "status": "confirmado",
    "createdAt": "2024-05-01T10:00:00.000Z"
}]"#;

#[tokio::test]
async fn test_checkout_appends_to_browser_history() {
    let dir = TempDir::new().unwrap();
    FileStore::open(dir.path())
        .unwrap()
        .set(ORDERS_KEY, BROWSER_ORDERS)
        .unwrap();

    let app = Storefront::open(config(&dir, 0)).unwrap();
    let old = checkout::get_order(&app.simulator, "1714557600000").unwrap();
    assert_eq!(old.total.cents(), 3598);

    cart::add_to_cart(&app.ledger, 2, Some(1), None, None).unwrap();
    let order = checkout::submit_order(&app.simulator, customer()).await.unwrap();

    let history = checkout::list_orders(&app.simulator).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].id, order.id);
}

#[tokio::test]
async fn test_unreadable_history_is_set_aside() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    store.set(ORDERS_KEY, "[{\"id\": true}]").unwrap();

    let app = Storefront::open(config(&dir, 0)).unwrap();
    assert!(checkout::list_orders(&app.simulator).unwrap().is_empty());
    assert_eq!(
        store.get(UNREADABLE_ORDERS_KEY).unwrap().as_deref(),
        Some("[{\"id\": true}]")
    );

    cart::add_to_cart(&app.ledger, 5, Some(1), None, None).unwrap();
    checkout::submit_order(&app.simulator, customer()).await.unwrap();
    assert_eq!(checkout::list_orders(&app.simulator).unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_session_stays_responsive_while_order_pending() {
    let dir = TempDir::new().unwrap();
    let app = Storefront::open(config(&dir, 2000)).unwrap();

    let add = session::parse_action(r#"{"action":"add_to_cart","productId":5,"quantity":2}"#)
        .unwrap();
    assert!(matches!(session::dispatch(&app, add), Outcome::Render(_)));

    let submit = session::parse_action(&format!(
        r#"{{"action":"submit_order","customerInfo":{}}}"#,
        serde_json::to_string(&customer()).unwrap()
    ))
    .unwrap();
    let Outcome::Pending(info) = session::dispatch(&app, submit) else {
        panic!("submit_order should be deferred");
    };
    let pending = tokio::spawn(session::submit(app.simulator.clone(), info));
    tokio::task::yield_now().await;

    tokio::time::advance(Duration::from_millis(500)).await;
    let stats = session::parse_action(r#"{"action":"stats"}"#).unwrap();
    let Outcome::Render(out) = session::dispatch(&app, stats) else {
        panic!("stats should render");
    };
    assert!(out.contains("In cart:     2 items"));
    assert!(!pending.is_finished());

    let result = pending.await.unwrap();
    let out = session::render_submission(&app, result);
    assert!(out.contains("Order confirmed!"));
    assert!(out.contains("$75.97"));
    assert_eq!(checkout::list_orders(&app.simulator).unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_cart_submission_is_reported() {
    let dir = TempDir::new().unwrap();
    let app = Storefront::open(config(&dir, 0)).unwrap();

    let result = session::submit(app.simulator.clone(), customer()).await;
    assert_eq!(result.as_ref().unwrap_err().code, ErrorCode::EmptyCart);

    let out = session::render_submission(&app, result);
    assert_eq!(out.matches("Your cart is empty").count(), 1);
    assert!(checkout::list_orders(&app.simulator).unwrap().is_empty());
}
