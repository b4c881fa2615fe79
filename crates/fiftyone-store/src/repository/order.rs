//! # Order Repository
//!
//! Append-only order history under the `orders` key.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. COMMIT (order simulator, after the processing delay)               │
//! │     └── append(order) → orders = [..., order]                          │
//! │                                                                         │
//! │  2. READ                                                               │
//! │     └── list() → oldest first                                          │
//! │     └── get(id) → Some(order) / None                                   │
//! │                                                                         │
//! │  3. STARTUP                                                            │
//! │     └── recover() → unreadable history moved to orders_unreadable      │
//! │                                                                         │
//! │  Orders are never updated or deleted.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use fiftyone_core::Order;

use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;
use crate::repository::{read_json, write_json};

/// Storage key of the order history document.
pub const ORDERS_KEY: &str = "orders";

/// Where [`OrderRepository::recover`] keeps a history it could not read.
pub const UNREADABLE_ORDERS_KEY: &str = "orders_unreadable";

/// Repository for the order history.
#[derive(Clone)]
pub struct OrderRepository {
    kv: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
    pretty: bool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(kv: Arc<dyn KeyValueStore>, write_lock: Arc<Mutex<()>>, pretty: bool) -> Self {
        OrderRepository {
            kv,
            write_lock,
            pretty,
        }
    }

    /// Every stored order, oldest first.
    pub fn list(&self) -> StoreResult<Vec<Order>> {
        Ok(read_json(self.kv.as_ref(), ORDERS_KEY)?.unwrap_or_default())
    }

    /// Gets an order by id.
    pub fn get(&self, id: &str) -> StoreResult<Option<Order>> {
        Ok(self.list()?.into_iter().find(|o| o.id == id))
    }

    /// Number of stored orders.
    pub fn count(&self) -> StoreResult<usize> {
        Ok(self.list()?.len())
    }

    /// Appends an order to the history.
    ///
    /// ## Returns
    /// * `Ok(())` - The order is stored
    /// * `Err(StoreError::Duplicate)` - An order with this id already exists
    pub fn append(&self, order: &Order) -> StoreResult<()> {
        let _guard = self.write_lock.lock().expect("Order write lock poisoned");

        let mut orders = self.list()?;
        if orders.iter().any(|o| o.id == order.id) {
            return Err(StoreError::Duplicate {
                entity: "order".to_string(),
                id: order.id.clone(),
            });
        }

        orders.push(order.clone());
        write_json(self.kv.as_ref(), ORDERS_KEY, &orders, self.pretty)?;

        debug!(order_id = %order.id, total = %order.total, history = orders.len(), "Appended order");
        Ok(())
    }

    /// Makes sure the history document can be read before orders are taken.
    ///
    /// A document that does not decode is copied to
    /// [`UNREADABLE_ORDERS_KEY`] and removed, so the next append starts a
    /// fresh history instead of failing. An earlier unreadable copy is
    /// overwritten.
    ///
    /// ## Returns
    /// * `Ok(true)` - The document was moved aside
    /// * `Ok(false)` - The history was readable (or absent)
    pub fn recover(&self) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().expect("Order write lock poisoned");

        match self.list() {
            Ok(_) => Ok(false),
            Err(StoreError::Serialization { key, source }) => {
                let raw = self.kv.get(ORDERS_KEY)?.unwrap_or_default();
                self.kv.set(UNREADABLE_ORDERS_KEY, &raw)?;
                self.kv.remove(ORDERS_KEY)?;
                warn!(
                    key = %key,
                    moved_to = UNREADABLE_ORDERS_KEY,
                    error = %source,
                    "Order history is unreadable, starting a fresh one"
                );
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for OrderRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderRepository").finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Storage, StoreConfig};
    use chrono::Utc;
    use fiftyone_core::{CustomerInfo, Money, OrderStatus};

    fn order(id: &str) -> Order {
        Order {
            id: id.to_string(),
            items: Vec::new(),
            subtotal: Money::from_cents(2999),
            shipping: Money::from_cents(599),
            total: Money::from_cents(3598),
            customer_info: CustomerInfo::default(),
            status: OrderStatus::Confirmed,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_history() {
        let storage = Storage::in_memory();
        assert!(storage.orders().list().unwrap().is_empty());
        assert_eq!(storage.orders().get("a").unwrap(), None);
    }

    #[test]
    fn test_append_keeps_order() {
        let storage = Storage::in_memory();
        let repo = storage.orders();

        repo.append(&order("a")).unwrap();
        repo.append(&order("b")).unwrap();

        let ids: Vec<_> = repo.list().unwrap().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(repo.get("b").unwrap().unwrap().total.cents(), 3598);
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let storage = Storage::in_memory();
        storage.orders().append(&order("a")).unwrap();

        assert!(matches!(
            storage.orders().append(&order("a")),
            Err(StoreError::Duplicate { .. })
        ));
        assert_eq!(storage.orders().count().unwrap(), 1);
    }

    #[test]
    fn test_history_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        Storage::open(StoreConfig::new(dir.path()))
            .unwrap()
            .orders()
            .append(&order("a"))
            .unwrap();

        let reopened = Storage::open(StoreConfig::new(dir.path())).unwrap();
        assert_eq!(reopened.orders().list().unwrap().len(), 1);
    }

    #[test]
    fn test_reads_timestamp_ids_and_dollar_amounts() {
        let storage = Storage::in_memory();
        storage
            .backend()
            .set(
                ORDERS_KEY,
                r#"[{"id":1714557600000,
                     "items":[{"id":2,"name":"Hoodie Oversize","price":49.99,"quantity":1,
                               "size":"L","color":"gris","addedAt":"2024-05-01T09:58:00.000Z"}],
                     "subtotal":49.99,"shipping":5.99,"total":55.980000000000004,
                     "customerInfo":{"name":"Ana","email":"ana@example.com","phone":"555",
                                     "address":"Main 1","city":"Lima","state":"","zip":"15001","notes":""},
                     "status":"confirmado","createdAt":"2024-05-01T10:00:00.000Z"}]"#,
            )
            .unwrap();

        let repo = storage.orders();
        let found = repo.get("1714557600000").unwrap().unwrap();
        assert_eq!(found.total.cents(), 5598);
        assert_eq!(found.items[0].quantity, 1);

        repo.append(&order("a")).unwrap();
        assert_eq!(repo.count().unwrap(), 2);
        assert!(!repo.recover().unwrap());
    }

    #[test]
    fn test_recover_moves_unreadable_history_aside() {
        let storage = Storage::in_memory();
        storage.backend().set(ORDERS_KEY, r#"{"not":"a list"}"#).unwrap();
        let repo = storage.orders();
        assert!(matches!(repo.list(), Err(StoreError::Serialization { .. })));

        assert!(repo.recover().unwrap());

        assert_eq!(
            storage.backend().get(UNREADABLE_ORDERS_KEY).unwrap().as_deref(),
            Some(r#"{"not":"a list"}"#)
        );
        assert!(repo.list().unwrap().is_empty());
        repo.append(&order("a")).unwrap();
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_reads_legacy_status() {
        let storage = Storage::in_memory();
        storage
            .backend()
            .set(
                ORDERS_KEY,
                r#"[{"id":"1714557600000","items":[],"subtotal":2999,"shipping":599,"total":3598,
                    "customerInfo":{"name":"Ana","email":"ana@example.com","phone":"555","address":"Main 1","city":"Lima","zip":"15001"},
                    "status":"confirmado","createdAt":"2024-05-01T10:00:00Z"}]"#,
            )
            .unwrap();

        let orders = storage.orders().list().unwrap();
        assert_eq!(orders[0].status, OrderStatus::Confirmed);
        assert_eq!(orders[0].customer_info.name, "Ana");
    }
}
