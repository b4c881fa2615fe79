//! # Repository Module
//!
//! Typed access to the stored JSON documents.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stored Documents                                     │
//! │                                                                         │
//! │  Cart ledger                      Order simulator                      │
//! │       │                                │                                │
//! │       │ storage.carts().save(lines)    │ storage.orders().append(o)    │
//! │       ▼                                ▼                                │
//! │  CartRepository                   OrderRepository                      │
//! │  ├── load()                       ├── list()                           │
//! │  ├── save(lines)                  ├── get(id)                          │
//! │  └── clear()                      └── append(order)                    │
//! │       │                                │                                │
//! │       ▼                                ▼                                │
//! │  key "cart"  [CartLine, ...]      key "orders"  [Order, ...]           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CartRepository`](cart::CartRepository) - The persisted cart
//! - [`OrderRepository`](order::OrderRepository) - Append-only order history

pub mod cart;
pub mod order;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;

/// Reads and decodes the document under `key`.
pub(crate) fn read_json<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> StoreResult<Option<T>> {
    match kv.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::serialization(key, e)),
        None => Ok(None),
    }
}

/// Encodes `value` and stores it under `key`.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    kv: &dyn KeyValueStore,
    key: &str,
    value: &T,
    pretty: bool,
) -> StoreResult<()> {
    let raw = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| StoreError::serialization(key, e))?;

    kv.set(key, &raw)
}
