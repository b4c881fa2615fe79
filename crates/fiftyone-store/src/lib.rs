//! # fiftyone-store: Durable Storage for the FiftyOne Storefront
//!
//! This crate persists the cart and the order history as JSON documents in
//! a key-value store, keeping the field names of existing browser data.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Data Flow                             │
//! │                                                                         │
//! │  Cart ledger / order simulator (apps/storefront)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 fiftyone-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Storage     │    │  Repositories │    │  Backends    │  │   │
//! │  │   │ (storage.rs)  │    │               │    │   (kv.rs)    │  │   │
//! │  │   │               │    │ CartRepo      │    │              │  │   │
//! │  │   │ StoreConfig   │◄───│ OrderRepo     │───►│ FileStore    │  │   │
//! │  │   │               │    │               │    │ MemoryStore  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   <data_dir>/cart.json        <data_dir>/orders.json            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`storage`] - Backend selection and repository access
//! - [`kv`] - Key-value backends (file, memory)
//! - [`error`] - Storage error types
//! - [`repository`] - Cart and order repositories
//!
//! ## Usage
//!
//! ```rust
//! use fiftyone_store::{Storage, StoreConfig};
//!
//! let storage = Storage::open(StoreConfig::in_memory()).unwrap();
//!
//! assert!(storage.carts().load().unwrap().is_empty());
//! assert!(storage.orders().list().unwrap().is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod repository;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use storage::{Backend, Storage, StoreConfig};

// Repository re-exports for convenience
pub use repository::cart::{CartRepository, CART_KEY};
pub use repository::order::{OrderRepository, ORDERS_KEY, UNREADABLE_ORDERS_KEY};
