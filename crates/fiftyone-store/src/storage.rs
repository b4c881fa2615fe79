//! # Storage Handle
//!
//! Backend selection and repository access.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Storage Startup                                 │
//! │                                                                         │
//! │  App startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::new(data_dir) ← or StoreConfig::in_memory()              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Storage::open(config) ← creates the data directory                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────┐                                      │
//! │  │  Arc<dyn KeyValueStore>      │                                      │
//! │  │  FileStore | MemoryStore     │                                      │
//! │  └──────────────────────────────┘                                      │
//! │       │                                                                 │
//! │       ├──► storage.carts()   ──► key "cart"                            │
//! │       └──► storage.orders()  ──► key "orders"                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::error::StoreResult;
use crate::kv::{FileStore, KeyValueStore, MemoryStore};
use crate::repository::cart::CartRepository;
use crate::repository::order::OrderRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where stored documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// `<dir>/<key>.json` files.
    Files(PathBuf),
    /// Process memory only.
    Memory,
}

/// Storage configuration.
///
/// ## Example
/// ```rust
/// use fiftyone_store::StoreConfig;
///
/// let config = StoreConfig::new("/tmp/fiftyone").pretty(true);
/// assert!(config.pretty);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: Backend,

    /// Pretty-print stored JSON.
    /// Default: false
    pub pretty: bool,
}

impl StoreConfig {
    /// File-backed storage in `dir`. The directory is created on open.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        StoreConfig {
            backend: Backend::Files(dir.into()),
            pretty: false,
        }
    }

    /// In-memory storage (for testing).
    pub fn in_memory() -> Self {
        StoreConfig {
            backend: Backend::Memory,
            pretty: false,
        }
    }

    /// Sets whether stored JSON is pretty-printed.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

// =============================================================================
// Storage
// =============================================================================

/// Main storage handle providing repository access.
///
/// Cloning is cheap; clones share the backend.
#[derive(Clone)]
pub struct Storage {
    kv: Arc<dyn KeyValueStore>,
    pretty: bool,
    /// Serializes read-modify-write cycles on list documents.
    write_lock: Arc<Mutex<()>>,
}

impl Storage {
    /// Opens storage with the configured backend.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let kv: Arc<dyn KeyValueStore> = match &config.backend {
            Backend::Files(dir) => {
                info!(dir = %dir.display(), "Opening file storage");
                Arc::new(FileStore::open(dir.clone())?)
            }
            Backend::Memory => {
                info!("Opening in-memory storage");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Storage::with_backend(kv, config.pretty))
    }

    /// Wraps an existing backend.
    pub fn with_backend(kv: Arc<dyn KeyValueStore>, pretty: bool) -> Self {
        Storage {
            kv,
            pretty,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Shorthand for `Storage::open(StoreConfig::in_memory())`.
    pub fn in_memory() -> Self {
        Storage::with_backend(Arc::new(MemoryStore::new()), false)
    }

    /// Returns the raw backend.
    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.kv
    }

    /// Returns the cart repository.
    pub fn carts(&self) -> CartRepository {
        CartRepository::new(Arc::clone(&self.kv), self.pretty)
    }

    /// Returns the order history repository.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(
            Arc::clone(&self.kv),
            Arc::clone(&self.write_lock),
            self.pretty,
        )
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("pretty", &self.pretty)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = StoreConfig::new("/tmp/fiftyone-test").pretty(true);
        assert_eq!(
            config.backend,
            Backend::Files(PathBuf::from("/tmp/fiftyone-test"))
        );
        assert!(config.pretty);

        let config = StoreConfig::in_memory();
        assert_eq!(config.backend, Backend::Memory);
        assert!(!config.pretty);
    }

    #[test]
    fn test_open_file_storage_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");

        Storage::open(StoreConfig::new(&data)).unwrap();
        assert!(data.is_dir());
    }

    #[test]
    fn test_clones_share_backend() {
        let storage = Storage::in_memory();
        let clone = storage.clone();

        storage.backend().set("cart", "[]").unwrap();
        assert_eq!(clone.backend().get("cart").unwrap().as_deref(), Some("[]"));
    }
}
