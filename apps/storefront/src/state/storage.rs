//! # Storage State
//!
//! Wraps the `Storage` handle for use in commands.
//!
//! ## Thread Safety
//! `Storage` shares one backend behind an `Arc`; the file and memory
//! backends are `Send + Sync`. Order appends take the storage write lock.

use fiftyone_store::{Storage, StoreConfig, StoreResult};

/// Wrapper around `Storage` for application state.
#[derive(Debug, Clone)]
pub struct StorageState {
    storage: Storage,
}

impl StorageState {
    /// Creates a new StorageState wrapping an open storage handle.
    pub fn new(storage: Storage) -> Self {
        StorageState { storage }
    }

    /// Opens storage with the given configuration.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        Ok(StorageState::new(Storage::open(config)?))
    }

    /// Returns a reference to the inner Storage.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let orders = storage_state.inner().orders().list()?;
    /// ```
    pub fn inner(&self) -> &Storage {
        &self.storage
    }
}
