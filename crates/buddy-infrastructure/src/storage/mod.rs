//! Key-value store adapters.
//!
//! - `memory`: `InMemoryKeyValueStore`, process-local and used by tests
//! - `file_store`: `FileKeyValueStore`, one JSON file per key with atomic writes

mod file_store;
mod memory;

pub use file_store::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;

use std::sync::Arc;

use buddy_core::config::{StorageBackend, StorageConfig};
use buddy_core::error::Result;
use buddy_core::storage::KeyValueStore;

use crate::paths::BuddyPaths;

/// Opens the store selected by `config`.
///
/// The file store lives in `storage.data_dir` when set, otherwise in the
/// platform data directory.
pub fn open_store(config: &StorageConfig, paths: &BuddyPaths) -> Result<Arc<dyn KeyValueStore>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!("[Storage] Using in-memory store; buddies will not survive restart");
            Ok(Arc::new(InMemoryKeyValueStore::new()))
        }
        StorageBackend::File => {
            let dir = match &config.data_dir {
                Some(dir) => dir.clone(),
                None => paths.data_dir()?,
            };
            tracing::info!("[Storage] Using file store at {}", dir.display());
            Ok(Arc::new(FileKeyValueStore::new(dir)))
        }
    }
}
