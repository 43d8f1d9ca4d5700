//! Process-local key-value store.

use std::collections::HashMap;
use std::sync::Mutex;

use buddy_core::error::{BuddyError, Result};
use buddy_core::storage::KeyValueStore;

/// A `KeyValueStore` held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| BuddyError::internal("In-memory store lock poisoned"))
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_save_wins() {
        let store = InMemoryKeyValueStore::with_entry("k", "first");
        assert_eq!(store.load("k").unwrap().as_deref(), Some("first"));
        store.save("k", "second").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("second"));
        assert!(store.load("other").unwrap().is_none());
    }
}
