//! Durable key-value persistence port.
//!
//! Models the host's local storage: a synchronous, string-keyed store of
//! string values. Implementations live in the infrastructure crate.

use crate::error::Result;

/// A synchronous string-keyed string store.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` if absent.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// The last successful save wins; no atomicity across keys is implied.
    fn save(&self, key: &str, value: &str) -> Result<()>;
}
