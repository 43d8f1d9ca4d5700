//! Key-value backed BuddyRepository implementation.

use std::collections::HashSet;
use std::sync::Arc;

use buddy_core::buddy::{Buddy, BuddyRepository};
use buddy_core::error::{BuddyError, Result};
use buddy_core::storage::KeyValueStore;

use crate::dto::{BuddyV1_0_0, create_buddy_migrator};

/// Key under which the whole collection is stored.
pub const STORAGE_KEY: &str = "ai-buddies";

/// A repository storing the buddy collection as one JSON array under
/// [`STORAGE_KEY`].
///
/// Responsibilities:
/// - Load/save the blob through a `KeyValueStore`
/// - Execute migrations (V1.0.0 → Buddy)
/// - Reject malformed content as `PersistenceCorruption`
///
/// Does NOT:
/// - Recover from corruption (the caller decides, see `BuddyStore::load`)
pub struct KeyValueBuddyRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KeyValueBuddyRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn parse(raw: &str) -> Result<Vec<Buddy>> {
        let json_value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| BuddyError::corruption(format!("Stored buddies are not JSON: {}", e)))?;

        let serde_json::Value::Array(records) = json_value else {
            return Err(BuddyError::corruption("Stored buddies are not an array"));
        };

        if records.is_empty() {
            return Ok(Vec::new());
        }

        // Use version-migrate to handle automatic migration (flat format)
        let migrator = create_buddy_migrator();
        let buddies: Vec<Buddy> = migrator
            .load_vec_flat_from("buddy", records)
            .map_err(|e| BuddyError::corruption(format!("Failed to migrate buddies: {}", e)))?;

        Self::check_invariants(&buddies)?;
        Ok(buddies)
    }

    fn check_invariants(buddies: &[Buddy]) -> Result<()> {
        let mut seen = HashSet::new();
        for buddy in buddies {
            if buddy.name.trim().is_empty() {
                return Err(BuddyError::corruption(format!(
                    "Buddy '{}' has an empty name",
                    buddy.id
                )));
            }
            if let Some(settings) = buddy.settings
                && !settings.is_valid()
            {
                return Err(BuddyError::corruption(format!(
                    "Buddy '{}' has creativity {} outside [0, 1]",
                    buddy.id, settings.creativity
                )));
            }
            if !seen.insert(buddy.id.as_str()) {
                return Err(BuddyError::corruption(format!(
                    "Duplicate buddy id '{}'",
                    buddy.id
                )));
            }
        }
        Ok(())
    }
}

impl BuddyRepository for KeyValueBuddyRepository {
    fn get_all(&self) -> Result<Option<Vec<Buddy>>> {
        let Some(raw) = self.store.load(STORAGE_KEY)? else {
            return Ok(None);
        };
        Self::parse(&raw).map(Some)
    }

    fn save_all(&self, buddies: &[Buddy]) -> Result<()> {
        // Convert Buddy domain models to latest DTO version (V1.0.0)
        let buddy_dtos: Vec<BuddyV1_0_0> = buddies.iter().map(|b| b.into()).collect();

        // Use migrator to serialize with version field
        let migrator = create_buddy_migrator();
        let json_str = migrator
            .save_vec_flat(buddy_dtos)
            .map_err(|e| BuddyError::Migration(format!("Failed to serialize buddies: {}", e)))?;

        self.store.save(STORAGE_KEY, &json_str)?;
        tracing::debug!("[KeyValueBuddyRepository] Saved {} buddies", buddies.len());
        Ok(())
    }
}
