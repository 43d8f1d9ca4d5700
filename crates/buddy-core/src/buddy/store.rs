//! In-memory buddy collection with write-through persistence.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::model::Buddy;
use super::preset::get_seed_buddies;
use super::repository::BuddyRepository;
use super::request::ValidatedBuddy;
use crate::error::{BuddyError, Result, ValidationError};

/// Read-only id resolution, used by the session controller to check that a
/// selection target exists.
pub trait BuddyLookup {
    fn contains_buddy(&self, id: &str) -> bool;
}

impl BuddyLookup for [Buddy] {
    fn contains_buddy(&self, id: &str) -> bool {
        self.iter().any(|b| b.id == id)
    }
}

/// Owns the process's buddy collection.
///
/// Every mutation is followed by a full-collection save before it returns.
/// If the save fails the in-memory change is rolled back, so memory never
/// runs ahead of durable state.
pub struct BuddyStore {
    repository: Arc<dyn BuddyRepository>,
    buddies: Vec<Buddy>,
}

impl BuddyStore {
    /// Creates an empty, not-yet-loaded store.
    pub fn new(repository: Arc<dyn BuddyRepository>) -> Self {
        Self {
            repository,
            buddies: Vec::new(),
        }
    }

    /// Reads the collection from the repository.
    ///
    /// - Nothing stored: the seed set is installed and persisted.
    /// - Corrupt content: logged, then handled like "nothing stored".
    /// - Any other repository error is returned.
    pub fn load(&mut self) -> Result<&[Buddy]> {
        let loaded = match self.repository.get_all() {
            Ok(Some(buddies)) => {
                tracing::debug!("[BuddyStore] Loaded {} buddies", buddies.len());
                Some(buddies)
            }
            Ok(None) => {
                tracing::info!("[BuddyStore] No stored buddies, installing seed set");
                None
            }
            Err(BuddyError::PersistenceCorruption(reason)) => {
                tracing::warn!(
                    "[BuddyStore] Stored buddies unreadable, falling back to seed set: {}",
                    reason
                );
                None
            }
            Err(e) => return Err(e),
        };

        self.buddies = match loaded {
            Some(buddies) => buddies,
            None => {
                let seeds = get_seed_buddies();
                self.repository.save_all(&seeds)?;
                seeds
            }
        };

        Ok(&self.buddies)
    }

    /// All buddies, in insertion order.
    pub fn all(&self) -> &[Buddy] {
        &self.buddies
    }

    /// Looks up a buddy by id.
    pub fn get(&self, id: &str) -> Option<&Buddy> {
        self.buddies.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.buddies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buddies.is_empty()
    }

    /// Inserts a new buddy built from validated form fields.
    ///
    /// Assigns a fresh id (unique within the store) and the creation time.
    pub fn create(&mut self, fields: ValidatedBuddy) -> Result<Buddy> {
        let buddy = Buddy {
            id: self.fresh_id(),
            name: fields.name,
            description: fields.description,
            personality: fields.personality,
            created_at: Utc::now(),
            image: fields.image,
            welcome_message: Some(fields.welcome_message),
            settings: None,
        };

        self.buddies.push(buddy.clone());
        if let Err(e) = self.persist() {
            self.buddies.pop();
            return Err(e);
        }

        tracing::info!("[BuddyStore] Created buddy {} ({})", buddy.id, buddy.name);
        Ok(buddy)
    }

    /// Replaces the buddy with the same id.
    ///
    /// Returns `NotFound` (leaving the store untouched) if the id is absent.
    pub fn update(&mut self, buddy: Buddy) -> Result<()> {
        if buddy.name.trim().is_empty() {
            return Err(ValidationError::MissingName.into());
        }
        if let Some(settings) = buddy.settings
            && !settings.is_valid()
        {
            return Err(ValidationError::CreativityOutOfRange(settings.creativity_percent()).into());
        }

        let index = self
            .buddies
            .iter()
            .position(|b| b.id == buddy.id)
            .ok_or_else(|| BuddyError::not_found("buddy", &buddy.id))?;

        let previous = std::mem::replace(&mut self.buddies[index], buddy);
        if let Err(e) = self.persist() {
            self.buddies[index] = previous;
            return Err(e);
        }

        tracing::info!("[BuddyStore] Updated buddy {}", self.buddies[index].id);
        Ok(())
    }

    /// Removes the buddy with `id` if present.
    ///
    /// Deleting an unknown id is not an error. Returns whether a buddy was
    /// removed.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let removed = self
            .buddies
            .iter()
            .position(|b| b.id == id)
            .map(|index| (index, self.buddies.remove(index)));

        if let Err(e) = self.persist() {
            if let Some((index, buddy)) = removed {
                self.buddies.insert(index, buddy);
            }
            return Err(e);
        }

        match removed {
            Some(_) => tracing::info!("[BuddyStore] Deleted buddy {}", id),
            None => tracing::debug!("[BuddyStore] Delete of unknown buddy {} ignored", id),
        }
        Ok(removed.is_some())
    }

    fn persist(&self) -> Result<()> {
        self.repository.save_all(&self.buddies)
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.buddies.contains_buddy(&id) {
                return id;
            }
        }
    }
}

impl BuddyLookup for BuddyStore {
    fn contains_buddy(&self, id: &str) -> bool {
        self.buddies.contains_buddy(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buddy::{CreateBuddyRequest, Personality};
    use std::sync::Mutex;

    /// Repository fake with switchable failure modes.
    #[derive(Default)]
    struct FakeRepository {
        stored: Mutex<Option<Vec<Buddy>>>,
        corrupt: Mutex<bool>,
        fail_saves: Mutex<bool>,
    }

    impl BuddyRepository for FakeRepository {
        fn get_all(&self) -> Result<Option<Vec<Buddy>>> {
            if *self.corrupt.lock().unwrap() {
                return Err(BuddyError::corruption("not an array"));
            }
            Ok(self.stored.lock().unwrap().clone())
        }

        fn save_all(&self, buddies: &[Buddy]) -> Result<()> {
            if *self.fail_saves.lock().unwrap() {
                return Err(BuddyError::io("disk full"));
            }
            *self.stored.lock().unwrap() = Some(buddies.to_vec());
            *self.corrupt.lock().unwrap() = false;
            Ok(())
        }
    }

    fn loaded_store() -> (Arc<FakeRepository>, BuddyStore) {
        let repo = Arc::new(FakeRepository::default());
        let mut store = BuddyStore::new(repo.clone());
        store.load().unwrap();
        (repo, store)
    }

    fn zed() -> ValidatedBuddy {
        CreateBuddyRequest::new("Zed", "Witty").validate().unwrap()
    }

    #[test]
    fn test_load_empty_installs_and_persists_seeds() {
        let (repo, store) = loaded_store();
        let ids: Vec<&str> = store.all().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(repo.stored.lock().unwrap().as_ref().unwrap().len(), 3);
    }

    #[test]
    fn test_load_corrupt_falls_back_to_seeds() {
        let repo = Arc::new(FakeRepository::default());
        *repo.corrupt.lock().unwrap() = true;
        let mut store = BuddyStore::new(repo.clone());
        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].name, "Alex Assistant");
    }

    #[test]
    fn test_load_keeps_stored_empty_collection() {
        let repo = Arc::new(FakeRepository::default());
        *repo.stored.lock().unwrap() = Some(Vec::new());
        let mut store = BuddyStore::new(repo);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_create_assigns_unique_id_and_persists() {
        let (repo, mut store) = loaded_store();
        let buddy = store.create(zed()).unwrap();
        assert!(!buddy.id.is_empty());
        assert!(!["1", "2", "3"].contains(&buddy.id.as_str()));
        assert_eq!(buddy.personality, Personality::Witty);
        assert_eq!(store.len(), 4);
        let stored = repo.stored.lock().unwrap().clone().unwrap();
        assert_eq!(stored.last().unwrap().id, buddy.id);
    }

    #[test]
    fn test_create_rolls_back_on_save_failure() {
        let (repo, mut store) = loaded_store();
        *repo.fail_saves.lock().unwrap() = true;
        assert!(store.create(zed()).is_err());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_update_replaces_whole_record() {
        let (repo, mut store) = loaded_store();
        let mut changed = store.get("2").unwrap().clone();
        changed.name = "Dr. Logic".to_string();
        changed.image = Some("https://example.com/logic.png".to_string());
        store.update(changed.clone()).unwrap();
        assert_eq!(store.get("2"), Some(&changed));
        let stored = repo.stored.lock().unwrap().clone().unwrap();
        assert_eq!(stored[1], changed);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let (_repo, mut store) = loaded_store();
        let before = store.all().to_vec();
        let mut ghost = before[0].clone();
        ghost.id = "999".to_string();
        let err = store.update(ghost).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.all(), before.as_slice());
    }

    #[test]
    fn test_update_rejects_blank_name() {
        let (_repo, mut store) = loaded_store();
        let mut changed = store.get("1").unwrap().clone();
        changed.name = "  ".to_string();
        assert!(store.update(changed).unwrap_err().is_validation());
        assert_eq!(store.get("1").unwrap().name, "Alex Assistant");
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (repo, mut store) = loaded_store();
        assert!(store.delete("1").unwrap());
        let after_once = store.all().to_vec();
        assert!(!store.delete("1").unwrap());
        assert_eq!(store.all(), after_once.as_slice());
        assert_eq!(repo.stored.lock().unwrap().clone().unwrap(), after_once);
    }

    #[test]
    fn test_delete_rolls_back_on_save_failure() {
        let (repo, mut store) = loaded_store();
        *repo.fail_saves.lock().unwrap() = true;
        assert!(store.delete("2").is_err());
        let ids: Vec<&str> = store.all().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }
}
