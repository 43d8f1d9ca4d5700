//! Buddy repository trait.
//!
//! Defines the interface for buddy collection persistence.

use super::model::Buddy;
use crate::error::Result;

/// An abstract repository for persisting the whole buddy collection.
///
/// The collection is always read and written as a unit; there are no
/// per-record operations at this level.
///
/// # Implementation Notes
///
/// Implementations should:
/// - Return `Ok(None)` when nothing has been stored yet
/// - Return `BuddyError::PersistenceCorruption` for any stored content that
///   is not a well-formed buddy collection, rather than a partial result
pub trait BuddyRepository: Send + Sync {
    /// Retrieves the stored collection, in stored order.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Vec<Buddy>))`: The stored buddies (possibly empty)
    /// - `Ok(None)`: Nothing stored yet
    /// - `Err(BuddyError)`: Storage failure or corrupt content
    fn get_all(&self) -> Result<Option<Vec<Buddy>>>;

    /// Replaces the stored collection with `buddies`.
    fn save_all(&self, buddies: &[Buddy]) -> Result<()>;
}
