//! Buddy domain module.
//!
//! This module contains the buddy domain model, the form validator, the seed
//! presets, and the store that keeps the in-memory collection in sync with
//! durable storage.
//!
//! # Module Structure
//!
//! - `model`: Core buddy domain models (`Buddy`, `Personality`, `BuddySettings`)
//! - `request`: Create/settings form models and validation
//! - `preset`: Seed buddies and fixed text tables
//! - `repository`: Repository trait for collection persistence
//! - `store`: `BuddyStore` with write-through persistence
//!
//! # Usage
//!
//! ```ignore
//! use buddy_core::buddy::{Buddy, BuddyStore, CreateBuddyRequest};
//! ```

mod model;
mod preset;
mod repository;
mod request;
mod store;

// Re-export public API
pub use model::{
    Buddy, BuddySettings, DEFAULT_CREATIVITY, DEFAULT_MEMORY, Personality, initials,
};
pub use preset::{
    FALLBACK_WELCOME_MESSAGE, default_description, get_seed_buddies, welcome_message,
    welcome_message_for,
};
pub use repository::BuddyRepository;
pub use request::{CreateBuddyRequest, UpdateBuddyRequest, ValidatedBuddy};
pub use store::{BuddyLookup, BuddyStore};
